/// 인증 처리
/// 1. 회원 가입
/// 2. 로그인
/// 3. 로그아웃
/// 4. 세션 조회
// region:    --- Imports
use crate::bidding::model::{NewUser, User};
use crate::error::{AppError, Result};
use crate::store::AuctionStore;
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 회원 가입 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// 로그인 결과 (Bearer 토큰 + 사용자)
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionGrant {
    pub token: String,
    pub user: User,
}

// endregion: --- Commands

// region:    --- Password
/// argon2 비밀번호 해시 생성
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}

/// argon2 해시와 비밀번호 비교
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(err) => {
            error!("{:<12} --> 비밀번호 해시 파싱 실패: {}", "Auth", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

// endregion: --- Password

// region:    --- Auth Operations
/// 1. 회원 가입 후 바로 로그인
pub async fn register(store: &dyn AuctionStore, cmd: RegisterCommand) -> Result<SessionGrant> {
    let username = cmd.username.trim();
    info!("{:<12} --> 회원 가입 요청: {}", "Auth", username);

    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if cmd.password.is_empty() {
        return Err(AppError::validation("password is required"));
    }
    if cmd.password != cmd.confirmation {
        return Err(AppError::PasswordMismatch);
    }
    let email = cmd.email.trim();
    if !email.contains('@') {
        return Err(AppError::validation("a valid email is required"));
    }

    let user = store
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(&cmd.password)?,
        })
        .await?;

    start_session(store, user).await
}

/// 2. 로그인
pub async fn login(store: &dyn AuctionStore, cmd: LoginCommand) -> Result<SessionGrant> {
    info!("{:<12} --> 로그인 요청: {}", "Auth", cmd.username);

    let user = match store.find_user_by_username(cmd.username.trim()).await? {
        Some(user) if verify_password(&user.password_hash, &cmd.password) => user,
        _ => {
            warn!("{:<12} --> 로그인 실패: {}", "Auth", cmd.username);
            return Err(AppError::CredentialMismatch);
        }
    };

    start_session(store, user).await
}

/// 3. 로그아웃 (없는 토큰이면 아무 것도 하지 않음)
pub async fn logout(store: &dyn AuctionStore, token: &str) -> Result<()> {
    info!("{:<12} --> 로그아웃", "Auth");
    store.delete_session(token).await
}

/// 4. 토큰으로 세션 사용자 조회
pub async fn resolve_session(store: &dyn AuctionStore, token: &str) -> Result<Option<User>> {
    store.find_session_user(token).await
}

async fn start_session(store: &dyn AuctionStore, user: User) -> Result<SessionGrant> {
    let token = uuid::Uuid::new_v4().to_string();
    store.create_session(&token, user.id).await?;
    info!("{:<12} --> 세션 생성: user_id={}", "Auth", user.id);
    Ok(SessionGrant { token, user })
}

// endregion: --- Auth Operations

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn register_cmd(username: &str, password: &str, confirmation: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-hash", "anything"));
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemoryStore::new();
        let grant = register(&store, register_cmd("alice", "pw", "pw"))
            .await
            .unwrap();
        let session_user = resolve_session(&store, &grant.token).await.unwrap();
        assert_eq!(session_user.map(|u| u.username), Some("alice".to_string()));

        let login_grant = login(
            &store,
            LoginCommand {
                username: "alice".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();
        assert_ne!(login_grant.token, grant.token);
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords() {
        let store = MemoryStore::new();
        let err = register(&store, register_cmd("bob", "pw", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PasswordMismatch));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let store = MemoryStore::new();
        register(&store, register_cmd("carol", "pw", "pw"))
            .await
            .unwrap();
        let err = register(&store, register_cmd("carol", "pw2", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let store = MemoryStore::new();
        register(&store, register_cmd("dave", "right", "right"))
            .await
            .unwrap();
        let err = login(
            &store,
            LoginCommand {
                username: "dave".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::CredentialMismatch));

        let err = login(
            &store,
            LoginCommand {
                username: "nobody".to_string(),
                password: "right".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::CredentialMismatch));
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let store = MemoryStore::new();
        let grant = register(&store, register_cmd("erin", "pw", "pw"))
            .await
            .unwrap();
        logout(&store, &grant.token).await.unwrap();
        assert!(resolve_session(&store, &grant.token).await.unwrap().is_none());
        // 없는 토큰 로그아웃은 에러가 아님
        logout(&store, "missing").await.unwrap();
    }
}
