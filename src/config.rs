/// 환경 변수 기반 설정
// region:    --- Imports
use crate::error::{AppError, Result};
use std::net::SocketAddr;

// endregion: --- Imports

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    /// None 이면 인메모리 저장소 사용
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// true 이면 시작 시 스키마를 삭제 후 재생성
    pub reset_database: bool,
}

impl Config {
    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키 조회 함수로부터 설정 로드
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Internal(format!("invalid BIND_ADDR: {e}")))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AppError::Internal(format!("invalid DATABASE_MAX_CONNECTIONS: {raw}"))
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let reset_database = matches!(
            lookup("RESET_DATABASE").as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        );

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            reset_database,
        })
    }
}

// endregion: --- Config
