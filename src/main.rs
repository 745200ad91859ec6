// region:    --- Imports
use auction_listings::config::Config;
use auction_listings::database::DatabaseManager;
use auction_listings::handlers::{self, AppState};
use auction_listings::store::{AuctionStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 환경 변수 설정 로드
    let config = Config::from_env()?;
    info!("{:<12} --> 설정 로드: {:?}", "Main", config.bind_addr);

    // 저장소 선택 (DATABASE_URL 이 있으면 Postgres)
    let store: Arc<dyn AuctionStore> = match DatabaseManager::from_config(&config).await? {
        Some(db_manager) => {
            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database(config.reset_database).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresStore::new(Arc::new(db_manager)))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 인메모리 저장소 사용",
                "Main"
            );
            Arc::new(MemoryStore::new())
        }
    };

    // 라우터 설정
    let routes_all = handlers::router(AppState::new(store));

    // 리스너 생성
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
