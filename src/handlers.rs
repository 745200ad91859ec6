// region:    --- Imports
use crate::auth::{self, LoginCommand, RegisterCommand, SessionGrant};
use crate::bidding::commands::{
    handle_add_comment, handle_create_category, handle_create_listing, handle_place_bid,
    handle_toggle_watchlist, AddCommentCommand, CreateCategoryCommand, CreateListingCommand,
    PlaceBidCommand, ToggleWatchlistCommand, WatchlistStatus,
};
use crate::bidding::model::{Bid, Category, Comment, Listing, PriceAudit, User};
use crate::error::{AppError, Result};
use crate::query::handlers::{self as query, CategoryListings, ListingDetail, ListingIndex};
use crate::store::AuctionStore;
use axum::async_trait;
use axum::extract::{DefaultBodyLimit, FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- State / Session
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AuctionStore>) -> Self {
        Self { store }
    }
}

/// 요청별 세션 컨텍스트 (Authorization: Bearer <token>)
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// 로그인 필수 요청
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token =
            match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
                Ok(TypedHeader(authorization)) => authorization.token().to_string(),
                Err(_) => {
                    return Ok(Self {
                        token: None,
                        user: None,
                    })
                }
            };

        let user = auth::resolve_session(state.store.as_ref(), &token).await?;
        Ok(Self {
            token: user.as_ref().map(|_| token),
            user,
        })
    }
}

// endregion: --- State / Session

// region:    --- Router
/// 라우터 설정
pub fn router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/listings", get(handle_get_index).post(handle_create_listing_req))
        .route("/listings/:id", get(handle_get_listing))
        .route(
            "/listings/:id/bids",
            get(handle_get_bid_history).post(handle_bid),
        )
        .route("/listings/:id/comments", post(handle_comment))
        .route("/listings/:id/watchlist", post(handle_watchlist))
        .route("/listings/:id/price-audit", get(handle_get_price_audit))
        .route("/watchlist", get(handle_get_watchlist))
        .route(
            "/categories",
            get(handle_get_categories).post(handle_create_category_req),
        )
        .route("/categories/:id", get(handle_get_category_listings))
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

// endregion: --- Router

// region:    --- Command Handlers

#[derive(Serialize)]
pub struct BidResponse {
    pub message: &'static str,
    pub current_price: rust_decimal::Decimal,
    pub bid: Bid,
}

/// 상품 등록 요청 처리
pub async fn handle_create_listing_req(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(cmd), _): WithRejection<Json<CreateListingCommand>, AppError>,
) -> Result<(StatusCode, Json<Listing>)> {
    info!("{:<12} --> 상품 등록 요청", "HandlerCmd");
    let user = session.require_user()?;
    let listing = handle_create_listing(state.store.as_ref(), user, cmd).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(cmd), _): WithRejection<Json<PlaceBidCommand>, AppError>,
) -> Result<(StatusCode, Json<BidResponse>)> {
    info!("{:<12} --> 입찰 요청 id: {}", "HandlerCmd", listing_id);
    let user = session.require_user()?;
    let bid = handle_place_bid(state.store.as_ref(), user, listing_id, cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(BidResponse {
            message: "bid placed",
            current_price: bid.amount,
            bid,
        }),
    ))
}

/// 댓글 작성 요청 처리
pub async fn handle_comment(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(cmd), _): WithRejection<Json<AddCommentCommand>, AppError>,
) -> Result<(StatusCode, Json<Comment>)> {
    info!("{:<12} --> 댓글 작성 요청 id: {}", "HandlerCmd", listing_id);
    let user = session.require_user()?;
    let comment = handle_add_comment(state.store.as_ref(), user, listing_id, cmd).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// 관심 목록 추가/삭제 요청 처리
pub async fn handle_watchlist(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(cmd), _): WithRejection<Json<ToggleWatchlistCommand>, AppError>,
) -> Result<Json<WatchlistStatus>> {
    info!("{:<12} --> 관심 목록 요청 id: {}", "HandlerCmd", listing_id);
    let user = session.require_user()?;
    let status = handle_toggle_watchlist(state.store.as_ref(), user, listing_id, cmd).await?;
    Ok(Json(status))
}

/// 카테고리 등록 요청 처리
pub async fn handle_create_category_req(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(cmd), _): WithRejection<Json<CreateCategoryCommand>, AppError>,
) -> Result<(StatusCode, Json<Category>)> {
    info!("{:<12} --> 카테고리 등록 요청", "HandlerCmd");
    session.require_user()?;
    let category = handle_create_category(state.store.as_ref(), cmd).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// 회원 가입 요청 처리
pub async fn handle_register(
    State(state): State<AppState>,
    WithRejection(Json(cmd), _): WithRejection<Json<RegisterCommand>, AppError>,
) -> Result<(StatusCode, Json<SessionGrant>)> {
    info!("{:<12} --> 회원 가입 요청", "HandlerCmd");
    let grant = auth::register(state.store.as_ref(), cmd).await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// 로그인 요청 처리
pub async fn handle_login(
    State(state): State<AppState>,
    WithRejection(Json(cmd), _): WithRejection<Json<LoginCommand>, AppError>,
) -> Result<Json<SessionGrant>> {
    info!("{:<12} --> 로그인 요청", "HandlerCmd");
    Ok(Json(auth::login(state.store.as_ref(), cmd).await?))
}

/// 로그아웃 요청 처리
pub async fn handle_logout(State(state): State<AppState>, session: Session) -> Result<StatusCode> {
    info!("{:<12} --> 로그아웃 요청", "HandlerCmd");
    if let Some(token) = &session.token {
        auth::logout(state.store.as_ref(), token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 상품 및 카테고리 조회
pub async fn handle_get_index(State(state): State<AppState>) -> Result<Json<ListingIndex>> {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    Ok(Json(query::get_index(state.store.as_ref()).await?))
}

/// 상품 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ListingDetail>> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", listing_id);
    let detail =
        query::get_listing_detail(state.store.as_ref(), listing_id, session.user.as_ref()).await?;
    Ok(Json(detail))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Vec<Bid>>> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    Ok(Json(
        query::get_bid_history(state.store.as_ref(), listing_id).await?,
    ))
}

/// 현재 가격 점검
pub async fn handle_get_price_audit(
    State(state): State<AppState>,
    WithRejection(Path(listing_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<PriceAudit>> {
    info!("{:<12} --> 현재 가격 점검 id: {}", "HandlerQuery", listing_id);
    Ok(Json(
        query::get_price_audit(state.store.as_ref(), listing_id).await?,
    ))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Listing>>> {
    info!("{:<12} --> 관심 목록 조회", "HandlerQuery");
    let user = session.require_user()?;
    Ok(Json(query::get_watchlist(state.store.as_ref(), user).await?))
}

/// 카테고리 조회
pub async fn handle_get_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    info!("{:<12} --> 카테고리 조회", "HandlerQuery");
    Ok(Json(query::get_categories(state.store.as_ref()).await?))
}

/// 카테고리별 상품 조회
pub async fn handle_get_category_listings(
    State(state): State<AppState>,
    WithRejection(Path(category_id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<CategoryListings>> {
    info!(
        "{:<12} --> 카테고리별 상품 조회 id: {}",
        "HandlerQuery", category_id
    );
    Ok(Json(
        query::get_category_listings(state.store.as_ref(), category_id).await?,
    ))
}

// endregion: --- Query Handlers
