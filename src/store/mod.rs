// region:    --- Imports
use crate::bidding::model::{
    Bid, BidOutcome, Category, Comment, Listing, NewListing, NewUser, PriceAudit, User,
};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

// endregion: --- Modules

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
///
/// `place_bid` 는 가격 비교, 현재 가격 갱신, 입찰 기록 추가를 하나의 단위로
/// 처리해야 한다. 같은 상품에 대한 입찰은 서로 직렬화된다.
#[async_trait]
pub trait AuctionStore: Send + Sync {
    // --- 사용자 / 세션
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_session(&self, token: &str, user_id: i64) -> Result<()>;
    async fn find_session_user(&self, token: &str) -> Result<Option<User>>;
    async fn delete_session(&self, token: &str) -> Result<()>;

    // --- 카테고리
    async fn create_category(&self, name: &str) -> Result<Category>;
    async fn get_category(&self, category_id: i64) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;

    // --- 상품
    async fn create_listing(&self, listing: NewListing) -> Result<Listing>;
    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>>;
    async fn list_listings(&self) -> Result<Vec<Listing>>;
    async fn list_listings_by_category(&self, category_id: i64) -> Result<Vec<Listing>>;

    // --- 입찰
    /// 존재하지 않는 상품이면 `NotFound`
    async fn place_bid(&self, listing_id: i64, user_id: i64, amount: Decimal)
        -> Result<BidOutcome>;
    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>>;
    async fn price_audit(&self, listing_id: i64) -> Result<Option<PriceAudit>>;

    // --- 댓글
    async fn add_comment(&self, listing_id: i64, user_id: i64, text: &str) -> Result<Comment>;
    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>>;

    // --- 관심 목록
    /// 이미 있으면 아무 것도 하지 않음
    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()>;
    /// 없으면 아무 것도 하지 않음
    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()>;
    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool>;
    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>>;
}

// endregion: --- Auction Store Trait
