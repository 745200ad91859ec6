// region:    --- Imports
use super::AuctionStore;
use crate::bidding::model::{
    Bid, BidOutcome, Category, Comment, Listing, NewListing, NewUser, PriceAudit, User,
};
use crate::database::DatabaseManager;
use crate::error::{AppError, Result};
use crate::query::queries;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Store
/// Postgres 저장소 구현체
pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[derive(sqlx::FromRow)]
struct PriceAuditRow {
    id: i64,
    starting_bid: Decimal,
    current_price: Decimal,
    highest_bid: Option<Decimal>,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// 참조 대상이 없는 경우 NotFound 로 변환
fn map_missing_reference(err: sqlx::Error, what: &'static str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::NotFound(what),
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl AuctionStore for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::DuplicateUser
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<()> {
        sqlx::query(queries::INSERT_SESSION)
            .bind(token)
            .bind(user_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_missing_reference(e, "user"))?;
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
            .bind(token)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
            .bind(name)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::validation("category already exists")
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing> {
        sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.starting_bid)
            .bind(listing.creator_id)
            .bind(listing.category_id)
            .bind(&listing.image_url)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_missing_reference(e, "category"))
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn list_listings_by_category(&self, category_id: i64) -> Result<Vec<Listing>> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_BY_CATEGORY)
            .bind(category_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        user_id: i64,
        amount: Decimal,
    ) -> Result<BidOutcome> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 현재 가격 확인 및 업데이트
                    let updated = sqlx::query(queries::UPDATE_PRICE_IF_HIGHER)
                        .bind(amount)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    if updated.is_none() {
                        let current_price: Option<Decimal> =
                            sqlx::query_scalar(queries::GET_LISTING_CURRENT_PRICE)
                                .bind(listing_id)
                                .fetch_optional(&mut **tx)
                                .await?;
                        debug!(
                            "{:<12} --> 입찰 실패: 현재 가격이 더 높거나 같음 ({:?})",
                            "Store", current_price
                        );
                        return match current_price {
                            Some(current_price) => Ok(BidOutcome::Rejected { current_price }),
                            None => Err(AppError::NotFound("listing")),
                        };
                    }

                    // 입찰 기록 추가
                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(user_id)
                        .bind(amount)
                        .fetch_one(&mut **tx)
                        .await?;

                    info!("{:<12} --> 입찰 성공: 현재 가격 {}", "Store", bid.amount);
                    Ok::<_, AppError>(BidOutcome::Accepted(bid))
                })
            })
            .await
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn price_audit(&self, listing_id: i64) -> Result<Option<PriceAudit>> {
        let row = sqlx::query_as::<_, PriceAuditRow>(queries::GET_PRICE_AUDIT)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|r| PriceAudit::new(r.id, r.starting_bid, r.current_price, r.highest_bid)))
    }

    async fn add_comment(&self, listing_id: i64, user_id: i64, text: &str) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(listing_id)
            .bind(user_id)
            .bind(text)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_missing_reference(e, "listing"))
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()> {
        sqlx::query(queries::INSERT_WATCHLIST)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_missing_reference(e, "listing"))?;
        Ok(())
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()> {
        sqlx::query(queries::DELETE_WATCHLIST)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool> {
        Ok(sqlx::query_scalar::<_, bool>(queries::EXISTS_WATCHLIST)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_USER_WATCHLIST)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?)
    }
}

// endregion: --- Postgres Store
