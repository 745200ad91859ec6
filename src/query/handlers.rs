// region:    --- Imports
use crate::bidding::model::{Bid, Category, Comment, Listing, PriceAudit, User};
use crate::error::{AppError, Result};
use crate::store::AuctionStore;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 메인 화면: 전체 상품 + 카테고리
#[derive(Debug, Serialize, Deserialize)]
pub struct ListingIndex {
    pub listings: Vec<Listing>,
    pub categories: Vec<Category>,
}

/// 상품 상세
#[derive(Debug, Serialize, Deserialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub comments: Vec<Comment>,
    pub bid_count: usize,
    pub in_watchlist: bool,
}

/// 카테고리별 상품
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListings {
    pub category: Category,
    pub listings: Vec<Listing>,
}

// endregion: --- Views

// region:    --- Query Handlers

/// 모든 상품 및 카테고리 조회
pub async fn get_index(store: &dyn AuctionStore) -> Result<ListingIndex> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    Ok(ListingIndex {
        listings: store.list_listings().await?,
        categories: store.list_categories().await?,
    })
}

/// 상품 조회
pub async fn get_listing(store: &dyn AuctionStore, listing_id: i64) -> Result<Listing> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    store
        .get_listing(listing_id)
        .await?
        .ok_or(AppError::NotFound("listing"))
}

/// 상품 상세 조회 (비로그인 사용자는 in_watchlist=false)
pub async fn get_listing_detail(
    store: &dyn AuctionStore,
    listing_id: i64,
    viewer: Option<&User>,
) -> Result<ListingDetail> {
    let listing = get_listing(store, listing_id).await?;
    let comments = store.list_comments(listing_id).await?;
    let bid_count = store.list_bids(listing_id).await?.len();
    let in_watchlist = match viewer {
        Some(user) => store.is_watching(user.id, listing_id).await?,
        None => false,
    };

    Ok(ListingDetail {
        listing,
        comments,
        bid_count,
        in_watchlist,
    })
}

/// 입찰 이력 조회 (최신순)
pub async fn get_bid_history(store: &dyn AuctionStore, listing_id: i64) -> Result<Vec<Bid>> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    get_listing(store, listing_id).await?;
    store.list_bids(listing_id).await
}

/// 모든 카테고리 조회
pub async fn get_categories(store: &dyn AuctionStore) -> Result<Vec<Category>> {
    info!("{:<12} --> 카테고리 조회", "Query");
    store.list_categories().await
}

/// 카테고리별 상품 조회
pub async fn get_category_listings(
    store: &dyn AuctionStore,
    category_id: i64,
) -> Result<CategoryListings> {
    info!("{:<12} --> 카테고리별 상품 조회 id: {}", "Query", category_id);
    let category = store
        .get_category(category_id)
        .await?
        .ok_or(AppError::NotFound("category"))?;
    let listings = store.list_listings_by_category(category_id).await?;
    Ok(CategoryListings { category, listings })
}

/// 관심 목록 조회
pub async fn get_watchlist(store: &dyn AuctionStore, user: &User) -> Result<Vec<Listing>> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "Query", user.id);
    store.list_watchlist(user.id).await
}

/// 현재 가격 점검: max(입찰 최고가, 시작 가격) 과 비교
pub async fn get_price_audit(store: &dyn AuctionStore, listing_id: i64) -> Result<PriceAudit> {
    info!("{:<12} --> 현재 가격 점검 id: {}", "Query", listing_id);
    store
        .price_audit(listing_id)
        .await?
        .ok_or(AppError::NotFound("listing"))
}

// endregion: --- Query Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::model::NewListing;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn viewer(id: i64) -> User {
        User {
            id,
            username: format!("viewer{id}"),
            email: format!("viewer{id}@example.com"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    async fn seed_listing(store: &MemoryStore, category_id: Option<i64>) -> Listing {
        store
            .create_listing(NewListing {
                creator_id: 1,
                title: "Bicycle".to_string(),
                description: "Steel frame".to_string(),
                starting_bid: Decimal::new(5000, 2),
                category_id,
                image_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn detail_reports_watchlist_membership() {
        let store = MemoryStore::new();
        let listing = seed_listing(&store, None).await;
        let user = viewer(5);

        let anonymous = get_listing_detail(&store, listing.id, None).await.unwrap();
        assert!(!anonymous.in_watchlist);

        store.add_to_watchlist(user.id, listing.id).await.unwrap();
        store.add_comment(listing.id, user.id, "first").await.unwrap();
        store.add_comment(listing.id, user.id, "second").await.unwrap();

        let detail = get_listing_detail(&store, listing.id, Some(&user))
            .await
            .unwrap();
        assert!(detail.in_watchlist);
        let texts: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(detail.bid_count, 0);
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let store = MemoryStore::new();
        let err = get_listing_detail(&store, 404, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("listing")));
        assert!(get_bid_history(&store, 404).await.is_err());
        assert!(get_price_audit(&store, 404).await.is_err());
    }

    #[tokio::test]
    async fn category_listings_are_filtered() {
        let store = MemoryStore::new();
        let books = store.create_category("Books").await.unwrap();
        let toys = store.create_category("Toys").await.unwrap();
        let in_books = seed_listing(&store, Some(books.id)).await;
        seed_listing(&store, Some(toys.id)).await;
        seed_listing(&store, None).await;

        let view = get_category_listings(&store, books.id).await.unwrap();
        assert_eq!(view.category, books);
        assert_eq!(view.listings.len(), 1);
        assert_eq!(view.listings[0].id, in_books.id);

        let err = get_category_listings(&store, 9999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("category")));
    }

    #[tokio::test]
    async fn index_lists_everything() {
        let store = MemoryStore::new();
        store.create_category("Music").await.unwrap();
        store.create_category("Art").await.unwrap();
        seed_listing(&store, None).await;
        seed_listing(&store, None).await;

        let index = get_index(&store).await.unwrap();
        assert_eq!(index.listings.len(), 2);
        let names: Vec<&str> = index.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Music"]);
    }
}
