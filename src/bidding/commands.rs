/// 입찰 서비스 커맨드 처리
/// 1. 상품 등록
/// 2. 입찰
/// 3. 댓글 작성
/// 4. 관심 목록 추가/삭제
/// 5. 카테고리 등록
// region:    --- Imports
use super::model::{Bid, BidOutcome, Category, Comment, Listing, NewListing, User};
use super::money::validate_amount;
use crate::error::{AppError, Result};
use crate::store::AuctionStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

const MAX_TITLE_LEN: usize = 64;
const MAX_CATEGORY_NAME_LEN: usize = 64;

// region:    --- Commands
/// 상품 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: Decimal,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub text: String,
}

/// 관심 목록 명령 (add=false 이면 삭제)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToggleWatchlistCommand {
    pub add: bool,
}

/// 카테고리 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
}

/// 관심 목록 처리 결과
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WatchlistStatus {
    pub listing_id: i64,
    pub in_watchlist: bool,
}

// endregion: --- Commands

// region:    --- Command Handlers
/// 1. 상품 등록 (현재 가격 = 시작 가격)
pub async fn handle_create_listing(
    store: &dyn AuctionStore,
    creator: &User,
    cmd: CreateListingCommand,
) -> Result<Listing> {
    info!("{:<12} --> 상품 등록 요청 처리 시작: {:?}", "Command", cmd);

    let title = cmd.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }

    let description = cmd.description.trim();
    if description.is_empty() {
        return Err(AppError::validation("description is required"));
    }

    let starting_bid = validate_amount("starting_bid", cmd.starting_bid)?;

    let image_url = match cmd.image_url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            Some(url.to_string())
        }
        Some(_) => return Err(AppError::validation("image_url must be an http(s) URL")),
    };

    if let Some(category_id) = cmd.category_id {
        if store.get_category(category_id).await?.is_none() {
            return Err(AppError::NotFound("category"));
        }
    }

    let listing = store
        .create_listing(NewListing {
            creator_id: creator.id,
            title: title.to_string(),
            description: description.to_string(),
            starting_bid,
            category_id: cmd.category_id,
            image_url,
        })
        .await?;

    info!(
        "{:<12} --> 상품 등록 성공: id={}, 시작 가격 {}",
        "Command", listing.id, listing.starting_bid
    );
    Ok(listing)
}

/// 2. 입찰
/// 현재 가격보다 높은 금액만 허용 (같으면 거절)
pub async fn handle_place_bid(
    store: &dyn AuctionStore,
    bidder: &User,
    listing_id: i64,
    cmd: PlaceBidCommand,
) -> Result<Bid> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: listing_id={}, {:?}",
        "Command", listing_id, cmd
    );

    let amount = validate_amount("amount", cmd.amount)?;

    match store.place_bid(listing_id, bidder.id, amount).await? {
        BidOutcome::Accepted(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing_id={}, 현재 가격 {}",
                "Command", listing_id, bid.amount
            );
            Ok(bid)
        }
        BidOutcome::Rejected { current_price } => {
            warn!(
                "{:<12} --> 입찰 금액이 현재 가격보다 높지 않음: {} <= {}",
                "Command", amount, current_price
            );
            Err(AppError::BidTooLow { current_price })
        }
    }
}

/// 3. 댓글 작성
pub async fn handle_add_comment(
    store: &dyn AuctionStore,
    author: &User,
    listing_id: i64,
    cmd: AddCommentCommand,
) -> Result<Comment> {
    info!(
        "{:<12} --> 댓글 작성 요청 처리 시작: listing_id={}",
        "Command", listing_id
    );

    let text = cmd.text.trim();
    if text.is_empty() {
        return Err(AppError::validation("comment text is required"));
    }

    store.add_comment(listing_id, author.id, text).await
}

/// 4. 관심 목록 추가/삭제
pub async fn handle_toggle_watchlist(
    store: &dyn AuctionStore,
    user: &User,
    listing_id: i64,
    cmd: ToggleWatchlistCommand,
) -> Result<WatchlistStatus> {
    info!(
        "{:<12} --> 관심 목록 요청 처리 시작: listing_id={}, add={}",
        "Command", listing_id, cmd.add
    );

    if store.get_listing(listing_id).await?.is_none() {
        return Err(AppError::NotFound("listing"));
    }

    if cmd.add {
        store.add_to_watchlist(user.id, listing_id).await?;
    } else {
        store.remove_from_watchlist(user.id, listing_id).await?;
    }

    Ok(WatchlistStatus {
        listing_id,
        in_watchlist: cmd.add,
    })
}

/// 5. 카테고리 등록
pub async fn handle_create_category(
    store: &dyn AuctionStore,
    cmd: CreateCategoryCommand,
) -> Result<Category> {
    info!("{:<12} --> 카테고리 등록 요청: {:?}", "Command", cmd);

    let name = cmd.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("category name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(AppError::validation(format!(
            "category name must be at most {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }

    store.create_category(name).await
}

// endregion: --- Command Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn listing_cmd(starting_bid: &str) -> CreateListingCommand {
        CreateListingCommand {
            title: "Vintage camera".to_string(),
            description: "Rangefinder, works fine".to_string(),
            starting_bid: dec(starting_bid),
            category_id: None,
            image_url: None,
        }
    }

    async fn bid(store: &MemoryStore, bidder: &User, listing_id: i64, amount: &str) -> Result<Bid> {
        handle_place_bid(
            store,
            bidder,
            listing_id,
            PlaceBidCommand {
                amount: dec(amount),
            },
        )
        .await
    }

    #[tokio::test]
    async fn new_listing_starts_at_starting_bid() {
        let store = MemoryStore::new();
        let listing = handle_create_listing(&store, &user(1), listing_cmd("100"))
            .await
            .unwrap();
        assert_eq!(listing.current_price, dec("100.00"));
        assert_eq!(listing.starting_bid, listing.current_price);

        let stored = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(stored.current_price, dec("100"));
    }

    #[tokio::test]
    async fn bidding_sequence_requires_strictly_higher_amounts() {
        let store = MemoryStore::new();
        let seller = user(1);
        let bidder = user(2);
        let listing = handle_create_listing(&store, &seller, listing_cmd("10.00"))
            .await
            .unwrap();

        let err = bid(&store, &bidder, listing.id, "10.00").await.unwrap_err();
        assert!(matches!(err, AppError::BidTooLow { current_price } if current_price == dec("10.00")));

        let accepted = bid(&store, &bidder, listing.id, "10.01").await.unwrap();
        assert_eq!(accepted.amount, dec("10.01"));
        let current = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(current.current_price, dec("10.01"));

        let err = bid(&store, &bidder, listing.id, "10.01").await.unwrap_err();
        assert!(matches!(err, AppError::BidTooLow { .. }));

        bid(&store, &bidder, listing.id, "15.00").await.unwrap();
        let current = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(current.current_price, dec("15.00"));

        let history = store.list_bids(listing.id).await.unwrap();
        let amounts: Vec<Decimal> = history.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![dec("15.00"), dec("10.01")]);

        let audit = store.price_audit(listing.id).await.unwrap().unwrap();
        assert!(audit.consistent);
    }

    #[tokio::test]
    async fn bid_on_unknown_listing_is_not_found() {
        let store = MemoryStore::new();
        let err = bid(&store, &user(2), 999, "5.00").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("listing")));
    }

    #[tokio::test]
    async fn bid_with_too_much_precision_is_invalid() {
        let store = MemoryStore::new();
        let listing = handle_create_listing(&store, &user(1), listing_cmd("1.00"))
            .await
            .unwrap();
        let err = bid(&store, &user(2), listing.id, "2.005").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_bids(listing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_bids_keep_the_maximum() {
        let store = Arc::new(MemoryStore::new());
        let listing = handle_create_listing(store.as_ref(), &user(1), listing_cmd("15.00"))
            .await
            .unwrap();

        let handles: Vec<_> = ["20.00", "25.00"]
            .into_iter()
            .enumerate()
            .map(|(i, amount)| {
                let store = Arc::clone(&store);
                let bidder = user(10 + i as i64);
                let listing_id = listing.id;
                tokio::spawn(async move { bid(&store, &bidder, listing_id, amount).await })
            })
            .collect();

        let mut accepted = Vec::new();
        for handle in handles {
            if let Ok(bid) = handle.await.unwrap() {
                accepted.push(bid.amount);
            }
        }

        let current = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(current.current_price, dec("25.00"));
        assert_eq!(accepted.iter().max().copied(), Some(dec("25.00")));

        let history = store.list_bids(listing.id).await.unwrap();
        assert_eq!(history.len(), accepted.len());
        assert!(store.price_audit(listing.id).await.unwrap().unwrap().consistent);
    }

    #[tokio::test]
    async fn create_listing_validates_category_reference() {
        let store = MemoryStore::new();
        let mut cmd = listing_cmd("5.00");
        cmd.category_id = Some(42);
        let err = handle_create_listing(&store, &user(1), cmd)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("category")));

        let category = handle_create_category(
            &store,
            CreateCategoryCommand {
                name: "Electronics".to_string(),
            },
        )
        .await
        .unwrap();
        let mut cmd = listing_cmd("5.00");
        cmd.category_id = Some(category.id);
        let listing = handle_create_listing(&store, &user(1), cmd).await.unwrap();
        assert_eq!(listing.category_id, Some(category.id));
    }

    #[tokio::test]
    async fn create_listing_rejects_bad_input() {
        let store = MemoryStore::new();

        let mut cmd = listing_cmd("5.00");
        cmd.title = "   ".to_string();
        assert!(handle_create_listing(&store, &user(1), cmd).await.is_err());

        let mut cmd = listing_cmd("5.00");
        cmd.image_url = Some("ftp://example.com/a.png".to_string());
        assert!(handle_create_listing(&store, &user(1), cmd).await.is_err());

        assert!(handle_create_listing(&store, &user(1), listing_cmd("0"))
            .await
            .is_err());

        let mut cmd = listing_cmd("5.00");
        cmd.image_url = Some(String::new());
        let listing = handle_create_listing(&store, &user(1), cmd).await.unwrap();
        assert!(listing.image_url.is_none());
    }

    #[tokio::test]
    async fn comments_require_text() {
        let store = MemoryStore::new();
        let listing = handle_create_listing(&store, &user(1), listing_cmd("5.00"))
            .await
            .unwrap();

        let err = handle_add_comment(
            &store,
            &user(2),
            listing.id,
            AddCommentCommand {
                text: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let comment = handle_add_comment(
            &store,
            &user(2),
            listing.id,
            AddCommentCommand {
                text: " Is it still available? ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(comment.text, "Is it still available?");
    }

    #[tokio::test]
    async fn watchlist_toggle_is_idempotent() {
        let store = MemoryStore::new();
        let watcher = user(3);
        let listing = handle_create_listing(&store, &user(1), listing_cmd("5.00"))
            .await
            .unwrap();
        let add = || ToggleWatchlistCommand { add: true };

        handle_toggle_watchlist(&store, &watcher, listing.id, add())
            .await
            .unwrap();
        handle_toggle_watchlist(&store, &watcher, listing.id, add())
            .await
            .unwrap();
        assert_eq!(store.list_watchlist(watcher.id).await.unwrap().len(), 1);

        let status = handle_toggle_watchlist(
            &store,
            &watcher,
            listing.id,
            ToggleWatchlistCommand { add: false },
        )
        .await
        .unwrap();
        assert!(!status.in_watchlist);
        assert!(!store.is_watching(watcher.id, listing.id).await.unwrap());

        // 없는 항목 삭제는 에러가 아님
        handle_toggle_watchlist(
            &store,
            &watcher,
            listing.id,
            ToggleWatchlistCommand { add: false },
        )
        .await
        .unwrap();
    }
}
