/// 인메모리 저장소
/// DATABASE_URL 없이 실행하거나 테스트할 때 사용
/// 모든 상태를 하나의 뮤텍스로 보호하므로 입찰 비교-갱신-기록이 원자적으로 처리된다.
// region:    --- Imports
use super::AuctionStore;
use crate::bidding::model::{
    Bid, BidOutcome, Category, Comment, Listing, NewListing, NewUser, PriceAudit, User,
    WatchlistEntry,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

// endregion: --- Imports

// region:    --- Memory Store
#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    sessions: HashMap<String, i64>,
    categories: Vec<Category>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    watchlist: Vec<WatchlistEntry>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn listing(&self, listing_id: i64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == listing_id)
    }

    fn listing_mut(&mut self, listing_id: i64) -> Option<&mut Listing> {
        self.listings.iter_mut().find(|l| l.id == listing_id)
    }

    fn user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl AuctionStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUser);
        }
        let user = User {
            id: state.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.user(user_id).is_none() {
            return Err(AppError::NotFound("user"));
        }
        state.sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .get(token)
            .and_then(|user_id| state.user(*user_id))
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.state.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        let mut state = self.state.lock().await;
        if state.categories.iter().any(|c| c.name == name) {
            return Err(AppError::validation("category already exists"));
        }
        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state.categories.iter().find(|c| c.id == category_id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.state.lock().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing> {
        let mut state = self.state.lock().await;
        if let Some(category_id) = listing.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(AppError::NotFound("category"));
            }
        }
        let listing = Listing {
            id: state.next_id(),
            title: listing.title,
            description: listing.description,
            starting_bid: listing.starting_bid,
            current_price: listing.starting_bid,
            creator_id: listing.creator_id,
            category_id: listing.category_id,
            image_url: listing.image_url,
            created_at: Utc::now(),
        };
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>> {
        Ok(self.state.lock().await.listing(listing_id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        let mut listings = self.state.lock().await.listings.clone();
        newest_first(&mut listings);
        Ok(listings)
    }

    async fn list_listings_by_category(&self, category_id: i64) -> Result<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .state
            .lock()
            .await
            .listings
            .iter()
            .filter(|l| l.category_id == Some(category_id))
            .cloned()
            .collect();
        newest_first(&mut listings);
        Ok(listings)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        user_id: i64,
        amount: Decimal,
    ) -> Result<BidOutcome> {
        let mut state = self.state.lock().await;
        let listing = state
            .listing_mut(listing_id)
            .ok_or(AppError::NotFound("listing"))?;
        if amount <= listing.current_price {
            debug!(
                "{:<12} --> 입찰 거절: {} <= {}",
                "Store", amount, listing.current_price
            );
            return Ok(BidOutcome::Rejected {
                current_price: listing.current_price,
            });
        }
        listing.current_price = amount;

        // 수락된 입찰만 id 를 할당
        let bid = Bid {
            id: state.next_id(),
            listing_id,
            user_id,
            amount,
            created_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(BidOutcome::Accepted(bid))
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>> {
        let state = self.state.lock().await;
        Ok(state
            .bids
            .iter()
            .rev()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn price_audit(&self, listing_id: i64) -> Result<Option<PriceAudit>> {
        let state = self.state.lock().await;
        let Some(listing) = state.listing(listing_id) else {
            return Ok(None);
        };
        let highest_bid = state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(|b| b.amount)
            .max();
        Ok(Some(PriceAudit::new(
            listing.id,
            listing.starting_bid,
            listing.current_price,
            highest_bid,
        )))
    }

    async fn add_comment(&self, listing_id: i64, user_id: i64, text: &str) -> Result<Comment> {
        let mut state = self.state.lock().await;
        if state.listing(listing_id).is_none() {
            return Err(AppError::NotFound("listing"));
        }
        let comment = Comment {
            id: state.next_id(),
            listing_id,
            user_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.listing(listing_id).is_none() {
            return Err(AppError::NotFound("listing"));
        }
        let exists = state
            .watchlist
            .iter()
            .any(|w| w.user_id == user_id && w.listing_id == listing_id);
        if !exists {
            let id = state.next_id();
            state.watchlist.push(WatchlistEntry {
                id,
                user_id,
                listing_id,
            });
        }
        Ok(())
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<()> {
        self.state
            .lock()
            .await
            .watchlist
            .retain(|w| !(w.user_id == user_id && w.listing_id == listing_id));
        Ok(())
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .watchlist
            .iter()
            .any(|w| w.user_id == user_id && w.listing_id == listing_id))
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>> {
        let state = self.state.lock().await;
        Ok(state
            .watchlist
            .iter()
            .filter(|w| w.user_id == user_id)
            .filter_map(|w| state.listing(w.listing_id))
            .cloned()
            .collect())
    }
}

// endregion: --- Memory Store
