use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    // argon2 해시, 응답에는 포함하지 않음
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 상품(리스팅) 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    pub current_price: Decimal,
    pub creator_id: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// 관심 목록 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
}

/// 검증이 끝난 상품 생성 입력
#[derive(Debug, Clone)]
pub struct NewListing {
    pub creator_id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

/// 검증이 끝난 사용자 생성 입력
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 저장소의 입찰 처리 결과
#[derive(Debug, Clone)]
pub enum BidOutcome {
    Accepted(Bid),
    Rejected { current_price: Decimal },
}

/// 캐시된 현재 가격과 입찰 이력에서 계산한 가격 비교 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceAudit {
    pub listing_id: i64,
    pub starting_bid: Decimal,
    pub current_price: Decimal,
    pub highest_bid: Option<Decimal>,
    pub derived_price: Decimal,
    pub consistent: bool,
}

impl PriceAudit {
    pub fn new(
        listing_id: i64,
        starting_bid: Decimal,
        current_price: Decimal,
        highest_bid: Option<Decimal>,
    ) -> Self {
        let derived_price = highest_bid.map_or(starting_bid, |h| h.max(starting_bid));
        Self {
            listing_id,
            starting_bid,
            current_price,
            highest_bid,
            derived_price,
            consistent: derived_price == current_price && current_price >= starting_bid,
        }
    }
}
