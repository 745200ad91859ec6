// region:    --- Users / Sessions
/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자 조회 (username)
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 세션 생성
pub const INSERT_SESSION: &str = "INSERT INTO sessions (token, user_id) VALUES ($1, $2)";

/// 세션 사용자 조회
pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.created_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = $1
"#;

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

// endregion: --- Users / Sessions

// region:    --- Categories
/// 카테고리 생성
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name ASC";

// endregion: --- Categories

// region:    --- Listings
/// 상품 생성 (현재 가격 = 시작 가격)
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, starting_bid, current_price, creator_id, category_id, image_url)
    VALUES ($1, $2, $3, $3, $4, $5, $6)
    RETURNING id, title, description, starting_bid, current_price, creator_id, category_id, image_url, created_at
"#;

/// 상품 조회
pub const GET_LISTING: &str =
    "SELECT id, title, description, starting_bid, current_price, creator_id, category_id, image_url, created_at FROM listings WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str =
    "SELECT id, title, description, starting_bid, current_price, creator_id, category_id, image_url, created_at FROM listings ORDER BY created_at DESC, id DESC";

/// 카테고리별 상품 조회
pub const GET_LISTINGS_BY_CATEGORY: &str =
    "SELECT id, title, description, starting_bid, current_price, creator_id, category_id, image_url, created_at FROM listings WHERE category_id = $1 ORDER BY created_at DESC, id DESC";

/// 상품 현재 가격 조회
pub const GET_LISTING_CURRENT_PRICE: &str = "SELECT current_price FROM listings WHERE id = $1";

// endregion: --- Listings

// region:    --- Bids
/// 현재 가격보다 높을 때만 가격 갱신 (행 잠금 후 재확인)
pub const UPDATE_PRICE_IF_HIGHER: &str =
    "UPDATE listings SET current_price = $1 WHERE id = $2 AND current_price < $1 RETURNING current_price";

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, user_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, user_id, amount, created_at
"#;

/// 입찰 이력 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, user_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 현재 가격 점검용 조회
pub const GET_PRICE_AUDIT: &str = r#"
    SELECT l.id, l.starting_bid, l.current_price, MAX(b.amount) AS highest_bid
    FROM listings l
    LEFT JOIN bids b ON b.listing_id = l.id
    WHERE l.id = $1
    GROUP BY l.id
"#;

// endregion: --- Bids

// region:    --- Comments
/// 댓글 추가
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, user_id, text)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, user_id, text, created_at
"#;

/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, user_id, text, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at ASC, id ASC
"#;

// endregion: --- Comments

// region:    --- Watchlist
/// 관심 목록 추가 (중복 시 무시)
pub const INSERT_WATCHLIST: &str = r#"
    INSERT INTO watchlist (user_id, listing_id)
    VALUES ($1, $2)
    ON CONFLICT (user_id, listing_id) DO NOTHING
"#;

/// 관심 목록 삭제
pub const DELETE_WATCHLIST: &str = "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";

/// 관심 목록 포함 여부
pub const EXISTS_WATCHLIST: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2) AS watching";

/// 사용자 관심 목록 조회
pub const GET_USER_WATCHLIST: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_price, l.creator_id, l.category_id, l.image_url, l.created_at
    FROM watchlist w
    JOIN listings l ON l.id = w.listing_id
    WHERE w.user_id = $1
    ORDER BY w.id ASC
"#;

// endregion: --- Watchlist
