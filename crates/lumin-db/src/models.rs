/// Database row types — these map directly to SQLite rows.
/// Distinct from the lumin-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub moderator: bool,
    pub created_at: String,
}

pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub coins: i64,
    pub tier: String,
    pub joined: String,
}

pub struct ShowcaseRow {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub title: String,
    pub body_md: String,
    pub link: Option<String>,
    pub screenshot_url: Option<String>,
    pub approved: bool,
    pub coins_award: i64,
    pub admin_note: String,
    pub created_at: String,
    pub approved_at: Option<String>,
}

pub struct LeaderboardRow {
    pub username: String,
    pub coins: i64,
    pub tier: String,
    pub joined: String,
}
