use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL,
            password    TEXT NOT NULL,
            moderator   INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL UNIQUE REFERENCES users(id),
            coins       INTEGER NOT NULL DEFAULT 0 CHECK (coins >= 0),
            tier        TEXT NOT NULL DEFAULT 'Explorer',
            joined      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS showcases (
            id              TEXT PRIMARY KEY,
            owner_id        TEXT NOT NULL REFERENCES profiles(id),
            title           TEXT NOT NULL,
            body_md         TEXT NOT NULL,
            link            TEXT,
            screenshot_url  TEXT,
            approved        INTEGER NOT NULL DEFAULT 0,
            coins_award     INTEGER NOT NULL DEFAULT 0 CHECK (coins_award >= 0),
            admin_note      TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            approved_at     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_showcases_owner
            ON showcases(owner_id, created_at);

        -- Pending queue scans filter on approved
        CREATE INDEX IF NOT EXISTS idx_showcases_approved
            ON showcases(approved, created_at);

        CREATE INDEX IF NOT EXISTS idx_profiles_coins
            ON profiles(coins, joined);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
