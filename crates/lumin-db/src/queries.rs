use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use lumin_types::Tier;

use crate::models::{LeaderboardRow, ProfileRow, ShowcaseRow, UserRow};
use crate::{Database, ModerationError};

const SHOWCASE_COLUMNS: &str = "s.id, s.owner_id, u.username, s.title, s.body_md, s.link, \
     s.screenshot_url, s.approved, s.coins_award, s.admin_note, s.created_at, s.approved_at";

impl Database {
    // -- Users / profiles --

    /// Create an account and its linked profile as one transaction, so a
    /// user can never exist without exactly one profile.
    pub fn create_user_with_profile(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        moderator: bool,
        profile_id: &str,
        joined: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO users (id, username, email, password, moderator) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![user_id, username, email, password_hash, moderator],
            )?;
            tx.execute(
                "INSERT INTO profiles (id, user_id, joined) VALUES (?1, ?2, ?3)",
                rusqlite::params![profile_id, user_id, joined],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn get_profile_by_user(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, coins, tier, joined FROM profiles WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(ProfileRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            coins: row.get(2)?,
                            tier: row.get(3)?,
                            joined: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Showcases --

    pub fn insert_showcase(
        &self,
        id: &str,
        owner_id: &str,
        title: &str,
        body_md: &str,
        link: Option<&str>,
        screenshot_url: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO showcases (id, owner_id, title, body_md, link, screenshot_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, owner_id, title, body_md, link, screenshot_url, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_showcase(&self, id: &str) -> Result<Option<ShowcaseRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {SHOWCASE_COLUMNS}
                 FROM showcases s
                 JOIN profiles p ON s.owner_id = p.id
                 LEFT JOIN users u ON p.user_id = u.id
                 WHERE s.id = ?1"
            );
            let row = conn
                .query_row(&sql, [id], showcase_from_row)
                .optional()?;
            Ok(row)
        })
    }

    /// A profile's own showcases, newest first (dashboard and profile pages).
    pub fn showcases_for_owner(&self, owner_id: &str) -> Result<Vec<ShowcaseRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {SHOWCASE_COLUMNS}
                 FROM showcases s
                 JOIN profiles p ON s.owner_id = p.id
                 LEFT JOIN users u ON p.user_id = u.id
                 WHERE s.owner_id = ?1
                 ORDER BY s.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([owner_id], showcase_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// The moderation queue: showcases that are neither approved nor
    /// rejected. Rejected records carry an admin note and leave the queue.
    pub fn pending_showcases(&self) -> Result<Vec<ShowcaseRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {SHOWCASE_COLUMNS}
                 FROM showcases s
                 JOIN profiles p ON s.owner_id = p.id
                 LEFT JOIN users u ON p.user_id = u.id
                 WHERE s.approved = 0 AND s.admin_note = ''
                 ORDER BY s.created_at ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], showcase_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Moderation transitions --

    /// Approve a pending showcase and award coins, as a single transaction:
    /// the showcase flags and the owner's coins/tier commit together or not
    /// at all. The tier is recomputed from the new balance inside the same
    /// transaction, so a stale tier is never persisted.
    pub fn approve_showcase(
        &self,
        id: &str,
        coins_award: u64,
        approved_at: &str,
    ) -> Result<(), ModerationError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let pending = tx
            .query_row(
                "SELECT owner_id, approved, admin_note FROM showcases WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let (owner_id, approved, admin_note) = pending.ok_or(ModerationError::NotFound)?;
        if approved || !admin_note.is_empty() {
            return Err(ModerationError::AlreadyDecided);
        }

        // SQLite integers are i64; clamp so an oversized award can never
        // wrap negative and trip the coins_award CHECK constraint.
        let award = coins_award.min(i64::MAX as u64) as i64;

        tx.execute(
            "UPDATE showcases SET approved = 1, coins_award = ?2, approved_at = ?3 WHERE id = ?1",
            rusqlite::params![id, award, approved_at],
        )?;

        let coins: i64 =
            tx.query_row("SELECT coins FROM profiles WHERE id = ?1", [&owner_id], |row| {
                row.get(0)
            })?;
        let new_coins = coins.saturating_add(award);
        let tier = Tier::for_coins(new_coins as u64);

        tx.execute(
            "UPDATE profiles SET coins = ?2, tier = ?3 WHERE id = ?1",
            rusqlite::params![owner_id, new_coins, tier.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Reject a pending showcase: record the reason, leave `approved` false,
    /// no coin or tier effect.
    pub fn reject_showcase(&self, id: &str, reason: &str) -> Result<(), ModerationError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let pending = tx
            .query_row(
                "SELECT approved, admin_note FROM showcases WHERE id = ?1",
                [id],
                |row| Ok((row.get::<_, bool>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let (approved, admin_note) = pending.ok_or(ModerationError::NotFound)?;
        if approved || !admin_note.is_empty() {
            return Err(ModerationError::AlreadyDecided);
        }

        tx.execute(
            "UPDATE showcases SET admin_note = ?2 WHERE id = ?1",
            rusqlite::params![id, reason],
        )?;

        tx.commit()?;
        Ok(())
    }

    // -- Leaderboard --

    /// Top profiles by coins, earlier joiners ranking above later joiners on
    /// equal coins. `joined` is RFC 3339 text, so the ascending sort is
    /// chronological.
    pub fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.username, p.coins, p.tier, p.joined
                 FROM profiles p
                 JOIN users u ON p.user_id = u.id
                 ORDER BY p.coins DESC, p.joined ASC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(LeaderboardRow {
                        username: row.get(0)?,
                        coins: row.get(1)?,
                        tier: row.get(2)?,
                        joined: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is a compile-time constant at every call site, never user input.
    let sql = format!(
        "SELECT id, username, email, password, moderator, created_at FROM users WHERE {column} = ?1"
    );
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                moderator: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn showcase_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShowcaseRow> {
    Ok(ShowcaseRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        owner_username: row.get::<_, Option<String>>(2)?.unwrap_or_else(|| "unknown".to_string()),
        title: row.get(3)?,
        body_md: row.get(4)?,
        link: row.get(5)?,
        screenshot_url: row.get(6)?,
        approved: row.get(7)?,
        coins_award: row.get(8)?,
        admin_note: row.get(9)?,
        created_at: row.get(10)?,
        approved_at: row.get(11)?,
    })
}
