//! Database query implementations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{DbError, DbResult};
use crate::models::{Contact, Message, NewUser, ProfilePatch, Tag, TrustLevel, User, UserTag};

/// Convert a timestamp to stored milliseconds.
pub(crate) fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Parse stored milliseconds back to a timestamp.
pub(crate) fn from_millis(column: &'static str, millis: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| DbError::Corrupt {
        column,
        value: millis.to_string(),
    })
}

/// Map unique/check constraint violations to [`DbError::Conflict`].
fn conflict_on_constraint(err: rusqlite::Error, what: &'static str) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            DbError::Conflict(what)
        }
        other => other.into(),
    }
}

/// Internal row id of a user.
pub(crate) fn user_id(conn: &Connection, username: &str) -> DbResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?)
}

fn tag_id(conn: &Connection, tagname: &str) -> DbResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM tags WHERE tagname = ?1",
            params![tagname],
            |row| row.get(0),
        )
        .optional()?)
}

/// Stored credentials of a user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub password_hash: String,
    pub email_verified: bool,
}

/// State of a pending email verification.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub email_temporary: String,
    pub code_hash: String,
    pub created: DateTime<Utc>,
}

/// Queries for users.
pub struct UserQueries;

impl UserQueries {
    const COLUMNS: &'static str = "username, email, email_temporary, email_verified, given_name, family_name, description, created";

    /// Insert a new, unverified user.
    pub fn insert(conn: &Connection, user: &NewUser) -> DbResult<User> {
        let now = Utc::now();
        conn.execute(
            r"INSERT INTO users (username, email_temporary, password_hash, email_verification_code_hash, email_verification_created, created)
              VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                user.username,
                user.email,
                user.password_hash,
                user.email_verification_code_hash,
                to_millis(now),
            ],
        )
        .map_err(|e| conflict_on_constraint(e, "username"))?;

        Ok(User {
            username: user.username.clone(),
            email: None,
            email_temporary: Some(user.email.clone()),
            email_verified: false,
            given_name: String::new(),
            family_name: String::new(),
            description: String::new(),
            created: now,
        })
    }

    /// Whether a user with this username exists.
    pub fn exists(conn: &Connection, username: &str) -> DbResult<bool> {
        Ok(user_id(conn, username)?.is_some())
    }

    /// Whether a verified user already owns this email.
    pub fn email_taken(conn: &Connection, email: &str) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a user by username.
    pub fn get(conn: &Connection, username: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?1", Self::COLUMNS);
        let result = conn
            .query_row(&sql, params![username], |row| Ok(Self::row_to_user(row)))
            .optional()?;
        result.transpose()
    }

    /// Get stored credentials for authentication.
    pub fn credentials(conn: &Connection, username: &str) -> DbResult<Option<Credentials>> {
        Ok(conn
            .query_row(
                "SELECT password_hash, email_verified FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(Credentials {
                        password_hash: row.get(0)?,
                        email_verified: row.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    /// Apply a profile patch. Returns the updated user, or `None` if missing.
    pub fn update_profile(
        conn: &Connection,
        username: &str,
        patch: &ProfilePatch,
    ) -> DbResult<Option<User>> {
        conn.execute(
            r"UPDATE users SET
                given_name = COALESCE(?2, given_name),
                family_name = COALESCE(?3, family_name),
                description = COALESCE(?4, description)
              WHERE username = ?1",
            params![
                username,
                patch.given_name,
                patch.family_name,
                patch.description
            ],
        )?;
        Self::get(conn, username)
    }

    /// Get the pending email verification of a user.
    pub fn pending_verification(
        conn: &Connection,
        username: &str,
    ) -> DbResult<Option<PendingVerification>> {
        let row = conn
            .query_row(
                r"SELECT email_temporary, email_verification_code_hash, email_verification_created
                  FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((Some(email_temporary), Some(code_hash), Some(created))) => {
                Ok(Some(PendingVerification {
                    email_temporary,
                    code_hash,
                    created: from_millis("email_verification_created", created)?,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Promote the temporary email to the verified one.
    pub fn finish_email_verification(conn: &Connection, username: &str) -> DbResult<Option<User>> {
        conn.execute(
            r"UPDATE users SET
                email = email_temporary,
                email_temporary = NULL,
                email_verified = 1,
                email_verification_code_hash = NULL,
                email_verification_created = NULL
              WHERE username = ?1 AND email_temporary IS NOT NULL",
            params![username],
        )
        .map_err(|e| conflict_on_constraint(e, "email"))?;
        Self::get(conn, username)
    }

    /// Delete a user with all incident edges.
    pub fn delete(conn: &Connection, username: &str) -> DbResult<bool> {
        let deleted = conn.execute("DELETE FROM users WHERE username = ?1", params![username])?;
        Ok(deleted > 0)
    }

    /// Count all users.
    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> DbResult<User> {
        Ok(User {
            username: row.get(0)?,
            email: row.get(1)?,
            email_temporary: row.get(2)?,
            email_verified: row.get(3)?,
            given_name: row.get(4)?,
            family_name: row.get(5)?,
            description: row.get(6)?,
            created: from_millis("users.created", row.get(7)?)?,
        })
    }
}

/// Queries for tags.
pub struct TagQueries;

impl TagQueries {
    const SELECT: &'static str = r"SELECT t.tagname, u.username, t.created
        FROM tags t LEFT JOIN users u ON u.id = t.creator_id";

    /// Create a tag on behalf of `creator`.
    pub fn insert(conn: &Connection, tagname: &str, creator: &str) -> DbResult<Tag> {
        let creator_id = user_id(conn, creator)?.ok_or(DbError::NotFound("user"))?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO tags (tagname, creator_id, created) VALUES (?1, ?2, ?3)",
            params![tagname, creator_id, to_millis(now)],
        )
        .map_err(|e| conflict_on_constraint(e, "tag"))?;

        Ok(Tag {
            tagname: tagname.to_string(),
            creator: Some(creator.to_string()),
            created: now,
        })
    }

    /// Get a tag by name.
    pub fn get(conn: &Connection, tagname: &str) -> DbResult<Option<Tag>> {
        let sql = format!("{} WHERE t.tagname = ?1", Self::SELECT);
        let result = conn
            .query_row(&sql, params![tagname], |row| Ok(Self::row_to_tag(row)))
            .optional()?;
        result.transpose()
    }

    /// Whether a tag exists.
    pub fn exists(conn: &Connection, tagname: &str) -> DbResult<bool> {
        Ok(tag_id(conn, tagname)?.is_some())
    }

    /// Tags whose name starts with `fragment`, or has a hyphen-separated
    /// word starting with it.
    pub fn filter_like(conn: &Connection, fragment: &str) -> DbResult<Vec<Tag>> {
        let sql = format!(
            "{} WHERE t.tagname LIKE ?1 || '%' OR t.tagname LIKE '%-' || ?1 || '%' ORDER BY t.tagname",
            Self::SELECT
        );
        Self::collect(conn, &sql, params![fragment])
    }

    /// Random sample of tags.
    pub fn random(conn: &Connection, limit: u32) -> DbResult<Vec<Tag>> {
        let sql = format!("{} ORDER BY RANDOM() LIMIT ?1", Self::SELECT);
        Self::collect(conn, &sql, params![limit])
    }

    /// Delete all tags which no user has. Returns the deleted tagnames.
    pub fn delete_abandoned(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r"DELETE FROM tags
              WHERE NOT EXISTS (SELECT 1 FROM user_tag ut WHERE ut.tag_id = tags.id)
              RETURNING tagname",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut deleted = Vec::new();
        for row in rows {
            deleted.push(row?);
        }
        deleted.sort();
        Ok(deleted)
    }

    /// Count all tags.
    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))?)
    }

    fn collect(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> DbResult<Vec<Tag>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| Ok(Self::row_to_tag(row)))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row??);
        }
        Ok(tags)
    }

    fn row_to_tag(row: &rusqlite::Row<'_>) -> DbResult<Tag> {
        Ok(Tag {
            tagname: row.get(0)?,
            creator: row.get(1)?,
            created: from_millis("tags.created", row.get(2)?)?,
        })
    }
}

/// Queries for user-tag edges.
pub struct UserTagQueries;

impl UserTagQueries {
    const SELECT: &'static str = r"SELECT u.username, t.tagname, ut.story, ut.relevance, ut.created
        FROM user_tag ut
        JOIN users u ON u.id = ut.user_id
        JOIN tags t ON t.id = ut.tag_id";

    /// Add a tag to a user.
    pub fn insert(
        conn: &Connection,
        username: &str,
        tagname: &str,
        story: &str,
        relevance: u8,
    ) -> DbResult<UserTag> {
        let uid = user_id(conn, username)?.ok_or(DbError::NotFound("user"))?;
        let tid = tag_id(conn, tagname)?.ok_or(DbError::NotFound("tag"))?;
        let now = Utc::now();

        conn.execute(
            r"INSERT INTO user_tag (user_id, tag_id, story, relevance, created)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![uid, tid, story, relevance, to_millis(now)],
        )
        .map_err(|e| conflict_on_constraint(e, "user tag"))?;

        Ok(UserTag {
            username: username.to_string(),
            tagname: tagname.to_string(),
            story: story.to_string(),
            relevance,
            created: now,
        })
    }

    /// Get one user-tag edge.
    pub fn get(conn: &Connection, username: &str, tagname: &str) -> DbResult<Option<UserTag>> {
        let sql = format!("{} WHERE u.username = ?1 AND t.tagname = ?2", Self::SELECT);
        let result = conn
            .query_row(&sql, params![username, tagname], |row| {
                Ok(Self::row_to_user_tag(row))
            })
            .optional()?;
        result.transpose()
    }

    /// List the tags of a user, most relevant first.
    pub fn list_for_user(conn: &Connection, username: &str) -> DbResult<Vec<UserTag>> {
        let sql = format!(
            "{} WHERE u.username = ?1 ORDER BY ut.relevance DESC, t.tagname ASC",
            Self::SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![username], |row| Ok(Self::row_to_user_tag(row)))?;

        let mut user_tags = Vec::new();
        for row in rows {
            user_tags.push(row??);
        }
        Ok(user_tags)
    }

    /// Update story and/or relevance of an edge.
    pub fn update(
        conn: &Connection,
        username: &str,
        tagname: &str,
        story: Option<&str>,
        relevance: Option<u8>,
    ) -> DbResult<Option<UserTag>> {
        conn.execute(
            r"UPDATE user_tag SET
                story = COALESCE(?3, story),
                relevance = COALESCE(?4, relevance)
              WHERE user_id = (SELECT id FROM users WHERE username = ?1)
                AND tag_id = (SELECT id FROM tags WHERE tagname = ?2)",
            params![username, tagname, story, relevance],
        )?;
        Self::get(conn, username, tagname)
    }

    /// Remove a tag from a user.
    pub fn delete(conn: &Connection, username: &str, tagname: &str) -> DbResult<bool> {
        let deleted = conn.execute(
            r"DELETE FROM user_tag
              WHERE user_id = (SELECT id FROM users WHERE username = ?1)
                AND tag_id = (SELECT id FROM tags WHERE tagname = ?2)",
            params![username, tagname],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_user_tag(row: &rusqlite::Row<'_>) -> DbResult<UserTag> {
        Ok(UserTag {
            username: row.get(0)?,
            tagname: row.get(1)?,
            story: row.get(2)?,
            relevance: row.get(3)?,
            created: from_millis("user_tag.created", row.get(4)?)?,
        })
    }
}

/// Queries for contact edges.
pub struct ContactQueries;

impl ContactQueries {
    const SELECT: &'static str = r"SELECT uf.username, ut.username, c.trust, c.reference, c.message, c.is_confirmed, c.created, c.confirmed
        FROM contacts c
        JOIN users uf ON uf.id = c.from_id
        JOIN users ut ON ut.id = c.to_id";

    /// Create an unconfirmed contact request `from -> to`.
    pub fn insert_request(
        conn: &mut Connection,
        from: &str,
        to: &str,
        trust: TrustLevel,
        reference: &str,
        message: &str,
    ) -> DbResult<Contact> {
        let tx = conn.transaction()?;
        let from_id = user_id(&tx, from)?.ok_or(DbError::NotFound("user"))?;
        let to_id = user_id(&tx, to)?.ok_or(DbError::NotFound("user"))?;

        let existing: i64 = tx.query_row(
            r"SELECT COUNT(*) FROM contacts
              WHERE (from_id = ?1 AND to_id = ?2) OR (from_id = ?2 AND to_id = ?1)",
            params![from_id, to_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(DbError::Conflict("contact"));
        }

        let now = Utc::now();
        tx.execute(
            r"INSERT INTO contacts (from_id, to_id, trust, reference, message, is_confirmed, created)
              VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![from_id, to_id, trust.as_u8(), reference, message, to_millis(now)],
        )
        .map_err(|e| conflict_on_constraint(e, "contact"))?;
        tx.commit()?;

        Ok(Contact {
            from: from.to_string(),
            to: to.to_string(),
            trust,
            reference: reference.to_string(),
            message: Some(message.to_string()),
            is_confirmed: false,
            created: now,
            confirmed: None,
        })
    }

    /// Get the edge `from -> to`.
    pub fn get(conn: &Connection, from: &str, to: &str) -> DbResult<Option<Contact>> {
        let sql = format!("{} WHERE uf.username = ?1 AND ut.username = ?2", Self::SELECT);
        let result = conn
            .query_row(&sql, params![from, to], |row| Ok(Self::row_to_contact(row)))
            .optional()?;
        result.transpose()
    }

    /// Confirm the pending request `requester -> confirmer`.
    ///
    /// Creates the reverse edge with the confirmer's trust and reference and
    /// marks both edges confirmed. Returns `None` when nothing is pending.
    pub fn confirm(
        conn: &mut Connection,
        confirmer: &str,
        requester: &str,
        trust: TrustLevel,
        reference: &str,
    ) -> DbResult<Option<Contact>> {
        let tx = conn.transaction()?;
        let (Some(confirmer_id), Some(requester_id)) =
            (user_id(&tx, confirmer)?, user_id(&tx, requester)?)
        else {
            return Ok(None);
        };

        let now = to_millis(Utc::now());
        let updated = tx.execute(
            r"UPDATE contacts SET is_confirmed = 1, confirmed = ?3, message = NULL
              WHERE from_id = ?1 AND to_id = ?2 AND is_confirmed = 0",
            params![requester_id, confirmer_id, now],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        tx.execute(
            r"INSERT INTO contacts (from_id, to_id, trust, reference, message, is_confirmed, created, confirmed)
              VALUES (?1, ?2, ?3, ?4, NULL, 1, ?5, ?5)",
            params![confirmer_id, requester_id, trust.as_u8(), reference, now],
        )
        .map_err(|e| conflict_on_constraint(e, "contact"))?;

        let contact = Self::get(&tx, confirmer, requester)?;
        tx.commit()?;
        Ok(contact)
    }

    /// Update trust and/or reference of the edge `from -> to`.
    pub fn update(
        conn: &Connection,
        from: &str,
        to: &str,
        trust: Option<TrustLevel>,
        reference: Option<&str>,
    ) -> DbResult<Option<Contact>> {
        conn.execute(
            r"UPDATE contacts SET
                trust = COALESCE(?3, trust),
                reference = COALESCE(?4, reference)
              WHERE from_id = (SELECT id FROM users WHERE username = ?1)
                AND to_id = (SELECT id FROM users WHERE username = ?2)",
            params![from, to, trust.map(TrustLevel::as_u8), reference],
        )?;
        Self::get(conn, from, to)
    }

    /// Delete the contact between two users, in both directions.
    pub fn delete(conn: &Connection, a: &str, b: &str) -> DbResult<bool> {
        let deleted = conn.execute(
            r"DELETE FROM contacts
              WHERE (from_id = (SELECT id FROM users WHERE username = ?1) AND to_id = (SELECT id FROM users WHERE username = ?2))
                 OR (from_id = (SELECT id FROM users WHERE username = ?2) AND to_id = (SELECT id FROM users WHERE username = ?1))",
            params![a, b],
        )?;
        Ok(deleted > 0)
    }

    /// Confirmed contacts authored by a user.
    pub fn list_confirmed(conn: &Connection, username: &str) -> DbResult<Vec<Contact>> {
        let sql = format!(
            "{} WHERE uf.username = ?1 AND c.is_confirmed = 1 ORDER BY c.trust DESC, ut.username ASC",
            Self::SELECT
        );
        Self::collect(conn, &sql, username)
    }

    /// Pending requests addressed to a user.
    pub fn list_pending_for(conn: &Connection, username: &str) -> DbResult<Vec<Contact>> {
        let sql = format!(
            "{} WHERE ut.username = ?1 AND c.is_confirmed = 0 ORDER BY c.created DESC",
            Self::SELECT
        );
        Self::collect(conn, &sql, username)
    }

    fn collect(conn: &Connection, sql: &str, username: &str) -> DbResult<Vec<Contact>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![username], |row| Ok(Self::row_to_contact(row)))?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row??);
        }
        Ok(contacts)
    }

    fn row_to_contact(row: &rusqlite::Row<'_>) -> DbResult<Contact> {
        let trust_value: i64 = row.get(2)?;
        let trust = TrustLevel::from_i64(trust_value).ok_or_else(|| DbError::Corrupt {
            column: "contacts.trust",
            value: trust_value.to_string(),
        })?;

        let confirmed: Option<DateTime<Utc>> = row
            .get::<_, Option<i64>>(7)?
            .map(|ms| from_millis("contacts.confirmed", ms))
            .transpose()?;

        Ok(Contact {
            from: row.get(0)?,
            to: row.get(1)?,
            trust,
            reference: row.get(3)?,
            message: row.get(4)?,
            is_confirmed: row.get(5)?,
            created: from_millis("contacts.created", row.get(6)?)?,
            confirmed,
        })
    }
}

/// Queries for message edges.
pub struct MessageQueries;

impl MessageQueries {
    const SELECT: &'static str = r"SELECT m.id, uf.username, ut.username, m.body, m.read, m.created
        FROM messages m
        JOIN users uf ON uf.id = m.from_id
        JOIN users ut ON ut.id = m.to_id";

    /// Store a new message.
    pub fn insert(conn: &Connection, message: &Message) -> DbResult<()> {
        let from_id = user_id(conn, &message.from)?.ok_or(DbError::NotFound("user"))?;
        let to_id = user_id(conn, &message.to)?.ok_or(DbError::NotFound("user"))?;

        conn.execute(
            r"INSERT INTO messages (id, from_id, to_id, body, read, created)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.id.to_string(),
                from_id,
                to_id,
                message.body,
                message.read,
                to_millis(message.created),
            ],
        )?;
        Ok(())
    }

    /// Get a message by id.
    pub fn get(conn: &Connection, id: &Uuid) -> DbResult<Option<Message>> {
        let sql = format!("{} WHERE m.id = ?1", Self::SELECT);
        let result = conn
            .query_row(&sql, params![id.to_string()], |row| {
                Ok(Self::row_to_message(row))
            })
            .optional()?;
        result.transpose()
    }

    /// All messages between two users, oldest first.
    pub fn thread(conn: &Connection, a: &str, b: &str) -> DbResult<Vec<Message>> {
        let sql = format!(
            r"{} WHERE (uf.username = ?1 AND ut.username = ?2) OR (uf.username = ?2 AND ut.username = ?1)
              ORDER BY m.created ASC, m.id ASC",
            Self::SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![a, b], |row| Ok(Self::row_to_message(row)))?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row??);
        }
        Ok(messages)
    }

    /// The last message of every thread the user takes part in, newest first.
    pub fn last_of_threads(conn: &Connection, username: &str) -> DbResult<Vec<Message>> {
        let sql = format!(
            r"{} WHERE uf.username = ?1 OR ut.username = ?1
              ORDER BY m.created DESC, m.id DESC",
            Self::SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![username], |row| Ok(Self::row_to_message(row)))?;

        let mut seen = std::collections::HashSet::new();
        let mut threads = Vec::new();
        for row in rows {
            let message = row??;
            if seen.insert(message.counterpart(username).to_string()) {
                threads.push(message);
            }
        }
        Ok(threads)
    }

    /// Mark `message` and every earlier unread message of the same sender
    /// to the same receiver as read. Returns how many were updated.
    pub fn mark_read_up_to(conn: &Connection, message: &Message) -> DbResult<usize> {
        let updated = conn.execute(
            r"UPDATE messages SET read = 1
              WHERE from_id = (SELECT id FROM users WHERE username = ?1)
                AND to_id = (SELECT id FROM users WHERE username = ?2)
                AND read = 0
                AND (created < ?3 OR (created = ?3 AND id <= ?4))",
            params![
                message.from,
                message.to,
                to_millis(message.created),
                message.id.to_string()
            ],
        )?;
        Ok(updated)
    }

    fn row_to_message(row: &rusqlite::Row<'_>) -> DbResult<Message> {
        let id_str: String = row.get(0)?;
        let id = Uuid::parse_str(&id_str).map_err(|_| DbError::Corrupt {
            column: "messages.id",
            value: id_str.clone(),
        })?;

        Ok(Message {
            id,
            from: row.get(1)?,
            to: row.get(2)?,
            body: row.get(3)?,
            read: row.get(4)?,
            created: from_millis("messages.created", row.get(5)?)?,
        })
    }
}
