//! Graph traversals over the user-tag graph.
//!
//! - Users and tags are vertices; each `user_tag` row is an edge carrying a
//!   relevance between 1 and 5
//! - A path is weighed by the geometric mean of the relevances of its edges
//! - Weights of all paths reaching the same vertex are summed
//!
//! The walks are expressed as joins; weighing and ranking happen here.

use std::collections::{BTreeSet, HashMap};

use rusqlite::{params, params_from_iter, Connection};

use super::queries::from_millis;
use super::DbResult;
use crate::models::{RankedUser, RelatedTag};

/// Traversal queries.
pub struct GraphQueries;

impl GraphQueries {
    /// Number of recommended tags when no limit is given.
    pub const DEFAULT_RELATED_TAGS_LIMIT: usize = 5;

    /// Number of users sharing tags returned when no limit is given.
    pub const DEFAULT_USERS_LIMIT: usize = 10;

    /// Find tags related to the tags of a user.
    ///
    /// Walks every path `user -> t1 <- other -> t2` of exactly three edges,
    /// where `other` is a different user and `t2` is not one of the user's
    /// own tags. Each path weighs `cbrt(r0 * r1 * r2)`; each `t2` is ranked
    /// by the sum of the weights of its paths. An unknown user has no
    /// related tags.
    pub fn related_tags_of_user(
        conn: &Connection,
        username: &str,
        limit: usize,
    ) -> DbResult<Vec<RelatedTag>> {
        let mut stmt = conn.prepare(
            r"SELECT t2.tagname, t2.created, ut0.relevance, ut1.relevance, ut2.relevance
              FROM users u
              JOIN user_tag ut0 ON ut0.user_id = u.id
              JOIN user_tag ut1 ON ut1.tag_id = ut0.tag_id AND ut1.user_id <> u.id
              JOIN user_tag ut2 ON ut2.user_id = ut1.user_id AND ut2.tag_id <> ut1.tag_id
              JOIN tags t2 ON t2.id = ut2.tag_id
              WHERE u.username = ?1
                AND ut2.tag_id NOT IN (SELECT tag_id FROM user_tag WHERE user_id = u.id)",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
            ))
        })?;

        let mut found: HashMap<String, (i64, f64)> = HashMap::new();
        for row in rows {
            let (tagname, created, r0, r1, r2) = row?;
            let entry = found.entry(tagname).or_insert((created, 0.0));
            entry.1 += path_weight3(r0, r1, r2);
        }

        let mut tags = Vec::with_capacity(found.len());
        for (tagname, (created, relevance)) in found {
            tags.push(RelatedTag {
                tagname,
                created: from_millis("tags.created", created)?,
                relevance,
            });
        }

        tags.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.tagname.cmp(&b.tagname))
        });
        tags.truncate(limit);
        Ok(tags)
    }

    /// Find verified users having any of the given tags.
    ///
    /// A user is ranked by the sum of their relevances on the matching tags.
    pub fn users_with_tags(conn: &Connection, tagnames: &[String]) -> DbResult<Vec<RankedUser>> {
        if tagnames.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = std::iter::repeat_n("?", tagnames.len())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r"SELECT u.username, t.tagname, ut.relevance
              FROM user_tag ut
              JOIN users u ON u.id = ut.user_id
              JOIN tags t ON t.id = ut.tag_id
              WHERE u.email_verified = 1 AND t.tagname IN ({placeholders})"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(tagnames.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
            ))
        })?;

        let mut found = Accumulator::default();
        for row in rows {
            let (username, tagname, relevance) = row?;
            found.add(username, tagname, f64::from(relevance));
        }
        Ok(found.ranked(usize::MAX))
    }

    /// Find verified users who share tags with `username`.
    ///
    /// Walks `user -> tag <- other`; each shared tag weighs
    /// `sqrt(r_user * r_other)`.
    pub fn users_with_my_tags(
        conn: &Connection,
        username: &str,
        limit: usize,
    ) -> DbResult<Vec<RankedUser>> {
        let mut stmt = conn.prepare(
            r"SELECT u2.username, t.tagname, ut0.relevance, ut1.relevance
              FROM users u
              JOIN user_tag ut0 ON ut0.user_id = u.id
              JOIN user_tag ut1 ON ut1.tag_id = ut0.tag_id AND ut1.user_id <> u.id
              JOIN users u2 ON u2.id = ut1.user_id
              JOIN tags t ON t.id = ut0.tag_id
              WHERE u.username = ?1 AND u2.email_verified = 1",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
            ))
        })?;

        let mut found = Accumulator::default();
        for row in rows {
            let (other, tagname, r0, r1) = row?;
            found.add(other, tagname, path_weight2(r0, r1));
        }
        Ok(found.ranked(limit))
    }
}

fn path_weight2(r0: u8, r1: u8) -> f64 {
    (f64::from(r0) * f64::from(r1)).sqrt()
}

fn path_weight3(r0: u8, r1: u8, r2: u8) -> f64 {
    (f64::from(r0) * f64::from(r1) * f64::from(r2)).cbrt()
}

/// Sums weights per user and remembers which tags contributed.
#[derive(Default)]
struct Accumulator {
    users: HashMap<String, (f64, BTreeSet<String>)>,
}

impl Accumulator {
    fn add(&mut self, username: String, tagname: String, weight: f64) {
        let entry = self.users.entry(username).or_default();
        entry.0 += weight;
        entry.1.insert(tagname);
    }

    fn ranked(self, limit: usize) -> Vec<RankedUser> {
        let mut users: Vec<RankedUser> = self
            .users
            .into_iter()
            .map(|(username, (relevance, tags))| RankedUser {
                username,
                relevance,
                tags: tags.into_iter().collect(),
            })
            .collect();

        users.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.username.cmp(&b.username))
        });
        users.truncate(limit);
        users
    }
}
