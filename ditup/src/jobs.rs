//! Periodic maintenance.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::{wrappers::IntervalStream, StreamExt};

use crate::db::{Database, DbResult, TagQueries};

/// Delete every tag no user has. Returns the deleted tagnames.
pub fn prune_abandoned_tags(db: &Database) -> DbResult<Vec<String>> {
    let deleted = db.call(|conn| TagQueries::delete_abandoned(conn))?;
    if deleted.is_empty() {
        tracing::debug!("no abandoned tags");
    } else {
        tracing::info!(count = deleted.len(), tags = ?deleted, "deleted abandoned tags");
    }
    Ok(deleted)
}

/// Prune abandoned tags every `every`. A zero period disables the job.
pub fn spawn_tag_pruning(db: Database, every: Duration) -> Option<JoinHandle<()>> {
    if every.is_zero() {
        tracing::info!("abandoned tag pruning disabled");
        return None;
    }

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(ticker);

    tracing::info!(every_secs = every.as_secs(), "abandoned tag pruning scheduled");
    Some(tokio::spawn(async move {
        while ticks.next().await.is_some() {
            if let Err(err) = prune_abandoned_tags(&db) {
                tracing::error!(error = %err, "failed to prune abandoned tags");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{add_user, UserTagQueries};

    #[test]
    fn test_prune_keeps_used_tags() {
        let db = Database::open_in_memory().unwrap();
        db.call(|conn| {
            add_user(conn, "test", true);
            TagQueries::insert(conn, "used", "test")?;
            TagQueries::insert(conn, "unused", "test")?;
            UserTagQueries::insert(conn, "test", "used", "", 3)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(prune_abandoned_tags(&db).unwrap(), vec!["unused".to_string()]);
        assert!(prune_abandoned_tags(&db).unwrap().is_empty());
        assert_eq!(db.call(|conn| TagQueries::count(conn)).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_disables_job() {
        let db = Database::open_in_memory().unwrap();
        assert!(spawn_tag_pruning(db, Duration::ZERO).is_none());
    }
}
