//! Cascading user deletion.
//!
//! Deleting a user is the one operation that must commit across several
//! tables atomically: the user row and every dependent row go in a single
//! read-write transaction, so no dependent row can survive its user.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;

impl Store {
    /// Delete a user and all rows that reference it, in one transaction.
    pub fn delete_user_cascade(&self, user_id: &str) -> Result<()> {
        let rw = self.db.rw_transaction()?;

        if let Some(user) = rw.get().primary::<StoredUser>(user_id.to_string())? {
            rw.remove(user)?;
        }

        let jutsus: Vec<StoredUserJutsu> = {
            let scan = rw
                .scan()
                .secondary::<StoredUserJutsu>(StoredUserJutsuKey::user_id)?;
            let iter = scan.start_with(user_id)?;
            let rows: std::result::Result<Vec<StoredUserJutsu>, _> = iter.collect();
            rows.map_err(|e| Error::Database(e.to_string()))?
                .into_iter()
                .filter(|j| j.user_id == user_id)
                .collect()
        };
        for row in jutsus {
            rw.remove(row)?;
        }

        let attributes: Vec<StoredUserAttribute> = {
            let scan = rw
                .scan()
                .secondary::<StoredUserAttribute>(StoredUserAttributeKey::user_id)?;
            let iter = scan.start_with(user_id)?;
            let rows: std::result::Result<Vec<StoredUserAttribute>, _> = iter.collect();
            rows.map_err(|e| Error::Database(e.to_string()))?
                .into_iter()
                .filter(|a| a.user_id == user_id)
                .collect()
        };
        for row in attributes {
            rw.remove(row)?;
        }

        let posts: Vec<StoredForumPost> = {
            let scan = rw
                .scan()
                .secondary::<StoredForumPost>(StoredForumPostKey::user_id)?;
            let iter = scan.start_with(user_id)?;
            let rows: std::result::Result<Vec<StoredForumPost>, _> = iter.collect();
            rows.map_err(|e| Error::Database(e.to_string()))?
                .into_iter()
                .filter(|p| p.user_id == user_id)
                .collect()
        };
        for row in posts {
            rw.remove(row)?;
        }

        // Reports reference users on both sides; drop rows where the user
        // appears as target or reporter.
        let reports: Vec<StoredReport> = {
            let scan = rw.scan().primary::<StoredReport>()?;
            let iter = scan.all()?;
            let rows: std::result::Result<Vec<StoredReport>, _> = iter.collect();
            rows.map_err(|e| Error::Database(e.to_string()))?
                .into_iter()
                .filter(|r| r.user_id == user_id || r.reporter_user_id == user_id)
                .collect()
        };
        for row in reports {
            rw.remove(row)?;
        }

        let logs: Vec<StoredActionLog> = {
            let scan = rw
                .scan()
                .secondary::<StoredActionLog>(StoredActionLogKey::user_id)?;
            let iter = scan.start_with(user_id)?;
            let rows: std::result::Result<Vec<StoredActionLog>, _> = iter.collect();
            rows.map_err(|e| Error::Database(e.to_string()))?
                .into_iter()
                .filter(|l| l.user_id == user_id)
                .collect()
        };
        for row in logs {
            rw.remove(row)?;
        }

        rw.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kunai_core::UserRecord;

    fn seed(store: &Store, user_id: &str) {
        let user = UserRecord::new(user_id, format!("name-{user_id}"), Utc::now());
        store.save_user(&user).unwrap();
        store
            .set_user_jutsus(
                user_id,
                vec![StoredUserJutsu {
                    id: format!("{user_id}-j1"),
                    user_id: user_id.to_string(),
                    jutsu_id: "fireball".to_string(),
                    level: 1,
                    equipped: true,
                }],
            )
            .unwrap();
        store
            .save_attribute(&StoredUserAttribute {
                id: format!("{user_id}-a1"),
                user_id: user_id.to_string(),
                attribute: "calm".to_string(),
            })
            .unwrap();
        store
            .save_forum_post(&StoredForumPost {
                id: format!("{user_id}-p1"),
                user_id: user_id.to_string(),
                content: "hello".to_string(),
                created_at: 0,
            })
            .unwrap();
        store
            .save_report(&StoredReport {
                id: format!("{user_id}-r1"),
                user_id: user_id.to_string(),
                reporter_user_id: "someone".to_string(),
                status: REPORT_STATUS_UNVIEWED.to_string(),
                created_at: 0,
            })
            .unwrap();
        store
            .insert_action_log(&StoredActionLog {
                id: format!("{user_id}-l1"),
                user_id: user_id.to_string(),
                table_name: "ai".to_string(),
                changes: vec!["created".to_string()],
                related_id: user_id.to_string(),
                related_msg: String::new(),
                related_image: String::new(),
                created_at: 0,
            })
            .unwrap();
    }

    #[test]
    fn test_cascade_removes_every_dependent_row() {
        let store = Store::in_memory().unwrap();
        seed(&store, "u1");
        seed(&store, "u2");

        store.delete_user_cascade("u1").unwrap();

        assert!(store.fetch_user("u1").unwrap().is_none());
        assert!(store.user_jutsus("u1").unwrap().is_empty());
        assert!(store.user_attributes("u1").unwrap().is_empty());
        assert!(store.action_logs_for("u1").unwrap().is_empty());

        // Unrelated user untouched
        assert!(store.fetch_user("u2").unwrap().is_some());
        assert_eq!(store.user_jutsus("u2").unwrap().len(), 1);
    }

    #[test]
    fn test_cascade_removes_reports_filed_by_user() {
        let store = Store::in_memory().unwrap();
        seed(&store, "target");
        store
            .save_report(&StoredReport {
                id: "by-target".to_string(),
                user_id: "other".to_string(),
                reporter_user_id: "target".to_string(),
                status: REPORT_STATUS_UNVIEWED.to_string(),
                created_at: 0,
            })
            .unwrap();

        store.delete_user_cascade("target").unwrap();
        assert_eq!(store.count_pending_reports().unwrap(), 0);
    }

    #[test]
    fn test_cascade_on_missing_user_is_ok() {
        let store = Store::in_memory().unwrap();
        assert!(store.delete_user_cascade("ghost").is_ok());
    }
}
