//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use kunai_core::{Bloodline, UserRecord, Village};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredUser>().unwrap();
    models.define::<StoredBloodline>().unwrap();
    models.define::<StoredVillage>().unwrap();
    models.define::<StoredJutsu>().unwrap();
    models.define::<StoredUserJutsu>().unwrap();
    models.define::<StoredUserAttribute>().unwrap();
    models.define::<StoredForumPost>().unwrap();
    models.define::<StoredReport>().unwrap();
    models.define::<StoredActionLog>().unwrap();
    models
});

/// A user together with its eagerly loaded relations.
#[derive(Debug, Clone)]
pub struct UserWithRelations {
    pub user: UserRecord,
    pub bloodline: Option<Bloodline>,
    pub village: Option<Village>,
}

/// Database store for persistent game state.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Save (insert or replace) a user.
    pub fn save_user(&self, user: &UserRecord) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredUser::from_user(user))?;
        rw.commit()?;
        Ok(())
    }

    /// Load a user by id.
    pub fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredUser> = r.get().primary(user_id.to_string())?;
        Ok(stored.map(|s| s.to_user()))
    }

    /// Load a user with its bloodline and village relations.
    pub fn fetch_user_with_relations(&self, user_id: &str) -> Result<Option<UserWithRelations>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredUser> = r.get().primary(user_id.to_string())?;
        let Some(stored) = stored else {
            return Ok(None);
        };
        let user = stored.to_user();

        let bloodline = match &user.bloodline_id {
            Some(id) => r
                .get()
                .primary::<StoredBloodline>(id.clone())?
                .map(|b| b.to_bloodline()),
            None => None,
        };
        let village = match &user.village_id {
            Some(id) => r
                .get()
                .primary::<StoredVillage>(id.clone())?
                .map(|v| v.to_village()),
            None => None,
        };

        Ok(Some(UserWithRelations {
            user,
            bloodline,
            village,
        }))
    }

    /// Save a bloodline.
    pub fn save_bloodline(&self, bloodline: &Bloodline) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredBloodline::from_bloodline(bloodline))?;
        rw.commit()?;
        Ok(())
    }

    /// Save a village.
    pub fn save_village(&self, village: &Village) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredVillage::from_village(village))?;
        rw.commit()?;
        Ok(())
    }

    /// Save a jutsu definition.
    pub fn save_jutsu(&self, jutsu: &StoredJutsu) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(jutsu.clone())?;
        rw.commit()?;
        Ok(())
    }

    /// Look up jutsu names by id.
    pub fn jutsu_names(&self, ids: &[String]) -> Result<Vec<(String, String)>> {
        let r = self.db.r_transaction()?;
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(jutsu) = r.get().primary::<StoredJutsu>(id.clone())? {
                names.push((jutsu.id, jutsu.name));
            }
        }
        Ok(names)
    }

    /// Jutsus known by a user.
    pub fn user_jutsus(&self, user_id: &str) -> Result<Vec<StoredUserJutsu>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredUserJutsu>(StoredUserJutsuKey::user_id)?;
        let iter = scan.start_with(user_id)?;
        let rows: std::result::Result<Vec<StoredUserJutsu>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().filter(|j| j.user_id == user_id).collect())
    }

    /// Replace a user's jutsus with a new set, in one transaction.
    pub fn set_user_jutsus(&self, user_id: &str, rows: Vec<StoredUserJutsu>) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let existing: Vec<StoredUserJutsu> = {
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
        for row in existing {
            rw.remove(row)?;
        }
        for row in rows {
            rw.upsert(row)?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Save a user attribute.
    pub fn save_attribute(&self, attribute: &StoredUserAttribute) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(attribute.clone())?;
        rw.commit()?;
        Ok(())
    }

    /// Attributes attached to a user.
    pub fn user_attributes(&self, user_id: &str) -> Result<Vec<StoredUserAttribute>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredUserAttribute>(StoredUserAttributeKey::user_id)?;
        let iter = scan.start_with(user_id)?;
        let rows: std::result::Result<Vec<StoredUserAttribute>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().filter(|a| a.user_id == user_id).collect())
    }

    /// Save a forum post.
    pub fn save_forum_post(&self, post: &StoredForumPost) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(post.clone())?;
        rw.commit()?;
        Ok(())
    }

    /// Save a report.
    pub fn save_report(&self, report: &StoredReport) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(report.clone())?;
        rw.commit()?;
        Ok(())
    }

    /// Append an audit log row.
    pub fn insert_action_log(&self, log: &StoredActionLog) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(log.clone())?;
        rw.commit()?;
        Ok(())
    }

    /// Audit log rows about a related record (newest first).
    pub fn action_logs_for(&self, related_id: &str) -> Result<Vec<StoredActionLog>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredActionLog>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredActionLog>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        let mut rows: Vec<StoredActionLog> = rows
            .into_iter()
            .filter(|l| l.related_id == related_id)
            .collect();
        rows.sort_by_key(|l| std::cmp::Reverse(l.created_at));
        Ok(rows)
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_save_and_fetch_user() {
        let store = Store::in_memory().unwrap();
        let user = UserRecord::new("u1", "Kaito", Utc::now());
        store.save_user(&user).unwrap();

        let loaded = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(loaded.username, "Kaito");
        assert!(store.fetch_user("missing").unwrap().is_none());
    }

    #[test]
    fn test_fetch_with_relations() {
        let store = Store::in_memory().unwrap();
        let bloodline = Bloodline {
            id: "b1".to_string(),
            name: "Crimson Mist".to_string(),
            regen_increase: 1.5,
        };
        let village = Village {
            id: "v1".to_string(),
            name: "Leafholm".to_string(),
            sector: 3,
        };
        store.save_bloodline(&bloodline).unwrap();
        store.save_village(&village).unwrap();

        let mut user = UserRecord::new("u1", "Kaito", Utc::now());
        user.bloodline_id = Some("b1".to_string());
        user.village_id = Some("v1".to_string());
        store.save_user(&user).unwrap();

        let loaded = store.fetch_user_with_relations("u1").unwrap().unwrap();
        assert_eq!(loaded.bloodline.unwrap().regen_increase, 1.5);
        assert_eq!(loaded.village.unwrap().name, "Leafholm");
    }

    #[test]
    fn test_set_user_jutsus_replaces() {
        let store = Store::in_memory().unwrap();
        let row = |id: &str, jutsu: &str| StoredUserJutsu {
            id: id.to_string(),
            user_id: "u1".to_string(),
            jutsu_id: jutsu.to_string(),
            level: 1,
            equipped: true,
        };
        store.set_user_jutsus("u1", vec![row("r1", "j1"), row("r2", "j2")]).unwrap();
        store.set_user_jutsus("u1", vec![row("r3", "j3")]).unwrap();

        let jutsus = store.user_jutsus("u1").unwrap();
        assert_eq!(jutsus.len(), 1);
        assert_eq!(jutsus[0].jutsu_id, "j3");
    }
}
