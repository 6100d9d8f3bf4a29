//! Profile service - the request/response layer over the store
//!
//! Every state-dependent mutation commits through the store's conditional
//! update: the service reads a snapshot, decides, and asks the store to
//! apply the change only if the observed precondition still holds. A lost
//! race comes back as `success: false`, never as an error; errors are
//! reserved for a missing required entity.

use crate::config::ProfileConfig;
use crate::error::{Error, Result};
use crate::notify::{AuditSink, LogSink, NavLink};
use chrono::{DateTime, Duration, Utc};
use kunai_core::{
    calc_cp, calc_hp, calc_level_requirements, calc_sp, seconds_passed, training_gain,
    ActionResponse, Stat, SystemTimeSource, TimeSource, UserRecord, UserStatus,
    ENERGY_SPENT_PER_SECOND,
};
use kunai_db::{ListUsersQuery, Store, UserListing, UserPage, UserPrecondition, UserWithRelations};
use std::sync::Arc;

/// Everything a client needs to render the logged-in user
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: UserWithRelations,
    pub notifications: Vec<NavLink>,
    pub server_time: DateTime<Utc>,
}

/// The profile service
///
/// Holds the store, a clock, the notification sink, and runtime limits.
/// All methods take `&self`; the service is `Send + Sync` and meant to be
/// shared behind an `Arc` by whatever transport fronts it.
pub struct ProfileService {
    pub(crate) store: Arc<Store>,
    pub(crate) clock: Arc<dyn TimeSource>,
    pub(crate) sink: Arc<dyn AuditSink>,
    pub(crate) config: ProfileConfig,
}

impl ProfileService {
    /// Create a service on the system clock with a log-backed sink
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_parts(
            store,
            Arc::new(SystemTimeSource),
            Arc::new(LogSink),
            ProfileConfig::default(),
        )
    }

    /// Create a service from explicit parts
    pub fn with_parts(
        store: Arc<Store>,
        clock: Arc<dyn TimeSource>,
        sink: Arc<dyn AuditSink>,
        config: ProfileConfig,
    ) -> Self {
        Self {
            store,
            clock,
            sink,
            config,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Begin training a stat.
    ///
    /// Requires at least one point of energy. The commit is gated on the
    /// user still being idle, so two racing starts resolve to one session.
    pub fn start_training(&self, user_id: &str, stat: Stat) -> Result<ActionResponse> {
        let fetched = self.fetch_regenerated_user(user_id, true)?;
        if fetched.user.cur_energy < 1.0 {
            return Ok(ActionResponse::failed("Not enough energy"));
        }
        let now = self.clock.now();
        let committed = self
            .store
            .update_user_if(user_id, UserPrecondition::Idle, |user| {
                user.currently_training = Some(stat);
                user.training_started_at = Some(now);
            })?;
        if committed {
            Ok(ActionResponse::ok(format!("Started training {stat}")))
        } else {
            Ok(ActionResponse::failed("You are already training"))
        }
    }

    /// End the active training session and bank the accrued gain.
    ///
    /// The gain is computed from the snapshot read here and the same amount
    /// is what the commit applies; the commit is gated on a session still
    /// being active.
    pub fn stop_training(&self, user_id: &str) -> Result<ActionResponse> {
        let fetched = self.fetch_regenerated_user(user_id, true)?;
        let user = fetched.user;
        if user.status == UserStatus::Battle {
            return Ok(ActionResponse::failed(
                "You cannot stop training while in battle",
            ));
        }
        let (Some(stat), Some(started)) = (user.currently_training, user.training_started_at)
        else {
            return Ok(ActionResponse::failed(
                "You are not currently training anything",
            ));
        };
        let now = self.clock.now();
        let elapsed = seconds_passed(started, now);
        let amount = training_gain(ENERGY_SPENT_PER_SECOND, elapsed, user.cur_energy);
        let committed = self
            .store
            .update_user_if(user_id, UserPrecondition::Training, |user| {
                user.currently_training = None;
                user.training_started_at = None;
                user.cur_energy = (user.cur_energy - amount).max(0.0);
                user.experience += amount;
                user.stats.add(stat, amount);
            })?;
        if committed {
            Ok(ActionResponse::ok(format!("You gained {amount} {stat}")))
        } else {
            Ok(ActionResponse::failed("You are not training"))
        }
    }

    /// Advance the user one level if their experience allows it.
    ///
    /// Returns the level after the call: unchanged when experience is short
    /// or when a concurrent level-up got there first, otherwise one higher
    /// with pool capacities recomputed for the new level.
    pub fn level_up(&self, user_id: &str) -> Result<u32> {
        let user = self.require_user(user_id)?;
        if user.experience < calc_level_requirements(user.level) {
            return Ok(user.level);
        }
        let new_level = user.level + 1;
        let committed =
            self.store
                .update_user_if(user_id, UserPrecondition::LevelIs(user.level), |user| {
                    user.level = new_level;
                    user.max_health = calc_hp(new_level);
                    user.max_stamina = calc_sp(new_level);
                    user.max_chakra = calc_cp(new_level);
                })?;
        Ok(if committed { new_level } else { user.level })
    }

    /// Fetch the logged-in user with refreshed pools, their notifications,
    /// and the server time.
    pub fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        let fetched = self.fetch_regenerated_user(user_id, false)?;
        let user = &fetched.user;

        let mut notifications = Vec::new();
        if user.role.can_moderate() {
            let pending = self.store.count_pending_reports()?;
            if pending > 0 {
                notifications.push(NavLink::new("/reports", format!("{pending} waiting!"), "blue"));
            }
        }
        if user.is_banned {
            notifications.push(NavLink::new("/reports", "You are banned!", "red"));
        }
        if user.deletion_at.is_some() {
            notifications.push(NavLink::new("/profile", "Being deleted", "red"));
        }
        if user.status == UserStatus::Battle {
            notifications.push(NavLink::new("/combat", "In combat", "red"));
        }
        if user.status == UserStatus::Hospitalized {
            notifications.push(NavLink::new("/hospital", "In hospital", "red"));
        }
        if user.inbox_news > 0 {
            notifications.push(NavLink::new(
                "/inbox",
                format!("{} new messages", user.inbox_news),
                "green",
            ));
        }

        Ok(UserProfile {
            user: fetched,
            notifications,
            server_time: self.clock.now(),
        })
    }

    /// Attributes attached to a user
    pub fn get_attributes(&self, user_id: &str) -> Result<Vec<String>> {
        let rows = self.store.user_attributes(user_id)?;
        Ok(rows.into_iter().map(|a| a.attribute).collect())
    }

    /// Whether a username is taken; returns the stored spelling
    pub fn username_exists(&self, username: &str) -> Result<Option<String>> {
        Ok(self.store.username_exists(username)?)
    }

    /// The five most similar approved users by username fragment
    pub fn search_users(
        &self,
        username: &str,
        exclude_user_id: Option<&str>,
    ) -> Result<Vec<UserListing>> {
        Ok(self.store.search_users(username, exclude_user_id)?)
    }

    /// Public view of a user with their village and bloodline, if they exist
    pub fn get_public_user(&self, user_id: &str) -> Result<Option<UserWithRelations>> {
        Ok(self.store.fetch_user_with_relations(user_id)?)
    }

    /// Paginated public roster; the page size is capped by configuration
    pub fn list_public_users(&self, mut query: ListUsersQuery) -> Result<UserPage> {
        query.limit = query.limit.clamp(1, self.config.max_page_limit());
        Ok(self.store.list_users(&query)?)
    }

    /// Start or stop the account deletion timer.
    ///
    /// The commit is gated on the timer state observed here, so two racing
    /// toggles cannot both start (or both stop) the timer.
    pub fn toggle_deletion_timer(&self, user_id: &str) -> Result<ActionResponse> {
        let user = self.require_user(user_id)?;
        let running = user.deletion_at.is_some();
        let deadline = self.clock.now() + Duration::hours(self.config.deletion_delay_hours());
        let committed = self.store.update_user_if(
            user_id,
            UserPrecondition::DeletionTimerRunning(running),
            |user| {
                user.deletion_at = if running { None } else { Some(deadline) };
            },
        )?;
        Ok(match (committed, running) {
            (true, true) => ActionResponse::ok("Deletion timer stopped"),
            (true, false) => ActionResponse::ok("Deletion timer started"),
            (false, _) => ActionResponse::failed("Deletion timer was already changed"),
        })
    }

    /// Delete the account once its deletion timer has expired.
    ///
    /// Runs the full cascade: the user row and every dependent row go in one
    /// transaction.
    pub fn confirm_deletion(&self, user_id: &str) -> Result<ActionResponse> {
        let user = self.require_user(user_id)?;
        match user.deletion_at {
            Some(at) if at <= self.clock.now() => {
                self.store.delete_user_cascade(user_id)?;
                Ok(ActionResponse::ok("Account deleted"))
            }
            _ => Ok(ActionResponse::failed("Deletion timer has not passed yet")),
        }
    }

    pub(crate) fn require_user(&self, user_id: &str) -> Result<UserRecord> {
        self.store
            .fetch_user(user_id)?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kunai_core::FixedTimeSource;
    use kunai_db::{StoredReport, StoredUserAttribute, UserOrder, REPORT_STATUS_UNVIEWED};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn service_at(store: &Arc<Store>, now: DateTime<Utc>) -> ProfileService {
        ProfileService::with_parts(
            Arc::clone(store),
            Arc::new(FixedTimeSource(now)),
            Arc::new(LogSink),
            ProfileConfig::default(),
        )
    }

    fn seed_user(store: &Store, user_id: &str) -> UserRecord {
        let mut user = UserRecord::new(user_id, format!("name-{user_id}"), t0());
        user.approved_tos = true;
        store.save_user(&user).unwrap();
        user
    }

    // ==== training ====

    #[tokio::test]
    async fn test_start_training() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());

        let response = service.start_training("u1", Stat::Strength).unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Started training strength");

        let user = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(user.currently_training, Some(Stat::Strength));
        assert_eq!(user.training_started_at, Some(t0()));
    }

    #[tokio::test]
    async fn test_start_training_refused_when_already_training() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());

        service.start_training("u1", Stat::Strength).unwrap();
        let response = service.start_training("u1", Stat::Speed).unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "You are already training");
    }

    #[tokio::test]
    async fn test_start_training_requires_energy() {
        let store = Arc::new(Store::in_memory().unwrap());
        let mut user = seed_user(&store, "u1");
        user.cur_energy = 0.5;
        store.save_user(&user).unwrap();
        let service = service_at(&store, t0());

        let response = service.start_training("u1", Stat::Strength).unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "Not enough energy");
    }

    #[tokio::test]
    async fn test_start_training_missing_user() {
        let store = Arc::new(Store::in_memory().unwrap());
        let service = service_at(&store, t0());
        assert!(matches!(
            service.start_training("ghost", Stat::Speed),
            Err(Error::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_training_banks_floored_gain() {
        // 120 seconds at 0.5/s: 60 points into experience and the stat
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        service_at(&store, t0())
            .start_training("u1", Stat::Strength)
            .unwrap();

        let later = service_at(&store, t0() + Duration::seconds(120));
        let response = later.stop_training("u1").unwrap();
        assert!(response.success);
        assert_eq!(response.message, "You gained 60 strength");

        let user = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(user.experience, 60.0);
        assert_eq!(user.stats.get(Stat::Strength), 60.0);
        assert_eq!(user.cur_energy, 40.0);
        assert!(!user.is_training());
        assert!(user.training_started_at.is_none());
    }

    #[tokio::test]
    async fn test_stop_training_energy_cost_not_reverted_by_refresh() {
        // The refresh that precedes the stop commit settles its write-back
        // first; the committed energy deduction must survive it.
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        service_at(&store, t0())
            .start_training("u1", Stat::Strength)
            .unwrap();

        let later = service_at(&store, t0() + Duration::seconds(120));
        later.stop_training("u1").unwrap();
        tokio::task::yield_now().await;

        let user = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(user.cur_energy, 40.0);
        assert_eq!(user.experience, 60.0);
    }

    #[tokio::test]
    async fn test_stop_training_gain_capped_by_energy() {
        let store = Arc::new(Store::in_memory().unwrap());
        let mut user = seed_user(&store, "u1");
        user.cur_energy = 10.0;
        user.currently_training = Some(Stat::Speed);
        user.training_started_at = Some(t0());
        store.save_user(&user).unwrap();

        let later = service_at(&store, t0() + Duration::seconds(500));
        let response = later.stop_training("u1").unwrap();
        assert!(response.success);
        // 500s * 0.5 = 250, capped at the 10 energy available
        assert_eq!(response.message, "You gained 10 speed");
    }

    #[tokio::test]
    async fn test_stop_training_refused_in_battle() {
        let store = Arc::new(Store::in_memory().unwrap());
        let mut user = seed_user(&store, "u1");
        user.status = UserStatus::Battle;
        user.currently_training = Some(Stat::Speed);
        user.training_started_at = Some(t0());
        store.save_user(&user).unwrap();

        let response = service_at(&store, t0()).stop_training("u1").unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "You cannot stop training while in battle");
        assert!(store.fetch_user("u1").unwrap().unwrap().is_training());
    }

    #[tokio::test]
    async fn test_stop_training_refused_when_idle() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let response = service_at(&store, t0()).stop_training("u1").unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "You are not currently training anything");
    }

    // ==== level-up ====

    #[test]
    fn test_level_up_noop_without_experience() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());

        assert_eq!(service.level_up("u1").unwrap(), 1);
        assert_eq!(store.fetch_user("u1").unwrap().unwrap().level, 1);
    }

    #[test]
    fn test_level_up_advances_and_rescales_pools() {
        let store = Arc::new(Store::in_memory().unwrap());
        let mut user = seed_user(&store, "u1");
        user.experience = calc_level_requirements(1);
        store.save_user(&user).unwrap();
        let service = service_at(&store, t0());

        assert_eq!(service.level_up("u1").unwrap(), 2);
        let user = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(user.level, 2);
        assert_eq!(user.max_health, calc_hp(2));
        assert_eq!(user.max_stamina, calc_sp(2));
        assert_eq!(user.max_chakra, calc_cp(2));
        // Experience is kept, not spent
        assert_eq!(user.experience, calc_level_requirements(1));
    }

    #[test]
    fn test_level_up_missing_user() {
        let store = Arc::new(Store::in_memory().unwrap());
        let service = service_at(&store, t0());
        assert!(matches!(
            service.level_up("ghost"),
            Err(Error::UserNotFound(_))
        ));
    }

    // ==== get_user ====

    #[tokio::test]
    async fn test_get_user_notifications() {
        let store = Arc::new(Store::in_memory().unwrap());
        let mut user = seed_user(&store, "u1");
        user.role = kunai_core::UserRole::Moderator;
        user.is_banned = true;
        user.inbox_news = 3;
        store.save_user(&user).unwrap();
        store
            .save_report(&StoredReport {
                id: "r1".to_string(),
                user_id: "other".to_string(),
                reporter_user_id: "x".to_string(),
                status: REPORT_STATUS_UNVIEWED.to_string(),
                created_at: 0,
            })
            .unwrap();

        let profile = service_at(&store, t0()).get_user("u1").unwrap();
        let names: Vec<&str> = profile
            .notifications
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, ["1 waiting!", "You are banned!", "3 new messages"]);
        assert_eq!(profile.server_time, t0());
    }

    #[tokio::test]
    async fn test_get_user_plain_player_has_no_notifications() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let profile = service_at(&store, t0()).get_user("u1").unwrap();
        assert!(profile.notifications.is_empty());
    }

    // ==== lookups ====

    #[test]
    fn test_get_attributes() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        store
            .save_attribute(&StoredUserAttribute {
                id: "a1".to_string(),
                user_id: "u1".to_string(),
                attribute: "calm".to_string(),
            })
            .unwrap();

        let attributes = service_at(&store, t0()).get_attributes("u1").unwrap();
        assert_eq!(attributes, vec!["calm".to_string()]);
    }

    #[test]
    fn test_get_public_user_loads_relations() {
        let store = Arc::new(Store::in_memory().unwrap());
        store
            .save_village(&kunai_core::Village {
                id: "v1".to_string(),
                name: "Leafholm".to_string(),
                sector: 3,
            })
            .unwrap();
        let mut user = seed_user(&store, "u1");
        user.village_id = Some("v1".to_string());
        store.save_user(&user).unwrap();
        let service = service_at(&store, t0());

        let public = service.get_public_user("u1").unwrap().unwrap();
        assert_eq!(public.user.username, "name-u1");
        assert_eq!(public.village.unwrap().name, "Leafholm");
        assert!(public.bloodline.is_none());

        assert!(service.get_public_user("ghost").unwrap().is_none());
    }

    #[test]
    fn test_list_public_users_caps_limit() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());

        let page = service
            .list_public_users(ListUsersQuery {
                cursor: None,
                limit: 10_000,
                is_ai: false,
                order_by: UserOrder::Online,
                username: None,
            })
            .unwrap();
        assert_eq!(page.data.len(), 1);
    }

    // ==== deletion ====

    #[test]
    fn test_toggle_deletion_timer_round_trip() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());

        let response = service.toggle_deletion_timer("u1").unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Deletion timer started");
        let user = store.fetch_user("u1").unwrap().unwrap();
        assert_eq!(user.deletion_at, Some(t0() + Duration::hours(48)));

        let response = service.toggle_deletion_timer("u1").unwrap();
        assert_eq!(response.message, "Deletion timer stopped");
        assert!(store.fetch_user("u1").unwrap().unwrap().deletion_at.is_none());
    }

    #[test]
    fn test_confirm_deletion_before_expiry_refused() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let service = service_at(&store, t0());
        service.toggle_deletion_timer("u1").unwrap();

        let response = service.confirm_deletion("u1").unwrap();
        assert!(!response.success);
        assert!(store.fetch_user("u1").unwrap().is_some());
    }

    #[test]
    fn test_confirm_deletion_after_expiry_cascades() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        service_at(&store, t0()).toggle_deletion_timer("u1").unwrap();

        let later = service_at(&store, t0() + Duration::hours(49));
        let response = later.confirm_deletion("u1").unwrap();
        assert!(response.success);
        assert!(store.fetch_user("u1").unwrap().is_none());
    }

    #[test]
    fn test_confirm_deletion_without_timer_refused() {
        let store = Arc::new(Store::in_memory().unwrap());
        seed_user(&store, "u1");
        let response = service_at(&store, t0()).confirm_deletion("u1").unwrap();
        assert!(!response.success);
    }
}
