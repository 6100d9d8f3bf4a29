//! Listing and search queries.
//!
//! The roster listing uses page-index cursors: a request carries the page to
//! fetch, the response carries `next_cursor` for the following page, or
//! `None` once a short page signals the end. Sorting and filtering happen
//! over a full scan; the store is embedded and user counts are modest.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use kunai_core::UserRole;

/// Sort order for the public roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOrder {
    /// Most recently active first.
    Online,
    /// Highest level and experience first.
    Strongest,
    /// Lowest level and experience first.
    Weakest,
    /// Staff roles first.
    Staff,
}

/// Parameters for a roster page.
#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    /// Page index; `None` means the first page.
    pub cursor: Option<u64>,
    /// Rows per page (1..=100).
    pub limit: usize,
    /// List AI records instead of players.
    pub is_ai: bool,
    pub order_by: UserOrder,
    /// Case-insensitive username substring filter.
    pub username: Option<String>,
}

/// One roster row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListing {
    pub user_id: String,
    pub username: String,
    pub avatar: String,
    pub rank: String,
    pub level: u32,
    pub role: UserRole,
    pub experience: f64,
    pub updated_at: i64,
    /// Jutsu names, populated for AI listings only.
    pub jutsu_names: Vec<String>,
}

/// A page of roster rows plus the continuation cursor.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub data: Vec<UserListing>,
    pub next_cursor: Option<u64>,
}

impl Store {
    fn all_users(&self) -> Result<Vec<StoredUser>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredUser>()?;
        let iter = scan.all()?;
        let users: std::result::Result<Vec<StoredUser>, _> = iter.collect();
        users.map_err(|e| Error::Database(e.to_string()))
    }

    fn listing_row(&self, user: &StoredUser, with_jutsus: bool) -> Result<UserListing> {
        let jutsu_names = if with_jutsus {
            let jutsus = self.user_jutsus(&user.user_id)?;
            let ids: Vec<String> = jutsus.into_iter().map(|j| j.jutsu_id).collect();
            self.jutsu_names(&ids)?
                .into_iter()
                .map(|(_, name)| name)
                .collect()
        } else {
            Vec::new()
        };
        Ok(UserListing {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            rank: user.rank.clone(),
            level: user.level,
            role: user.role.parse().unwrap_or_default(),
            experience: user.experience,
            updated_at: user.updated_at,
            jutsu_names,
        })
    }

    /// Paginated, filtered, sorted roster of public users or AIs.
    pub fn list_users(&self, query: &ListUsersQuery) -> Result<UserPage> {
        let limit = query.limit.clamp(1, 100);
        let needle = query.username.as_deref().map(str::to_lowercase);

        let mut users: Vec<StoredUser> = self
            .all_users()?
            .into_iter()
            .filter(|u| {
                if query.is_ai {
                    u.is_ai
                } else {
                    !u.is_ai && u.approved_tos
                }
            })
            .filter(|u| match &needle {
                Some(n) => u.username.to_lowercase().contains(n),
                None => true,
            })
            .filter(|u| {
                if query.order_by == UserOrder::Staff {
                    u.role.parse::<UserRole>().unwrap_or_default() != UserRole::User
                } else {
                    true
                }
            })
            .collect();

        match query.order_by {
            UserOrder::Online => {
                users.sort_by_key(|u| std::cmp::Reverse(u.updated_at));
            }
            UserOrder::Strongest => {
                users.sort_by(|a, b| {
                    b.level
                        .cmp(&a.level)
                        .then(b.experience.total_cmp(&a.experience))
                });
            }
            UserOrder::Weakest => {
                users.sort_by(|a, b| {
                    a.level
                        .cmp(&b.level)
                        .then(a.experience.total_cmp(&b.experience))
                });
            }
            UserOrder::Staff => {
                users.sort_by(|a, b| {
                    let ra = a.role.parse::<UserRole>().unwrap_or_default();
                    let rb = b.role.parse::<UserRole>().unwrap_or_default();
                    rb.cmp(&ra).then(a.username.cmp(&b.username))
                });
            }
        }

        let cursor = query.cursor.unwrap_or(0);
        let skip = cursor as usize * limit;
        let page: Vec<UserListing> = users
            .iter()
            .skip(skip)
            .take(limit)
            .map(|u| self.listing_row(u, query.is_ai))
            .collect::<Result<_>>()?;

        let next_cursor = if page.len() < limit {
            None
        } else {
            Some(cursor + 1)
        };
        Ok(UserPage {
            data: page,
            next_cursor,
        })
    }

    /// The five most similar approved users by username fragment.
    pub fn search_users(
        &self,
        username: &str,
        exclude_user_id: Option<&str>,
    ) -> Result<Vec<UserListing>> {
        let needle = username.to_lowercase();
        let mut matches: Vec<StoredUser> = self
            .all_users()?
            .into_iter()
            .filter(|u| u.approved_tos && u.username.to_lowercase().contains(&needle))
            .filter(|u| Some(u.user_id.as_str()) != exclude_user_id)
            .collect();
        // Shortest matching name is the closest match
        matches.sort_by_key(|u| (u.username.len(), u.username.clone()));
        matches
            .iter()
            .take(5)
            .map(|u| self.listing_row(u, false))
            .collect()
    }

    /// Whether a username is taken; returns the stored spelling.
    pub fn username_exists(&self, username: &str) -> Result<Option<String>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredUser>(StoredUserKey::username)?;
        let iter = scan.start_with(username)?;
        for row in iter {
            let row = row.map_err(|e| Error::Database(e.to_string()))?;
            if row.username == username {
                return Ok(Some(row.username));
            }
        }
        Ok(None)
    }

    /// Number of reports awaiting moderator review.
    pub fn count_pending_reports(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredReport>()?;
        let iter = scan.all()?;
        let mut count = 0;
        for row in iter {
            let row = row.map_err(|e| Error::Database(e.to_string()))?;
            if row.status == REPORT_STATUS_UNVIEWED || row.status == REPORT_STATUS_BAN_ESCALATED {
                count += 1;
            }
        }
        Ok(count)
    }
}
