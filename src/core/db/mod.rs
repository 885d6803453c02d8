//! Data access for the campus tables.
//!
//! Tools never talk to MySQL directly; they go through the [`CampusStore`]
//! trait so a different backend (the in-memory one in tests, for instance)
//! can be injected without touching query logic.
//!
//! - `mysql.rs` - sqlx-backed implementation over a lazily connected pool
//! - `memory.rs` - in-memory implementation with the same filtering rules
//! - `record.rs` - MySQL row to JSON record conversion

mod error;
pub mod memory;
pub mod mysql;
pub mod record;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use mysql::MySqlStore;

/// A result row: column name to JSON value, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Visibility class of a schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    /// Shared campus-wide entry, visible to everyone and never mutated here.
    Common,
    /// Entry owned by a single student id.
    Personal,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Personal => "personal",
        }
    }
}

/// A personal schedule about to be inserted.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub content: String,
    pub owner: String,
    pub created_at: DateTime<FixedOffset>,
}

/// A schedule row removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedSchedule {
    pub id: i64,
    pub content: String,
}

/// Wrap a keyword for a `LIKE` substring match.
pub fn like_pattern(keyword: &str) -> String {
    format!("%{keyword}%")
}

/// Read and write access to the campus tables.
///
/// Every method is a single logical statement. `viewer` is the caller's
/// student id: with one, personal rows owned by that id are included next to
/// common rows; without one, only common rows are returned.
#[async_trait]
pub trait CampusStore: Send + Sync {
    /// Meals on `date_iso` (`YYYY-MM-DD`) whose category equals `category`,
    /// ignoring case. Tolerates dates stored as DATE or as dotted/slashed text.
    async fn meals_by_date_category(&self, date_iso: &str, category: &str)
    -> StoreResult<Vec<Record>>;

    /// Meals whose description contains `keyword`.
    async fn meals_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>>;

    /// Notices whose title contains `keyword`.
    async fn notices_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>>;

    /// Exams whose subject contains `keyword` and, when given, whose
    /// professor contains `professor`.
    async fn exams(&self, keyword: &str, professor: Option<&str>) -> StoreResult<Vec<Record>>;

    /// Schedules whose content contains `keyword`.
    async fn schedules_by_keyword(
        &self,
        keyword: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>>;

    /// Schedules whose start or end date contains `date_token`, either as a
    /// bare date or as the full stored timestamp.
    async fn schedules_by_date(
        &self,
        date_token: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>>;

    /// Insert a personal schedule and return its generated id.
    async fn insert_schedule(&self, schedule: &NewSchedule) -> StoreResult<u64>;

    /// Delete the personal schedules of `owner` whose content contains
    /// `content_keyword`. Returns the removed rows; empty when nothing matched.
    async fn delete_personal_schedules(
        &self,
        content_keyword: &str,
        owner: &str,
    ) -> StoreResult<Vec<DeletedSchedule>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("중간"), "%중간%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_schedule_kind_serde() {
        assert_eq!(ScheduleKind::Personal.as_str(), "personal");
        assert_eq!(
            serde_json::to_value(ScheduleKind::Common).unwrap(),
            serde_json::json!("common")
        );
    }
}
