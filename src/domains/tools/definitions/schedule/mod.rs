//! Schedule tools over `smu_schedule`.
//!
//! Reads apply the visibility rule (common rows for everyone, personal rows
//! for their owner); writes only ever create or remove personal rows.

pub mod add;
pub mod by_date;
pub mod by_keyword;
pub mod delete;

pub use add::{AddScheduleParams, AddScheduleTool, ScheduleCreated};
pub use by_date::{ScheduleByDateParams, ScheduleByDateTool};
pub use by_keyword::{ScheduleByKeywordParams, ScheduleByKeywordTool};
pub use delete::{DeleteScheduleParams, DeleteScheduleTool, ScheduleDeletion};
