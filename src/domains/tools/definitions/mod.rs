//! Tool definitions module.
//!
//! One file per tool, grouped by the table they read.

pub mod board;
pub mod common;
pub mod meals;
pub mod schedule;
pub mod special;
pub mod time;

pub use board::{ExamSearchTool, NoticesByKeywordTool};
pub use meals::{MealsByDateCategoryTool, MealsByKeywordTool};
pub use schedule::{AddScheduleTool, DeleteScheduleTool, ScheduleByDateTool, ScheduleByKeywordTool};
pub use special::{SpecialKeywords, SpecialKeywordsTool};
pub use time::NowKrTool;
