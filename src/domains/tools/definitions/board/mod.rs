//! Academic board tools: notices (`smu_notices`) and exams (`smu_exam`).

pub mod exams;
pub mod notices;

pub use exams::{ExamSearchParams, ExamSearchTool};
pub use notices::{NoticesByKeywordParams, NoticesByKeywordTool};
