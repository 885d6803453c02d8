//! Cafeteria meal tools over `smu_meals`.

pub mod by_date_category;
pub mod by_keyword;

pub use by_date_category::{MealsByDateCategoryParams, MealsByDateCategoryTool};
pub use by_keyword::{MealsByKeywordParams, MealsByKeywordTool};
