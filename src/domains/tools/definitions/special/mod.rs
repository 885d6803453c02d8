//! Static lookups that need no database.

pub mod keywords;

pub use keywords::{SpecialKeywords, SpecialKeywordsParams, SpecialKeywordsTool};
