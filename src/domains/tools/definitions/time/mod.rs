//! Clock tools.

pub mod now_kr;

pub use now_kr::{NowKrParams, NowKrTool};
