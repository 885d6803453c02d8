//! Tools domain module.
//!
//! Each tool runs one parameterized query or mutation against the campus
//! tables (or a static lookup) and returns structured content.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for the STDIO transport
//! - `registry.rs` - HTTP dispatch by tool name
//! - `error.rs` - Tool-specific error types
//!
//! A new tool needs an export in `definitions/mod.rs`, a route in
//! `router.rs` and an entry in `registry.rs`; `server.rs` stays untouched.

pub mod definitions;
mod error;
#[cfg(feature = "http")]
mod registry;
pub mod router;

pub use definitions::SpecialKeywords;
pub use error::ToolError;
#[cfg(feature = "http")]
pub use registry::ToolRegistry;
pub use router::build_tool_router;
