//! Prompts domain module.
//!
//! Prompts are data-file templates rendered with clock variables and the
//! caller's arguments.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual prompt definitions (one file per prompt)
//! - `registry.rs` - Central prompt registration
//! - `service.rs` - Listing and rendering
//! - `templates.rs` - `{{variable}}` renderer

pub mod definitions;
mod error;
mod registry;
mod service;
pub mod templates;

pub use definitions::PromptDefinition;
pub use error::PromptError;
pub use registry::get_all_prompts;
pub use service::PromptService;
pub use templates::PromptTemplate;
