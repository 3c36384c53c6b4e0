//! CLI command handlers for `studyplan`.
//!
//! Each command is implemented in its own submodule; `session` holds the
//! loading and persistence shared by the catalog and plan commands.

pub mod catalog;
pub mod config;
pub mod plan;
pub mod session;
