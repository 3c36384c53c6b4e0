//! Shared library for the study planner
//! Contains the plan engine, loaders, and the logger used by the CLI

pub mod core;
pub mod logger;

pub use core::config;
