//! Core module: data model, plan engine, loaders and export

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod planner;
pub mod rules;
