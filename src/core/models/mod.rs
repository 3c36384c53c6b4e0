//! Data models for the study planner

pub mod entry;
pub mod exam;
pub mod plan;
pub mod table;

pub use entry::PlanEntry;
pub use exam::ExamDescriptor;
pub use plan::Plan;
pub use table::{Curriculum, Table};
