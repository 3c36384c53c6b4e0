//! Plan allocation and validation

pub mod allocation;
pub mod availability;
pub mod engine;
pub mod validation;

pub use allocation::{allowed_tables, assign_tables, TableTargets};
pub use availability::{AcademicYear, Availability, AvailabilityInfo, Parity};
pub use engine::PlanEngine;
pub use validation::{AggregateStatus, TableStatus, ValidationMessage, ValidationReport};
