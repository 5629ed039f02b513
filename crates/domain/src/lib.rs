//! Domain Layer - personnel back office business logic
//!
//! Pure business logic with no dependency on:
//! - storage (SQLite, connection pools)
//! - presentation (CLI, desktop UI)
//! - logging backends
//!
//! - Entities: org units, roles, staff, assignments, leave, transfers, attendance
//! - Value Objects: typed ids, status machines, normalized role titles
//! - Pagination and configuration types shared by the outer layers

pub mod config;
pub mod entities;
pub mod errors;
pub mod pagination;
pub mod value_objects;

pub use entities::{
    build_forest, forest_size, Assignment, AssignmentDetail, AttendanceRecord, AttendanceSheetRow,
    AttendanceSummary, Holiday, LeaveListing, LeaveRequest, OrgUnit, Role, Staff, Transfer,
    TransferListing, UnitCoverage, UnitRecord,
};
pub use errors::{DomainError, DomainResult, ErrorCategory};
pub use pagination::{total_pages, Page, PageRequest};
pub use value_objects::*;
