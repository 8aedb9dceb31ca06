//! Work-readiness scheduling and KPI scoring for occupational-health case management.
//!
//! The crate exposes two independent pieces: the [`kpi`] engine, which turns counts and
//! assignment/assessment records into rating objects for dashboards, and the [`assignments`]
//! workflow, which guards batch scheduling against overdue and not-yet-due pending work.

pub mod assignments;
pub mod clock;
pub mod config;
pub mod error;
pub mod kpi;
pub mod telemetry;
