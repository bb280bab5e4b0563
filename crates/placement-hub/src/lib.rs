//! Core engine for the placement portal's application tracking surface.
//!
//! The crate reconciles two structurally different backends, direct
//! applications and internship postings reinterpreted as applications, into
//! one normalized collection, serves filtered and sorted views of it, and
//! routes status changes back to the backend that owns each record.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracking;
