//! Tracking of records-retrieval ("desarquivamento") requests.
//!
//! The crate centres on two pieces: self-validating identifiers that keep a
//! request's identity and classification well-formed, and the dashboard
//! aggregator that turns repository counts into an operational report.

pub mod config;
pub mod error;
pub mod requests;
pub mod telemetry;
