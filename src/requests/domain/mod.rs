//! Self-validating identifiers and classifications for a request.
//!
//! Raw strings and numbers are turned into these types at the boundary (CSV
//! rows, CLI arguments, deserialized payloads) and never mutated afterwards.

mod error;
mod kind;
mod registration_number;
mod request_id;
mod status;
mod tracking_code;

pub use error::ValidationError;
pub use kind::{DocumentMedium, KindProfile, RequestKind};
pub use registration_number::{
    RegistrationNumber, MAX_REGISTRATION_LENGTH, MIN_REGISTRATION_LENGTH,
};
pub use request_id::RequestId;
pub use status::{deadline_for, is_due_within, is_overdue, RequestStatus, StatusBucket};
pub use tracking_code::{TrackingCode, TRACKING_CODE_PREFIX};
