//! Records-retrieval requests: identifiers, lifecycle and dashboard statistics.

pub mod dashboard;
pub mod domain;
pub mod import;
pub mod memory;
pub mod record;

pub use dashboard::{DashboardAggregator, DashboardError, DashboardQuery, DashboardReport};
pub use import::{RequestCsvImporter, RequestImportError};
pub use memory::{InMemoryRequestRepository, RepositorySettings};
pub use record::RequestRecord;
