//! Dashboard statistics over a population of requests.

mod aggregator;
pub mod repository;
pub mod scope;
pub mod views;

pub use aggregator::{completion_rate, DashboardAggregator, DashboardError};
pub use repository::{
    DashboardRepository, RawDashboardStats, RawResponsibleEfficiency, RecentRequest,
    RepositoryError,
};
pub use scope::{
    DashboardQuery, DashboardScope, DateRange, RawDateRange, UserId, MAX_RANGE_MONTHS,
};
pub use views::{DashboardReport, MediumBreakdown, ResponsibleEfficiency};
