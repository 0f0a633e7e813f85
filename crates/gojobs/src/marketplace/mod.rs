//! Job-marketplace records, the read-only repository seam, and the matching engine.
//!
//! Everything here reads a snapshot of the record store; nothing writes back.

pub mod domain;
mod import;
pub mod matching;
pub mod repository;
pub mod search;
pub mod service;
pub mod snapshot;
pub mod statistics;
pub mod subscription;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, CandidateProfile, ContractType, JobId,
    JobPosting, JobPreferences, JobStatus, Salary, SalaryPeriod, SubscriptionId, UserId,
    UserRecord, UserRole,
};
pub use matching::{
    MatchSignal, MatchingConfig, MatchingEngine, Recommendation, ScoreComponent, SimilarJob,
    INCLUSION_THRESHOLD,
};
pub use repository::{MarketplaceRepository, RepositoryError};
pub use search::{JobSearchPage, JobSearchQuery, PageMeta};
pub use service::{MarketplaceService, MarketplaceServiceError};
pub use snapshot::{MarketplaceSnapshot, SnapshotError};
pub use statistics::{EmployerDashboard, JobPerformanceView, PerformanceByType, TypePerformance};
pub use subscription::{
    BillingCycle, PlanType, Subscription, SubscriptionError, SubscriptionStatus,
    SubscriptionStatusView,
};
