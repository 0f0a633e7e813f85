use std::collections::HashSet;

use super::domain::{ApplicationRecord, JobId, JobPosting, UserId, UserRecord};
use super::subscription::Subscription;

/// Read-only access to the record store so the service can be exercised in isolation.
///
/// `open_jobs` returns active postings newest first; the scorers treat that as
/// the tie-breaking order.
pub trait MarketplaceRepository: Send + Sync {
    fn open_jobs(&self) -> Result<Vec<JobPosting>, RepositoryError>;
    fn applied_job_ids(&self, candidate: &UserId) -> Result<HashSet<JobId>, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
    fn employer_jobs(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError>;
    fn employer_applications(
        &self,
        employer: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn subscription_for(&self, user: &UserId) -> Result<Option<Subscription>, RepositoryError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
