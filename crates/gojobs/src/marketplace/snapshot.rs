use std::cmp::Reverse;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, JobId, JobPosting, UserId, UserRecord};
use super::import;
use super::repository::{MarketplaceRepository, RepositoryError};
use super::subscription::Subscription;

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read marketplace data: {}", err),
            SnapshotError::Json(err) => write!(f, "invalid snapshot JSON: {}", err),
            SnapshotError::Csv(err) => write!(f, "invalid jobs CSV data: {}", err),
            SnapshotError::InvalidRow { line, reason } => {
                write!(f, "jobs CSV line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json(err) => Some(err),
            SnapshotError::Csv(err) => Some(err),
            SnapshotError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Point-in-time copy of the record store, loaded once and read by every query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceSnapshot {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl MarketplaceSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot = serde_json::from_reader(reader)?;
        Ok(snapshot)
    }

    pub fn merge_jobs_csv_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SnapshotError> {
        let file = std::fs::File::open(path)?;
        self.merge_jobs_csv(file)
    }

    /// Import a jobs export, replacing postings that share an id. Returns the row count.
    pub fn merge_jobs_csv<R: Read>(&mut self, reader: R) -> Result<usize, SnapshotError> {
        let imported = import::parse_jobs(reader)?;
        let count = imported.len();

        for job in imported {
            match self.jobs.iter_mut().find(|existing| existing.id == job.id) {
                Some(existing) => *existing = job,
                None => self.jobs.push(job),
            }
        }

        Ok(count)
    }
}

impl MarketplaceRepository for MarketplaceSnapshot {
    fn open_jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let mut jobs: Vec<JobPosting> = self.jobs.iter().filter(|job| job.is_open()).cloned().collect();
        jobs.sort_by_key(|job| Reverse(job.created_at));
        Ok(jobs)
    }

    fn applied_job_ids(&self, candidate: &UserId) -> Result<HashSet<JobId>, RepositoryError> {
        Ok(self
            .applications
            .iter()
            .filter(|application| &application.candidate_id == candidate)
            .map(|application| application.job_id)
            .collect())
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.jobs.iter().find(|job| &job.id == id).cloned())
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.users.iter().find(|user| &user.id == id).cloned())
    }

    fn employer_jobs(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError> {
        let mut jobs: Vec<JobPosting> = self
            .jobs
            .iter()
            .filter(|job| &job.employer_id == employer)
            .cloned()
            .collect();
        jobs.sort_by_key(|job| Reverse(job.created_at));
        Ok(jobs)
    }

    fn employer_applications(
        &self,
        employer: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let owned: HashSet<JobId> = self
            .jobs
            .iter()
            .filter(|job| &job.employer_id == employer)
            .map(|job| job.id)
            .collect();

        Ok(self
            .applications
            .iter()
            .filter(|application| owned.contains(&application.job_id))
            .cloned()
            .collect())
    }

    fn subscription_for(&self, user: &UserId) -> Result<Option<Subscription>, RepositoryError> {
        Ok(self
            .subscriptions
            .iter()
            .find(|subscription| &subscription.user_id == user)
            .cloned())
    }
}
