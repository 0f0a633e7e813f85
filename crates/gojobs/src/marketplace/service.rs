use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{CandidateProfile, JobId, JobPosting, UserId};
use super::matching::{MatchingConfig, MatchingEngine, Recommendation, SimilarJob};
use super::repository::{MarketplaceRepository, RepositoryError};
use super::search::{JobSearchPage, JobSearchQuery};
use super::statistics::{EmployerDashboard, PerformanceByType};
use super::subscription::SubscriptionStatusView;

/// Service composing the record store with the matching engine.
pub struct MarketplaceService<R> {
    repository: Arc<R>,
    engine: Arc<MatchingEngine>,
}

impl<R> MarketplaceService<R>
where
    R: MarketplaceRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: MatchingConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(MatchingEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Rank open jobs for a profile. `limit` falls back to the configured default.
    pub fn recommend(
        &self,
        candidate: &CandidateProfile,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, MarketplaceServiceError> {
        let limit = limit.unwrap_or(self.engine.config().recommendation_limit);
        if !candidate.is_candidate() {
            return Ok(Vec::new());
        }

        let jobs = self.repository.open_jobs()?;
        let applied = self.repository.applied_job_ids(&candidate.user_id)?;
        let recommendations = self.engine.recommend(candidate, &jobs, &applied, now, limit);

        debug!(
            user_id = candidate.user_id.0,
            open_jobs = jobs.len(),
            applied = applied.len(),
            returned = recommendations.len(),
            "computed job recommendations"
        );
        Ok(recommendations)
    }

    pub fn recommend_for_user(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, MarketplaceServiceError> {
        let user = self
            .repository
            .fetch_user(user_id)?
            .ok_or(MarketplaceServiceError::UserNotFound(*user_id))?;
        self.recommend(&CandidateProfile::from(&user), limit, now)
    }

    /// Jobs most similar to `job_id`. Unknown ids fail with `ReferenceNotFound`.
    pub fn similar(
        &self,
        job_id: &JobId,
        limit: Option<usize>,
    ) -> Result<Vec<JobPosting>, MarketplaceServiceError> {
        Ok(self
            .similar_scored(job_id, limit)?
            .into_iter()
            .map(|entry| entry.job)
            .collect())
    }

    pub fn similar_scored(
        &self,
        job_id: &JobId,
        limit: Option<usize>,
    ) -> Result<Vec<SimilarJob>, MarketplaceServiceError> {
        let limit = limit.unwrap_or(self.engine.config().similar_limit);
        let reference = self
            .repository
            .fetch_job(job_id)?
            .ok_or(MarketplaceServiceError::ReferenceNotFound(*job_id))?;

        let jobs = self.repository.open_jobs()?;
        let similar = self.engine.score_similar(&reference, &jobs, limit);

        debug!(
            job_id = job_id.0,
            category = %reference.category,
            returned = similar.len(),
            "computed similar jobs"
        );
        Ok(similar)
    }

    pub fn search(&self, query: &JobSearchQuery) -> Result<JobSearchPage, MarketplaceServiceError> {
        let jobs = self.repository.open_jobs()?;
        Ok(query.run(jobs))
    }

    pub fn employer_dashboard(
        &self,
        employer_id: &UserId,
    ) -> Result<EmployerDashboard, MarketplaceServiceError> {
        let jobs = self.repository.employer_jobs(employer_id)?;
        let applications = self.repository.employer_applications(employer_id)?;
        let dashboard = EmployerDashboard::build(&jobs, &applications);

        info!(
            employer_id = employer_id.0,
            total_jobs = dashboard.total_jobs,
            total_applications = dashboard.total_applications,
            "built employer dashboard"
        );
        Ok(dashboard)
    }

    pub fn performance_by_type(
        &self,
        employer_id: &UserId,
    ) -> Result<PerformanceByType, MarketplaceServiceError> {
        let jobs = self.repository.employer_jobs(employer_id)?;
        Ok(PerformanceByType::build(&jobs))
    }

    pub fn subscription_status(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionStatusView, MarketplaceServiceError> {
        let subscription = self
            .repository
            .subscription_for(user_id)?
            .ok_or(MarketplaceServiceError::SubscriptionNotFound(*user_id))?;
        Ok(subscription.status_view(now))
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceServiceError {
    #[error("job {0} not found")]
    ReferenceNotFound(JobId),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("user {0} has no subscription")]
    SubscriptionNotFound(UserId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
