mod config;
mod rules;
pub mod scoring;

pub use config::{
    MatchingConfig, DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_SIMILAR_LIMIT,
    DEFAULT_SIMILAR_OVERFETCH,
};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{CandidateProfile, JobId, JobPosting};
use scoring::{clamp_score, rank_descending};

/// Recommendations at or below this clamped score are dropped.
pub const INCLUSION_THRESHOLD: u8 = 20;

/// Stateless scorer applying the fixed signal weights to in-memory job collections.
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank open, not-yet-applied jobs for a candidate.
    ///
    /// `jobs` is consumed in store order; equal scores keep that order. Profiles
    /// without the candidate role get an empty list rather than an error.
    pub fn recommend(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
        applied: &HashSet<JobId>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<Recommendation> {
        if !candidate.is_candidate() {
            debug!(
                user_id = candidate.user_id.0,
                role = candidate.role.label(),
                "skipping recommendations for non-candidate profile"
            );
            return Vec::new();
        }

        let mut recommendations: Vec<Recommendation> = jobs
            .iter()
            .filter(|job| job.is_open() && !applied.contains(&job.id))
            .filter_map(|job| {
                let (components, raw_score) = rules::score_candidate_fit(candidate, job, now);
                let score = clamp_score(raw_score);
                (score > INCLUSION_THRESHOLD).then(|| Recommendation {
                    job: job.clone(),
                    score,
                    components,
                })
            })
            .collect();

        rank_descending(&mut recommendations, |entry| entry.score);
        recommendations.truncate(limit);
        recommendations
    }

    /// Rank open jobs sharing the reference's category, most similar first.
    ///
    /// Only the first `limit * similar_overfetch` pool entries in store order are
    /// scored. The reference itself is never part of the result.
    pub fn similar(
        &self,
        reference: &JobPosting,
        jobs: &[JobPosting],
        limit: usize,
    ) -> Vec<JobPosting> {
        self.score_similar(reference, jobs, limit)
            .into_iter()
            .map(|entry| entry.job)
            .collect()
    }

    /// Same ranking as [`MatchingEngine::similar`] but keeps the intermediate scores.
    pub fn score_similar(
        &self,
        reference: &JobPosting,
        jobs: &[JobPosting],
        limit: usize,
    ) -> Vec<SimilarJob> {
        let pool_size = limit.saturating_mul(self.config.similar_overfetch.max(1));

        let mut scored: Vec<SimilarJob> = jobs
            .iter()
            .filter(|job| {
                job.is_open() && job.id != reference.id && job.category == reference.category
            })
            .take(pool_size)
            .map(|job| {
                let (components, raw_score) = rules::score_job_similarity(reference, job);
                SimilarJob {
                    job: job.clone(),
                    score: clamp_score(raw_score),
                    components,
                }
            })
            .collect();

        rank_descending(&mut scored, |entry| entry.score);
        scored.truncate(limit);
        scored
    }
}

/// Attribute that contributed to a fit or similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    Category,
    Location,
    Skill,
    Urgency,
    Featured,
    Recency,
    ContractType,
    SalaryBand,
}

/// Discrete contribution to a score so callers can explain a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: MatchSignal,
    pub score: i32,
    pub notes: String,
}

/// A job offered to a candidate together with its clamped fit score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub job: JobPosting,
    pub score: u8,
    pub components: Vec<ScoreComponent>,
}

impl Recommendation {
    pub fn as_pair(&self) -> (&JobPosting, u8) {
        (&self.job, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarJob {
    pub job: JobPosting,
    pub score: u8,
    pub components: Vec<ScoreComponent>,
}
