use std::collections::HashMap;

use serde::Serialize;

use super::domain::{ApplicationRecord, JobId, JobPosting, JobStatus};

const TOP_JOBS: usize = 5;

/// Aggregates shown on an employer's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerDashboard {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
    pub new_applications: usize,
    pub total_views: u64,
    pub cv_rate: f64,
    pub top_jobs: Vec<JobPerformanceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPerformanceView {
    pub job_id: JobId,
    pub title: String,
    pub views: u32,
    pub applications: usize,
    pub conversion_rate: f64,
}

impl EmployerDashboard {
    /// `jobs` are the employer's postings, `applications` every application made to them.
    pub fn build(jobs: &[JobPosting], applications: &[ApplicationRecord]) -> Self {
        let mut per_job: HashMap<JobId, usize> = HashMap::new();
        for application in applications {
            *per_job.entry(application.job_id).or_default() += 1;
        }

        let total_views: u64 = jobs.iter().map(|job| u64::from(job.views_count)).sum();
        let total_applications = applications.len();
        let cv_rate = if total_views > 0 {
            round_two(total_applications as f64 / total_views as f64 * 100.0)
        } else {
            0.0
        };

        let mut top_jobs: Vec<JobPerformanceView> = jobs
            .iter()
            .map(|job| JobPerformanceView {
                job_id: job.id,
                title: job.title.clone(),
                views: job.views_count,
                applications: per_job.get(&job.id).copied().unwrap_or(0),
                conversion_rate: round_two(job.conversion_rate()),
            })
            .collect();
        top_jobs.sort_by(|left, right| right.applications.cmp(&left.applications));
        top_jobs.truncate(TOP_JOBS);

        Self {
            total_jobs: jobs.len(),
            active_jobs: jobs
                .iter()
                .filter(|job| job.status == JobStatus::Active)
                .count(),
            total_applications,
            new_applications: applications
                .iter()
                .filter(|application| !application.is_read)
                .count(),
            total_views,
            cv_rate,
            top_jobs,
        }
    }
}

/// Average reach of a group of listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypePerformance {
    pub count: usize,
    pub avg_views: f64,
    pub avg_applications: f64,
    pub avg_conversion: f64,
}

impl TypePerformance {
    fn from_jobs<'a>(jobs: impl Iterator<Item = &'a JobPosting>) -> Self {
        let group: Vec<&JobPosting> = jobs.collect();
        if group.is_empty() {
            return Self {
                count: 0,
                avg_views: 0.0,
                avg_applications: 0.0,
                avg_conversion: 0.0,
            };
        }

        let count = group.len() as f64;
        Self {
            count: group.len(),
            avg_views: group.iter().map(|job| f64::from(job.views_count)).sum::<f64>() / count,
            avg_applications: group
                .iter()
                .map(|job| f64::from(job.applications_count))
                .sum::<f64>()
                / count,
            avg_conversion: group.iter().map(|job| job.conversion_rate()).sum::<f64>() / count,
        }
    }
}

/// Compares plain, urgent, and featured listings. A job both urgent and top counts in both groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceByType {
    pub normal: TypePerformance,
    pub urgent: TypePerformance,
    pub top: TypePerformance,
}

impl PerformanceByType {
    pub fn build(jobs: &[JobPosting]) -> Self {
        Self {
            normal: TypePerformance::from_jobs(
                jobs.iter().filter(|job| !job.is_urgent && !job.is_top),
            ),
            urgent: TypePerformance::from_jobs(jobs.iter().filter(|job| job.is_urgent)),
            top: TypePerformance::from_jobs(jobs.iter().filter(|job| job.is_top)),
        }
    }
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
