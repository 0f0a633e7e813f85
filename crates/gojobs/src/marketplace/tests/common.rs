use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::marketplace::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, CandidateProfile, ContractType, JobId,
    JobPosting, JobStatus, Salary, SalaryPeriod, UserId, UserRecord, UserRole,
};
use crate::marketplace::repository::{MarketplaceRepository, RepositoryError};
use crate::marketplace::subscription::Subscription;

pub(super) const EMPLOYER: UserId = UserId(1);
pub(super) const CANDIDATE: UserId = UserId(2);

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub(super) fn warehouse_candidate() -> CandidateProfile {
    CandidateProfile {
        user_id: CANDIDATE,
        role: UserRole::Candidate,
        preferred_categories: set(&["warehouse"]),
        preferred_locations: set(&["Lyon"]),
        skills: set(&["forklift"]),
    }
}

/// Plain open posting created `age_days` before [`now`], with no bonus flags.
pub(super) fn job(id: u64, category: &str, city: &str, age_days: i64) -> JobPosting {
    JobPosting {
        id: JobId(id),
        employer_id: EMPLOYER,
        title: format!("Job {id}"),
        description: String::new(),
        category: category.to_string(),
        city: city.to_string(),
        contract_type: ContractType::Cdi,
        is_urgent: false,
        is_top: false,
        status: JobStatus::Active,
        created_at: now() - Duration::days(age_days),
        expires_at: None,
        salary: None,
        requirements: None,
        views_count: 0,
        applications_count: 0,
    }
}

pub(super) fn with_requirements(mut job: JobPosting, requirements: &[&str]) -> JobPosting {
    job.requirements = Some(requirements.iter().map(|item| item.to_string()).collect());
    job
}

pub(super) fn with_salary(mut job: JobPosting, amount: f64, period: SalaryPeriod) -> JobPosting {
    job.salary = Some(Salary { amount, period });
    job
}

pub(super) fn with_contract(mut job: JobPosting, contract_type: ContractType) -> JobPosting {
    job.contract_type = contract_type;
    job
}

pub(super) fn application(
    id: u64,
    job_id: u64,
    candidate: UserId,
    is_read: bool,
) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(id),
        job_id: JobId(job_id),
        candidate_id: candidate,
        status: ApplicationStatus::Pending,
        is_read,
        created_at: now(),
    }
}

pub(super) fn user(id: UserId, role: UserRole) -> UserRecord {
    UserRecord {
        id,
        role,
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        skills: None,
        job_preferences: None,
    }
}

pub(super) fn ids(jobs: &[JobPosting]) -> Vec<u64> {
    jobs.iter().map(|job| job.id.0).collect()
}

/// Store double that keeps postings in insertion order and can simulate an outage.
#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) jobs: Vec<JobPosting>,
    pub(super) users: Vec<UserRecord>,
    pub(super) applications: Vec<ApplicationRecord>,
    pub(super) subscriptions: Vec<Subscription>,
    pub(super) unavailable: bool,
}

impl MemoryRepository {
    fn guard(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            Err(RepositoryError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl MarketplaceRepository for MemoryRepository {
    fn open_jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        self.guard()?;
        Ok(self.jobs.iter().filter(|job| job.is_open()).cloned().collect())
    }

    fn applied_job_ids(&self, candidate: &UserId) -> Result<HashSet<JobId>, RepositoryError> {
        self.guard()?;
        Ok(self
            .applications
            .iter()
            .filter(|application| &application.candidate_id == candidate)
            .map(|application| application.job_id)
            .collect())
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.guard()?;
        Ok(self.jobs.iter().find(|job| &job.id == id).cloned())
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        self.guard()?;
        Ok(self.users.iter().find(|user| &user.id == id).cloned())
    }

    fn employer_jobs(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError> {
        self.guard()?;
        Ok(self
            .jobs
            .iter()
            .filter(|job| &job.employer_id == employer)
            .cloned()
            .collect())
    }

    fn employer_applications(
        &self,
        employer: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.guard()?;
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
        self.guard()?;
        Ok(self
            .subscriptions
            .iter()
            .find(|subscription| &subscription.user_id == user)
            .cloned())
    }
}
