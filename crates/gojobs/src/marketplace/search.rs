use serde::{Deserialize, Serialize};

use super::domain::{ContractType, JobPosting};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filters applied to open jobs. Text matches title or description, the rest are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSearchQuery {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl JobSearchQuery {
    pub fn matches(&self, job: &JobPosting) -> bool {
        if !job.is_open() {
            return false;
        }

        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            if !job.title.to_lowercase().contains(&needle)
                && !job.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &job.category != category {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if &job.city != city {
                return false;
            }
        }

        if let Some(contract_type) = self.contract_type {
            if job.contract_type != contract_type {
                return false;
            }
        }

        true
    }

    /// Filter `jobs` (kept in store order) and cut out the requested page.
    pub fn run(&self, jobs: Vec<JobPosting>) -> JobSearchPage {
        let per_page = self.per_page.filter(|size| *size > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        let current_page = self.page.filter(|page| *page > 0).unwrap_or(1);

        let matching: Vec<JobPosting> = jobs.into_iter().filter(|job| self.matches(job)).collect();
        let total = matching.len();
        let last_page = total.div_ceil(per_page).max(1);

        let jobs = matching
            .into_iter()
            .skip((current_page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        JobSearchPage {
            jobs,
            meta: PageMeta {
                current_page,
                last_page,
                per_page,
                total,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSearchPage {
    pub jobs: Vec<JobPosting>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: usize,
    pub last_page: usize,
    pub per_page: usize,
    pub total: usize,
}
