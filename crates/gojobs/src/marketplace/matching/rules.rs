use chrono::{DateTime, Utc};

use super::super::domain::{CandidateProfile, JobPosting};
use super::scoring::days_between;
use super::{MatchSignal, ScoreComponent};

const CATEGORY_WEIGHT: i32 = 30;
const LOCATION_WEIGHT: i32 = 25;
const SKILL_WEIGHT: i32 = 15;
const URGENT_WEIGHT: i32 = 10;
const FEATURED_WEIGHT: i32 = 5;
const CONTRACT_WEIGHT: i32 = 20;
const SALARY_BAND_WEIGHT: i32 = 15;

/// (exclusive upper bound in days, bonus), most recent band first.
const RECENCY_BANDS: [(i64, i32); 3] = [(3, 15), (7, 10), (14, 5)];

pub(crate) fn score_candidate_fit(
    candidate: &CandidateProfile,
    job: &JobPosting,
    now: DateTime<Utc>,
) -> (Vec<ScoreComponent>, i32) {
    let mut components = Vec::new();
    let mut total_score: i32 = 0;

    if candidate.preferred_categories.contains(&job.category) {
        components.push(ScoreComponent {
            signal: MatchSignal::Category,
            score: CATEGORY_WEIGHT,
            notes: format!("category '{}' is a saved preference", job.category),
        });
        total_score += CATEGORY_WEIGHT;
    }

    if candidate.preferred_locations.contains(&job.city) {
        components.push(ScoreComponent {
            signal: MatchSignal::Location,
            score: LOCATION_WEIGHT,
            notes: format!("city '{}' is a saved location", job.city),
        });
        total_score += LOCATION_WEIGHT;
    }

    let requirements: Vec<String> = job
        .requirements()
        .iter()
        .map(|requirement| requirement.to_lowercase())
        .collect();
    for skill in &candidate.skills {
        let needle = skill.to_lowercase();
        if requirements
            .iter()
            .any(|requirement| requirement.contains(&needle))
        {
            components.push(ScoreComponent {
                signal: MatchSignal::Skill,
                score: SKILL_WEIGHT,
                notes: format!("skill '{skill}' appears in the requirements"),
            });
            total_score += SKILL_WEIGHT;
        }
    }

    if job.is_urgent {
        components.push(ScoreComponent {
            signal: MatchSignal::Urgency,
            score: URGENT_WEIGHT,
            notes: "urgent hiring".to_string(),
        });
        total_score += URGENT_WEIGHT;
    }

    if job.is_top {
        components.push(ScoreComponent {
            signal: MatchSignal::Featured,
            score: FEATURED_WEIGHT,
            notes: "featured listing".to_string(),
        });
        total_score += FEATURED_WEIGHT;
    }

    let age_days = days_between(job.created_at, now);
    if let Some((_, bonus)) = RECENCY_BANDS
        .iter()
        .find(|(upper_bound, _)| age_days < *upper_bound)
    {
        components.push(ScoreComponent {
            signal: MatchSignal::Recency,
            score: *bonus,
            notes: format!("posted {age_days} day(s) ago"),
        });
        total_score += *bonus;
    }

    (components, total_score)
}

pub(crate) fn score_job_similarity(
    reference: &JobPosting,
    job: &JobPosting,
) -> (Vec<ScoreComponent>, i32) {
    let mut components = Vec::new();
    let mut total_score: i32 = 0;

    if job.category == reference.category {
        components.push(ScoreComponent {
            signal: MatchSignal::Category,
            score: CATEGORY_WEIGHT,
            notes: format!("same category '{}'", job.category),
        });
        total_score += CATEGORY_WEIGHT;
    }

    if job.city == reference.city {
        components.push(ScoreComponent {
            signal: MatchSignal::Location,
            score: LOCATION_WEIGHT,
            notes: format!("same city '{}'", job.city),
        });
        total_score += LOCATION_WEIGHT;
    }

    if job.contract_type == reference.contract_type {
        components.push(ScoreComponent {
            signal: MatchSignal::ContractType,
            score: CONTRACT_WEIGHT,
            notes: format!("same contract type {}", job.contract_type.label()),
        });
        total_score += CONTRACT_WEIGHT;
    }

    if let (Some(reference_salary), Some(salary)) = (reference.salary, job.salary) {
        if reference_salary.period == salary.period
            && within_salary_band(reference_salary.amount, salary.amount)
        {
            components.push(ScoreComponent {
                signal: MatchSignal::SalaryBand,
                score: SALARY_BAND_WEIGHT,
                notes: format!(
                    "salary {:.2} within 20% of {:.2}",
                    salary.amount, reference_salary.amount
                ),
            });
            total_score += SALARY_BAND_WEIGHT;
        }
    }

    (components, total_score)
}

/// Inclusive +/-20% band, compared as `4/5` and `6/5` multiples of the reference.
fn within_salary_band(reference: f64, amount: f64) -> bool {
    let scaled = amount * 5.0;
    scaled >= reference * 4.0 && scaled <= reference * 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_band_is_inclusive() {
        assert!(within_salary_band(1500.0, 1200.0));
        assert!(within_salary_band(1500.0, 1800.0));
        assert!(within_salary_band(1500.0, 1600.0));
        assert!(!within_salary_band(1500.0, 1199.0));
        assert!(!within_salary_band(1500.0, 1801.0));
    }

    #[test]
    fn zero_reference_only_matches_zero() {
        assert!(within_salary_band(0.0, 0.0));
        assert!(!within_salary_band(0.0, 10.0));
    }
}
