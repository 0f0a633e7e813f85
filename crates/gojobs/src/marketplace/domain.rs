use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::matching::scoring::days_between;

/// Listings saved without an explicit expiry stay up for this many days.
pub const DEFAULT_LISTING_DAYS: i64 = 30;

/// Identifier wrapper for marketplace users (candidates, employers, admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Candidate,
    Employer,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Candidate => "candidate",
            UserRole::Employer => "employer",
            UserRole::Admin => "admin",
        }
    }
}

/// Free-form preferences a candidate saves on their profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPreferences {
    #[serde(default, deserialize_with = "string_or_list")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub locations: Vec<String>,
}

/// User row as handed over by the record store. Candidate-only fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub role: UserRole,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "optional_string_or_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub job_preferences: Option<JobPreferences>,
}

impl UserRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Normalized view of a user that the recommendation scorer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: UserId,
    pub role: UserRole,
    pub preferred_categories: BTreeSet<String>,
    pub preferred_locations: BTreeSet<String>,
    pub skills: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn is_candidate(&self) -> bool {
        self.role == UserRole::Candidate
    }
}

impl From<&UserRecord> for CandidateProfile {
    fn from(record: &UserRecord) -> Self {
        let preferences = record.job_preferences.clone().unwrap_or_default();
        let skills = record
            .skills
            .iter()
            .flatten()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            user_id: record.id,
            role: record.role,
            preferred_categories: preferences.categories.into_iter().collect(),
            preferred_locations: preferences.locations.into_iter().collect(),
            skills,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[serde(alias = "open")]
    Active,
    Closed,
    Draft,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => Some(Self::Active),
            "closed" => Some(Self::Closed),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "CDI")]
    Cdi,
    #[serde(rename = "CDD")]
    Cdd,
    Freelance,
    Alternance,
}

impl ContractType {
    pub const fn label(self) -> &'static str {
        match self {
            ContractType::Cdi => "CDI",
            ContractType::Cdd => "CDD",
            ContractType::Freelance => "Freelance",
            ContractType::Alternance => "Alternance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cdi" => Some(Self::Cdi),
            "cdd" => Some(Self::Cdd),
            "freelance" => Some(Self::Freelance),
            "alternance" => Some(Self::Alternance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    Hourly,
    Monthly,
}

impl SalaryPeriod {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub amount: f64,
    pub period: SalaryPeriod,
}

/// Published job offer. Only `Active` postings are visible to the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub employer_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub city: String,
    pub contract_type: ContractType,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_top: bool,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "optional_string_or_list")]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default)]
    pub applications_count: u32,
}

impl JobPosting {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Active
    }

    /// Requirement strings with an absent field read as an empty list.
    pub fn requirements(&self) -> &[String] {
        self.requirements.as_deref().unwrap_or(&[])
    }

    pub fn effective_expiry(&self) -> DateTime<Utc> {
        self.expires_at
            .unwrap_or(self.created_at + Duration::days(DEFAULT_LISTING_DAYS))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.effective_expiry() < now
    }

    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        days_between(now, self.effective_expiry())
    }

    /// Applications per hundred views, zero for a listing nobody has opened.
    pub fn conversion_rate(&self) -> f64 {
        if self.views_count == 0 {
            return 0.0;
        }
        f64::from(self.applications_count) / f64::from(self.views_count) * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    OnHold,
}

/// Candidate application to a job. The scorers only look at the (candidate, job) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    #[serde(default = "default_application_status")]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

fn default_application_status() -> ApplicationStatus {
    ApplicationStatus::Pending
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(Vec::from).unwrap_or_default())
}

fn optional_string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(Vec::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requirements_accept_single_string_and_null() {
        let base = json!({
            "id": 7,
            "employer_id": 2,
            "title": "Cariste",
            "category": "warehouse",
            "city": "Lyon",
            "contract_type": "CDD",
            "status": "open",
            "created_at": "2025-03-01T08:00:00Z",
        });

        let mut single = base.clone();
        single["requirements"] = json!("forklift certified");
        let job: JobPosting = serde_json::from_value(single).expect("single string parses");
        assert_eq!(job.requirements().to_vec(), vec!["forklift certified".to_string()]);
        assert_eq!(job.status, JobStatus::Active);

        let mut null = base.clone();
        null["requirements"] = serde_json::Value::Null;
        let job: JobPosting = serde_json::from_value(null).expect("null parses");
        assert!(job.requirements().is_empty());

        let job: JobPosting = serde_json::from_value(base).expect("absent parses");
        assert!(job.requirements.is_none());
        assert!(job.requirements().is_empty());
    }

    #[test]
    fn candidate_profile_substitutes_empty_defaults() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 3,
            "role": "candidate",
            "skills": null,
            "job_preferences": null,
        }))
        .expect("user parses");

        let profile = CandidateProfile::from(&record);
        assert!(profile.is_candidate());
        assert!(profile.skills.is_empty());
        assert!(profile.preferred_categories.is_empty());
        assert!(profile.preferred_locations.is_empty());
    }

    #[test]
    fn candidate_profile_drops_blank_skills() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 4,
            "role": "candidate",
            "skills": ["  forklift ", "", "   "],
            "job_preferences": { "categories": "warehouse" },
        }))
        .expect("user parses");

        let profile = CandidateProfile::from(&record);
        assert_eq!(profile.skills.len(), 1);
        assert!(profile.skills.contains("forklift"));
        assert!(profile.preferred_categories.contains("warehouse"));
        assert!(profile.preferred_locations.is_empty());
    }

    #[test]
    fn expiry_defaults_to_thirty_days_after_creation() {
        let job: JobPosting = serde_json::from_value(json!({
            "id": 1,
            "employer_id": 2,
            "title": "Serveur",
            "category": "hospitality",
            "city": "Nice",
            "contract_type": "CDI",
            "status": "active",
            "created_at": "2025-03-01T08:00:00Z",
        }))
        .expect("job parses");

        let now = job.created_at + Duration::days(10);
        assert_eq!(job.days_until_expiry(now), 20);
        assert!(!job.is_expired(now));

        let later = job.created_at + Duration::days(31);
        assert!(job.is_expired(later));
        assert_eq!(job.days_until_expiry(later), 0);
    }

    #[test]
    fn conversion_rate_is_zero_without_views() {
        let job: JobPosting = serde_json::from_value(json!({
            "id": 1,
            "employer_id": 2,
            "title": "Vendeur",
            "category": "retail",
            "city": "Paris",
            "contract_type": "CDI",
            "status": "active",
            "created_at": "2025-03-01T08:00:00Z",
            "applications_count": 4,
        }))
        .expect("job parses");
        assert_eq!(job.conversion_rate(), 0.0);
    }
}
