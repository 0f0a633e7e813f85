use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::{ContractType, JobId, JobPosting, JobStatus, Salary, SalaryPeriod, UserId};
use super::snapshot::SnapshotError;

const REQUIREMENT_SEPARATOR: char = ';';

pub(crate) fn parse_jobs<R: Read>(reader: R) -> Result<Vec<JobPosting>, SnapshotError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut jobs = Vec::new();

    for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index as u64 + 2;
        let job = row
            .into_posting()
            .map_err(|reason| SnapshotError::InvalidRow { line, reason })?;
        jobs.push(job);
    }

    Ok(jobs)
}

#[derive(Debug, Deserialize)]
struct JobRow {
    id: u64,
    employer_id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    category: String,
    city: String,
    contract_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_urgent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_top: Option<String>,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    expires_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary_period: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    requirements: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    views_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    applications_count: Option<String>,
}

impl JobRow {
    fn into_posting(self) -> Result<JobPosting, String> {
        let contract_type = ContractType::parse(&self.contract_type)
            .ok_or_else(|| format!("unknown contract type '{}'", self.contract_type))?;
        let status = match self.status.as_deref() {
            Some(value) => {
                JobStatus::parse(value).ok_or_else(|| format!("unknown status '{value}'"))?
            }
            None => JobStatus::Active,
        };
        let created_at = parse_datetime(&self.created_at)
            .ok_or_else(|| format!("invalid created_at '{}'", self.created_at))?;
        let expires_at = match self.expires_at.as_deref() {
            Some(value) => {
                Some(parse_datetime(value).ok_or_else(|| format!("invalid expires_at '{value}'"))?)
            }
            None => None,
        };

        let salary = match (self.salary_amount.as_deref(), self.salary_period.as_deref()) {
            (Some(amount), Some(period)) => Some(Salary {
                amount: amount
                    .parse::<f64>()
                    .map_err(|_| format!("invalid salary_amount '{amount}'"))?,
                period: SalaryPeriod::parse(period)
                    .ok_or_else(|| format!("unknown salary_period '{period}'"))?,
            }),
            (None, None) => None,
            _ => return Err("salary_amount and salary_period must be set together".to_string()),
        };

        let requirements = self.requirements.map(|raw| {
            raw.split(REQUIREMENT_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        });

        Ok(JobPosting {
            id: JobId(self.id),
            employer_id: UserId(self.employer_id),
            title: self.title,
            description: self.description.unwrap_or_default(),
            category: self.category,
            city: self.city,
            contract_type,
            is_urgent: parse_flag("is_urgent", self.is_urgent.as_deref())?,
            is_top: parse_flag("is_top", self.is_top.as_deref())?,
            status,
            created_at,
            expires_at,
            salary,
            requirements,
            views_count: parse_count("views_count", self.views_count.as_deref())?,
            applications_count: parse_count(
                "applications_count",
                self.applications_count.as_deref(),
            )?,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(column: &str, value: Option<&str>) -> Result<bool, String> {
    match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        None | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => Err(format!("invalid {column} flag '{other}'")),
    }
}

fn parse_count(column: &str, value: Option<&str>) -> Result<u32, String> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| format!("invalid {column} '{raw}'")),
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,employer_id,title,category,city,contract_type,status,is_urgent,is_top,created_at,expires_at,salary_amount,salary_period,requirements,views_count,applications_count\n";

    #[test]
    fn parses_full_row() {
        let csv = format!(
            "{HEADER}5,2,Cariste,warehouse,Lyon,CDD,open,yes,0,2025-03-01T08:30:00Z,2025-04-01,1650.50,monthly,forklift certified; night shifts ;,120,6\n"
        );
        let jobs = parse_jobs(csv.as_bytes()).expect("row parses");
        assert_eq!(jobs.len(), 1);

        let job = &jobs[0];
        assert_eq!(job.id, JobId(5));
        assert_eq!(job.contract_type, ContractType::Cdd);
        assert_eq!(job.status, JobStatus::Active);
        assert!(job.is_urgent);
        assert!(!job.is_top);
        assert_eq!(
            job.requirements().to_vec(),
            vec!["forklift certified".to_string(), "night shifts".to_string()]
        );
        let salary = job.salary.expect("salary present");
        assert_eq!(salary.period, SalaryPeriod::Monthly);
        assert!((salary.amount - 1650.5).abs() < f64::EPSILON);
        assert_eq!(job.views_count, 120);
        assert_eq!(job.applications_count, 6);
        assert!(job.expires_at.is_some());
    }

    #[test]
    fn empty_cells_become_defaults() {
        let csv = format!("{HEADER}6,2,Vendeur,retail,Paris,CDI,,,,2025-03-01,,,,,,\n");
        let jobs = parse_jobs(csv.as_bytes()).expect("row parses");
        let job = &jobs[0];
        assert_eq!(job.status, JobStatus::Active);
        assert!(job.salary.is_none());
        assert!(job.requirements.is_none());
        assert_eq!(job.views_count, 0);
    }

    #[test]
    fn reports_line_of_invalid_row() {
        let csv = format!(
            "{HEADER}6,2,Vendeur,retail,Paris,CDI,active,,,2025-03-01,,,,,,\n7,2,Barman,hospitality,Nice,Interim,active,,,2025-03-01,,,,,,\n"
        );
        match parse_jobs(csv.as_bytes()) {
            Err(SnapshotError::InvalidRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("Interim"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn salary_columns_must_be_paired() {
        let csv = format!("{HEADER}8,2,Serveur,hospitality,Nice,CDD,active,,,2025-03-01,,1500,,,,\n");
        assert!(matches!(
            parse_jobs(csv.as_bytes()),
            Err(SnapshotError::InvalidRow { line: 2, .. })
        ));
    }
}
