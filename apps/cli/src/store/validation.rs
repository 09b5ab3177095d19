//! Profile schema checks shared by the store (load/save) and the
//! data-collection form (per-field, on entry).

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{JobExperience, Profile, PRESENT};

/// Checks a `YYYY-MM` month string. Returns the reason on failure.
pub fn check_month(value: &str) -> Result<(), String> {
    let well_formed = value.len() == 7
        && value.as_bytes()[4] == b'-'
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !well_formed {
        return Err(format!("'{value}' is not in YYYY-MM form"));
    }
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("'{value}' is not a real month"))
}

/// Checks an end date: a `YYYY-MM` month or the `Present` sentinel.
pub fn check_end_date(value: &str) -> Result<(), String> {
    if value == PRESENT {
        return Ok(());
    }
    check_month(value).map_err(|reason| format!("{reason} (or '{PRESENT}')"))
}

/// Start must come strictly before a dated end. Both are `YYYY-MM`, so
/// lexical order is chronological order.
pub fn check_date_order(start: &str, end: &str) -> Result<(), String> {
    if end == PRESENT || start < end {
        Ok(())
    } else {
        Err(format!("start date {start} must be before end date {end}"))
    }
}

/// Maps any casing of "present" to the sentinel; other input is trimmed.
pub fn normalize_end_date(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case(PRESENT) {
        PRESENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validates a whole profile. The first violation is reported, naming the field.
pub fn validate_profile(profile: &Profile) -> Result<(), AppError> {
    let info = &profile.personal_info;
    for (field, value) in [
        ("name", &info.name),
        ("email", &info.email),
        ("phone", &info.phone),
        ("location", &info.location),
    ] {
        require_non_empty(&format!("personal_info.{field}"), value)?;
    }

    let mut seen_ids = HashSet::new();
    for job in &profile.job_experience {
        if !seen_ids.insert(job.id) {
            return Err(AppError::Validation(format!(
                "job_experience: duplicate id {}",
                job.id
            )));
        }
        validate_job(job)?;
    }

    for (i, edu) in profile.education.iter().enumerate() {
        require_non_empty(&format!("education[{i}].degree"), &edu.degree)?;
        require_non_empty(&format!("education[{i}].institution"), &edu.institution)?;
    }

    Ok(())
}

fn validate_job(job: &JobExperience) -> Result<(), AppError> {
    let field = |name: &str| format!("job_experience[id={}].{name}", job.id);

    require_non_empty(&field("title"), &job.title)?;
    require_non_empty(&field("company"), &job.company)?;

    check_month(&job.start_date)
        .map_err(|reason| AppError::Validation(format!("{}: {reason}", field("start_date"))))?;
    check_end_date(&job.end_date)
        .map_err(|reason| AppError::Validation(format!("{}: {reason}", field("end_date"))))?;
    check_date_order(&job.start_date, &job.end_date)
        .map_err(|reason| AppError::Validation(format!("{}: {reason}", field("end_date"))))?;

    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
