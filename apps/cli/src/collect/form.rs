//! The data-collection form: a fixed sequence of fields, each checked the
//! moment it is entered. Nothing is kept between runs; `ProfileForm::run`
//! returns one complete, validated `Profile` or an error.

use std::io::{BufRead, Write};

use crate::console::Console;
use crate::errors::AppError;
use crate::models::{EducationEntry, JobExperience, PersonalInfo, Profile};
use crate::store::validation::{
    check_date_order, check_end_date, check_month, normalize_end_date, validate_profile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Optional,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM` or `Present`, any casing of the latter
    EndDate,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub label: &'static str,
    pub rule: Rule,
}

const fn field(label: &'static str, rule: Rule) -> Field {
    Field { label, rule }
}

pub const PERSONAL_FIELDS: [Field; 6] = [
    field("Full Name", Rule::Required),
    field("Email", Rule::Required),
    field("Phone Number", Rule::Required),
    field("Location (City, State)", Rule::Required),
    field("LinkedIn URL (optional)", Rule::Optional),
    field("Portfolio/Website URL (optional)", Rule::Optional),
];

pub const JOB_FIELDS: [Field; 5] = [
    field("Job Title", Rule::Required),
    field("Company Name", Rule::Required),
    field("Position/Role", Rule::Optional),
    field("Start Date (YYYY-MM)", Rule::Month),
    field("End Date (YYYY-MM or 'Present')", Rule::EndDate),
];

pub const EDUCATION_FIELDS: [Field; 3] = [
    field("Degree/Certification", Rule::Required),
    field("Institution", Rule::Required),
    field("Graduation Year", Rule::Optional),
];

/// Checks one answer against its rule and returns the normalized value.
pub fn check(rule: Rule, input: &str) -> Result<String, String> {
    let value = input.trim();
    match rule {
        Rule::Required if value.is_empty() => Err("This field is required.".to_string()),
        Rule::Required | Rule::Optional => Ok(value.to_string()),
        Rule::Month => check_month(value).map(|_| value.to_string()),
        Rule::EndDate => {
            let normalized = normalize_end_date(value);
            check_end_date(&normalized).map(|_| normalized)
        }
    }
}

pub struct ProfileForm<'c, R, W> {
    console: &'c mut Console<R, W>,
}

impl<'c, R: BufRead, W: Write> ProfileForm<'c, R, W> {
    pub fn new(console: &'c mut Console<R, W>) -> Self {
        Self { console }
    }

    pub fn run(mut self) -> Result<Profile, AppError> {
        self.console.say("\n== Personal Information ==")?;
        let personal_info = self.personal_info()?;

        self.console.say("\n== Job Experience ==")?;
        let job_experience = self.jobs()?;

        self.console.say("\n== Additional Information (Optional) ==")?;
        let education = self.education()?;
        let skills = self.optional_list("Add skills?", true, "Skill")?;
        let certifications = self.optional_list("Add certifications?", false, "Certification")?;
        let interests_and_background =
            self.optional_list("Add interests/background information?", false, "Interest")?;

        let profile = Profile {
            personal_info,
            job_experience,
            education,
            skills,
            certifications,
            interests_and_background,
        };
        validate_profile(&profile)?;
        Ok(profile)
    }

    fn personal_info(&mut self) -> Result<PersonalInfo, AppError> {
        let [name, email, phone, location, linkedin, portfolio] =
            self.ask_fields(&PERSONAL_FIELDS)?;
        Ok(PersonalInfo {
            name,
            email,
            phone,
            location,
            linkedin: non_empty(linkedin),
            portfolio: non_empty(portfolio),
        })
    }

    fn jobs(&mut self) -> Result<Vec<JobExperience>, AppError> {
        let mut jobs = Vec::new();
        loop {
            let id = jobs.len() as u32 + 1;
            self.console.say(format!("\nJob #{id}"))?;
            let [title, company, position, start_date, mut end_date] =
                self.ask_fields(&JOB_FIELDS)?;

            while let Err(reason) = check_date_order(&start_date, &end_date) {
                self.console.say(format!("  {reason}"))?;
                end_date = self.ask_field(&JOB_FIELDS[4])?;
            }

            self.console
                .say("Enter job duties/responsibilities (one per line, empty line to finish):")?;
            let duties = self.list("Duty")?;
            self.console
                .say("Enter achievements (optional, empty line to finish):")?;
            let achievements = self.list("Achievement")?;

            jobs.push(JobExperience {
                id,
                title,
                company,
                position,
                start_date,
                end_date,
                duties,
                achievements,
            });

            if !self.console.confirm("Add another job?", false)? {
                return Ok(jobs);
            }
        }
    }

    fn education(&mut self) -> Result<Vec<EducationEntry>, AppError> {
        let mut entries = Vec::new();
        if !self.console.confirm("Add education information?", true)? {
            return Ok(entries);
        }
        loop {
            self.console.say("\nEducation Entry")?;
            let [degree, institution, year] = self.ask_fields(&EDUCATION_FIELDS)?;
            entries.push(EducationEntry {
                degree,
                institution,
                year,
            });
            if !self.console.confirm("Add another education entry?", false)? {
                return Ok(entries);
            }
        }
    }

    fn optional_list(
        &mut self,
        question: &str,
        default: bool,
        item: &str,
    ) -> Result<Vec<String>, AppError> {
        if !self.console.confirm(question, default)? {
            return Ok(Vec::new());
        }
        self.console.say("(one per line, empty line to finish)")?;
        self.list(item)
    }

    fn list(&mut self, item: &str) -> Result<Vec<String>, AppError> {
        let mut items = Vec::new();
        loop {
            let answer = self.console.ask(&format!("  {item} #{}", items.len() + 1))?;
            if answer.is_empty() {
                return Ok(items);
            }
            items.push(answer);
        }
    }

    fn ask_fields<const N: usize>(&mut self, fields: &[Field; N]) -> Result<[String; N], AppError> {
        let mut values = Vec::with_capacity(N);
        for field in fields {
            values.push(self.ask_field(field)?);
        }
        values
            .try_into()
            .map_err(|_| AppError::Validation("form answered the wrong number of fields".to_string()))
    }

    /// Asks until the answer passes the field's rule.
    fn ask_field(&mut self, field: &Field) -> Result<String, AppError> {
        loop {
            let answer = self.console.ask(field.label)?;
            match check(field.rule, &answer) {
                Ok(value) => return Ok(value),
                Err(reason) => self.console.say(format!("  {reason}"))?,
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
