use serde::{Deserialize, Serialize};

/// End-date sentinel for a job that is still ongoing.
pub const PRESENT: &str = "Present";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

impl PersonalInfo {
    /// Non-empty profile links, in display order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        [self.linkedin.as_deref(), self.portfolio.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExperience {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub position: String,
    /// `YYYY-MM`
    pub start_date: String,
    /// `YYYY-MM` or [`PRESENT`]
    pub end_date: String,
    pub duties: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl JobExperience {
    /// `"2019-03 to Present"`
    pub fn date_range(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

/// The persisted record of one user. Read-only to the tailoring pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    /// Entry order, not necessarily date order.
    pub job_experience: Vec<JobExperience>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub interests_and_background: Vec<String>,
}

impl Profile {
    pub fn experience(&self, id: u32) -> Option<&JobExperience> {
        self.job_experience.iter().find(|job| job.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_default_when_absent() {
        let json = r#"{
            "personal_info": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "555-0100",
                "location": "London"
            },
            "job_experience": [{
                "id": 1,
                "title": "Analyst",
                "company": "Engines Ltd",
                "position": "Lead",
                "start_date": "2020-01",
                "end_date": "Present",
                "duties": ["Wrote programs"]
            }]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert!(profile.education.is_empty());
        assert!(profile.skills.is_empty());
        assert!(profile.interests_and_background.is_empty());
        assert!(profile.job_experience[0].achievements.is_empty());
        assert_eq!(profile.job_experience[0].end_date, PRESENT);
        assert_eq!(profile.personal_info.linkedin, None);
    }

    #[test]
    fn test_missing_duties_fails_deserialization() {
        let json = r#"{
            "id": 1, "title": "Analyst", "company": "Engines Ltd", "position": "Lead",
            "start_date": "2020-01", "end_date": "Present"
        }"#;
        let result: Result<JobExperience, _> = serde_json::from_str(json);
        assert!(result.is_err(), "duties is a required field");
    }

    #[test]
    fn test_links_skip_blank_values() {
        let info = PersonalInfo {
            name: "A".into(),
            email: "a@b.c".into(),
            phone: "1".into(),
            location: "X".into(),
            linkedin: Some("  ".into()),
            portfolio: Some("https://a.dev".into()),
        };
        assert_eq!(info.links().collect::<Vec<_>>(), vec!["https://a.dev"]);
    }

    #[test]
    fn test_experience_lookup_by_id() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "personal_info": {"name": "A", "email": "a@b.c", "phone": "1", "location": "X"},
            "job_experience": [
                {"id": 4, "title": "T", "company": "C", "position": "P",
                 "start_date": "2018-01", "end_date": "2019-01", "duties": []}
            ]
        }))
        .unwrap();
        assert_eq!(profile.experience(4).map(|j| j.title.as_str()), Some("T"));
        assert!(profile.experience(5).is_none());
    }
}
