use crate::models::JobExperience;

/// Result of one tailoring run, handed to the renderer.
///
/// Only the pipeline constructs it, and only after every step succeeded.
/// Selected experiences are in relevance order, carry the highlighted duties,
/// and have their dates already reduced to years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoredResume {
    about_me: String,
    selected_experiences: Vec<JobExperience>,
    tailored_skills: Vec<String>,
}

impl TailoredResume {
    pub(crate) fn new(
        about_me: String,
        selected_experiences: Vec<JobExperience>,
        tailored_skills: Vec<String>,
    ) -> Self {
        Self {
            about_me,
            selected_experiences,
            tailored_skills,
        }
    }

    pub fn about_me(&self) -> &str {
        &self.about_me
    }

    pub fn selected_experiences(&self) -> &[JobExperience] {
        &self.selected_experiences
    }

    pub fn tailored_skills(&self) -> &[String] {
        &self.tailored_skills
    }
}
