//! Prompt Builder: turns profile data plus a job description into the
//! prompt for one tailoring task.
//!
//! Each prompt embeds only the fields its task needs (experience selection
//! sees titles and date ranges, never duties). Pure and deterministic.

use crate::config::TailoringConfig;
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NOT_PROVIDED, STYLE_INSTRUCTION};
use crate::llm_client::{Prompt, TailoringTask};
use crate::models::{JobDescription, JobExperience, Profile};
use crate::tailoring::prompts::{
    ABOUT_ME_SYSTEM, ABOUT_ME_TEMPLATE, DUTIES_SYSTEM, DUTIES_TEMPLATE, SELECTION_SYSTEM,
    SELECTION_TEMPLATE, SKILLS_SYSTEM, SKILLS_TEMPLATE,
};

/// Experiences summarized for the about-me and skills context.
const CONTEXT_EXPERIENCES: usize = 3;
/// Duties taken from each of those experiences for skills context.
const CONTEXT_DUTIES_PER_JOB: usize = 2;
/// Total duty lines in the skills context.
const CONTEXT_DUTY_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    limits: TailoringConfig,
}

impl PromptBuilder {
    pub fn new(limits: TailoringConfig) -> Self {
        Self { limits }
    }

    pub fn build(&self, task: TailoringTask, profile: &Profile, jd: &JobDescription) -> Prompt {
        match task {
            TailoringTask::AboutMe => self.about_me(profile, jd),
            TailoringTask::ExperienceSelection => self.experience_selection(profile, jd),
            TailoringTask::DutyHighlighting { experience_id } => {
                self.duty_highlighting(experience_id, profile, jd)
            }
            TailoringTask::SkillsTailoring => self.skills(profile, jd),
        }
    }

    fn about_me(&self, profile: &Profile, jd: &JobDescription) -> Prompt {
        let experience_summary = if profile.job_experience.is_empty() {
            "No work experience provided".to_string()
        } else {
            profile
                .job_experience
                .iter()
                .take(CONTEXT_EXPERIENCES)
                .map(|job| format!("- {} at {} ({})", job.title, job.company, job.date_range()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let skills = if profile.skills.is_empty() {
            "various professional skills".to_string()
        } else {
            profile.skills.join(", ")
        };

        let interests = dash_list(&profile.interests_and_background);
        let user = fill_template(
            ABOUT_ME_TEMPLATE,
            &[
                ("experience_summary", &experience_summary),
                ("skills", &skills),
                ("interests", &interests),
                ("style_instruction", STYLE_INSTRUCTION),
                ("job_description", jd.as_str()),
            ],
        );

        Prompt {
            task: TailoringTask::AboutMe,
            system: ABOUT_ME_SYSTEM,
            user,
            temperature: 0.7,
            max_tokens: 300,
        }
    }

    fn experience_selection(&self, profile: &Profile, jd: &JobDescription) -> Prompt {
        let experiences = profile
            .job_experience
            .iter()
            .map(|job| {
                format!(
                    "\nExperience id {}:\n- Title: {}\n- Company: {}\n- Position: {}\n- Duration: {}",
                    job.id,
                    job.title,
                    job.company,
                    job.position,
                    job.date_range()
                )
            })
            .collect::<String>();

        let user = fill_template(
            SELECTION_TEMPLATE,
            &[
                ("experiences", &experiences),
                ("json_only", JSON_ONLY_INSTRUCTION),
                ("job_description", jd.as_str()),
            ],
        );

        Prompt {
            task: TailoringTask::ExperienceSelection,
            system: SELECTION_SYSTEM,
            user,
            temperature: 0.3,
            max_tokens: 100,
        }
    }

    fn duty_highlighting(&self, experience_id: u32, profile: &Profile, jd: &JobDescription) -> Prompt {
        let task = TailoringTask::DutyHighlighting { experience_id };
        let (title, company, duties) = match profile.experience(experience_id) {
            Some(job) => (job.title.as_str(), job.company.as_str(), duty_points(job)),
            None => ("Unknown role", "unknown company", NOT_PROVIDED.to_string()),
        };

        let max_duties = self.limits.max_duties.to_string();
        let user = fill_template(
            DUTIES_TEMPLATE,
            &[
                ("title", title),
                ("company", company),
                ("duties", &duties),
                ("max_duties", &max_duties),
                ("style_instruction", STYLE_INSTRUCTION),
                ("job_description", jd.as_str()),
            ],
        );

        Prompt {
            task,
            system: DUTIES_SYSTEM,
            user,
            temperature: 0.7,
            max_tokens: 400,
        }
    }

    fn skills(&self, profile: &Profile, jd: &JobDescription) -> Prompt {
        let context: Vec<String> = profile
            .job_experience
            .iter()
            .take(CONTEXT_EXPERIENCES)
            .flat_map(|job| job.duties.iter().take(CONTEXT_DUTIES_PER_JOB).cloned())
            .take(CONTEXT_DUTY_LINES)
            .collect();

        let skills = dash_list(&profile.skills);
        let experience_context = dash_list(&context);
        let max_skills = self.limits.max_skills.to_string();
        let user = fill_template(
            SKILLS_TEMPLATE,
            &[
                ("skills", &skills),
                ("experience_context", &experience_context),
                ("max_skills", &max_skills),
                ("job_description", jd.as_str()),
            ],
        );

        Prompt {
            task: TailoringTask::SkillsTailoring,
            system: SKILLS_SYSTEM,
            user,
            temperature: 0.5,
            max_tokens: 200,
        }
    }
}

/// Fills `{name}` placeholders in one left-to-right pass. Substituted values
/// are never scanned again, and braces that do not name a known placeholder
/// are copied as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Duties followed by achievements, one `- ` line each.
fn duty_points(job: &JobExperience) -> String {
    let points: Vec<String> = job
        .duties
        .iter()
        .chain(job.achievements.iter())
        .cloned()
        .collect();
    dash_list(&points)
}

fn dash_list(items: &[String]) -> String {
    if items.is_empty() {
        return NOT_PROVIDED.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
