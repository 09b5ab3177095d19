//! Tailoring Pipeline: runs the four tailoring tasks in order and assembles
//! one `TailoredResume`.
//!
//! Flow: about-me → experience selection → duty highlighting (one call per
//! selected experience) → skills. Strictly sequential; the first failing step
//! ends the run and its error is returned unchanged.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::TailoringConfig;
use crate::llm_client::{StructuredReply, TailoringClient, TailoringError, TailoringTask};
use crate::models::{JobDescription, JobExperience, Profile, TailoredResume};
use crate::tailoring::dates::format_year;
use crate::tailoring::prompt_builder::PromptBuilder;

pub struct TailoringPipeline<'a> {
    client: &'a dyn TailoringClient,
    builder: PromptBuilder,
    limits: TailoringConfig,
}

impl<'a> TailoringPipeline<'a> {
    pub fn new(client: &'a dyn TailoringClient, limits: TailoringConfig) -> Self {
        Self {
            client,
            builder: PromptBuilder::new(limits),
            limits,
        }
    }

    pub async fn run(
        &self,
        profile: &Profile,
        jd: &JobDescription,
    ) -> Result<TailoredResume, TailoringError> {
        // Step 1: about-me summary
        info!("Generating professional summary");
        let about_me = match self.execute(TailoringTask::AboutMe, profile, jd).await? {
            StructuredReply::Summary(text) => text,
            other => return Err(shape_mismatch(TailoringTask::AboutMe, &other)),
        };

        // Step 2: rank and select experiences
        let selected = if profile.job_experience.is_empty() {
            warn!("Profile has no job experience; skipping experience selection");
            Vec::new()
        } else {
            info!(
                "Ranking {} job experiences",
                profile.job_experience.len()
            );
            let ranked = match self
                .execute(TailoringTask::ExperienceSelection, profile, jd)
                .await?
            {
                StructuredReply::RankedIds(ids) => ids,
                other => return Err(shape_mismatch(TailoringTask::ExperienceSelection, &other)),
            };
            select_experiences(&ranked, profile, self.limits.max_experiences)?
        };
        info!("Selected {} experiences", selected.len());

        // Step 3: highlight duties of each selected experience, in rank order
        let mut selected_experiences = Vec::with_capacity(selected.len());
        for job in selected {
            let duties = self.highlight_duties(job, profile, jd).await?;
            selected_experiences.push(JobExperience {
                duties,
                start_date: format_year(&job.start_date),
                end_date: format_year(&job.end_date),
                ..job.clone()
            });
        }

        // Step 4: skills
        info!("Selecting relevant skills");
        let mut tailored_skills = match self
            .execute(TailoringTask::SkillsTailoring, profile, jd)
            .await?
        {
            StructuredReply::Skills(skills) => skills,
            other => return Err(shape_mismatch(TailoringTask::SkillsTailoring, &other)),
        };
        tailored_skills.truncate(self.limits.max_skills);

        Ok(TailoredResume::new(
            about_me,
            selected_experiences,
            tailored_skills,
        ))
    }

    async fn highlight_duties(
        &self,
        job: &JobExperience,
        profile: &Profile,
        jd: &JobDescription,
    ) -> Result<Vec<String>, TailoringError> {
        if job.duties.is_empty() && job.achievements.is_empty() {
            warn!("Experience {} has no duties to highlight", job.id);
            return Ok(Vec::new());
        }

        info!("Highlighting duties for {} at {}", job.title, job.company);
        let task = TailoringTask::DutyHighlighting {
            experience_id: job.id,
        };
        match self.execute(task, profile, jd).await? {
            StructuredReply::Bullets(mut bullets) => {
                bullets.truncate(self.limits.max_duties);
                Ok(bullets)
            }
            other => Err(shape_mismatch(task, &other)),
        }
    }

    async fn execute(
        &self,
        task: TailoringTask,
        profile: &Profile,
        jd: &JobDescription,
    ) -> Result<StructuredReply, TailoringError> {
        let prompt = self.builder.build(task, profile, jd);
        let reply = self.client.execute(&prompt).await?;
        if !reply.matches(task) {
            return Err(shape_mismatch(task, &reply));
        }
        Ok(reply)
    }
}

/// Keeps the top-ranked experiences, in rank order, up to `max`.
///
/// Ids the profile does not contain and repeated ids are dropped first. A
/// ranking that leaves nothing for a non-empty profile is a malformed reply.
pub fn select_experiences<'p>(
    ranked: &[u32],
    profile: &'p Profile,
    max: usize,
) -> Result<Vec<&'p JobExperience>, TailoringError> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for &id in ranked {
        if !seen.insert(id) {
            warn!("Ranking repeats experience id {id}; ignoring the repeat");
            continue;
        }
        match profile.experience(id) {
            Some(job) => selected.push(job),
            None => warn!("Ranking names unknown experience id {id}; ignoring it"),
        }
    }

    if selected.is_empty() && !profile.job_experience.is_empty() {
        return Err(TailoringError::malformed(
            TailoringTask::ExperienceSelection,
            format!("ranking {ranked:?} names none of the profile's experiences"),
        ));
    }

    selected.truncate(max);
    Ok(selected)
}

fn shape_mismatch(task: TailoringTask, reply: &StructuredReply) -> TailoringError {
    TailoringError::malformed(task, format!("reply has the wrong shape: {reply:?}"))
}
