//! Interactive generation: load the profile, read a job description, tailor,
//! preview, then write one document.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::console::Console;
use crate::errors::AppError;
use crate::llm_client::TailoringClient;
use crate::models::{JobDescription, Profile, TailoredResume};
use crate::render::{
    default_base_name, sanitize_base_name, write_document, DocxRenderer, ResumeRenderer,
};
use crate::store::ProfileStore;
use crate::tailoring::TailoringPipeline;

const PREVIEW_DUTIES: usize = 3;
const PREVIEW_SKILLS: usize = 10;

/// Runs the generation flow and returns the path of the written document.
///
/// `connect` builds the tailoring client. It runs only once the profile has
/// loaded and a job description was entered.
pub async fn run_generate<R, W, C, F>(
    console: &mut Console<R, W>,
    config: &Config,
    connect: F,
) -> Result<PathBuf, AppError>
where
    R: BufRead,
    W: Write,
    C: TailoringClient,
    F: FnOnce() -> Result<C, AppError>,
{
    let store = ProfileStore::new(&config.data_file);
    let profile = store.load()?;
    console.say(format!(
        "Loaded profile for {} ({} job experiences)",
        profile.personal_info.name,
        profile.job_experience.len()
    ))?;

    console.say("\nPaste the job description below. Press Enter twice on empty lines to finish:")?;
    let jd = JobDescription::new(console.read_block(2)?)
        .ok_or_else(|| AppError::Cancelled("no job description provided".to_string()))?;
    console.say(format!("Job description received ({} characters)", jd.char_count()))?;

    let client = connect()?;
    console.say("\nTailoring your resume...")?;
    let resume = TailoringPipeline::new(&client, config.tailoring)
        .run(&profile, &jd)
        .await?;

    print_preview(console, &resume, &profile)?;
    if !console.confirm("\nGenerate the resume document?", true)? {
        return Err(AppError::Cancelled("resume not written".to_string()));
    }

    let answer = console.ask("File name (Enter for default)")?;
    let base = sanitize_base_name(&answer).unwrap_or_else(default_base_name);

    let renderer = DocxRenderer;
    let document = renderer.render(&resume, &profile)?;
    let path = write_document(&config.output_dir, &base, renderer.extension(), &document)?;
    info!("Generated resume for {}", profile.personal_info.name);
    console.say(format!("Resume saved to {}", path.display()))?;
    Ok(path)
}

fn print_preview<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    resume: &TailoredResume,
    profile: &Profile,
) -> Result<(), AppError> {
    console.say("\n== Resume Preview ==")?;
    console.say(format!("\nProfessional Summary:\n{}", resume.about_me()))?;

    console.say("\nSelected Experience:")?;
    for job in resume.selected_experiences() {
        console.say(format!(
            "  {} at {} ({} - {})",
            job.title, job.company, job.start_date, job.end_date
        ))?;
        for duty in job.duties.iter().take(PREVIEW_DUTIES) {
            console.say(format!("    • {duty}"))?;
        }
        if job.duties.len() > PREVIEW_DUTIES {
            console.say(format!("    ... and {} more", job.duties.len() - PREVIEW_DUTIES))?;
        }
    }

    let skills = resume.tailored_skills();
    let shown: Vec<&str> = skills.iter().take(PREVIEW_SKILLS).map(String::as_str).collect();
    let mut line = format!("\nSkills: {}", shown.join(", "));
    if skills.len() > PREVIEW_SKILLS {
        line.push_str(&format!(" (+{} more)", skills.len() - PREVIEW_SKILLS));
    }
    console.say(line)?;

    if !profile.education.is_empty() {
        console.say("\nEducation:")?;
        for edu in &profile.education {
            console.say(format!("  {} - {}", edu.degree, edu.institution))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TailoringConfig;
    use crate::console::tests::scripted;
    use crate::llm_client::{TailoringErrorKind, TailoringTask};
    use crate::store::validation::tests::sample_profile;
    use crate::tailoring::pipeline::tests::{happy_client, ScriptedClient};

    const JD: &str = "Seeking a backend engineer\nPython and APIs\n\n\n";

    fn setup() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_file: dir.path().join("user_data.json"),
            output_dir: dir.path().join("resumes"),
            tailoring: TailoringConfig::default(),
            rust_log: "warn".to_string(),
        };
        ProfileStore::new(&config.data_file)
            .save(&sample_profile())
            .unwrap();
        (dir, config)
    }

    #[tokio::test]
    async fn test_generate_writes_named_document() {
        let (_dir, config) = setup();
        let input = format!("{JD}y\nAcme Backend\n");
        let mut console = scripted(&input);

        let path = run_generate(&mut console, &config, || Ok(happy_client()))
            .await
            .unwrap();

        assert_eq!(path, config.output_dir.join("Acme_Backend.docx"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let shown = String::from_utf8(console.into_output()).unwrap();
        assert!(shown.contains("Loaded profile for Jane Doe (2 job experiences)"));
        assert!(shown.contains("Experienced backend engineer..."));
        let exp2 = shown.find("Engineer 2 at Company 2 (2019 - Present)").unwrap();
        let exp1 = shown.find("Engineer 1 at Company 1 (2016 - 2019)").unwrap();
        assert!(exp2 < exp1, "experiences must follow the ranking");
        assert!(shown.contains("Skills: Python, APIs"));
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_file: dir.path().join("absent.json"),
            output_dir: dir.path().join("resumes"),
            tailoring: TailoringConfig::default(),
            rust_log: "warn".to_string(),
        };
        let mut console = scripted(JD);

        let result = run_generate(&mut console, &config, || Ok(happy_client())).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_job_description_cancels_before_connecting() {
        let (_dir, config) = setup();
        let mut console = scripted("\n\n");

        let result = run_generate(&mut console, &config, || -> Result<ScriptedClient, AppError> {
            panic!("client must not be built without a job description")
        })
        .await;

        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_tailoring_failure_writes_nothing() {
        let (_dir, config) = setup();
        let client =
            happy_client().fail(TailoringTask::SkillsTailoring, TailoringErrorKind::RateLimited);
        let input = format!("{JD}y\n\n");
        let mut console = scripted(&input);

        let result = run_generate(&mut console, &config, || Ok(client)).await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), "TAILORING_ERROR:RATE_LIMITED");
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_declining_preview_writes_nothing() {
        let (_dir, config) = setup();
        let input = format!("{JD}n\n");
        let mut console = scripted(&input);

        let result = run_generate(&mut console, &config, || Ok(happy_client())).await;

        assert!(matches!(result, Err(AppError::Cancelled(_))));
        assert!(!config.output_dir.exists());
    }
}
