//! Interactive profile collection: overwrite check, the form, a summary and
//! a confirmed save.

pub mod form;

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::console::Console;
use crate::errors::AppError;
use crate::models::Profile;
use crate::store::ProfileStore;

pub use form::ProfileForm;

/// Runs the whole collection flow. Returns the saved profile, or
/// `Cancelled` when the user declines to overwrite or to save.
pub fn run_collect<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &ProfileStore,
) -> Result<Profile, AppError> {
    console.say("Resume Data Collection")?;
    console.say("Please provide your information. Press Enter to skip optional fields.")?;

    if store.exists() {
        match store.load() {
            Ok(existing) => console.say(format!(
                "\nA profile for {} already exists at {}.",
                existing.personal_info.name,
                store.path().display()
            ))?,
            Err(e) => {
                warn!("Existing profile is unreadable: {e}");
                console.say(format!(
                    "\nThe existing profile at {} could not be read: {e}",
                    store.path().display()
                ))?;
            }
        }
        if !console.confirm("This will overwrite existing data. Continue?", false)? {
            return Err(AppError::Cancelled("existing profile kept".to_string()));
        }
    }

    let profile = ProfileForm::new(console).run()?;

    print_summary(console, &profile)?;
    if !console.confirm("Save this data?", true)? {
        return Err(AppError::Cancelled("data not saved".to_string()));
    }

    store.save(&profile)?;
    info!("Profile collected for {}", profile.personal_info.name);
    console.say(format!("Data saved to {}", store.path().display()))?;
    Ok(profile)
}

fn print_summary<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    profile: &Profile,
) -> Result<(), AppError> {
    let info = &profile.personal_info;
    console.say("\n== Data Summary ==")?;
    console.say(format!("Name: {}", info.name))?;
    console.say(format!("Email: {}", info.email))?;
    console.say(format!("Phone: {}", info.phone))?;
    console.say(format!("Location: {}", info.location))?;
    for link in info.links() {
        console.say(format!("Link: {link}"))?;
    }

    console.say(format!("\nJob Experience ({} positions):", profile.job_experience.len()))?;
    for job in &profile.job_experience {
        console.say(format!(
            "  {}. {} at {} ({}), {} duties",
            job.id,
            job.title,
            job.company,
            job.date_range(),
            job.duties.len()
        ))?;
    }

    for (label, count) in [
        ("Education entries", profile.education.len()),
        ("Skills", profile.skills.len()),
        ("Certifications", profile.certifications.len()),
        ("Interests/Background items", profile.interests_and_background.len()),
    ] {
        if count > 0 {
            console.say(format!("{label}: {count}"))?;
        }
    }
    Ok(())
}
