pub mod job_description;
pub mod profile;
pub mod resume;

pub use job_description::JobDescription;
pub use profile::{EducationEntry, JobExperience, PersonalInfo, Profile, PRESENT};
pub use resume::TailoredResume;
