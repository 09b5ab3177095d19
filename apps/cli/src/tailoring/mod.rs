// Resume tailoring: prompt building, date formatting, and the four-step pipeline.
// All API calls go through llm_client::TailoringClient.

pub mod dates;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;

pub use dates::format_year;
pub use pipeline::{select_experiences, TailoringPipeline};
pub use prompt_builder::PromptBuilder;
