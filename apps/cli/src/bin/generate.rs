use std::process::ExitCode;

use tracing::info;

use resume_tailor::config::{Config, LlmConfig};
use resume_tailor::errors::AppError;
use resume_tailor::generate::run_generate;
use resume_tailor::llm_client::LlmClient;
use resume_tailor::{console, finish, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return finish::<()>(Err(AppError::Config(e))),
    };
    init_tracing(&config.rust_log);
    info!("Starting resume generation v{}", env!("CARGO_PKG_VERSION"));

    let connect = || -> Result<LlmClient, AppError> {
        let llm = LlmClient::new(&LlmConfig::from_env()?)?;
        info!("LLM client initialized (model: {})", llm.model());
        Ok(llm)
    };

    finish(run_generate(&mut console::stdio(), &config, connect).await)
}
