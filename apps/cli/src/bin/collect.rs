use std::process::ExitCode;

use resume_tailor::collect::run_collect;
use resume_tailor::config::Config;
use resume_tailor::errors::AppError;
use resume_tailor::store::ProfileStore;
use resume_tailor::{console, finish, init_tracing};

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return finish::<()>(Err(AppError::Config(e))),
    };
    init_tracing(&config.rust_log);

    let store = ProfileStore::new(&config.data_file);
    finish(run_collect(&mut console::stdio(), &store))
}
