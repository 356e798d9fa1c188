mod loader;
mod run;

pub use loader::{load_run_config, parse_run_config};
pub use run::RunConfig;
