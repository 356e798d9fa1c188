use std::{fs, path::Path};

use super::RunConfig;
use crate::OrchestratorError;

/// Loads and validates a [`RunConfig`] from a JSON file.
///
/// A `SEED` environment variable, when set, overrides the file's seed.
///
/// # Errors
/// Returns `OrchestratorError::InvalidConfig` if the file can't be read, parsed or
/// describes an invalid run.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, OrchestratorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        OrchestratorError::InvalidConfig(format!("cannot read '{}': {e}", path.display()))
    })?;

    let mut config = parse_run_config(&content)?;

    if let Ok(raw) = std::env::var("SEED") {
        let seed = raw
            .trim()
            .parse()
            .map_err(|e| OrchestratorError::InvalidConfig(format!("invalid SEED '{raw}': {e}")))?;
        config.seed = Some(seed);
    }

    Ok(config)
}

/// Parses and validates a [`RunConfig`] from its JSON text.
///
/// # Errors
/// Returns `OrchestratorError::InvalidConfig` on malformed JSON or an invalid run.
pub fn parse_run_config(content: &str) -> Result<RunConfig, OrchestratorError> {
    let config: RunConfig = serde_json::from_str(content)
        .map_err(|e| OrchestratorError::InvalidConfig(format!("invalid JSON: {e}")))?;

    config.validate()?;
    Ok(config)
}
