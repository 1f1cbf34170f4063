//! Command implementations.

mod info;
mod replay;
mod run;
mod validate;

pub use info::run_info;
pub use replay::run_replay;
pub use run::run_session;
pub use validate::run_validate;

use std::path::Path;

use contracts::AppConfig;
use tracing::info;

use crate::error::{CliError, Result};

/// Load the config at `path`, or defaults when no path is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(CliError::config_not_found(path));
        }
        info!(config = %path.display(), "Loading configuration");
    } else {
        info!("No configuration file given, using defaults");
    }

    config_loader::ConfigLoader::load_or_default(path).map_err(CliError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.classifier.calibration_count, 20);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/tilt-coach.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier]\nsmoothing_window = 3").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.classifier.smoothing_window, 3);
    }
}
