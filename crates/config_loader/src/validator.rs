//! Configuration validation
//!
//! Rules:
//! - field ranges declared on the contract types (`validator` derive)
//! - thresholds are finite
//! - stationary_threshold <= movement_threshold
//! - replay source has a replay_path

use contracts::{AppConfig, ClassifierConfig, ContractError, SensorConfig, SourceKind};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate AppConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &AppConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| first_error("", &errors))?;
    validate_thresholds(&config.classifier)?;
    validate_sensor_source(&config.sensor)?;
    Ok(())
}

/// Flatten the nested validator report into a single field path
fn first_error(prefix: &str, errors: &ValidationErrors) -> ContractError {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let message = field_errors
                    .iter()
                    .map(|e| e.code.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return ContractError::config_validation(path, format!("failed: {message}"));
            }
            ValidationErrorsKind::Struct(inner) => return first_error(&path, inner),
            ValidationErrorsKind::List(items) => {
                if let Some((idx, inner)) = items.iter().next() {
                    return first_error(&format!("{path}[{idx}]"), inner);
                }
            }
        }
    }
    ContractError::config_validation(prefix, "invalid configuration")
}

/// Validate classifier thresholds
fn validate_thresholds(classifier: &ClassifierConfig) -> Result<(), ContractError> {
    for (field, value) in [
        ("classifier.movement_threshold", classifier.movement_threshold),
        ("classifier.stationary_threshold", classifier.stationary_threshold),
    ] {
        if !value.is_finite() {
            return Err(ContractError::config_validation(
                field,
                format!("must be finite, got {value}"),
            ));
        }
    }

    if classifier.stationary_threshold > classifier.movement_threshold {
        return Err(ContractError::config_validation(
            "classifier.stationary_threshold / classifier.movement_threshold",
            format!(
                "stationary_threshold ({}) must be <= movement_threshold ({})",
                classifier.stationary_threshold, classifier.movement_threshold
            ),
        ));
    }

    Ok(())
}

/// Validate sensor source selection
fn validate_sensor_source(sensor: &SensorConfig) -> Result<(), ContractError> {
    if sensor.source == SourceKind::Replay && sensor.replay_path.is_none() {
        return Err(ContractError::config_validation(
            "sensor.replay_path",
            "replay source requires replay_path",
        ));
    }
    Ok(())
}
