//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AppConfig, SourceKind, TargetPolicy};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    calibration_count: usize,
    smoothing_window: usize,
    movement_threshold: f64,
    stationary_threshold: f64,
    source: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    calibration_count: config.classifier.calibration_count,
                    smoothing_window: config.classifier.smoothing_window,
                    movement_threshold: config.classifier.movement_threshold,
                    stationary_threshold: config.classifier.stationary_threshold,
                    source: format!("{:?}", config.sensor.source),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let classifier = &config.classifier;

    if classifier.stationary_threshold == classifier.movement_threshold {
        warnings.push(
            "stationary_threshold equals movement_threshold - no margin between still and moving"
                .to_string(),
        );
    }

    if classifier.smoothing_window == 1 {
        warnings.push("smoothing_window is 1 - classification will follow raw noise".to_string());
    }

    let calibration_ms = classifier.calibration_count as u64 * classifier.update_interval_ms;
    if calibration_ms >= config.session.max_duration_ms {
        warnings.push(format!(
            "calibration takes ~{calibration_ms} ms, not shorter than session.max_duration_ms ({})",
            config.session.max_duration_ms
        ));
    }

    if config.sensor.source == SourceKind::Mock && config.sensor.replay_path.is_some() {
        warnings.push("sensor.replay_path is set but sensor.source is mock".to_string());
    }

    if config.session.target == TargetPolicy::Random && config.session.seed.is_some() {
        warnings.push("session.seed is set - random targets will repeat between runs".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Calibration samples: {}", summary.calibration_count);
            println!("  Smoothing window: {}", summary.smoothing_window);
            println!(
                "  Thresholds: move > {}, still <= {}",
                summary.movement_threshold, summary.stationary_threshold
            );
            println!("  Source: {}", summary.source);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
