//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{AppConfig, SignConvention, TargetPolicy};
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!("Loading configuration info");

    let config = load_config(args.config.as_deref())?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&config)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn describe_convention(convention: SignConvention) -> &'static str {
    match convention {
        SignConvention::PositiveIsLeft => "positive x = left, negative x = right",
        SignConvention::PositiveIsRight => "positive x = right, negative x = left",
    }
}

fn describe_target(target: TargetPolicy) -> String {
    match target {
        TargetPolicy::Random => "random".to_string(),
        TargetPolicy::Fixed(direction) => format!("fixed ({direction})"),
    }
}

fn print_config_info(config: &AppConfig) {
    let classifier = &config.classifier;
    let sensor = &config.sensor;
    let session = &config.session;

    println!("=== Tilt Coach Configuration ===\n");

    println!("Classifier");
    println!("   ├─ Version: {:?}", config.version);
    println!(
        "   ├─ Calibration: {} samples",
        classifier.calibration_count
    );
    println!("   ├─ Smoothing window: {}", classifier.smoothing_window);
    println!(
        "   ├─ Movement threshold: > {}",
        classifier.movement_threshold
    );
    println!(
        "   ├─ Stationary threshold: <= {}",
        classifier.stationary_threshold
    );
    println!("   ├─ Update interval: {} ms", classifier.update_interval_ms);
    println!(
        "   └─ Sign convention: {}",
        describe_convention(classifier.sign_convention)
    );

    println!("\nSensor");
    println!("   ├─ Id: {}", sensor.sensor_id);
    println!("   ├─ Source: {:?}", sensor.source);
    match &sensor.replay_path {
        Some(path) => println!(
            "   └─ Replay: {} (x{}, loop: {})",
            path.display(),
            sensor.replay_speed,
            sensor.replay_loop
        ),
        None => println!(
            "   └─ Mock noise: ±{} (seed {})",
            sensor.mock_noise, sensor.mock_seed
        ),
    }

    println!("\nSession");
    println!("   ├─ Max duration: {} ms", session.max_duration_ms);
    println!("   ├─ Target: {}", describe_target(session.target));
    println!("   └─ Request permissions: {}", session.request_permissions);

    println!();
}
