//! `replay` command implementation.
//!
//! Feeds a recording through a fresh classifier synchronously, without
//! pacing, and prints every emitted state.

use anyhow::{Context, Result};
use contracts::{AppConfig, ContractError, Movement, MovementState, Sample};
use motion_classifier::{Classifier, SampleOutcome};
use observability::{ClassificationAggregator, ClassificationSummary};
use serde::Serialize;
use tracing::{info, warn};

use super::load_config;
use crate::cli::ReplayArgs;
use crate::error::CliError;

/// One emitted classification, for `--json`
#[derive(Debug, Serialize)]
struct ReplayLine {
    index: usize,
    timestamp: u64,
    movement: Movement,
    smoothed: f64,
    state: MovementState,
}

/// Execute the `replay` command
pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let samples = sensor_source::read_recording(&args.input).map_err(CliError::from)?;
    info!(input = %args.input.display(), samples = samples.len(), "Replaying recording");

    let (lines, summary) = classify_recording(&config, &samples);

    for line in &lines {
        if args.json {
            let json = serde_json::to_string(line).context("Failed to serialize state")?;
            println!("{json}");
        } else {
            println!(
                "#{:<5} t={:<8} {:<10} smoothed={:+.4}",
                line.index,
                line.timestamp,
                line.movement.as_str(),
                line.smoothed
            );
        }
    }

    if !args.json {
        println!();
        print!("{summary}");
    }

    Ok(())
}

fn classify_recording(
    config: &AppConfig,
    samples: &[Sample],
) -> (Vec<ReplayLine>, ClassificationSummary) {
    let mut classifier = Classifier::new(config.classifier.clone());
    let mut aggregator = ClassificationAggregator::new();
    let mut lines = Vec::new();
    classifier.begin();

    for (index, sample) in samples.iter().enumerate() {
        aggregator.record_sample();
        match classifier.on_sample(sample) {
            Ok(SampleOutcome::Classified { state, smoothed }) => {
                aggregator.record_classification(state.movement(), smoothed);
                lines.push(ReplayLine {
                    index,
                    timestamp: sample.timestamp,
                    movement: state.movement(),
                    smoothed,
                    state,
                });
            }
            Ok(SampleOutcome::Calibrated { baseline }) => {
                info!(index, baseline, "Baseline established");
            }
            Ok(_) => {}
            Err(ContractError::InvalidSample { field, value }) => {
                aggregator.record_rejected();
                warn!(index, field, value, "Skipping invalid sample");
            }
            Err(e) => warn!(index, error = %e, "Skipping sample"),
        }
    }

    (lines, aggregator.summary())
}
