//! JSONL recordings: one `Sample` object per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use contracts::Sample;
use tracing::info;

use crate::error::{Result, SensorSourceError};

/// Read every sample from a JSONL recording
///
/// Blank lines are skipped. Samples are returned in file order.
pub fn read_recording(path: &Path) -> Result<Vec<Sample>> {
    let file = File::open(path).map_err(|e| SensorSourceError::recording_io(path, e))?;
    let reader = BufReader::new(file);

    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SensorSourceError::recording_io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: Sample =
            serde_json::from_str(&line).map_err(|e| SensorSourceError::RecordingParse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: e.to_string(),
            })?;
        samples.push(sample);
    }

    info!(path = %path.display(), samples = samples.len(), "Loaded recording");
    Ok(samples)
}

/// Write samples as a JSONL recording, replacing any existing file
pub fn write_recording(path: &Path, samples: &[Sample]) -> Result<()> {
    let file = File::create(path).map_err(|e| SensorSourceError::recording_io(path, e))?;
    let mut writer = BufWriter::new(file);

    for sample in samples {
        let line = serde_json::to_string(sample).map_err(|e| SensorSourceError::RecordingParse {
            path: path.to_path_buf(),
            line: 0,
            message: e.to_string(),
        })?;
        writeln!(writer, "{line}").map_err(|e| SensorSourceError::recording_io(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| SensorSourceError::recording_io(path, e))?;

    info!(path = %path.display(), samples = samples.len(), "Wrote recording");
    Ok(())
}
