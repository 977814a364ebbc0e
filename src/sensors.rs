//! Measurement log reader
//!
//! One whitespace-separated record per line:
//!
//! ```text
//! L  px  py  timestamp_us  [px_gt py_gt vx_gt vy_gt ...]
//! R  rho phi rho_dot timestamp_us  [px_gt py_gt vx_gt vy_gt ...]
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Ground-truth
//! columns beyond the first four are accepted and dropped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::SensorLogError;
use crate::types::{GroundTruth, Measurement, SensorKind};

const GROUND_TRUTH_FIELDS: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub measurement: Measurement,
    pub ground_truth: Option<GroundTruth>,
}

fn malformed(line: usize, reason: impl Into<String>) -> SensorLogError {
    SensorLogError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn parse_f64(token: &str, line: usize, field: &str) -> Result<f64, SensorLogError> {
    let value: f64 = token
        .parse()
        .map_err(|_| malformed(line, format!("{} is not a number: '{}'", field, token)))?;
    if !value.is_finite() {
        return Err(malformed(line, format!("{} is not finite", field)));
    }
    Ok(value)
}

/// Parse one log line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(text: &str, line: usize) -> Result<Option<LogRecord>, SensorLogError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (sensor, names): (SensorKind, &[&str]) = match tokens[0] {
        "L" => (SensorKind::Lidar, &["px", "py"][..]),
        "R" => (SensorKind::Radar, &["rho", "phi", "rho_dot"][..]),
        other => return Err(malformed(line, format!("unknown sensor tag '{}'", other))),
    };

    let n = sensor.measurement_dim();
    if tokens.len() < n + 2 {
        return Err(malformed(
            line,
            format!(
                "{} record needs {} values and a timestamp, found {} fields",
                sensor.label(),
                n,
                tokens.len() - 1
            ),
        ));
    }

    let raw = tokens[1..=n]
        .iter()
        .zip(names)
        .map(|(tok, name)| parse_f64(tok, line, name))
        .collect::<Result<Vec<f64>, _>>()?;

    let ts_token = tokens[n + 1];
    let timestamp_us: i64 = ts_token
        .parse()
        .map_err(|_| malformed(line, format!("timestamp is not an integer: '{}'", ts_token)))?;

    let rest = &tokens[n + 2..];
    let ground_truth = match rest.len() {
        0 => None,
        len if len < GROUND_TRUTH_FIELDS => {
            return Err(malformed(
                line,
                format!("incomplete ground truth: {} of {} fields", len, GROUND_TRUTH_FIELDS),
            ))
        }
        _ => Some(GroundTruth {
            px: parse_f64(rest[0], line, "px_gt")?,
            py: parse_f64(rest[1], line, "py_gt")?,
            vx: parse_f64(rest[2], line, "vx_gt")?,
            vy: parse_f64(rest[3], line, "vy_gt")?,
        }),
    };

    Ok(Some(LogRecord {
        measurement: Measurement {
            sensor,
            raw,
            timestamp_us,
        },
        ground_truth,
    }))
}

/// Parse every record from a reader.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<LogRecord>, SensorLogError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        if let Some(record) = parse_line(&line?, idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Load a log file, decompressing `.gz` files on the fly.
pub fn load_log(path: &Path) -> Result<Vec<LogRecord>, SensorLogError> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let records = parse_log(BufReader::new(reader))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
