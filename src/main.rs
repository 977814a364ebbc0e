use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use ctrv_tracker_rs::consistency::rmse;
use ctrv_tracker_rs::sensors::{load_log, LogRecord};
use ctrv_tracker_rs::simulation::CtrvTrajectory;
use ctrv_tracker_rs::types::StateVec;
use ctrv_tracker_rs::{CtrvUkf, GroundTruth, UkfConfig};

#[derive(Parser, Debug)]
#[command(name = "ctrv_tracker")]
#[command(about = "CTRV unscented Kalman filter over lidar/radar logs", long_about = None)]
struct Args {
    /// Measurement log (L/R records, optionally .gz)
    #[arg(value_name = "LOG", conflicts_with = "simulate")]
    input: Option<PathBuf>,

    /// Run on a synthetic CTRV trajectory with this many measurements instead of a log
    #[arg(long, value_name = "STEPS")]
    simulate: Option<usize>,

    /// Sample period of the synthetic trajectory [µs]
    #[arg(long, default_value = "50000")]
    sim_step_us: i64,

    /// JSON file with filter configuration (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Predict through lidar measurements without updating
    #[arg(long, default_value_t = false)]
    no_laser: bool,

    /// Predict through radar measurements without updating
    #[arg(long, default_value_t = false)]
    no_radar: bool,

    /// Longitudinal acceleration noise std [m/s²]
    #[arg(long)]
    std_a: Option<f64>,

    /// Yaw acceleration noise std [rad/s²]
    #[arg(long)]
    std_yawdd: Option<f64>,

    /// Write one JSON estimate per processed measurement to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<UkfConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => UkfConfig::default(),
    };

    if args.no_laser {
        config.use_laser = false;
    }
    if args.no_radar {
        config.use_radar = false;
    }
    if let Some(std_a) = args.std_a {
        config.std_a = std_a;
    }
    if let Some(std_yawdd) = args.std_yawdd {
        config.std_yawdd = std_yawdd;
    }
    Ok(config)
}

fn load_records(args: &Args) -> Result<(String, Vec<LogRecord>)> {
    if let Some(steps) = args.simulate {
        if args.sim_step_us <= 0 {
            anyhow::bail!("--sim-step-us must be positive");
        }
        let traj = CtrvTrajectory::new(StateVec::new(0.6, 0.6, 5.2, 0.0, 0.2), args.sim_step_us);
        let records = traj
            .samples(steps)
            .into_iter()
            .map(|(measurement, gt)| LogRecord {
                measurement,
                ground_truth: Some(gt),
            })
            .collect();
        return Ok((format!("simulated:{}", steps), records));
    }

    let Some(path) = args.input.as_ref() else {
        anyhow::bail!("Provide a measurement log or --simulate <STEPS>");
    };
    let records = load_log(path).with_context(|| format!("reading {}", path.display()))?;
    Ok((path.display().to_string(), records))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let (source, records) = load_records(&args)?;
    let mut ukf = CtrvUkf::new(config)?;

    let mut output = match args.output.as_ref() {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };

    let mut estimates: Vec<StateVec> = Vec::new();
    let mut truths: Vec<GroundTruth> = Vec::new();
    let mut failed_cycles = 0u64;

    for record in &records {
        if let Err(e) = ukf.process_measurement(&record.measurement) {
            log::warn!(
                "[REPLAY] t={} {} cycle failed: {}",
                record.measurement.timestamp_us,
                record.measurement.sensor.label(),
                e
            );
            failed_cycles += 1;
        }

        let Some(estimate) = ukf.estimate() else {
            continue;
        };
        if let Some(w) = output.as_mut() {
            serde_json::to_writer(&mut *w, &estimate)?;
            writeln!(w)?;
        }
        if let (Some(x), Some(gt)) = (ukf.state(), record.ground_truth) {
            estimates.push(*x);
            truths.push(gt);
        }
    }

    if let Some(mut w) = output {
        w.flush()?;
    }

    let rmse_json = if estimates.is_empty() {
        serde_json::Value::Null
    } else {
        let [px, py, vx, vy] = rmse(&estimates, &truths)?;
        json!({ "px": px, "py": py, "vx": vx, "vy": vy })
    };

    let summary = json!({
        "source": source,
        "records": records.len(),
        "steps": ukf.steps(),
        "failed_cycles": failed_cycles,
        "config": ukf.config(),
        "rmse": rmse_json,
        "nis": ukf.nis_monitor().summaries(),
        "final": ukf.estimate(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
