use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use step_counter::analysis::{StepAnalysis, StepPipeline};
use step_counter::config::{AppConfig, CountingStrategy, ThresholdMode, WindowRadius};
use step_counter::error::{log_analysis_error, log_ingest_error};
use step_counter::ingest::load_samples;
use step_counter::testing::SyntheticWalk;

#[derive(Parser, Debug)]
#[command(
    name = "step_cli",
    about = "Count walking steps in accelerometer recordings"
)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count steps and print a JSON report
    Count {
        #[command(flatten)]
        input: InputArgs,
        /// Exit with code 2 when the count differs from this value
        #[arg(long)]
        expect: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List detected peaks, marking those above the threshold with '*'
    Peaks {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Dump times, magnitudes, peak flags and thresholds as JSON
    Series {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a synthetic walking recording as CSV
    Synth {
        #[arg(long, default_value_t = 20)]
        steps: usize,
        /// Uniform noise amplitude on every axis (m/s²)
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// CSV recording with a time column and accelerometer columns
    #[arg(long)]
    input: PathBuf,
    /// JSON configuration file (defaults are used for missing values).
    /// Without it, `assets/step_config.json` is read when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    #[arg(long, value_enum)]
    threshold_mode: Option<ThresholdModeArg>,
    /// Scale applied to the standard deviation in the threshold
    #[arg(long)]
    multiplier: Option<f64>,
    /// Deadzone radius as an elapsed-time cutoff in milliseconds
    #[arg(long)]
    deadzone_ms: Option<f64>,
    /// Adaptive threshold window as an elapsed-time cutoff in milliseconds
    #[arg(long)]
    window_ms: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    Threshold,
    Periodicity,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ThresholdModeArg {
    Global,
    Adaptive,
}

impl InputArgs {
    fn resolve_config(&self) -> AppConfig {
        let mut config = self
            .config
            .as_ref()
            .map(AppConfig::load_from_file)
            .unwrap_or_else(AppConfig::load);

        if let Some(strategy) = self.strategy {
            config.counting.strategy = match strategy {
                StrategyArg::Threshold => CountingStrategy::Threshold,
                StrategyArg::Periodicity => CountingStrategy::Periodicity,
            };
        }

        if let Some(multiplier) = self.multiplier {
            config.threshold.deviation_multiplier = multiplier;
        }

        if let Some(cutoff_ms) = self.deadzone_ms {
            config.peaks.deadzone = WindowRadius::ElapsedMs(cutoff_ms);
        }

        match self.threshold_mode {
            Some(ThresholdModeArg::Global) => config.threshold.mode = ThresholdMode::Global,
            Some(ThresholdModeArg::Adaptive) => {
                config.threshold.mode = ThresholdMode::Adaptive {
                    window: WindowRadius::ElapsedMs(self.window_ms.unwrap_or(20.0)),
                }
            }
            None => {
                if let (ThresholdMode::Adaptive { window }, Some(cutoff_ms)) =
                    (&mut config.threshold.mode, self.window_ms)
                {
                    *window = WindowRadius::ElapsedMs(cutoff_ms);
                }
            }
        }

        if self.window_ms.is_some() && config.threshold.mode == ThresholdMode::Global {
            tracing::warn!("--window-ms has no effect with the global threshold mode");
        }

        config
    }

    fn analyze(&self) -> Result<StepAnalysis> {
        let config = self.resolve_config();
        let samples = load_samples(&self.input, &config.ingest)
            .map_err(|err| {
                log_ingest_error(&err, "load_samples");
                err
            })
            .with_context(|| format!("reading {}", self.input.display()))?;
        tracing::info!(
            "Loaded {} samples from {}",
            samples.len(),
            self.input.display()
        );

        StepPipeline::new(config)
            .analyze(&samples)
            .map_err(|err| {
                log_analysis_error(&err, "analyze");
                err
            })
            .with_context(|| format!("analyzing {}", self.input.display()))
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    step_counter::init_logging(match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    });

    match cli.command {
        Commands::Count {
            input,
            expect,
            output,
        } => run_count(&input, expect, output),
        Commands::Peaks { input } => run_peaks(&input),
        Commands::Series { input, output } => run_series(&input, output),
        Commands::Synth {
            steps,
            noise,
            seed,
            output,
        } => run_synth(steps, noise, seed, output),
    }
}

fn run_count(input: &InputArgs, expect: Option<usize>, output: Option<PathBuf>) -> Result<ExitCode> {
    let analysis = input.analyze()?;
    let report = CountReport {
        input: &input.input,
        sample_count: analysis.magnitudes.len(),
        peak_count: analysis.peak_count(),
        step_count: analysis.steps,
        strategy: analysis.strategy,
    };
    emit(&serde_json::to_string_pretty(&report)?, output)?;

    match expect {
        Some(expected) if expected != analysis.steps => {
            let diff = serde_json::json!({
                "expected": expected,
                "actual": analysis.steps,
            });
            eprintln!("{}", serde_json::to_string_pretty(&diff)?);
            Ok(ExitCode::from(2))
        }
        _ => Ok(ExitCode::from(0)),
    }
}

fn run_peaks(input: &InputArgs) -> Result<ExitCode> {
    let analysis = input.analyze()?;

    println!("Peak time\t\tMagnitude");
    for row in analysis.peak_rows() {
        let marker = if row.above_threshold { "*" } else { "" };
        println!("    {}\t\t    {}{}", row.time_ms, row.magnitude, marker);
    }
    println!("Step count: {}", analysis.steps);

    Ok(ExitCode::from(0))
}

fn run_series(input: &InputArgs, output: Option<PathBuf>) -> Result<ExitCode> {
    let analysis = input.analyze()?;
    emit(&serde_json::to_string_pretty(&analysis)?, output)?;
    Ok(ExitCode::from(0))
}

fn run_synth(steps: usize, noise: f64, seed: u64, output: Option<PathBuf>) -> Result<ExitCode> {
    if !noise.is_finite() || noise < 0.0 {
        return Err(anyhow!("noise amplitude must be finite and >= 0 (got {noise})"));
    }

    let walk = SyntheticWalk::new(steps).with_noise(noise, seed);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "time", "accel x", "accel y", "accel z", "gyro x", "gyro y", "gyro z",
    ])?;
    for sample in walk.samples() {
        writer.write_record([
            sample.time_ms.to_string(),
            sample.x.to_string(),
            sample.y.to_string(),
            sample.z.to_string(),
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
        ])?;
    }
    let csv = writer
        .into_inner()
        .map_err(|err| anyhow!("flushing CSV: {}", err.error()))?;

    emit(&String::from_utf8(csv)?, output)?;
    Ok(ExitCode::from(0))
}

fn emit(text: &str, output_path: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{}", text.trim_end());
    }

    Ok(())
}

#[derive(Serialize)]
struct CountReport<'a> {
    input: &'a Path,
    sample_count: usize,
    peak_count: usize,
    step_count: usize,
    strategy: CountingStrategy,
}
