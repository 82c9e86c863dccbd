mod reports;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use profitsim_core::{
    AiReadinessTier, EngineConfig, HistogramConfig, InputProfile, OutsourcingTier,
    SimulationEngine, SimulationOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored terminal summary
    Console,
    /// Machine-readable summary
    Json,
    /// Markdown tables for pasting into documents
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "profitsim", version)]
#[command(about = "Estimate the range of operating-cost savings for a business profile")]
struct Args {
    /// Annual revenue in millions
    #[arg(long, default_value_t = 20.0)]
    revenue: f64,

    /// Operating expense as a percentage of revenue
    #[arg(long, default_value_t = 35.0)]
    opex_percent: f64,

    /// Employee headcount (informational)
    #[arg(long, default_value_t = 85)]
    headcount: u32,

    /// Technology spend as a percentage of OpEx
    #[arg(long, default_value_t = 8.0)]
    tech_spend: f64,

    /// AI readiness tier: beginner, learning or adopter
    #[arg(long, default_value = "beginner")]
    ai_readiness: AiReadinessTier,

    /// Process maturity percentage
    #[arg(long, default_value_t = 60.0)]
    process_maturity: f64,

    /// Outsourcing tier: low, medium or high
    #[arg(long, default_value = "low")]
    outsourcing: OutsourcingTier,

    /// JSON profile file; replaces the individual profile flags
    #[arg(long)]
    profile: Option<PathBuf>,

    /// JSON engine configuration overriding the built-in tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of scenarios to draw
    #[arg(long)]
    samples: Option<usize>,

    /// Seed for a reproducible run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Parallel sampling streams
    #[arg(long)]
    workers: Option<usize>,

    /// Quantiles to report (comma-separated, each in [0, 1))
    #[arg(long)]
    quantiles: Option<String>,

    /// Histogram bucket count
    #[arg(long)]
    buckets: Option<usize>,

    /// Histogram lower edge in percent
    #[arg(long)]
    range_min: Option<f64>,

    /// Histogram upper edge in percent
    #[arg(long)]
    range_max: Option<f64>,

    /// Days of delay used for the cost-of-inaction line
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Include every scenario in JSON output
    #[arg(long)]
    include_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = load_engine(args.config.as_deref())?;
    let profile = build_profile(&args)?;
    let options = build_options(&args, engine.config().defaults.clone())?;
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);

    log::info!(
        "simulating {} scenarios with seed {seed} on {} worker(s)",
        options.sample_count,
        options.workers
    );
    let start_time = Instant::now();
    let summary = engine
        .run_seeded(&profile, Some(&options), seed)
        .context("simulation failed")?;
    let elapsed = start_time.elapsed();

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Console => reports::write_console_report(
            output_target.writer(),
            &profile,
            &summary,
            args.days,
            elapsed,
        )?,
        ReportFormat::Json => reports::write_json_report(
            output_target.writer(),
            &profile,
            &summary,
            args.include_scenarios,
        )?,
        ReportFormat::Markdown => {
            reports::write_markdown_report(output_target.writer(), &profile, &summary, args.days)?;
        }
    }
    output_target.flush_inner()?;

    if args.output.is_some() {
        println!("{}", "✅ Report written".green());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_engine(path: Option<&Path>) -> Result<SimulationEngine> {
    let Some(path) = path else {
        return Ok(SimulationEngine::default());
    };
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = EngineConfig::from_json(&raw)
        .with_context(|| format!("invalid engine config {}", path.display()))?;
    Ok(SimulationEngine::new(config)?)
}

fn build_profile(args: &Args) -> Result<InputProfile> {
    if let Some(path) = &args.profile {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return InputProfile::from_json(&raw)
            .with_context(|| format!("invalid profile {}", path.display()));
    }
    let profile = InputProfile {
        revenue_millions: args.revenue,
        opex_percent: args.opex_percent,
        headcount: args.headcount,
        tech_spend_percent: args.tech_spend,
        ai_readiness: args.ai_readiness,
        process_maturity_percent: args.process_maturity,
        outsourcing: args.outsourcing,
    };
    profile.validate().context("invalid profile")?;
    Ok(profile)
}

fn build_options(args: &Args, defaults: SimulationOptions) -> Result<SimulationOptions> {
    let mut options = defaults;
    if let Some(samples) = args.samples {
        options.sample_count = samples;
    }
    if let Some(workers) = args.workers {
        options.workers = workers;
    }
    if let Some(raw) = &args.quantiles {
        options.quantiles = parse_quantiles(raw)?;
    }
    options.histogram = HistogramConfig {
        bucket_count: args.buckets.unwrap_or(options.histogram.bucket_count),
        range_min: args.range_min.unwrap_or(options.histogram.range_min),
        range_max: args.range_max.unwrap_or(options.histogram.range_max),
    };
    options.validate().context("invalid simulation options")?;
    Ok(options)
}

fn parse_quantiles(raw: &str) -> Result<Vec<f64>> {
    let quantiles = split_csv(raw)
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("quantile `{token}` is not a number"))
        })
        .collect::<Result<Vec<_>>>()?;
    if quantiles.is_empty() {
        bail!("no quantiles given");
    }
    Ok(quantiles)
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["profitsim"])
    }

    #[test]
    fn defaults_build_the_reference_profile() {
        let profile = build_profile(&base_args()).unwrap();
        assert_eq!(profile, InputProfile::default());
    }

    #[test]
    fn flags_override_options() {
        let args = Args::parse_from([
            "profitsim",
            "--samples",
            "500",
            "--workers",
            "3",
            "--quantiles",
            "0.25, 0.75",
            "--buckets",
            "10",
            "--range-max",
            "50",
        ]);
        let options = build_options(&args, SimulationOptions::default()).unwrap();
        assert_eq!(options.sample_count, 500);
        assert_eq!(options.workers, 3);
        assert_eq!(options.quantiles, vec![0.25, 0.75]);
        assert_eq!(options.histogram.bucket_count, 10);
        assert!((options.histogram.range_max - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tier_flags_parse_through_core_names() {
        let args = Args::parse_from([
            "profitsim",
            "--ai-readiness",
            "adopter",
            "--outsourcing",
            "high",
        ]);
        assert_eq!(args.ai_readiness, AiReadinessTier::Adopter);
        assert_eq!(args.outsourcing, OutsourcingTier::High);
        assert!(Args::try_parse_from(["profitsim", "--ai-readiness", "guru"]).is_err());
    }

    #[test]
    fn invalid_profile_and_options_are_rejected() {
        let args = Args::parse_from(["profitsim", "--opex-percent", "150"]);
        assert!(build_profile(&args).is_err());
        let args = Args::parse_from(["profitsim", "--quantiles", "0.5,abc"]);
        assert!(build_options(&args, SimulationOptions::default()).is_err());
        let args = Args::parse_from(["profitsim", "--samples", "0"]);
        assert!(build_options(&args, SimulationOptions::default()).is_err());
    }

    #[test]
    fn output_target_writes_to_stdout() {
        let mut target = OutputTarget::new(None).unwrap();
        target.writer().write_all(b"ok").unwrap();
        target.flush_inner().unwrap();
    }
}
