use redprobe_core::config::RedprobeConfig;
use redprobe_core::engine::{AutomataEngine, BacktrackEngine, EngineKind, RegexEngine};
use redprobe_core::{PatternCase, Prober, PumpStrategy, write_report};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "redprobe.toml";

/// Probe a regex engine with one ReDoS test case and print the result as JSON.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// JSON pattern case to run
    #[clap(value_parser)]
    input_file: PathBuf,
    /// Engine adapter to probe
    #[clap(short, long, value_enum)]
    engine: Option<EngineArg>,
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// How to build the attack string
    #[clap(long, value_enum)]
    pump_strategy: Option<PumpStrategyArg>,
    /// Suppress diagnostics on stderr
    #[clap(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EngineArg {
    Backtrack,
    Automata,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Backtrack => EngineKind::Backtrack,
            EngineArg::Automata => EngineKind::Automata,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PumpStrategyArg {
    Naive,
    Doubling,
}

impl From<PumpStrategyArg> for PumpStrategy {
    fn from(arg: PumpStrategyArg) -> Self {
        match arg {
            PumpStrategyArg::Naive => PumpStrategy::Naive,
            PumpStrategyArg::Doubling => PumpStrategy::Doubling,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<(RedprobeConfig, String), anyhow::Error> {
    match path {
        Some(config_path) => {
            let config = RedprobeConfig::load_from_file(config_path)?;
            Ok((config, format!("Loaded configuration from {config_path:?}")))
        }
        None => {
            let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_config_path.exists() {
                let config = RedprobeConfig::load_from_file(&default_config_path)?;
                Ok((
                    config,
                    format!("Loaded default configuration from {default_config_path:?}"),
                ))
            } else {
                Ok((
                    RedprobeConfig::default(),
                    "No config file found, using built-in defaults".to_string(),
                ))
            }
        }
    }
}

fn init_logging(filter: &str, quiet: bool) {
    if quiet {
        return;
    }
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run<E>(engine: E, strategy: Option<PumpStrategy>, case: PatternCase) -> anyhow::Result<()>
where
    E: RegexEngine + 'static,
{
    let mut prober = Prober::new(engine);
    if let Some(strategy) = strategy {
        prober = prober.with_pump_strategy(strategy);
    }
    info!(
        "Probing {} engine, {} pump strategy",
        prober.engine().name(),
        prober.pump_strategy().as_str()
    );

    let verdict = prober
        .probe(&case)
        .context("Failed to build the attack string")?;
    debug!("Verdict: {verdict:?}");

    write_report(std::io::stdout().lock(), case, &verdict).context("Failed to emit result")?;
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let (config, config_source) = load_config(cli.config_file.as_ref())?;
    init_logging(&config.logging.filter, cli.quiet);
    info!("{config_source}");

    let engine_kind = cli.engine.map(EngineKind::from).unwrap_or(config.probe.engine);
    let strategy = cli
        .pump_strategy
        .map(PumpStrategy::from)
        .or(config.probe.pump_strategy);

    let case = PatternCase::load_from_file(&cli.input_file)
        .with_context(|| format!("Failed to load pattern case {:?}", cli.input_file))?;

    match engine_kind {
        EngineKind::Backtrack => run(BacktrackEngine, strategy, case),
        EngineKind::Automata => run(AutomataEngine::new(config.automata), strategy, case),
    }
}
