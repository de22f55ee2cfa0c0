mod bench;
mod config;
mod constants;
mod game;

use bench::BenchRunner;
use clap::Parser;
use config::{
    algorithm_from_selector, get_profiles, load_profile, save_profile, BenchConfig, PROFILES_DIR,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Game-tree search benchmark along an Othello principal variation",
    long_about = None
)]
struct Args {
    /// 1 = Negamax, 2 = Negamax with alpha-beta, 3 = Scout, 4 = Negascout
    algorithm: Option<u8>,

    /// Use the transposition table
    #[arg(long)]
    tt: bool,

    /// Search depth (plies)
    #[arg(long)]
    depth: Option<u32>,

    /// Only search the last N positions of the variation
    #[arg(long)]
    positions: Option<usize>,

    /// Minimum generated nodes below a node before its result is cached
    #[arg(long)]
    threshold: Option<u64>,

    /// Maximum entries per transposition table slot
    #[arg(long)]
    tt_capacity: Option<usize>,

    /// Principal variation, e.g. "e6 d6 c5 ... pass ..."
    #[arg(long)]
    pv: Option<String>,

    /// Load settings from profiles/<NAME>.json before applying other flags
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Save the resulting settings as profiles/<NAME>.json
    #[arg(long, value_name = "NAME")]
    save_profile: Option<String>,

    /// List saved profiles and exit
    #[arg(long)]
    list_profiles: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Profile (or defaults) with the command-line flags applied on top.
    fn bench_config(&self, profiles: &Path) -> Result<BenchConfig, config::ConfigError> {
        let mut config = match &self.profile {
            Some(name) => load_profile(profiles, name)?,
            None => BenchConfig::default(),
        };
        if let Some(selector) = self.algorithm {
            config.algorithm = algorithm_from_selector(selector)?;
        }
        if self.tt {
            config.use_tt = true;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(positions) = self.positions {
            config.positions = Some(positions);
        }
        if let Some(threshold) = self.threshold {
            config.tt_threshold = threshold;
        }
        if let Some(capacity) = self.tt_capacity {
            config.tt_capacity = Some(capacity);
        }
        if let Some(pv) = &self.pv {
            config.pv = pv.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    let profiles = Path::new(PROFILES_DIR);
    if args.list_profiles {
        for name in get_profiles(profiles)? {
            println!("{name}");
        }
        return Ok(());
    }

    let config = args.bench_config(profiles)?;
    if let Some(name) = &args.save_profile {
        save_profile(profiles, name, &config)?;
        info!(profile = %name, "saved profile");
    }

    let mut runner = BenchRunner::new(config)?;
    info!(
        plies = runner.config().pv_positions()?.len() - 1,
        "extracted principal variation"
    );
    println!(
        "Algorithm: {}{}",
        runner.config().algorithm,
        if runner.use_tt() { " w/ transposition table" } else { "" }
    );
    println!("Moving along PV:");
    let summary = runner.run(|report| println!("{report}"));

    if let Some(path) = &args.output {
        summary.save_json(path)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(())
}
