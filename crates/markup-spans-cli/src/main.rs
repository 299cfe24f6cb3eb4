use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use markup_spans_config::{Config, generate_baselines_from_env};
use markup_spans_engine::{BaselineOutcome, BaselineVerifier, serialize};
use markup_spans_syntax::SyntaxTreeNode;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_BASELINES_PATH: &str = "baselines";

#[derive(Parser)]
#[command(name = "markup-spans")]
#[command(about = "Classify markup syntax trees and check them against baselines")]
struct Args {
    /// Config file to read instead of ~/.config/markup-spans/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the classified spans of a JSON syntax tree
    Classify {
        /// Path to the tree JSON file
        tree: PathBuf,
    },
    /// Compare every tree matching a glob pattern with its baseline
    Verify {
        /// Glob pattern selecting tree JSON files
        pattern: String,

        /// Directory holding .cspans.txt baselines
        #[arg(long)]
        baselines: Option<PathBuf>,

        /// Rewrite baselines instead of comparing
        #[arg(long)]
        generate: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Classify { tree } => {
            let root = load_tree(&tree)?;
            let output = serialize(&root)
                .with_context(|| format!("Failed to classify {}", tree.display()))?;
            print!("{output}");
        }
        Command::Verify {
            pattern,
            baselines,
            generate,
        } => {
            let config = load_config(args.config.as_deref())?;
            let verifier = verifier_for(baselines, generate, config);
            let failures = verify_all(&pattern, &verifier)?;
            if failures > 0 {
                eprintln!("{failures} tree(s) failed verification");
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// A config file named on the command line must exist; the default one may not.
fn load_config(explicit: Option<&Path>) -> Result<Option<Config>> {
    match explicit {
        Some(config_path) => {
            log::debug!("Config path: {}", config_path.display());
            if !config_path.exists() {
                bail!("Config file not found at {}", config_path.display());
            }
            Ok(Config::load_from_path(config_path)?)
        }
        None => {
            log::debug!("Config path: {}", Config::config_path().display());
            Ok(Config::load()?)
        }
    }
}

/// Flag, then config file, then `./baselines`.
fn verifier_for(
    baselines: Option<PathBuf>,
    generate_flag: bool,
    config: Option<Config>,
) -> BaselineVerifier {
    let (config_path, config_generate) = match config {
        Some(config) => (Some(config.baselines_path), config.generate_baselines),
        None => (None, generate_baselines_from_env().unwrap_or(false)),
    };
    let baselines_path = baselines
        .or(config_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINES_PATH));

    log::info!("Using baselines from {}", baselines_path.display());
    BaselineVerifier::new(baselines_path).generate(generate_flag || config_generate)
}

fn verify_all(pattern: &str, verifier: &BaselineVerifier) -> Result<usize> {
    let paths = glob::glob(pattern).with_context(|| format!("Invalid pattern {pattern}"))?;

    let mut checked = 0;
    let mut failures = 0;
    for entry in paths {
        let path = entry?;
        checked += 1;
        match verify_one(&path, verifier) {
            Ok(BaselineOutcome::Matched) => println!("ok      {}", path.display()),
            Ok(BaselineOutcome::Written) => println!("written {}", path.display()),
            Err(error) => {
                failures += 1;
                println!("FAILED  {}", path.display());
                eprintln!("{error:#}");
            }
        }
    }

    if checked == 0 {
        bail!("No trees match {pattern}");
    }
    Ok(failures)
}

fn verify_one(path: &Path, verifier: &BaselineVerifier) -> Result<BaselineOutcome> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Cannot name a baseline after {}", path.display()))?;
    let root = load_tree(path)?;
    Ok(verifier.verify(name, &root)?)
}

fn load_tree(path: &Path) -> Result<SyntaxTreeNode> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse tree {}", path.display()))
}
