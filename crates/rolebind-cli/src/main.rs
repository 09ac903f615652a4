//! rolebind CLI - role bindings for projects and packages
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ROLEBIND_*`)
//! 3. Project config (`.rolebind/config.toml` in the `-C` directory)
//! 4. Global config (`~/.rolebind/config.toml`, or `--config`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `ROLEBIND_DEBUG`: Enable debug logging (`true`/`false`)
//! - `ROLEBIND_STATE_FILE`: Relationship snapshot file
//! - `ROLEBIND_DIRECTORY_FILE`: Directory file of known users and groups
//! - `ROLEBIND_LOG_LEVEL`: `tracing` filter directive
//! - `ROLEBIND_PRUNE_LOCKS`: Drop idle pair locks (`true`/`false`)
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | recoverable refusal (unknown principal, relationship already exists) |
//! | 2 | internal error |

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Command, Outcome};
use rolebind_runtime::config::{ConfigError, ConfigLoader, ConfigResolver, RolebindConfig};
use rolebind_runtime::{MemoryDirectory, RoleBindingService, SnapshotFile, StoreSnapshot};
use rolebind_types::ErrorCode;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// rolebind - manage who holds which role on a project or package
#[derive(Parser, Debug)]
#[command(name = "rolebind")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding `.rolebind/config.toml` (defaults to current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    root: Option<PathBuf>,

    /// Global config file (defaults to ~/.rolebind/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Relationship snapshot file (also: ROLEBIND_STATE_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Directory file of known users and groups (also: ROLEBIND_DIRECTORY_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    directory_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    global_config: Option<PathBuf>,
    debug: bool,
    verbose: bool,
    state_file: Option<PathBuf>,
    directory_file: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.root.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            global_config: args.config.clone(),
            debug: args.debug,
            verbose: args.verbose,
            state_file: args.state_file.clone(),
            directory_file: args.directory_file.clone(),
        }
    }

    fn resolve(&self) -> Result<RolebindConfig, ConfigError> {
        let mut loader = ConfigLoader::new().with_project_root(&self.project_root);
        if let Some(ref path) = self.global_config {
            loader = loader.with_global_config(path);
        }

        let mut config = loader.load()?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut RolebindConfig) {
        if self.debug {
            config.debug = true;
        }
        if self.verbose && config.logging.level.is_none() {
            config.logging.level = Some("info".into());
        }
        if let Some(ref p) = self.state_file {
            config.paths.state_file = Some(p.clone());
        }
        if let Some(ref p) = self.directory_file {
            config.paths.directory_file = Some(p.clone());
        }
    }
}

/// Terminal filter: --debug > --verbose > RUST_LOG > config > "warn".
fn log_filter(args: &Args, config: &RolebindConfig) -> EnvFilter {
    if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        config
            .log_directive()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(log_filter(&args, &config)),
        )
        .init();

    info!(path = %resolver.project_root.display(), "Project root");

    let state_path = config.paths.state_file_or_default();
    let directory_path = config.paths.directory_file_or_default();
    debug!(
        state = %state_path.display(),
        directory = %directory_path.display(),
        prune_locks = config.store.prune_locks,
        "Resolved files"
    );

    // Held until exit so concurrent invocations see each other's writes.
    let snapshot_file = SnapshotFile::new(&state_path);
    let _lock = snapshot_file.lock()?;
    let store = snapshot_file.load()?;
    let directory = MemoryDirectory::load(&directory_path)?;
    let service = RoleBindingService::new(Arc::new(store), Arc::new(directory))
        .with_prune_locks(config.store.prune_locks);

    match commands::run(&service, &args.command) {
        Ok(Outcome::Changed(message)) => {
            snapshot_file.save(&StoreSnapshot::capture(service.store().as_ref()))?;
            info!(
                path = %snapshot_file.path().display(),
                bindings = service.store().binding_count(),
                "Snapshot saved"
            );
            println!("{message}");
        }
        Ok(Outcome::Unchanged(message)) => println!("{message}"),
        Ok(Outcome::Tables {
            resource,
            tables,
            json,
        }) => {
            if json {
                let value: serde_json::Map<String, serde_json::Value> = tables
                    .iter()
                    .map(|(kind, rows)| {
                        serde_json::to_value(rows).map(|v| (kind.label().to_string(), v))
                    })
                    .collect::<Result<_, serde_json::Error>>()?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{resource}");
                for (kind, rows) in &tables {
                    print!("{}", commands::render_table(*kind, rows));
                }
            }
        }
        Err(err) => {
            eprintln!("{}", err.notice());
            std::process::exit(if err.is_recoverable() { 1 } else { 2 });
        }
    }

    Ok(())
}
