/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Interactive DocPress console, config wizard or one-shot chat answer
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use docpress_app::{AppConfig, AppContext, chatbot};

use crate::cli::notifier::ConsoleNotifier;

const LOG_FILE_NAME: &str = "docpress.log";

#[derive(Parser, Debug)]
#[command(name = "docpress", version, about = "DocPress certificate console")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Load and validate the configuration, then exit
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = "docpress.yaml")]
        output: PathBuf,
    },
    /// Ask the assistant a single question
    Chat {
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Browse DocPress pages from the terminal
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Some(Command::Init { output }) => {
            init_tracing(&args.log_level, None)?;
            return cli::init::run_init(output);
        }
        Some(Command::Chat { message }) => {
            init_tracing(&args.log_level, None)?;
            println!("{}", chatbot::respond(&message.join(" ")));
            return Ok(());
        }
        Some(Command::Interactive) | None => {}
    }

    let config = load_config(args.config_path.as_deref())?;

    if args.dry_run {
        init_tracing(&args.log_level, None)?;
        config.validate().context("validate config")?;
        info!(
            demo = config.wallet.demo,
            rpc_url = config.wallet.rpc_url.as_deref().unwrap_or("-"),
            "dry-run requested; configuration validated"
        );
        return Ok(());
    }

    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("create data dir {}", data_dir.display()))?;
    let _guard = init_tracing(&args.log_level, Some(&data_dir))?;
    info!(data_dir = %data_dir.display(), "starting docpress");

    let ctx = AppContext::from_config(config, Arc::new(ConsoleNotifier)).context("build context")?;
    ctx.start();

    let outcome = cli::interactive::run_interactive(&ctx).await;
    ctx.shutdown().await;
    outcome
}

/// Logs go to stderr, or to a file in `log_dir` so prompts stay readable
fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path).context("load config"),
        None => Ok(AppConfig::default()),
    }
}
