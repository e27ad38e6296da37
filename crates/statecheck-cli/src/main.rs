//! Statecheck entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use statecheck_cli::config::{load_engine_config, resolve_config_path, ConfigOverrides};
use statecheck_cli::fetch::DEFAULT_TIMEOUT_MS;
use statecheck_cli::{CheckOptions, Input};

#[derive(Parser)]
#[command(
    name = "statecheck",
    about = "Statecheck: tell whether a web page is stateful or stateless",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// URL of the page to check.
    target: Option<String>,

    /// URL of the page to check (alternative to the positional argument).
    #[arg(long)]
    site: Option<String>,

    /// Classify a local file instead of fetching ("-" reads stdin).
    #[arg(long, short, conflicts_with_all = ["target", "site"])]
    file: Option<String>,

    /// Path to a JSON engine config file.
    /// Also reads from STATECHECK_CONFIG, then ./.statecheck.json.
    #[arg(long)]
    config: Option<String>,

    /// Minimum stateful signals for a stateful verdict.
    #[arg(long)]
    stateful_threshold: Option<usize>,

    /// Minimum stateless signals for a stateless verdict.
    #[arg(long)]
    stateless_threshold: Option<usize>,

    /// Match script keywords (xmlhttprequest, websocket, document.cookie) case-sensitively.
    #[arg(long)]
    case_sensitive: bool,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Classify the response body only, without the Set-Cookie header lines.
    #[arg(long)]
    body_only: bool,

    /// Output the full analysis as JSON.
    #[arg(long)]
    json: bool,

    /// Print per-detector results under the verdict.
    #[arg(long)]
    explain: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable debug logging, including every detector result.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "statecheck",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let input = Input::from_args(cli.target, cli.site, cli.file)?;

    let config_path = resolve_config_path(cli.config.as_deref());
    let overrides = ConfigOverrides {
        stateful_threshold: cli.stateful_threshold,
        stateless_threshold: cli.stateless_threshold,
        case_sensitive: cli.case_sensitive,
    };
    let engine = load_engine_config(config_path.as_deref(), &overrides)?;

    let opts = CheckOptions {
        input,
        engine,
        timeout_ms: cli.timeout,
        body_only: cli.body_only,
        json: cli.json,
        explain: cli.explain,
    };

    let rendered = statecheck_cli::run(&opts).await?;
    println!("{rendered}");
    Ok(())
}
