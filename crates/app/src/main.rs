//! insight CLI: browse tests and results, and take a timed test in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::AppContext;

#[derive(Parser)]
#[command(name = "insight", version, about = "Timed assessments and result analytics")]
struct Cli {
    /// Directory holding tests.json and responses.json
    #[arg(long, env = "INSIGHT_DATA_DIR", default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Signed-in learner
    #[arg(long, env = "INSIGHT_USER_EMAIL", global = true)]
    email: Option<String>,

    #[arg(long, env = "INSIGHT_USER_NAME", global = true)]
    name: Option<String>,

    #[arg(long, env = "INSIGHT_DEPARTMENT", global = true)]
    department: Option<String>,

    /// Seconds the submitted confirmation stays up
    #[arg(long, env = "INSIGHT_REDIRECT_DELAY_SECS", default_value = "3", global = true)]
    redirect_delay_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Search, sort and filter shared by both catalogs.
#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    /// Case-insensitive match on title, subject or instructor
    #[arg(long, default_value = "")]
    search: String,

    /// title | marks | difficulty | schedule (tests) / submitted_at (results)
    #[arg(long, default_value = "")]
    sort: String,

    /// all | easy | medium | hard
    #[arg(long, default_value = "all")]
    difficulty: String,

    /// Print view models as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming tests
    Tests(CatalogArgs),
    /// List graded results with the average score
    Results(CatalogArgs),
    /// Show one graded result
    Result {
        id: String,

        /// Write the text report into this directory
        #[arg(long)]
        report: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Take a test; commands are read from stdin
    Take { test_id: String },
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::from_options(
        cli.data_dir,
        cli.email,
        cli.name,
        cli.department,
        cli.redirect_delay_secs,
    )?;

    match cli.command {
        Commands::Tests(args) => commands::catalog::list_tests(&ctx, &args.query()?, args.json).await,
        Commands::Results(args) => {
            commands::catalog::list_results(&ctx, &args.query()?, args.json).await
        }
        Commands::Result { id, report, json } => {
            commands::catalog::show_result(&ctx, &id, report, json).await
        }
        Commands::Take { test_id } => {
            commands::take::execute(&ctx, &test_id, commands::take::stdin_lines()).await
        }
    }
}

impl CatalogArgs {
    fn query(&self) -> Result<services::CatalogQuery, Box<dyn std::error::Error>> {
        Ok(services::CatalogQuery {
            search: self.search.clone(),
            sort: self.sort.parse()?,
            filter: self.difficulty.parse()?,
        })
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        process::exit(2);
    }
}
