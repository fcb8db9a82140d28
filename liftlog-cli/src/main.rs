mod runtime;

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::info;

use liftlog::db;
use liftlog::identity::SqliteIdentity;
use liftlog_server::ServerConfig;
use liftlog_server::config::{DEFAULT_DATABASE_URL, DEFAULT_LISTEN};

#[derive(Parser, Debug)]
#[command(version, about = "liftlog - workout log server", long_about = None)]
struct Args {
    /// SQLite database location
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// off, error, warn, info, debug or trace
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, env = "LISTEN", default_value = DEFAULT_LISTEN)]
        listen: SocketAddr,
        /// Defaults to the number of CPUs
        #[arg(long, env = "WORKER_THREADS")]
        worker_threads: Option<usize>,
    },
    /// Create the database and apply pending migrations
    Migrate,
    /// Fill an empty catalog with demo exercises, plans and sessions
    Seed,
    /// Delete every row from every table
    Reset,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Register a user for HTTP Basic authentication
    Add {
        username: String,
        #[arg(short, long, env = "LIFTLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let level = liftlog::logging::parse_level(&args.log_level)?;
    liftlog::logging::init_logger(level);

    let worker_threads = match &args.command {
        Commands::Serve { worker_threads, .. } => *worker_threads,
        _ => Some(2),
    };
    let runtime = runtime::build(worker_threads)?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let database_url = args.database_url;

    match args.command {
        Commands::Serve { listen, .. } => {
            liftlog_server::serve(ServerConfig {
                listen,
                database_url,
            })
            .await?;
        }
        Commands::Migrate => {
            db::connect(&database_url).await?;
            info!("database at {} is up to date", database_url);
        }
        Commands::Seed => {
            let pool = db::connect(&database_url).await?;
            if liftlog::seed::seed_catalog(&pool).await? {
                println!("Seeded demo catalog");
            } else {
                println!("Catalog already has exercises, nothing seeded");
            }
        }
        Commands::Reset => {
            let pool = db::connect(&database_url).await?;
            db::clear_all_tables(&pool).await?;
            println!("Cleared all tables");
        }
        Commands::User {
            command: UserCommands::Add { username, password },
        } => {
            let pool = db::connect(&database_url).await?;
            let user = SqliteIdentity::new(pool).register(&username, &password).await?;
            println!("Added user {} ({})", user.username, user.id);
        }
    }
    Ok(())
}
