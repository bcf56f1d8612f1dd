use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use equipviz::client::{self, ClientOptions, RunTarget};
use equipviz::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the upload/summary backend
    Serve {
        #[clap(short, long, default_value = "8000")]
        port: u16,
        #[clap(short, long, default_value = "equipviz.db")]
        database: String,
        #[clap(short, long, default_value = "datasets")]
        storage: String,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Run the desktop client, or open the web UI
    Client {
        #[clap(long, value_enum, ignore_case = true, default_value = "desktop")]
        run: RunTarget,
        /// CSV file to upload and visualize
        #[clap(long)]
        upload: Option<PathBuf>,
        #[clap(long, default_value = "http://127.0.0.1:8000/api")]
        api_url: String,
        #[clap(long, default_value = "http://localhost:3000")]
        web_url: String,
        #[clap(long, default_value = "stored_data")]
        cache_dir: String,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "equipviz.db")]
        database: String,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long, default_value = "equipviz.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            database,
            storage,
            cors_origin,
        } => {
            info!("Starting server on port {}", port);
            server::start_server(port, &database, &storage, cors_origin.as_deref()).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::Client {
            run,
            upload,
            api_url,
            web_url,
            cache_dir,
        } => match run {
            RunTarget::Desktop => {
                client::run_desktop(ClientOptions {
                    api_url,
                    cache_dir,
                    upload,
                })
                .await?;
            }
            RunTarget::Website => {
                client::run_website(&web_url);
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
