use clap::{Parser, Subcommand};

mod rank;
mod recompute;

#[derive(Debug, Parser)]
#[command(name = "canasta")]
#[command(about = "Catalog unit normalization and best-value selection")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database utilities.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Recompute cheapest and best-value winners and write them to groups.
    Recompute {
        /// Restrict the pass to a single group slug.
        #[arg(long)]
        group: Option<String>,
        /// Compute and print results without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the live best-value ordering for one group (read-only).
    Rank {
        /// Group slug to rank.
        #[arg(long)]
        group: String,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database connection.
    Ping,
    /// Run pending schema migrations.
    Migrate,
    /// Load the demo catalog.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("canasta: no command given; try --help");
        return Ok(());
    };

    let config = canasta_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let pool_config = canasta_db::PoolConfig::from_app_config(&config);
    let pool = canasta_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                canasta_db::ping(&pool).await?;
                println!("database connection ok");
            }
            DbCommands::Migrate => {
                let applied = canasta_db::run_migrations(&pool).await?;
                println!("applied {applied} migrations");
            }
            DbCommands::Seed => {
                let count = canasta_db::seed_demo_catalog(&pool).await?;
                println!("seeded {count} demo products");
            }
        },
        Commands::Recompute { group, dry_run } => {
            recompute::run_recompute(&pool, &config, group.as_deref(), dry_run).await?;
        }
        Commands::Rank { group } => {
            rank::run_rank(&pool, &config, &group).await?;
        }
    }

    Ok(())
}
