use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "punchmap-cli")]
#[command(about = "Punchmap operational command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one incremental discovery pass around a center point.
    Discover {
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        longitude: f64,
        #[arg(long)]
        radius_km: f64,
    },
    /// Re-queue previously-enriched stores that are missing state/country
    /// codes; the background worker re-processes them over time.
    Backfill,
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = punchmap_core::load_app_config()?;
    let pool_config = punchmap_db::PoolConfig::from_app_config(&config);
    let pool = punchmap_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Discover {
            latitude,
            longitude,
            radius_km,
        } => {
            let provider = punchmap_overpass::OverpassClient::with_base_url(
                config.overpass_timeout_secs,
                &config.overpass_base_url,
            )?;
            let stats =
                punchmap_search::discover(&pool, &provider, latitude, longitude, radius_km)
                    .await?;
            println!(
                "discovery complete: {} boxes queried ({} failed), {} POIs seen, {} stores added",
                stats.boxes_queried, stats.boxes_failed, stats.pois_found, stats.stores_added
            );
        }
        Commands::Backfill => {
            let reset = punchmap_db::reset_enrichment_for_backfill(&pool).await?;
            if reset == 0 {
                println!("no stores need backfilling");
            } else {
                println!(
                    "{reset} stores reset to 'unchanged'; the enrichment worker will \
                     re-process them at its usual pace"
                );
            }
        }
        Commands::Migrate => {
            let applied = punchmap_db::run_migrations(&pool).await?;
            println!("{applied} migrations applied");
        }
    }

    Ok(())
}
