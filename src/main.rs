//! Hotel Room-Rate Recommendation Engine
//!
//! CLI for scoring date ranges and training the pricing model.

use clap::{Parser, Subcommand};
use ratecast::{
    client::{PerplexityClient, SearchProvider},
    config::{Config, PerplexityConfig},
    engine::{EngineOptions, PricingEngine},
    ml::PriceModel,
    types::{PricingItem, RunMetadata, PricingRequest},
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ratecast")]
#[command(about = "Daily room-rate recommendations from heuristics, events and ML")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "ratecast.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a date range and export the recommendations as CSV
    Run {
        /// First date to score (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last date to score, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "1")]
        hotel_id: i64,
        #[arg(long, default_value = "DLX-QUEEN")]
        room_type: String,
        /// "City, Country" for the events search
        #[arg(long, default_value = "Dublin, Ireland")]
        location: String,
        /// Override the configured data directory
        #[arg(long)]
        data_dir: Option<String>,
        /// Override the configured cache directory
        #[arg(long)]
        cache_dir: Option<String>,
        /// Override the configured output directory
        #[arg(long)]
        out_dir: Option<String>,
        /// Disable external event search (cache/fallback only)
        #[arg(long)]
        disable_events: bool,
        /// Max results to request from the search provider
        #[arg(long)]
        max_search_results: Option<usize>,
        /// Ignore the events cache and refresh
        #[arg(long)]
        force_refresh_events: bool,
        /// Disable ML blending (heuristics only)
        #[arg(long)]
        disable_ml: bool,
        /// Weight of the ML prediction in the ensemble [0..1]
        #[arg(long)]
        ml_weight: Option<f64>,
        /// Rolling median window size for smoothing (>= 1)
        #[arg(long)]
        smoothing_window: Option<usize>,
    },
    /// Train the pricing model from the data directory
    Train {
        #[arg(long)]
        data_dir: Option<String>,
        #[arg(long)]
        cache_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry PERPLEXITY_API_KEY
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            from,
            to,
            hotel_id,
            room_type,
            location,
            data_dir,
            cache_dir,
            out_dir,
            disable_events,
            max_search_results,
            force_refresh_events,
            disable_ml,
            ml_weight,
            smoothing_window,
        } => {
            let data_dir = expand_dir(data_dir.as_deref().unwrap_or(&config.engine.data_dir));
            let cache_dir = expand_dir(cache_dir.as_deref().unwrap_or(&config.engine.cache_dir));
            let out_dir = expand_dir(out_dir.as_deref().unwrap_or(&config.engine.out_dir));

            let options = EngineOptions {
                disable_external: disable_events,
                max_search_results: max_search_results
                    .unwrap_or(config.engine.max_search_results),
                force_refresh: force_refresh_events,
                disable_ml,
                ml_weight: ml_weight.unwrap_or(config.engine.ml_weight).clamp(0.0, 1.0),
                smoothing_window: smoothing_window
                    .unwrap_or(config.engine.smoothing_window)
                    .max(1),
            };

            let provider = build_provider(config.perplexity.as_ref());
            let model = if disable_ml {
                None
            } else {
                PriceModel::load(&cache_dir)
            };
            let engine = PricingEngine::new(&data_dir, &cache_dir, provider).with_model(model);

            let request = PricingRequest {
                hotel_id,
                room_type_code: room_type,
                from_date: from,
                to_date: to,
                location: Some(location),
            };
            let (items, meta) = engine.score_dates(&request, &options).await?;

            print_preview(&items, &meta);
            let out_path = write_csv(&out_dir, &items)?;
            println!("[ratecast] wrote CSV -> {}", out_path.display());
            Ok(())
        }
        Commands::Train { data_dir, cache_dir } => {
            let data_dir = expand_dir(data_dir.as_deref().unwrap_or(&config.engine.data_dir));
            let cache_dir = expand_dir(cache_dir.as_deref().unwrap_or(&config.engine.cache_dir));
            match PriceModel::train_from_data_dir(&data_dir, &cache_dir) {
                Some(model) => {
                    println!(
                        "[ratecast] trained model {} on {} samples (validation MAE {:?}) -> {}",
                        model.version(),
                        model.n_samples(),
                        model.validation_mae(),
                        cache_dir.display()
                    );
                }
                None => {
                    println!("[ratecast] training failed or no suitable data found");
                }
            }
            Ok(())
        }
    }
}

fn expand_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn build_provider(config: Option<&PerplexityConfig>) -> Option<Box<dyn SearchProvider>> {
    let from_env = std::env::var("PERPLEXITY_API_KEY").ok().filter(|k| !k.is_empty());
    let resolved = match (config, from_env) {
        (Some(cfg), _) if !cfg.api_key.is_empty() => Some(cfg.clone()),
        (Some(cfg), Some(key)) => Some(PerplexityConfig {
            api_key: key,
            base_url: cfg.base_url.clone(),
        }),
        (None, Some(key)) => Some(PerplexityConfig {
            api_key: key,
            base_url: "https://api.perplexity.ai".to_string(),
        }),
        _ => None,
    };
    match resolved {
        Some(cfg) => match PerplexityClient::new(&cfg) {
            Ok(client) => Some(Box::new(client)),
            Err(e) => {
                tracing::warn!("Search provider unavailable, events disabled: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("No Perplexity API key configured, events search disabled");
            None
        }
    }
}

fn print_preview(items: &[PricingItem], meta: &RunMetadata) {
    println!(
        "[ratecast] scored {} days (hotel_id={} room_type={} location={})",
        meta.num_items,
        meta.hotel_id,
        meta.room_type_code,
        meta.location.as_deref().unwrap_or("-")
    );
    for item in items.iter().take(5) {
        println!(
            "  {}  rec={:.2}  min={:.2}  max={:.2}  drivers={}",
            item.date,
            item.price_rec,
            item.price_min,
            item.price_max,
            item.drivers.join(", ")
        );
    }
    if items.len() > 5 {
        println!("  ...");
    }
    if !meta.sources.is_empty() {
        println!("[ratecast] event sources ({}):", meta.sources.len());
        for source in meta.sources.iter().take(5) {
            println!("  - {} :: {}", source.title, source.url);
        }
        if meta.sources.len() > 5 {
            println!("  ...");
        }
    }
}

fn write_csv(out_dir: &Path, items: &[PricingItem]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let out_path = out_dir.join(format!("pricing_{timestamp}.csv"));
    let mut writer = csv::Writer::from_path(&out_path)?;
    writer.write_record(["date", "room_type_code", "price_rec", "price_min", "price_max", "drivers"])?;
    for item in items {
        writer.write_record(&[
            item.date.clone(),
            item.room_type_code.clone(),
            format!("{:.2}", item.price_rec),
            format!("{:.2}", item.price_min),
            format!("{:.2}", item.price_max),
            item.drivers.join("|"),
        ])?;
    }
    writer.flush()?;
    Ok(out_path)
}
