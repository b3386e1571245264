use std::fs;

use dotenv::dotenv;
use navbot::infra::DefaultObserver;
use navbot::sim::{Game, SimConfig, World};
use navbot::state::NavigatorConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("navbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let config = SimConfig::from_env();
    let navigator_config = NavigatorConfig::from_env();

    let world = match &config.map_path {
        Some(path) => {
            tracing::info!("Loading map from {}", path);
            World::parse(&fs::read_to_string(path)?)?
        }
        None => {
            tracing::info!("Generating map with seed {}", config.seed);
            World::generate(&config)
        }
    };
    tracing::info!("Map:\n{}", world);

    let mut game = Game::new(world, config, navigator_config, DefaultObserver);
    let report = game.run()?;
    tracing::info!("Result: {:?}", report);

    Ok(())
}
