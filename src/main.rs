use anyhow::{Context, Result};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warehouse_sim::io::{loader, reporting};
use warehouse_sim::strategy::implementations::RandomActionPolicy;
use warehouse_sim::{DemandGenerator, SimulationConfig, WarehouseSimulation};

const USAGE: &str = "usage: warehouse-sim <products_metadata.csv> <scenarios.csv>";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. INPUTS
    let mut args = env::args().skip(1);
    let catalog_path = args.next().context(USAGE)?;
    let forecast_path = args.next().context(USAGE)?;

    let catalog = loader::load_catalog(&catalog_path)
        .with_context(|| format!("reading catalog {}", catalog_path))?;
    let forecast = loader::load_forecast(&forecast_path)
        .with_context(|| format!("reading forecast {}", forecast_path))?;

    // 2. SETUP
    let config = SimulationConfig::default();
    info!(duration = config.duration, seed = ?config.seed, "configured run");
    let mut demand = DemandGenerator::seeded(config.seed);
    let policy = RandomActionPolicy::new(config.seed);
    let mut sim =
        WarehouseSimulation::new(config, catalog, forecast).with_action_policy(Box::new(policy));

    // 3. RUN
    let outcome = sim.simulate(&mut demand)?;

    // 4. EXPORT
    let output_file = "simulation_results.csv";
    reporting::write_simulation_log(output_file, &outcome.history)?;

    // 5. SUMMARY
    let lost = outcome.lost_sales();
    println!("\n=== Inventory Summary ===");
    for (p, product) in outcome.final_state.products.iter().enumerate() {
        println!(
            "product {:>3}: on hand {:>5} | lost sales {:>5} | forecast {} -> {}",
            p, product.quantity, lost[p], product.forecast_today, product.forecast_tomorrow
        );
    }
    println!(
        "Total on hand: {} | total lost sales: {}",
        outcome
            .final_state
            .quantities()
            .iter()
            .map(|&q| u64::from(q))
            .sum::<u64>(),
        lost.iter().sum::<u64>()
    );

    Ok(())
}
