// ABOUTME: Launcher for the aerodrome simulation.
// ABOUTME: Loads an optional JSON config, runs the fleet, prints the final report.

use anyhow::Context;

use aerodrome::config::SimConfig;
use aerodrome::sim::Simulation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file '{path}'"))?;
            serde_json::from_str::<SimConfig>(&text)
                .with_context(|| format!("parsing config file '{path}'"))?
        }
        None => SimConfig::default(),
    };

    let report = Simulation::new(config).run().await;

    if report.aborted.is_none() {
        println!("\nSimulation completed successfully!");
    } else {
        println!("\nSimulation aborted!");
    }
    println!(
        "Total simulation time: {:.2} seconds",
        report.elapsed.as_secs_f64()
    );
    println!();
    println!("{}", report.statistics);
    println!();
    println!("{}", report.gate_status);

    for (plane, error) in &report.failures {
        eprintln!("{plane} failed: {error}");
    }
    if let Some(reason) = &report.aborted {
        eprintln!("run aborted: {reason}");
    }
    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
