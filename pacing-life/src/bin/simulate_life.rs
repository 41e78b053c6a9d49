//! Simulate one life from a catalog file and print what happened.

use std::path::PathBuf;

use clap::Parser;
use pacing_core::{EventPayload, PacingConfig};
use pacing_life::logging::init_logging;
use pacing_life::{Catalog, LifeCharacter, Playthrough};

/// Simulate one life and print every event it meets
#[derive(Parser, Debug)]
#[command(name = "simulate_life")]
struct Args {
    /// Content catalog (JSON)
    catalog: PathBuf,

    /// Session seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Years to simulate
    #[arg(long, default_value_t = 80)]
    years: u32,

    /// Pacing configuration (TOML); built-in defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args
        .config
        .as_deref()
        .map(PacingConfig::from_file)
        .transpose()?
        .unwrap_or_default();

    init_logging(&config.general.log_level)?;

    let catalog = Catalog::from_file(&args.catalog)?;
    let mut life = Playthrough::new(&catalog, config, LifeCharacter::newborn("Alex"), args.seed);

    for _ in 0..args.years {
        let events: Vec<_> = life.advance_year().to_vec();
        for event in events {
            let label = match &event.payload {
                EventPayload::Controlled(e) => e.title.clone(),
                EventPayload::Pool(e) => e.title.clone(),
                EventPayload::ArcStage(step) => {
                    format!("{} ({}/{})", step.arc_title, step.stage_index + 1, step.total_stages)
                }
            };
            let resolution = life.resolve(event.id(), 0)?;
            println!(
                "age {:>3}  {:<40} {}",
                life.character().age,
                label,
                match resolution.succeeded {
                    Some(true) => "succeeded",
                    Some(false) => "failed",
                    None => "",
                }
            );
        }
    }

    let counters = life.counters();
    println!("\n{}", counters.summary());
    println!(
        "final: health {:.0} happiness {:.0} stress {:.0} money {:.0}",
        life.character().health,
        life.character().happiness,
        life.character().stress,
        life.character().money
    );
    Ok(())
}
