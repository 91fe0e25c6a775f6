use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use foundry_blocks::BlockRegistry;
use foundry_machine::RecipeList;

mod config;
mod sim;

use config::SimConfig;
use sim::Sim;

#[derive(Parser, Debug)]
#[command(name = "foundry")]
#[command(about = "Headless multiblock crafting simulation")]
struct Args {
    /// Block registry
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,

    /// Recipe list
    #[arg(long, default_value = "assets/recipes.toml")]
    recipes: PathBuf,

    /// Shapes, machine placement, and scripted events
    #[arg(long, default_value = "assets/sim.toml")]
    sim: PathBuf,

    /// Overrides the tick count from the sim config
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    let recipes = RecipeList::load_from_path(&args.recipes)?;
    let cfg = SimConfig::load_from_path(&args.sim)?;
    let ticks = args.ticks.unwrap_or(cfg.ticks);
    let block_count = reg.blocks.len();
    let recipe_count = recipes.len();

    let sim = Sim::new(reg, recipes, &cfg)?;
    log::info!(
        target: "sim",
        "{} block(s), {} recipe(s), {} shape(s), {} hatch(es), {} tick(s)",
        block_count,
        recipe_count,
        sim.machine().shapes().templates().len(),
        sim.world().hatch_count(),
        ticks
    );

    let summary = sim.run(ticks);
    log::info!(
        target: "sim",
        "done: {} tick(s), {} valid, {} working, {} completed, {} activity change(s), shape {:?}, progress {:.2}",
        summary.ticks,
        summary.valid_ticks,
        summary.working_ticks,
        summary.completed,
        summary.activity_changes,
        summary.shape,
        summary.final_progress
    );
    Ok(())
}
