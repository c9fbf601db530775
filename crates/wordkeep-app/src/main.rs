use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tracing::info;

use wordkeep_app::args::CliArgs;
use wordkeep_app::{game_loop, logging};
use wordkeep_core::config::DifficultyTable;
use wordkeep_sim::engine::SimConfig;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    if args.show_help {
        CliArgs::print_help();
        return Ok(());
    }

    logging::init_logging(&args.log_path)?;

    let mut config = SimConfig {
        seed: args.seed.unwrap_or_else(clock_seed),
        ..Default::default()
    };
    if let Some(path) = &args.levels_path {
        config.difficulty = DifficultyTable::from_path(path)
            .with_context(|| format!("loading difficulty table {}", path.display()))?;
    }

    info!(
        seed = config.seed,
        levels = config.difficulty.last_level(),
        "starting wordkeep"
    );
    game_loop::run(config)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}
