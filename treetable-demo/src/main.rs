mod config;
mod provider;

use std::fs::File;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::time::timeout;
use treetable::{
    ChangeReceiver, ExpandCollapseNode, ExpandState, ExpandTable, SelectOutcome, TableConfig,
};

use crate::config::DemoConfig;
use crate::provider::RandomChildren;

/// Parse `treetable-demo [seed] [taps]` over the defaults.
fn demo_config() -> DemoConfig {
    let mut config = DemoConfig::default();
    let mut args = std::env::args().skip(1);
    if let Some(seed) = args.next().and_then(|arg| arg.parse().ok()) {
        config = config.with_seed(seed);
    }
    if let Some(taps) = args.next().and_then(|arg| arg.parse().ok()) {
        config = config.with_taps(taps);
    }
    config
}

fn print_rows(table: &ExpandTable<u64>) {
    for (row, flat) in table.rows().iter().enumerate() {
        let Some(element) = table.element(row) else {
            continue;
        };
        let marker = match table.state(row) {
            Some(ExpandState::Expand) => '-',
            _ => '+',
        };
        println!("{:>3} {}{} {}", row, "  ".repeat(flat.level), marker, element);
    }
}

/// Drain the change a pending refresh will send, if it comes in time.
async fn settle(changes: &mut ChangeReceiver, config: &DemoConfig) {
    match timeout(config.settle_timeout(), changes.recv()).await {
        Ok(Some(change)) => println!("    refreshed: {}", change),
        Ok(None) => warn!("change channel closed"),
        Err(_) => info!("no refresh within {:?}", config.settle_timeout()),
    }
}

async fn run(config: DemoConfig) {
    let provider = RandomChildren::new(config.seed, config.fetch_delay);
    let (table, mut changes) =
        ExpandTable::with_provider(ExpandCollapseNode::new(0), TableConfig::default(), provider);
    let mut script = StdRng::seed_from_u64(config.seed.wrapping_add(1));

    for tap in 0..=config.taps {
        let row = match tap {
            0 => 0,
            _ => script.random_range(0..table.row_count()),
        };
        let element = table.element(row);

        match table.select_row(row) {
            SelectOutcome::Toggled { state, change } => {
                println!("tap {} on row {} ({:?}): {:?} {}", tap, row, element, state, change);
                // Already printed; keep it out of `settle`.
                if !change.is_empty() {
                    let _ = changes.try_recv();
                }
                if state == ExpandState::Expand {
                    settle(&mut changes, &config).await;
                }
            }
            SelectOutcome::Busy => println!("tap {} on row {}: busy, dropped", tap, row),
            SelectOutcome::NoSuchRow => println!("tap {} on row {}: no such row", tap, row),
        }
        print_rows(&table);
    }
}

#[tokio::main]
async fn main() {
    let config = demo_config();

    let log_file = File::create(&config.log_path).expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");
    info!("demo starting with {:?}", config);

    run(config).await;
}
