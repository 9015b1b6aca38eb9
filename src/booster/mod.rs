//! Pack-opening odds: pack generation and Monte-Carlo value estimates.

pub mod simulator;

pub use simulator::{
    open_box, open_pack, run_simulations, simulate_run, target_card_odds, BestPull, Hits,
    PackConfiguration, PullRate, PullRates, Rarity, SimulationParams, SimulationRun,
    SimulationSummary,
};
