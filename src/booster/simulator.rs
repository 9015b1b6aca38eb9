//! Pack-opening simulator.
//!
//! Two pieces: a slot-based pack generator (guaranteed common/uncommon/rare
//! slots plus chance-gated hits) and a Monte-Carlo calculator that opens
//! many boxes against a pull-rate table to estimate value and ROI. All
//! randomness comes from a caller-supplied RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, Result};

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    ReverseHolo,
    UltraRare,
    SecretRare,
}

impl Rarity {
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::ReverseHolo => "reverseHolo",
            Rarity::UltraRare => "ultraRare",
            Rarity::SecretRare => "secretRare",
        }
    }
}

// ---------------------------------------------------------------------------
// Pack generation
// ---------------------------------------------------------------------------

/// Slot layout of a booster pack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackConfiguration {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    /// Probability of one extra ultra rare.
    pub ultra_rare_chance: f64,
    /// Probability of one extra secret rare.
    pub secret_chance: f64,
}

impl PackConfiguration {
    pub fn standard() -> Self {
        Self {
            common: 6,
            uncommon: 3,
            rare: 1,
            ultra_rare_chance: 0.2,
            secret_chance: 0.05,
        }
    }

    pub fn premium() -> Self {
        Self {
            common: 5,
            uncommon: 3,
            rare: 2,
            ultra_rare_chance: 0.4,
            secret_chance: 0.1,
        }
    }

    /// Look up a named preset (`"standard"` or `"premium"`).
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "premium" => Ok(Self::premium()),
            other => Err(PricerError::NotFound(format!("no pack preset named '{}'", other))),
        }
    }

    pub fn guaranteed(&self) -> u32 {
        self.common + self.uncommon + self.rare
    }
}

/// Open one pack: the guaranteed slots, then each chance-gated hit, shuffled.
pub fn open_pack<R: Rng>(config: &PackConfiguration, rng: &mut R) -> Vec<Rarity> {
    let mut pack = Vec::with_capacity(config.guaranteed() as usize + 2);
    pack.extend(std::iter::repeat(Rarity::Common).take(config.common as usize));
    pack.extend(std::iter::repeat(Rarity::Uncommon).take(config.uncommon as usize));
    pack.extend(std::iter::repeat(Rarity::Rare).take(config.rare as usize));

    if rng.gen::<f64>() < config.ultra_rare_chance {
        pack.push(Rarity::UltraRare);
    }
    if rng.gen::<f64>() < config.secret_chance {
        pack.push(Rarity::SecretRare);
    }

    pack.shuffle(rng);
    pack
}

/// Open `packs` packs in a row.
pub fn open_box<R: Rng>(
    config: &PackConfiguration,
    packs: usize,
    rng: &mut R,
) -> Vec<Vec<Rarity>> {
    (0..packs).map(|_| open_pack(config, rng)).collect()
}

// ---------------------------------------------------------------------------
// Pull rates
// ---------------------------------------------------------------------------

/// Per-pack hit chance and value range of one rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullRate {
    pub rarity: Rarity,
    pub chance: f64,
    pub average_value: f64,
    /// Listed top value of the tier; simulated pulls are not clamped to it.
    pub max_value: f64,
}

/// Ordered table of pull rates; evaluated top to bottom for every pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRates {
    pub tiers: Vec<PullRate>,
}

impl Default for PullRates {
    fn default() -> Self {
        let tier = |rarity, chance, average_value, max_value| PullRate {
            rarity,
            chance,
            average_value,
            max_value,
        };
        Self {
            tiers: vec![
                tier(Rarity::SecretRare, 0.02, 80.0, 300.0),
                tier(Rarity::UltraRare, 0.10, 25.0, 100.0),
                tier(Rarity::Rare, 1.0, 3.0, 15.0),
                tier(Rarity::ReverseHolo, 1.0, 1.0, 5.0),
                tier(Rarity::Common, 1.0, 0.25, 2.0),
            ],
        }
    }
}

impl PullRates {
    pub fn get(&self, rarity: Rarity) -> Option<&PullRate> {
        self.tiers.iter().find(|t| t.rarity == rarity)
    }
}

// ---------------------------------------------------------------------------
// Monte-Carlo simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub pack_price: f64,
    pub packs: u32,
    pub runs: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            pack_price: 4.99,
            packs: 36,
            runs: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hits {
    pub secret_rare: u32,
    pub ultra_rare: u32,
    pub rare: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestPull {
    pub rarity: Rarity,
    pub value: f64,
    /// 1-based pack number within the run.
    pub pack_number: u32,
}

/// Outcome of opening one box/case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub packs_opened: u32,
    pub total_spent: f64,
    pub total_value: f64,
    /// Percent return: `(value − spent) / spent × 100`.
    pub roi: f64,
    pub hits: Hits,
    pub best_pull: Option<BestPull>,
}

/// Averages over many runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub runs: usize,
    pub avg_roi: f64,
    pub profitable_percentage: f64,
    pub avg_secret_rares: f64,
    pub avg_ultra_rares: f64,
    pub avg_value: f64,
}

impl SimulationSummary {
    /// Summarize a batch of runs; `None` when there are none.
    pub fn from_runs(runs: &[SimulationRun]) -> Option<Self> {
        if runs.is_empty() {
            return None;
        }
        let n = runs.len() as f64;
        let mean = |f: &dyn Fn(&SimulationRun) -> f64| runs.iter().map(f).sum::<f64>() / n;
        let profitable = runs.iter().filter(|r| r.roi > 0.0).count() as f64;

        Some(Self {
            runs: runs.len(),
            avg_roi: mean(&|r| r.roi),
            profitable_percentage: profitable / n * 100.0,
            avg_secret_rares: mean(&|r| r.hits.secret_rare as f64),
            avg_ultra_rares: mean(&|r| r.hits.ultra_rare as f64),
            avg_value: mean(&|r| r.total_value),
        })
    }
}

/// Open `params.packs` packs once against the pull-rate table.
pub fn simulate_run<R: Rng>(
    params: &SimulationParams,
    rates: &PullRates,
    rng: &mut R,
) -> SimulationRun {
    let total_spent = params.packs as f64 * params.pack_price;
    let mut total_value = 0.0;
    let mut hits = Hits::default();
    let mut best_pull: Option<BestPull> = None;

    for pack in 1..=params.packs {
        for tier in &rates.tiers {
            if rng.gen::<f64>() > tier.chance {
                continue;
            }
            let value = tier.average_value * (0.5 + rng.gen::<f64>());
            total_value += value;

            match tier.rarity {
                Rarity::SecretRare => hits.secret_rare += 1,
                Rarity::UltraRare => hits.ultra_rare += 1,
                Rarity::Rare => hits.rare += 1,
                _ => {}
            }

            if best_pull.map_or(true, |b| value > b.value) {
                best_pull = Some(BestPull {
                    rarity: tier.rarity,
                    value,
                    pack_number: pack,
                });
            }
        }
    }

    let roi = if total_spent > 0.0 {
        (total_value - total_spent) / total_spent * 100.0
    } else {
        0.0
    };

    SimulationRun {
        packs_opened: params.packs,
        total_spent,
        total_value,
        roi,
        hits,
        best_pull,
    }
}

/// Repeat [`simulate_run`] `params.runs` times.
pub fn run_simulations<R: Rng>(
    params: &SimulationParams,
    rates: &PullRates,
    rng: &mut R,
) -> Result<Vec<SimulationRun>> {
    if params.packs == 0 {
        return Err(PricerError::InvalidArgument("packs must be at least 1".to_string()));
    }
    if !(params.pack_price.is_finite() && params.pack_price > 0.0) {
        return Err(PricerError::InvalidArgument(format!(
            "pack price must be positive, got {}",
            params.pack_price
        )));
    }
    let runs = (0..params.runs)
        .map(|_| simulate_run(params, rates, rng))
        .collect();
    Ok(runs)
}

/// Percent chance of pulling one specific card within `packs` packs.
///
/// The per-pack chance is `pull_rate × copies / set_size`; the result is
/// `1 − (1 − p)^packs`, scaled to a percentage.
pub fn target_card_odds(pull_rate: f64, copies: u32, set_size: u32, packs: u32) -> Result<f64> {
    if set_size == 0 {
        return Err(PricerError::InvalidArgument("set size must be at least 1".to_string()));
    }
    let single = (pull_rate * copies as f64 / set_size as f64).clamp(0.0, 1.0);
    Ok((1.0 - (1.0 - single).powf(packs as f64)) * 100.0)
}
