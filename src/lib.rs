//! Robust MDP action core.
//!
//! Sparse transition models and the actions built on top of them, evaluated
//! against a value function the way a Bellman backup would consume them.
//! Robust actions let an adversary ("nature") choose among outcomes, either
//! from a finite list or from an L1 ball around a baseline distribution.
//!
//! ## Core Types
//!
//! - [`Transition`] — sparse successor distribution with rewards
//! - [`OutcomeManager`] — ordered outcome list with a validity flag
//! - [`RegularAction`] — single outcome, no ambiguity
//! - [`DiscreteOutcomeAction`] — nature picks one of finitely many outcomes
//! - [`WeightedOutcomeAction`] — nature picks a distribution over outcomes
//! - [`Action`] — closed sum of the three variants
//!
//! ## Nature
//!
//! - [`Nature`] — strategy contract for constrained adversarial responses
//! - [`WorstCaseL1`] — greedy solver for the L1 ambiguity ball
//! - [`Minimize`] / [`Maximize`] — direction of the adversarial search
//!
//! Every variant implements [`Evaluate`], so a planner never needs to know
//! which kind of action it holds.
mod action;
mod dto;
mod error;
mod nature;
mod transition;

pub use action::*;
pub use dto::*;
pub use error::*;
pub use nature::*;
pub use transition::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Transition probabilities, outcome weights and ambiguity budgets.
pub type Probability = f64;
/// Rewards, state values and action values.
pub type Utility = f64;
/// Multiplicative discount applied to successor values.
pub type Discount = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a random instance.
    fn random() -> Self;
}

// ============================================================================
// NUMERICAL PARAMETERS
// ============================================================================
/// Tolerance for every "sums to one" check on distributions.
pub const TOLERANCE: Probability = 1e-5;
/// Default discount factor for callers that do not discount.
pub const DISCOUNT: Discount = 1.0;

/// Whether the probabilities sum to one within [`TOLERANCE`].
pub fn is_distribution(weights: &[Probability]) -> bool {
    (weights.iter().sum::<Probability>() - 1.0).abs() <= TOLERANCE
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Terminal logging at `level`, plus a per-run file under `logs/` that
/// records at least DEBUG.
#[cfg(feature = "cli")]
pub fn log(level: log::LevelFilter) -> std::io::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let file = simplelog::WriteLogger::new(
        level.max(log::LevelFilter::Debug),
        config.clone(),
        std::fs::File::create(logfile(secs))?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(std::io::Error::other)
}

#[cfg(feature = "cli")]
fn logfile(secs: u64) -> std::path::PathBuf {
    std::path::Path::new("logs").join(format!("{}-{}.log", env!("CARGO_PKG_NAME"), secs))
}
