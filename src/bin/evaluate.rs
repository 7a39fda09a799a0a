//! Evaluate Binary
//!
//! Loads an action from its JSON export and reports its nominal,
//! optimistic and pessimistic values against a value function.
//!
//! Example: evaluate --action a.json --kind weighted --threshold 0.5 --values 1,0,-1

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;
use rmdp::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Regular,
    Discrete,
    Weighted,
}

#[derive(Debug, Parser)]
#[command(about = "Evaluate a robust MDP action against a value function")]
struct Args {
    /// Path to the action JSON
    #[arg(long)]
    action: std::path::PathBuf,
    /// How to interpret the outcomes
    #[arg(long, value_enum, default_value_t = Kind::Discrete)]
    kind: Kind,
    /// State values, comma separated
    #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
    values: Vec<Utility>,
    /// Discount applied to successor values
    #[arg(long, default_value_t = DISCOUNT)]
    discount: Discount,
    /// L1 budget of nature, weighted actions only
    #[arg(long, default_value_t = 0.)]
    threshold: Probability,
    /// Repeat for debug and trace output on the terminal
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
    fn load(&self) -> anyhow::Result<Action> {
        let json = std::fs::read_to_string(&self.action)
            .with_context(|| format!("read {}", self.action.display()))?;
        let api = serde_json::from_str::<ApiAction>(&json).context("parse action json")?;
        Ok(match self.kind {
            Kind::Regular => RegularAction::try_from(api)?.into(),
            Kind::Discrete => DiscreteOutcomeAction::try_from(api)?.into(),
            Kind::Weighted => {
                let mut action = WeightedOutcomeAction::<WorstCaseL1>::try_from(api)?;
                action.set_threshold(self.threshold)?;
                action.into()
            }
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log(args.level()).context("initialize logging")?;
    let action = args.load()?;
    log::info!(
        "loaded {} action with {} outcomes ({})",
        action.kind(),
        action.outcome_count(),
        action
    );
    let ref values = args.values;
    let average = action.average(values, args.discount).context("average")?;
    let (best, maximal) = action.maximal(values, args.discount).context("maximal")?;
    let (worst, minimal) = action.minimal(values, args.discount).context("minimal")?;
    log::debug!("optimistic outcome {:?}", best);
    log::debug!("pessimistic outcome {:?}", worst);
    log::info!("{:<12}{:>12.6}", "average", average);
    log::info!("{:<12}{:>12.6}", "maximal", maximal);
    log::info!("{:<12}{:>12.6}", "minimal", minimal);
    Ok(())
}
