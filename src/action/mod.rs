//! Actions and the evaluation contract a planner consumes.
//!
//! # Module Structure
//!
//! - `regular` — single outcome, no ambiguity
//! - `outcomes` — outcome list shared by the robust actions
//! - `discrete` — nature picks one outcome
//! - `weighted` — nature picks a distribution over outcomes
//! - `variant` — closed sum of the above

mod discrete;
mod outcomes;
mod regular;
mod variant;
mod weighted;

pub use discrete::*;
pub use outcomes::*;
pub use regular::*;
pub use variant::*;
pub use weighted::*;

use crate::*;

/// Uniform evaluation contract shared by every action variant.
///
/// A planner performing a Bellman backup calls one of these against the
/// current value function and never needs to know which variant it holds.
/// Evaluation takes `&self` only, so a built model can be read from any
/// number of threads at once.
///
/// Invalid actions still evaluate; excluding them from any search over
/// actions is the planner's job, see [`is_valid`](Evaluate::is_valid).
///
/// # Associated Types
///
/// - `Outcome` — what nature selects: nothing meaningful for regular
///   actions, an index for discrete outcomes, a distribution for weighted ones
pub trait Evaluate {
    type Outcome;

    /// Nominal value, with no adversarial choice.
    fn value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError>;
    /// Value under the baseline weighting of outcomes.
    fn average(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError>;
    /// Outcome chosen by an optimistic nature, with its value.
    fn maximal(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
    ) -> Result<(Self::Outcome, Utility), MdpError>;
    /// Outcome chosen by a pessimistic nature, with its value.
    fn minimal(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
    ) -> Result<(Self::Outcome, Utility), MdpError>;
    /// Value when the outcome is fixed by the caller.
    fn fixed(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
        outcome: &Self::Outcome,
    ) -> Result<Utility, MdpError>;

    /// Whether a planner may take this action.
    fn is_valid(&self) -> bool;
    fn set_validity(&mut self, valid: bool);

    fn outcomes(&self) -> &[Transition];
    fn outcome_count(&self) -> usize {
        self.outcomes().len()
    }
    /// Whether the outcome identifier fits this action.
    fn is_outcome_correct(&self, outcome: &Self::Outcome) -> bool;
    /// Expected immediate reward under the given outcome.
    fn mean_reward(&self, outcome: &Self::Outcome) -> Result<Utility, MdpError>;
    /// Expected successor distribution under the given outcome.
    fn mean_transition(&self, outcome: &Self::Outcome) -> Result<Transition, MdpError>;
    /// Normalizes the probabilities of every outcome.
    fn normalize(&mut self) -> Result<(), MdpError>;

    /// JSON export, `{"actionid": .., "outcomes": [..]}`.
    fn to_json(&self, actionid: Option<usize>) -> String {
        ApiAction::from_outcomes(actionid, self.outcomes()).to_string()
    }
}
