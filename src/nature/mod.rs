//! Constrained adversarial responses over outcome distributions.

mod direction;
mod l1;

pub use direction::*;
pub use l1::*;

use crate::*;

/// Outcome distribution chosen by nature, with its objective Σ p_i · z_i.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub distribution: Vec<Probability>,
    pub objective: Utility,
}

/// Constraint set on nature's choice of outcome distribution.
///
/// Nature picks a distribution p over outcomes inside an ambiguity set
/// centered at a baseline q and bounded by a threshold t. Implementations
/// only solve the minimizing problem; the direction-generic
/// [`respond`](Nature::respond) derives the maximizing one by negating the
/// values, so callers always state which sense they want in the type.
///
/// # Required Methods
///
/// - [`minimize`](Nature::minimize) — min Σ p_i · z_i over the ambiguity set
///
/// # Implementations
///
/// - [`WorstCaseL1`] — ‖p − q‖₁ ≤ t
pub trait Nature {
    /// Distribution minimizing Σ p_i · z_i within the ambiguity set.
    fn minimize(
        &self,
        values: &[Utility],
        baseline: &[Probability],
        threshold: Probability,
    ) -> Result<Response, MdpError>;
    /// Distribution optimizing Σ p_i · z_i in the direction `D`.
    fn respond<D>(
        &self,
        values: &[Utility],
        baseline: &[Probability],
        threshold: Probability,
    ) -> Result<Response, MdpError>
    where
        D: Direction,
    {
        let oriented = values.iter().copied().map(D::orient).collect::<Vec<_>>();
        let response = self.minimize(&oriented, baseline, threshold)?;
        Ok(Response {
            objective: D::orient(response.objective),
            distribution: response.distribution,
        })
    }
}
