use super::*;

/// Nature constrained to an L1 ball around the baseline distribution.
///
/// Solves min { p·z : ‖p − q‖₁ ≤ t, p ≥ 0, Σp = 1 } with [`worst_case_l1`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorstCaseL1;

impl Nature for WorstCaseL1 {
    fn minimize(
        &self,
        values: &[Utility],
        baseline: &[Probability],
        threshold: Probability,
    ) -> Result<Response, MdpError> {
        worst_case_l1(values, baseline, threshold)
    }
}

/// Worst-case distribution over an L1 ball of radius `t` around `q`.
///
/// # Algorithm
///
/// Moving mass δ between two coordinates spends 2δ of the L1 budget, so the
/// optimum shifts δ = min(t/2, 1 − q_best, Σ_{i≠best} q_i) onto the outcome
/// with the smallest value, withdrawing it from the largest values first.
///
/// 1. Stable sort outcomes by value ascending (ties keep the lower index)
/// 2. Add δ to the first outcome in that order
/// 3. Withdraw δ walking the order from the back
///
/// With t = 0 the baseline is returned unchanged; with t ≥ 2 all mass lands
/// on the smallest value. The baseline must sum to one within [`TOLERANCE`].
///
/// # Complexity
///
/// O(n log n) for the sort, O(n) for the greedy pass.
pub fn worst_case_l1(
    z: &[Utility],
    q: &[Probability],
    t: Probability,
) -> Result<Response, MdpError> {
    if z.is_empty() {
        return Err(MdpError::precondition("worst case over an empty outcome set"));
    }
    if z.len() != q.len() {
        return Err(MdpError::invalid(format!(
            "{} values but {} baseline weights",
            z.len(),
            q.len()
        )));
    }
    if t.is_nan() || t < 0. {
        return Err(MdpError::invalid(format!("l1 budget must be non-negative, got {}", t)));
    }
    if q.iter().any(|w| !w.is_finite() || *w < 0.) {
        return Err(MdpError::invalid("baseline weights must be finite and non-negative"));
    }
    if !is_distribution(q) {
        return Err(MdpError::invalid(format!(
            "baseline sums to {} instead of one",
            q.iter().sum::<Probability>()
        )));
    }
    let mut order = (0..z.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| z[a].total_cmp(&z[b]));
    let best = order[0];
    let spare = order.iter().skip(1).map(|&i| q[i]).sum::<Probability>();
    let mut budget = (t / 2.).min(1. - q[best]).min(spare).max(0.);
    if t >= 2. {
        log::debug!("l1 budget {} saturates the simplex", t);
    }
    let mut p = q.to_vec();
    p[best] += budget;
    for &i in order.iter().skip(1).rev() {
        if budget <= 0. {
            break;
        }
        let shift = budget.min(p[i]);
        p[i] -= shift;
        budget -= shift;
    }
    let objective = p.iter().zip(z).map(|(p, z)| p * z).sum();
    Ok(Response {
        distribution: p,
        objective,
    })
}
