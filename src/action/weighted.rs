use super::*;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Deref;

/// Robust action whose nature picks a distribution over outcomes.
///
/// The ambiguity set is parametrized by a baseline (nominal) distribution d
/// over outcomes and a threshold t. With the default [`WorstCaseL1`] nature
/// the pessimistic value is
///
/// min { u·z : ‖u − d‖₁ ≤ t }
///
/// where z holds the values of the individual outcomes. Any other
/// [`Nature`] can be injected through the type parameter.
///
/// # Invariants
///
/// - the baseline has exactly one weight per outcome, at all times
/// - outcomes are only added through methods that also extend the baseline
///
/// The baseline is uniform unless set otherwise; see
/// [`create_outcome`](WeightedOutcomeAction::create_outcome).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedOutcomeAction<N = WorstCaseL1>
where
    N: Nature,
{
    outcomes: OutcomeManager,
    distribution: Vec<Probability>,
    threshold: Probability,
    nature: N,
}

impl<N> WeightedOutcomeAction<N>
where
    N: Nature,
{
    /// Empty action with the given nature and a zero threshold.
    pub fn new(nature: N) -> Self {
        Self::with_outcomes(Vec::new(), nature)
    }
    /// Action over the given outcomes with a uniform baseline.
    pub fn with_outcomes(outcomes: Vec<Transition>, nature: N) -> Self {
        let mut action = Self {
            outcomes: OutcomeManager::from(outcomes),
            distribution: Vec::new(),
            threshold: 0.,
            nature,
        };
        action.uniform_distribution();
        action
    }

    /// Outcome at `id`, creating it and any missing outcomes before it.
    ///
    /// New outcomes get the weight of a uniform prior over the enlarged set,
    /// u = 1/(id+1), and the m existing weights are rescaled to sum to m·u:
    ///
    /// d_i' = d_i · m·u / Σ d
    ///
    /// so the baseline sums to one afterwards. When the existing weights sum
    /// to zero the baseline becomes uniform. The new baseline is computed
    /// aside and committed only if every weight is finite.
    ///
    /// An existing outcome is returned unchanged.
    pub fn create_outcome(&mut self, id: usize) -> Result<&mut Transition, MdpError> {
        let m = self.outcomes.outcome_count();
        if id < m {
            return self.outcomes.outcome_mut(id);
        }
        let n = id + 1;
        let u = 1. / n as Probability;
        let mass = self.distribution.iter().sum::<Probability>();
        if !mass.is_finite() {
            return Err(MdpError::domain(format!(
                "baseline mass over {} outcomes is not finite",
                m
            )));
        }
        let scratch = if mass == 0. {
            log::debug!("baseline has no mass, resetting to uniform over {} outcomes", n);
            vec![u; n]
        } else {
            let scale = m as Probability * u / mass;
            self.distribution
                .iter()
                .map(|w| w * scale)
                .chain(std::iter::repeat_n(u, n - m))
                .collect()
        };
        if scratch.iter().any(|w| !w.is_finite()) {
            return Err(MdpError::domain(format!(
                "rebalancing baseline with mass {} over {} outcomes is not finite",
                mass, n
            )));
        }
        self.distribution = scratch;
        Ok(self.outcomes.create_outcome(id))
    }
    /// Outcome at `id` with its nominal weight overwritten.
    ///
    /// Missing outcomes before `id` get weight zero. Nothing is rescaled, so
    /// the baseline may no longer sum to one; restore it with
    /// [`normalize_distribution`](WeightedOutcomeAction::normalize_distribution)
    /// before evaluating.
    pub fn create_outcome_weighted(&mut self, id: usize, weight: Probability) -> Result<&mut Transition, MdpError> {
        check_weight(weight)?;
        if id >= self.distribution.len() {
            self.distribution.resize(id + 1, 0.);
        }
        self.distribution[id] = weight;
        Ok(self.outcomes.create_outcome(id))
    }
    /// Creates a new outcome at the end, rebalancing as in
    /// [`create_outcome`](WeightedOutcomeAction::create_outcome).
    pub fn append_outcome(&mut self) -> Result<&mut Transition, MdpError> {
        self.create_outcome(self.outcomes.outcome_count())
    }
    /// Places a transition at `id`, rebalancing as in
    /// [`create_outcome`](WeightedOutcomeAction::create_outcome).
    pub fn add_outcome(&mut self, id: usize, transition: Transition) -> Result<(), MdpError> {
        *self.create_outcome(id)? = transition;
        Ok(())
    }
    /// Mutable access to an existing outcome; cannot change the outcome count.
    pub fn outcome_mut(&mut self, id: usize) -> Result<&mut Transition, MdpError> {
        self.outcomes.outcome_mut(id)
    }

    pub fn distribution(&self) -> &[Probability] {
        &self.distribution
    }
    /// Replaces the baseline. It must have one non-negative weight per
    /// outcome and sum to one within [`TOLERANCE`].
    pub fn set_distribution(&mut self, distribution: Vec<Probability>) -> Result<(), MdpError> {
        self.check_distribution(&distribution)?;
        self.distribution = distribution;
        Ok(())
    }
    /// Overwrites one baseline weight without checking the sum.
    pub fn set_weight(&mut self, id: usize, weight: Probability) -> Result<(), MdpError> {
        check_weight(weight)?;
        let len = self.distribution.len();
        self.distribution
            .get_mut(id)
            .map(|w| *w = weight)
            .ok_or_else(|| MdpError::range("outcome", id, len))
    }
    /// Rescales the baseline to sum to one. Fails when it sums to zero.
    pub fn normalize_distribution(&mut self) -> Result<(), MdpError> {
        let sum = self.distribution.iter().sum::<Probability>();
        if sum == 0. {
            return Err(MdpError::domain("baseline distribution sums to zero"));
        }
        self.distribution.iter_mut().for_each(|w| *w /= sum);
        Ok(())
    }
    pub fn is_distribution_normalized(&self) -> bool {
        is_distribution(&self.distribution)
    }
    /// Resets the baseline to uniform and the threshold to zero.
    pub fn uniform_distribution(&mut self) {
        let n = self.outcomes.outcome_count();
        self.distribution = vec![1. / n as Probability; n];
        self.threshold = 0.;
    }

    pub fn threshold(&self) -> Probability {
        self.threshold
    }
    pub fn set_threshold(&mut self, threshold: Probability) -> Result<(), MdpError> {
        if !threshold.is_finite() || threshold < 0. {
            return Err(MdpError::invalid(format!(
                "threshold must be finite and non-negative, got {}",
                threshold
            )));
        }
        self.threshold = threshold;
        Ok(())
    }
    pub fn nature(&self) -> &N {
        &self.nature
    }

    /// Distribution chosen by nature in the direction `D`, with its value.
    ///
    /// Fails with an invalid argument while the baseline does not sum to one.
    pub fn extremal<D>(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
    ) -> Result<(Vec<Probability>, Utility), MdpError>
    where
        D: Direction,
    {
        let values = self.outcomes.values(valuefunction, discount)?;
        if !self.is_distribution_normalized() {
            return Err(MdpError::invalid(format!(
                "baseline sums to {} instead of one, normalize before evaluating",
                self.distribution.iter().sum::<Probability>()
            )));
        }
        let response = self
            .nature
            .respond::<D>(&values, &self.distribution, self.threshold)?;
        if response.distribution.len() != values.len() {
            return Err(MdpError::invalid(format!(
                "nature returned {} weights for {} outcomes",
                response.distribution.len(),
                values.len()
            )));
        }
        let value = dot(&response.distribution, &values);
        log::trace!("nature moved objective {} -> {}", dot(&self.distribution, &values), value);
        Ok((response.distribution, value))
    }

    fn check_distribution(&self, distribution: &[Probability]) -> Result<(), MdpError> {
        if distribution.len() != self.outcomes.outcome_count() {
            return Err(MdpError::invalid(format!(
                "distribution has {} weights for {} outcomes",
                distribution.len(),
                self.outcomes.outcome_count()
            )));
        }
        distribution.iter().copied().try_for_each(check_weight)?;
        if !is_distribution(distribution) {
            return Err(MdpError::invalid(format!(
                "distribution sums to {} instead of one",
                distribution.iter().sum::<Probability>()
            )));
        }
        Ok(())
    }
}

fn check_weight(weight: Probability) -> Result<(), MdpError> {
    match weight.is_finite() && weight >= 0. {
        true => Ok(()),
        false => Err(MdpError::invalid(format!(
            "outcome weight must be finite and non-negative, got {}",
            weight
        ))),
    }
}

fn dot(weights: &[Probability], values: &[Utility]) -> Utility {
    weights.iter().zip(values).map(|(w, z)| w * z).sum()
}

impl<N> Default for WeightedOutcomeAction<N>
where
    N: Nature + Default,
{
    fn default() -> Self {
        Self::new(N::default())
    }
}

impl<N> From<Vec<Transition>> for WeightedOutcomeAction<N>
where
    N: Nature + Default,
{
    fn from(outcomes: Vec<Transition>) -> Self {
        Self::with_outcomes(outcomes, N::default())
    }
}

impl<N> Deref for WeightedOutcomeAction<N>
where
    N: Nature,
{
    type Target = OutcomeManager;
    fn deref(&self) -> &Self::Target {
        &self.outcomes
    }
}

impl<N> Evaluate for WeightedOutcomeAction<N>
where
    N: Nature,
{
    type Outcome = Vec<Probability>;

    fn value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        self.average(valuefunction, discount)
    }
    fn average(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        let values = self.outcomes.values(valuefunction, discount)?;
        Ok(dot(&self.distribution, &values))
    }
    fn maximal(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
    ) -> Result<(Vec<Probability>, Utility), MdpError> {
        self.extremal::<Maximize>(valuefunction, discount)
    }
    fn minimal(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
    ) -> Result<(Vec<Probability>, Utility), MdpError> {
        self.extremal::<Minimize>(valuefunction, discount)
    }
    fn fixed(
        &self,
        valuefunction: &[Utility],
        discount: Discount,
        outcome: &Vec<Probability>,
    ) -> Result<Utility, MdpError> {
        let values = self.outcomes.values(valuefunction, discount)?;
        self.check_distribution(outcome)?;
        Ok(dot(outcome, &values))
    }

    fn is_valid(&self) -> bool {
        self.outcomes.is_valid()
    }
    fn set_validity(&mut self, valid: bool) {
        self.outcomes.set_validity(valid);
    }

    fn outcomes(&self) -> &[Transition] {
        self.outcomes.outcomes()
    }
    fn is_outcome_correct(&self, outcome: &Vec<Probability>) -> bool {
        outcome.len() == self.outcomes.outcome_count()
    }
    fn mean_reward(&self, outcome: &Vec<Probability>) -> Result<Utility, MdpError> {
        self.check_distribution(outcome)?;
        self.outcomes
            .outcomes()
            .iter()
            .zip(outcome)
            .filter(|(_, w)| **w > 0.)
            .map(|(t, w)| t.mean_reward().map(|r| w * r))
            .sum()
    }
    fn mean_transition(&self, outcome: &Vec<Probability>) -> Result<Transition, MdpError> {
        self.check_distribution(outcome)?;
        let mut mean = Transition::default();
        self.outcomes
            .outcomes()
            .iter()
            .zip(outcome)
            .try_for_each(|(t, &w)| t.transition_addto(w, &mut mean))?;
        Ok(mean)
    }
    fn normalize(&mut self) -> Result<(), MdpError> {
        self.outcomes.normalize()
    }
}

impl<N> Display for WeightedOutcomeAction<N>
where
    N: Nature,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.outcomes.outcome_count(), self.distribution.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Outcome i is certain to reach state i with the given reward.
    fn action(rewards: &[Utility]) -> WeightedOutcomeAction {
        rewards
            .iter()
            .enumerate()
            .map(|(i, &r)| Transition::new(&[i], &[1.], &[r]).unwrap())
            .collect::<Vec<_>>()
            .into()
    }
    fn zeros(n: usize) -> Vec<Utility> {
        vec![0.; n]
    }

    #[test]
    fn baseline_uniform_on_construction() {
        let a = action(&[1., 2., 3., 4.]);
        assert_eq!(a.distribution(), &[0.25; 4]);
        assert_eq!(a.threshold(), 0.);
        assert_eq!(a.to_string(), "4 / 4");
    }
    #[test]
    fn create_outcome_keeps_baseline_normalized() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        for id in [0, 1, 2, 5, 6, 10, 31] {
            a.create_outcome(id).unwrap();
            assert_eq!(a.distribution().len(), id + 1);
            assert_eq!(a.outcome_count(), id + 1);
            let sum = a.distribution().iter().sum::<Probability>();
            assert!((sum - 1.).abs() < 1e-9, "sum {} after id {}", sum, id);
        }
    }
    #[test]
    fn create_outcome_rescales_existing() {
        let mut a = action(&[0., 0.]);
        a.set_distribution(vec![0.2, 0.8]).unwrap();
        a.create_outcome(2).unwrap();
        let d = a.distribution();
        assert!((d[0] - 0.2 * 2. / 3.).abs() < 1e-12);
        assert!((d[1] - 0.8 * 2. / 3.).abs() < 1e-12);
        assert!((d[2] - 1. / 3.).abs() < 1e-12);
    }
    #[test]
    fn create_outcome_existing_is_noop() {
        let mut a = action(&[0., 0.]);
        a.set_distribution(vec![0.2, 0.8]).unwrap();
        a.create_outcome(1).unwrap();
        assert_eq!(a.distribution(), &[0.2, 0.8]);
    }
    #[test]
    fn create_outcome_zero_mass_falls_back_to_uniform() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        a.create_outcome_weighted(1, 0.).unwrap();
        assert_eq!(a.distribution(), &[0., 0.]);
        a.create_outcome(3).unwrap();
        assert_eq!(a.distribution(), &[0.25; 4]);
    }
    #[test]
    fn create_outcome_weighted_is_unchecked() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        a.create_outcome_weighted(2, 0.5).unwrap();
        assert_eq!(a.distribution(), &[0., 0., 0.5]);
        assert!(!a.is_distribution_normalized());
        a.create_outcome_weighted(0, 1.5).unwrap();
        a.normalize_distribution().unwrap();
        assert!(a.is_distribution_normalized());
        assert!((a.distribution()[0] - 0.75).abs() < 1e-12);
        assert!(a.create_outcome_weighted(0, -1.).is_err());
    }
    #[test]
    fn create_outcome_overflowing_mass_is_atomic() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        a.create_outcome_weighted(1, 1e308).unwrap();
        a.set_weight(0, 1e308).unwrap();
        let before = a.clone();
        assert!(matches!(a.create_outcome(2), Err(MdpError::Domain(_))));
        assert!(matches!(a.append_outcome(), Err(MdpError::Domain(_))));
        assert_eq!(a, before);
        assert_eq!(a.distribution(), &[1e308, 1e308]);
        assert_eq!(a.outcome_count(), 2);
    }
    #[test]
    fn evaluating_unnormalized_baseline_fails() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        for (id, r) in [1., 2., 3.].into_iter().enumerate() {
            *a.create_outcome_weighted(id, if id == 2 { 0.5 } else { 0. }).unwrap() =
                Transition::new(&[0], &[1.], &[r]).unwrap();
        }
        a.set_threshold(2.).unwrap();
        assert!(matches!(a.minimal(&[0.], 1.), Err(MdpError::InvalidArgument(_))));
        assert!(matches!(a.maximal(&[0.], 1.), Err(MdpError::InvalidArgument(_))));
        a.normalize_distribution().unwrap();
        let (d, v) = a.minimal(&[0.], 1.).unwrap();
        assert_eq!(d, vec![1., 0., 0.]);
        assert!((v - 1.).abs() < 1e-12);
    }
    #[test]
    fn set_distribution_validates() {
        let mut a = action(&[0., 0., 0.]);
        assert!(matches!(a.set_distribution(vec![0.5, 0.5]), Err(MdpError::InvalidArgument(_))));
        assert!(matches!(a.set_distribution(vec![0.5, 0.5, 0.5]), Err(MdpError::InvalidArgument(_))));
        assert!(matches!(a.set_distribution(vec![1.5, -0.5, 0.]), Err(MdpError::InvalidArgument(_))));
        a.set_distribution(vec![0.1, 0.2, 0.7]).unwrap();
        assert_eq!(a.distribution(), &[0.1, 0.2, 0.7]);
    }
    #[test]
    fn normalize_distribution_zero_fails() {
        let mut a = WeightedOutcomeAction::<WorstCaseL1>::default();
        a.create_outcome_weighted(1, 0.).unwrap();
        assert!(matches!(a.normalize_distribution(), Err(MdpError::Domain(_))));
    }
    #[test]
    fn uniform_resets_threshold() {
        let mut a = action(&[0., 0.]);
        a.set_distribution(vec![0.9, 0.1]).unwrap();
        a.set_threshold(0.3).unwrap();
        a.uniform_distribution();
        assert_eq!(a.distribution(), &[0.5, 0.5]);
        assert_eq!(a.threshold(), 0.);
        assert!(a.set_threshold(-0.1).is_err());
    }
    #[test]
    fn set_weight_unchecked() {
        let mut a = action(&[0., 0.]);
        a.set_weight(0, 3.).unwrap();
        assert_eq!(a.distribution(), &[3., 0.5]);
        assert!(matches!(a.set_weight(2, 0.1), Err(MdpError::OutOfRange { .. })));
    }
    #[test]
    fn average_uses_baseline() {
        let mut a = action(&[1., 2., 3.]);
        assert!((a.average(&zeros(3), 1.).unwrap() - 2.).abs() < 1e-12);
        a.set_distribution(vec![0.5, 0.5, 0.]).unwrap();
        assert!((a.average(&zeros(3), 1.).unwrap() - 1.5).abs() < 1e-12);
    }
    #[test]
    fn minimal_full_threshold_is_worst_outcome() {
        let mut a = action(&[1., 2., 3.]);
        a.set_threshold(2.).unwrap();
        let (d, v) = a.minimal(&zeros(3), 1.).unwrap();
        assert!((v - 1.).abs() < 1e-12);
        assert!((d[0] - 1.).abs() < 1e-12);
    }
    #[test]
    fn maximal_full_threshold_is_best_outcome() {
        let mut a = action(&[1., 2., 3.]);
        a.set_threshold(2.).unwrap();
        let (d, v) = a.maximal(&zeros(3), 1.).unwrap();
        assert!((v - 3.).abs() < 1e-12);
        assert!((d[2] - 1.).abs() < 1e-12);
    }
    #[test]
    fn zero_threshold_collapses_to_average() {
        let a = action(&[1., -2., 4.]);
        let average = a.average(&zeros(3), 1.).unwrap();
        assert!((a.minimal(&zeros(3), 1.).unwrap().1 - average).abs() < 1e-12);
        assert!((a.maximal(&zeros(3), 1.).unwrap().1 - average).abs() < 1e-12);
    }
    #[test]
    fn bounds_bracket_average() {
        let mut a = action(&[1., -2., 4., 0.5]);
        a.set_threshold(0.7).unwrap();
        let v = [1., 0., -1., 2.];
        let lo = a.minimal(&v, 0.9).unwrap().1;
        let hi = a.maximal(&v, 0.9).unwrap().1;
        let mid = a.average(&v, 0.9).unwrap();
        assert!(lo <= mid && mid <= hi);
    }
    #[test]
    fn fixed_validates_distribution() {
        let a = action(&[1., 2., 3.]);
        assert!((a.fixed(&zeros(3), 1., &vec![0., 0., 1.]).unwrap() - 3.).abs() < 1e-12);
        assert!(matches!(a.fixed(&zeros(3), 1., &vec![0.5, 0.2, 0.2]), Err(MdpError::InvalidArgument(_))));
        assert!(matches!(a.fixed(&zeros(3), 1., &vec![0.5, 0.5]), Err(MdpError::InvalidArgument(_))));
    }
    #[test]
    fn empty_action_fails() {
        let a = WeightedOutcomeAction::<WorstCaseL1>::default();
        assert!(matches!(a.minimal(&[], 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.maximal(&[], 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.average(&[], 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.fixed(&[], 1., &vec![]), Err(MdpError::Precondition(_))));
    }
    #[test]
    fn mean_queries_mix_outcomes() {
        let a = action(&[2., 4.]);
        let d = vec![0.25, 0.75];
        assert!((a.mean_reward(&d).unwrap() - 3.5).abs() < 1e-12);
        let t = a.mean_transition(&d).unwrap();
        assert_eq!(t.indices(), &[0, 1]);
        assert_eq!(t.probabilities(), &[0.25, 0.75]);
        assert!(a.is_outcome_correct(&d));
        assert!(!a.is_outcome_correct(&vec![1.]));
    }

    /// Nature that always puts all mass on the last outcome.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct Last;
    impl Nature for Last {
        fn minimize(&self, values: &[Utility], _: &[Probability], _: Probability) -> Result<Response, MdpError> {
            let mut distribution = vec![0.; values.len()];
            distribution[values.len() - 1] = 1.;
            Ok(Response {
                objective: values[values.len() - 1],
                distribution,
            })
        }
    }

    #[test]
    fn nature_is_injected() {
        let a = WeightedOutcomeAction::with_outcomes(
            vec![
                Transition::new(&[0], &[1.], &[5.]).unwrap(),
                Transition::new(&[0], &[1.], &[-5.]).unwrap(),
            ],
            Last,
        );
        assert_eq!(a.minimal(&[0.], 1.).unwrap(), (vec![0., 1.], -5.));
        assert_eq!(a.maximal(&[0.], 1.).unwrap(), (vec![0., 1.], -5.));
    }
}
