use super::*;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Deref;
use std::ops::DerefMut;

/// Robust action whose nature picks exactly one of finitely many outcomes.
///
/// Outcomes carry no weights; the optimistic and pessimistic values are an
/// exact search over all of them, and the average is unweighted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscreteOutcomeAction {
    outcomes: OutcomeManager,
}

impl DiscreteOutcomeAction {
    /// First outcome that is best in the direction `D`, with its value.
    pub fn extremal<D>(&self, valuefunction: &[Utility], discount: Discount) -> Result<(usize, Utility), MdpError>
    where
        D: Direction,
    {
        self.outcomes
            .values(valuefunction, discount)?
            .into_iter()
            .enumerate()
            .reduce(|best, next| if D::improves(next.1, best.1) { next } else { best })
            .ok_or_else(|| MdpError::precondition("evaluating an action with no outcomes"))
    }
}

impl From<Vec<Transition>> for DiscreteOutcomeAction {
    fn from(outcomes: Vec<Transition>) -> Self {
        Self {
            outcomes: OutcomeManager::from(outcomes),
        }
    }
}

impl Deref for DiscreteOutcomeAction {
    type Target = OutcomeManager;
    fn deref(&self) -> &Self::Target {
        &self.outcomes
    }
}

impl DerefMut for DiscreteOutcomeAction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.outcomes
    }
}

impl Evaluate for DiscreteOutcomeAction {
    type Outcome = usize;

    fn value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        self.average(valuefunction, discount)
    }
    fn average(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        let values = self.outcomes.values(valuefunction, discount)?;
        Ok(values.iter().sum::<Utility>() / values.len() as Utility)
    }
    fn maximal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(usize, Utility), MdpError> {
        self.extremal::<Maximize>(valuefunction, discount)
    }
    fn minimal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(usize, Utility), MdpError> {
        self.extremal::<Minimize>(valuefunction, discount)
    }
    fn fixed(&self, valuefunction: &[Utility], discount: Discount, outcome: &usize) -> Result<Utility, MdpError> {
        if self.outcomes.outcome_count() == 0 {
            return Err(MdpError::precondition("evaluating an action with no outcomes"));
        }
        self.outcomes
            .outcome(*outcome)?
            .compute_value(valuefunction, discount)
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
    fn is_outcome_correct(&self, outcome: &usize) -> bool {
        *outcome < self.outcomes.outcome_count()
    }
    fn mean_reward(&self, outcome: &usize) -> Result<Utility, MdpError> {
        self.outcomes.outcome(*outcome)?.mean_reward()
    }
    fn mean_transition(&self, outcome: &usize) -> Result<Transition, MdpError> {
        self.outcomes.outcome(*outcome).cloned()
    }
    fn normalize(&mut self) -> Result<(), MdpError> {
        self.outcomes.normalize()
    }
}

impl Display for DiscreteOutcomeAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.outcomes, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three outcomes, each certain to reach its own state.
    fn action(rewards: [Utility; 3]) -> DiscreteOutcomeAction {
        rewards
            .iter()
            .enumerate()
            .map(|(i, &r)| Transition::new(&[i], &[1.], &[r]).unwrap())
            .collect::<Vec<_>>()
            .into()
    }
    const ZERO: [Utility; 3] = [0.; 3];

    #[test]
    fn maximal_and_minimal() {
        let a = action([2., 5., -1.]);
        assert_eq!(a.maximal(&ZERO, 1.).unwrap(), (1, 5.));
        assert_eq!(a.minimal(&ZERO, 1.).unwrap(), (2, -1.));
    }
    #[test]
    fn ties_break_to_first_index() {
        let a = action([3., 1., 3.]);
        assert_eq!(a.maximal(&ZERO, 1.).unwrap(), (0, 3.));
        let a = action([4., 1., 1.]);
        assert_eq!(a.minimal(&ZERO, 1.).unwrap(), (1, 1.));
    }
    #[test]
    fn average_is_unweighted() {
        let a = action([2., 5., -1.]);
        assert!((a.average(&ZERO, 1.).unwrap() - 2.).abs() < 1e-12);
        assert_eq!(a.value(&ZERO, 1.).unwrap(), a.average(&ZERO, 1.).unwrap());
    }
    #[test]
    fn fixed_selects_outcome() {
        let a = action([2., 5., -1.]);
        assert_eq!(a.fixed(&[0., 10., 0.], 0.5, &1).unwrap(), 10.);
        assert!(matches!(a.fixed(&ZERO, 1., &3), Err(MdpError::OutOfRange { index: 3, .. })));
    }
    #[test]
    fn empty_action_fails_everywhere() {
        let a = DiscreteOutcomeAction::default();
        assert!(matches!(a.maximal(&ZERO, 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.minimal(&ZERO, 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.average(&ZERO, 1.), Err(MdpError::Precondition(_))));
        assert!(matches!(a.fixed(&ZERO, 1., &0), Err(MdpError::Precondition(_))));
    }
    #[test]
    fn outcomes_build_incrementally() {
        let mut a = DiscreteOutcomeAction::default();
        a.create_outcome(1).add_sample(0, 1., 4.).unwrap();
        a.create_outcome(0).add_sample(1, 1., -4.).unwrap();
        assert_eq!(a.outcome_count(), 2);
        assert!(a.is_outcome_correct(&1));
        assert!(!a.is_outcome_correct(&2));
        assert_eq!(a.minimal(&[0., 0.], 1.).unwrap(), (0, -4.));
        assert_eq!(a.mean_reward(&1).unwrap(), 4.);
        assert_eq!(a.to_string(), "2");
    }
    #[test]
    fn validity_toggles() {
        let mut a = action(ZERO);
        assert!(a.is_valid());
        a.set_validity(false);
        assert!(!a.is_valid());
    }
}
