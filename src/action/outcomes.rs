use super::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// Ordered list of outcomes with a validity flag.
///
/// Shared by the robust actions. Outcomes are addressed by position and
/// created on demand: asking for an id past the end fills the gap with
/// empty transitions. Actions are constructed valid.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeManager {
    outcomes: Vec<Transition>,
    valid: bool,
}

impl OutcomeManager {
    /// Extends the list so that `id` exists and returns that outcome.
    pub fn create_outcome(&mut self, id: usize) -> &mut Transition {
        if id >= self.outcomes.len() {
            self.outcomes.resize_with(id + 1, Transition::default);
        }
        &mut self.outcomes[id]
    }
    /// Creates a new outcome at the end.
    pub fn append_outcome(&mut self) -> &mut Transition {
        self.create_outcome(self.outcomes.len())
    }
    /// Places a transition at `id`, creating empty outcomes before it as needed.
    pub fn add_outcome(&mut self, id: usize, transition: Transition) {
        *self.create_outcome(id) = transition;
    }
    pub fn outcome(&self, id: usize) -> Result<&Transition, MdpError> {
        self.outcomes
            .get(id)
            .ok_or_else(|| MdpError::range("outcome", id, self.outcomes.len()))
    }
    pub fn outcome_mut(&mut self, id: usize) -> Result<&mut Transition, MdpError> {
        let len = self.outcomes.len();
        self.outcomes
            .get_mut(id)
            .ok_or_else(|| MdpError::range("outcome", id, len))
    }
    pub fn outcomes(&self) -> &[Transition] {
        &self.outcomes
    }
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Value of every outcome, z_i = outcome_i.compute_value(v, discount).
    /// Fails when there are no outcomes.
    pub fn values(&self, valuefunction: &[Utility], discount: Discount) -> Result<Vec<Utility>, MdpError> {
        if self.outcomes.is_empty() {
            return Err(MdpError::precondition("evaluating an action with no outcomes"));
        }
        self.outcomes
            .iter()
            .map(|outcome| outcome.compute_value(valuefunction, discount))
            .collect()
    }
    /// Normalizes every outcome. Either all succeed or nothing changes.
    pub fn normalize(&mut self) -> Result<(), MdpError> {
        let mut scratch = self.outcomes.clone();
        scratch.iter_mut().try_for_each(Transition::normalize)?;
        self.outcomes = scratch;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
    pub fn set_validity(&mut self, valid: bool) {
        self.valid = valid;
    }
}

impl Default for OutcomeManager {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl From<Vec<Transition>> for OutcomeManager {
    fn from(outcomes: Vec<Transition>) -> Self {
        Self {
            outcomes,
            valid: true,
        }
    }
}

impl Display for OutcomeManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.outcomes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_fills_gaps() {
        let mut m = OutcomeManager::default();
        m.create_outcome(2).add_sample(0, 1., 0.).unwrap();
        assert_eq!(m.outcome_count(), 3);
        assert!(m.outcome(0).unwrap().is_empty());
        assert!(!m.outcome(2).unwrap().is_empty());
        m.create_outcome(1);
        assert_eq!(m.outcome_count(), 3);
        m.append_outcome();
        assert_eq!(m.outcome_count(), 4);
    }
    #[test]
    fn unknown_outcome_fails() {
        let mut m = OutcomeManager::default();
        assert!(matches!(m.outcome(0), Err(MdpError::OutOfRange { .. })));
        assert!(m.outcome_mut(0).is_err());
    }
    #[test]
    fn values_require_outcomes() {
        let m = OutcomeManager::default();
        assert!(matches!(m.values(&[], 1.), Err(MdpError::Precondition(_))));
    }
    #[test]
    fn normalize_is_atomic() {
        let mut m = OutcomeManager::default();
        m.add_outcome(0, Transition::dense(&[2., 2.]).unwrap());
        m.create_outcome(1);
        let before = m.clone();
        assert!(matches!(m.normalize(), Err(MdpError::Domain(_))));
        assert_eq!(m, before);
        m.add_outcome(1, Transition::dense(&[1., 3.]).unwrap());
        m.normalize().unwrap();
        assert!(m.outcomes().iter().all(Transition::is_normalized));
    }
}
