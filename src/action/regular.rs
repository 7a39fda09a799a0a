use super::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// Action of a regular MDP: a single outcome and no uncertainty.
///
/// Every robust query collapses to [`Transition::compute_value`], which
/// makes this the degenerate case the other variants generalize.
/// Actions are constructed valid.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularAction {
    outcome: Transition,
    valid: bool,
}

impl RegularAction {
    pub fn outcome(&self) -> &Transition {
        &self.outcome
    }
    pub fn outcome_mut(&mut self) -> &mut Transition {
        &mut self.outcome
    }
    /// Returns the single outcome; only id 0 exists.
    pub fn create_outcome(&mut self, id: usize) -> Result<&mut Transition, MdpError> {
        match id {
            0 => Ok(&mut self.outcome),
            _ => Err(MdpError::range("outcome", id, 1)),
        }
    }
}

impl Default for RegularAction {
    fn default() -> Self {
        Self {
            outcome: Transition::default(),
            valid: true,
        }
    }
}

impl From<Transition> for RegularAction {
    fn from(outcome: Transition) -> Self {
        Self {
            outcome,
            valid: true,
        }
    }
}

impl Evaluate for RegularAction {
    type Outcome = usize;

    fn value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        self.outcome.compute_value(valuefunction, discount)
    }
    fn average(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        self.value(valuefunction, discount)
    }
    fn maximal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(usize, Utility), MdpError> {
        Ok((0, self.value(valuefunction, discount)?))
    }
    fn minimal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(usize, Utility), MdpError> {
        Ok((0, self.value(valuefunction, discount)?))
    }
    fn fixed(&self, valuefunction: &[Utility], discount: Discount, outcome: &usize) -> Result<Utility, MdpError> {
        match *outcome {
            0 => self.value(valuefunction, discount),
            id => Err(MdpError::range("outcome", id, 1)),
        }
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
    fn set_validity(&mut self, valid: bool) {
        self.valid = valid;
    }

    fn outcomes(&self) -> &[Transition] {
        std::slice::from_ref(&self.outcome)
    }
    fn is_outcome_correct(&self, outcome: &usize) -> bool {
        *outcome == 0
    }
    fn mean_reward(&self, _: &usize) -> Result<Utility, MdpError> {
        self.outcome.mean_reward()
    }
    fn mean_transition(&self, _: &usize) -> Result<Transition, MdpError> {
        Ok(self.outcome.clone())
    }
    fn normalize(&mut self) -> Result<(), MdpError> {
        self.outcome.normalize()
    }
}

impl Display for RegularAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "1(reg)")
    }
}
