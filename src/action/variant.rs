use super::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// Any action a planner may hold.
///
/// Dispatches the [`Evaluate`] contract to the wrapped variant, so a model
/// can mix regular and robust actions within a single state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<N = WorstCaseL1>
where
    N: Nature,
{
    Regular(RegularAction),
    Discrete(DiscreteOutcomeAction),
    Weighted(WeightedOutcomeAction<N>),
}

/// Outcome identifier for [`Action`], tagged by the variant that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeId {
    Index(usize),
    Distribution(Vec<Probability>),
}

impl<N> Action<N>
where
    N: Nature,
{
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Regular(_) => "regular",
            Self::Discrete(_) => "discrete",
            Self::Weighted(_) => "weighted",
        }
    }
}

fn mismatch(kind: &str, outcome: &OutcomeId) -> MdpError {
    MdpError::invalid(format!("outcome {:?} does not identify a {} outcome", outcome, kind))
}

impl<N> Evaluate for Action<N>
where
    N: Nature,
{
    type Outcome = OutcomeId;

    fn value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        match self {
            Self::Regular(a) => a.value(valuefunction, discount),
            Self::Discrete(a) => a.value(valuefunction, discount),
            Self::Weighted(a) => a.value(valuefunction, discount),
        }
    }
    fn average(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        match self {
            Self::Regular(a) => a.average(valuefunction, discount),
            Self::Discrete(a) => a.average(valuefunction, discount),
            Self::Weighted(a) => a.average(valuefunction, discount),
        }
    }
    fn maximal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(OutcomeId, Utility), MdpError> {
        match self {
            Self::Regular(a) => a
                .maximal(valuefunction, discount)
                .map(|(i, v)| (OutcomeId::Index(i), v)),
            Self::Discrete(a) => a
                .maximal(valuefunction, discount)
                .map(|(i, v)| (OutcomeId::Index(i), v)),
            Self::Weighted(a) => a
                .maximal(valuefunction, discount)
                .map(|(d, v)| (OutcomeId::Distribution(d), v)),
        }
    }
    fn minimal(&self, valuefunction: &[Utility], discount: Discount) -> Result<(OutcomeId, Utility), MdpError> {
        match self {
            Self::Regular(a) => a
                .minimal(valuefunction, discount)
                .map(|(i, v)| (OutcomeId::Index(i), v)),
            Self::Discrete(a) => a
                .minimal(valuefunction, discount)
                .map(|(i, v)| (OutcomeId::Index(i), v)),
            Self::Weighted(a) => a
                .minimal(valuefunction, discount)
                .map(|(d, v)| (OutcomeId::Distribution(d), v)),
        }
    }
    fn fixed(&self, valuefunction: &[Utility], discount: Discount, outcome: &OutcomeId) -> Result<Utility, MdpError> {
        match (self, outcome) {
            (Self::Regular(a), OutcomeId::Index(i)) => a.fixed(valuefunction, discount, i),
            (Self::Discrete(a), OutcomeId::Index(i)) => a.fixed(valuefunction, discount, i),
            (Self::Weighted(a), OutcomeId::Distribution(d)) => a.fixed(valuefunction, discount, d),
            _ => Err(mismatch(self.kind(), outcome)),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Self::Regular(a) => a.is_valid(),
            Self::Discrete(a) => a.is_valid(),
            Self::Weighted(a) => a.is_valid(),
        }
    }
    fn set_validity(&mut self, valid: bool) {
        match self {
            Self::Regular(a) => a.set_validity(valid),
            Self::Discrete(a) => a.set_validity(valid),
            Self::Weighted(a) => a.set_validity(valid),
        }
    }

    fn outcomes(&self) -> &[Transition] {
        match self {
            Self::Regular(a) => a.outcomes(),
            Self::Discrete(a) => Evaluate::outcomes(a),
            Self::Weighted(a) => Evaluate::outcomes(a),
        }
    }
    fn is_outcome_correct(&self, outcome: &OutcomeId) -> bool {
        match (self, outcome) {
            (Self::Regular(a), OutcomeId::Index(i)) => a.is_outcome_correct(i),
            (Self::Discrete(a), OutcomeId::Index(i)) => a.is_outcome_correct(i),
            (Self::Weighted(a), OutcomeId::Distribution(d)) => a.is_outcome_correct(d),
            _ => false,
        }
    }
    fn mean_reward(&self, outcome: &OutcomeId) -> Result<Utility, MdpError> {
        match (self, outcome) {
            (Self::Regular(a), OutcomeId::Index(i)) => a.mean_reward(i),
            (Self::Discrete(a), OutcomeId::Index(i)) => a.mean_reward(i),
            (Self::Weighted(a), OutcomeId::Distribution(d)) => a.mean_reward(d),
            _ => Err(mismatch(self.kind(), outcome)),
        }
    }
    fn mean_transition(&self, outcome: &OutcomeId) -> Result<Transition, MdpError> {
        match (self, outcome) {
            (Self::Regular(a), OutcomeId::Index(i)) => a.mean_transition(i),
            (Self::Discrete(a), OutcomeId::Index(i)) => a.mean_transition(i),
            (Self::Weighted(a), OutcomeId::Distribution(d)) => a.mean_transition(d),
            _ => Err(mismatch(self.kind(), outcome)),
        }
    }
    fn normalize(&mut self) -> Result<(), MdpError> {
        match self {
            Self::Regular(a) => a.normalize(),
            Self::Discrete(a) => Evaluate::normalize(a),
            Self::Weighted(a) => Evaluate::normalize(a),
        }
    }
}

impl<N> From<RegularAction> for Action<N>
where
    N: Nature,
{
    fn from(action: RegularAction) -> Self {
        Self::Regular(action)
    }
}

impl<N> From<DiscreteOutcomeAction> for Action<N>
where
    N: Nature,
{
    fn from(action: DiscreteOutcomeAction) -> Self {
        Self::Discrete(action)
    }
}

impl<N> From<WeightedOutcomeAction<N>> for Action<N>
where
    N: Nature,
{
    fn from(action: WeightedOutcomeAction<N>) -> Self {
        Self::Weighted(action)
    }
}

impl<N> Display for Action<N>
where
    N: Nature,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular(a) => Display::fmt(a, f),
            Self::Discrete(a) => Display::fmt(a, f),
            Self::Weighted(a) => Display::fmt(a, f),
        }
    }
}
