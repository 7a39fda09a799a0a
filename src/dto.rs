//! JSON shapes for exporting and re-importing transitions and actions.
//!
//! The field names and nesting are consumed by external aggregation and
//! export tooling and must not change.
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiTransition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomeid: Option<usize>,
    #[serde(rename = "idStatesTo")]
    pub id_states_to: Vec<usize>,
    pub probabilities: Vec<Probability>,
    pub rewards: Vec<Utility>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionid: Option<usize>,
    pub outcomes: Vec<ApiTransition>,
}

impl ApiTransition {
    pub fn tagged(transition: &Transition, outcomeid: Option<usize>) -> Self {
        Self {
            outcomeid,
            id_states_to: transition.indices().to_vec(),
            probabilities: transition.probabilities().to_vec(),
            rewards: transition.rewards().to_vec(),
        }
    }
}

impl ApiAction {
    /// Each outcome is tagged with its position.
    pub fn from_outcomes(actionid: Option<usize>, outcomes: &[Transition]) -> Self {
        Self {
            actionid,
            outcomes: outcomes
                .iter()
                .enumerate()
                .map(|(i, t)| ApiTransition::tagged(t, Some(i)))
                .collect(),
        }
    }
    /// Outcomes placed at their `outcomeid`, or at their position when
    /// untagged. Gaps become empty transitions; repeated ids are rejected.
    pub fn transitions(self) -> Result<Vec<Transition>, MdpError> {
        let mut outcomes = OutcomeManager::default();
        let mut seen = Vec::<bool>::new();
        for (position, api) in self.outcomes.into_iter().enumerate() {
            let id = api.outcomeid.unwrap_or(position);
            if id < seen.len() && seen[id] {
                return Err(MdpError::invalid(format!("outcome {} appears twice", id)));
            }
            if id >= seen.len() {
                seen.resize(id + 1, false);
            }
            seen[id] = true;
            outcomes.add_outcome(id, Transition::try_from(api)?);
        }
        Ok(outcomes.outcomes().to_vec())
    }
}

impl From<&Transition> for ApiTransition {
    fn from(transition: &Transition) -> Self {
        Self::tagged(transition, None)
    }
}

impl TryFrom<ApiTransition> for Transition {
    type Error = MdpError;
    fn try_from(api: ApiTransition) -> Result<Self, Self::Error> {
        Transition::new(&api.id_states_to, &api.probabilities, &api.rewards)
    }
}

impl TryFrom<ApiAction> for RegularAction {
    type Error = MdpError;
    fn try_from(api: ApiAction) -> Result<Self, Self::Error> {
        let mut transitions = api.transitions()?;
        match transitions.len() {
            1 => Ok(Self::from(transitions.remove(0))),
            n => Err(MdpError::invalid(format!(
                "regular action needs exactly one outcome, got {}",
                n
            ))),
        }
    }
}

impl TryFrom<ApiAction> for DiscreteOutcomeAction {
    type Error = MdpError;
    fn try_from(api: ApiAction) -> Result<Self, Self::Error> {
        Ok(Self::from(api.transitions()?))
    }
}

impl<N> TryFrom<ApiAction> for WeightedOutcomeAction<N>
where
    N: Nature + Default,
{
    type Error = MdpError;
    fn try_from(api: ApiAction) -> Result<Self, Self::Error> {
        Ok(Self::from(api.transitions()?))
    }
}

impl Display for ApiTransition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serde_json::to_string(self).map_err(|_| std::fmt::Error)?)
    }
}

impl Display for ApiAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serde_json::to_string(self).map_err(|_| std::fmt::Error)?)
    }
}

impl Transition {
    /// JSON export, `{"outcomeid": .., "idStatesTo": [..], "probabilities": [..], "rewards": [..]}`.
    pub fn to_json(&self, outcomeid: Option<usize>) -> String {
        ApiTransition::tagged(self, outcomeid).to_string()
    }
    pub fn from_json(json: &str) -> Result<Self, MdpError> {
        Self::try_from(serde_json::from_str::<ApiTransition>(json)?)
    }
}

impl RegularAction {
    pub fn from_json(json: &str) -> Result<Self, MdpError> {
        Self::try_from(serde_json::from_str::<ApiAction>(json)?)
    }
}

impl DiscreteOutcomeAction {
    pub fn from_json(json: &str) -> Result<Self, MdpError> {
        Self::try_from(serde_json::from_str::<ApiAction>(json)?)
    }
}

impl<N> WeightedOutcomeAction<N>
where
    N: Nature + Default,
{
    /// Parses outcomes only; the baseline is uniform and the threshold zero.
    pub fn from_json(json: &str) -> Result<Self, MdpError> {
        Self::try_from(serde_json::from_str::<ApiAction>(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_json_shape() {
        let t = Transition::new(&[0, 2], &[0.25, 0.75], &[1., -1.]).unwrap();
        assert_eq!(
            t.to_json(Some(3)),
            r#"{"outcomeid":3,"idStatesTo":[0,2],"probabilities":[0.25,0.75],"rewards":[1.0,-1.0]}"#
        );
        assert_eq!(
            t.to_json(None),
            r#"{"idStatesTo":[0,2],"probabilities":[0.25,0.75],"rewards":[1.0,-1.0]}"#
        );
    }
    #[test]
    fn transition_json_round_trip() {
        for _ in 0..32 {
            let t = Transition::random();
            let parsed = Transition::from_json(&t.to_json(Some(1))).unwrap();
            assert_eq!(parsed.indices(), t.indices());
            assert_eq!(parsed.probabilities(), t.probabilities());
            assert_eq!(parsed.rewards(), t.rewards());
        }
    }
    #[test]
    fn action_json_shape() {
        let a = DiscreteOutcomeAction::from(vec![
            Transition::new(&[1], &[1.], &[0.5]).unwrap(),
            Transition::default(),
        ]);
        assert_eq!(
            a.to_json(None),
            concat!(
                r#"{"outcomes":["#,
                r#"{"outcomeid":0,"idStatesTo":[1],"probabilities":[1.0],"rewards":[0.5]},"#,
                r#"{"outcomeid":1,"idStatesTo":[],"probabilities":[],"rewards":[]}"#,
                r#"]}"#
            )
        );
    }
    #[test]
    fn action_json_round_trip() {
        let outcomes = (0..4).map(|_| Transition::random()).collect::<Vec<_>>();
        let a = DiscreteOutcomeAction::from(outcomes.clone());
        let b = DiscreteOutcomeAction::from_json(&a.to_json(Some(7))).unwrap();
        assert_eq!(Evaluate::outcomes(&b), outcomes.as_slice());
        let w = WeightedOutcomeAction::<WorstCaseL1>::from_json(&a.to_json(None)).unwrap();
        assert_eq!(w.distribution(), &[0.25; 4]);
    }
    #[test]
    fn outcome_ids_place_outcomes() {
        let json = r#"{"outcomes":[{"outcomeid":2,"idStatesTo":[0],"probabilities":[1.0],"rewards":[0.0]}]}"#;
        let a = DiscreteOutcomeAction::from_json(json).unwrap();
        assert_eq!(a.outcome_count(), 3);
        assert!(a.outcome(0).unwrap().is_empty());
        let twice = r#"{"outcomes":[
            {"outcomeid":0,"idStatesTo":[0],"probabilities":[1.0],"rewards":[0.0]},
            {"outcomeid":0,"idStatesTo":[1],"probabilities":[1.0],"rewards":[0.0]}]}"#;
        assert!(matches!(DiscreteOutcomeAction::from_json(twice), Err(MdpError::InvalidArgument(_))));
    }
    #[test]
    fn regular_needs_one_outcome() {
        let a = DiscreteOutcomeAction::from(vec![Transition::default(), Transition::default()]);
        assert!(RegularAction::from_json(&a.to_json(None)).is_err());
        let r = RegularAction::from(Transition::dense(&[0.5, 0.5]).unwrap());
        let parsed = RegularAction::from_json(&r.to_json(Some(0))).unwrap();
        assert_eq!(parsed, r);
    }
    #[test]
    fn malformed_json_fails() {
        assert!(matches!(Transition::from_json("{"), Err(MdpError::Json(_))));
        let ragged = r#"{"idStatesTo":[0,1],"probabilities":[1.0],"rewards":[0.0,0.0]}"#;
        assert!(matches!(Transition::from_json(ragged), Err(MdpError::InvalidArgument(_))));
    }
}
