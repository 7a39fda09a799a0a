use crate::*;

/// Sparse transition probabilities and rewards out of a single state.
///
/// Stored as three parallel vectors: successor indices, probabilities and
/// rewards. Indices are kept strictly increasing, which makes aggregation of
/// repeated samples a binary search and keeps value evaluation cache
/// friendly. Samples should still be added with mostly increasing indices,
/// since out-of-order inserts shift the tail of each vector.
///
/// The probabilities are not required to sum to one at all times; see
/// [`Transition::normalize`] and [`Transition::is_normalized`]. Every stored
/// probability is strictly positive.
///
/// The type also serves as a generic sparse distribution, e.g. over initial
/// states, in which case the rewards are simply zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    indices: Vec<usize>,
    probabilities: Vec<Probability>,
    rewards: Vec<Utility>,
}

impl Transition {
    /// Builds a transition from raw parallel vectors.
    ///
    /// Indices need not be sorted or unique; duplicates are aggregated
    /// exactly as repeated calls to [`Transition::add_sample`] would.
    pub fn new(
        indices: &[usize],
        probabilities: &[Probability],
        rewards: &[Utility],
    ) -> Result<Self, MdpError> {
        if indices.len() != probabilities.len() || indices.len() != rewards.len() {
            return Err(MdpError::invalid(format!(
                "mismatched lengths: {} indices, {} probabilities, {} rewards",
                indices.len(),
                probabilities.len(),
                rewards.len()
            )));
        }
        indices
            .iter()
            .zip(probabilities)
            .zip(rewards)
            .try_fold(Self::default(), |mut transition, ((&i, &p), &r)| {
                transition.add_sample(i, p, r)?;
                Ok::<_, MdpError>(transition)
            })
    }
    /// Builds a transition with zero rewards.
    pub fn unrewarded(indices: &[usize], probabilities: &[Probability]) -> Result<Self, MdpError> {
        Self::new(indices, probabilities, &vec![0.; indices.len()])
    }
    /// Builds a transition with zero rewards from a dense vector;
    /// the index of each probability is its position.
    pub fn dense(probabilities: &[Probability]) -> Result<Self, MdpError> {
        let indices = (0..probabilities.len()).collect::<Vec<_>>();
        Self::unrewarded(&indices, probabilities)
    }

    /// Adds a sample to the transition.
    ///
    /// A new successor is inserted at its sorted position. If the successor
    /// already exists, probabilities add up and the reward becomes the
    /// probability-weighted average:
    ///
    /// - p'(s) = p(s) + p
    /// - r'(s) = (p(s)·r(s) + p·r) / p'(s)
    ///
    /// Repeated samples therefore aggregate independently of their order.
    /// A zero-probability sample changes nothing.
    pub fn add_sample(
        &mut self,
        index: usize,
        probability: Probability,
        reward: Utility,
    ) -> Result<(), MdpError> {
        if !probability.is_finite() || probability < 0. {
            return Err(MdpError::invalid(format!(
                "sample probability must be finite and non-negative, got {}",
                probability
            )));
        }
        if !reward.is_finite() {
            return Err(MdpError::invalid(format!(
                "sample reward must be finite, got {}",
                reward
            )));
        }
        if probability == 0. {
            return Ok(());
        }
        match self.indices.binary_search(&index) {
            Ok(i) => {
                let prior = self.probabilities[i];
                let total = prior + probability;
                self.rewards[i] = (prior * self.rewards[i] + probability * reward) / total;
                self.probabilities[i] = total;
            }
            Err(i) => {
                self.indices.insert(i, index);
                self.probabilities.insert(i, probability);
                self.rewards.insert(i, reward);
            }
        }
        Ok(())
    }

    pub fn sum_probabilities(&self) -> Probability {
        self.probabilities.iter().sum()
    }
    /// Whether the probabilities sum to one within [`TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        is_distribution(&self.probabilities)
    }
    /// Rescales probabilities to sum to one.
    /// Fails when the probabilities sum to zero.
    pub fn normalize(&mut self) -> Result<(), MdpError> {
        let sum = self.sum_probabilities();
        if sum == 0. {
            return Err(MdpError::domain("transition probabilities sum to zero"));
        }
        self.probabilities.iter_mut().for_each(|p| *p /= sum);
        Ok(())
    }

    /// Expected one-step return: Σ p_i · (r_i + discount · v[i]).
    ///
    /// Fails on a transition with no successors, and when a successor
    /// lies outside the value function.
    pub fn compute_value(&self, valuefunction: &[Utility], discount: Discount) -> Result<Utility, MdpError> {
        match self.max_index() {
            None => Err(MdpError::precondition("value of a transition with no successors")),
            Some(max) if max >= valuefunction.len() => {
                Err(MdpError::range("value function", max, valuefunction.len()))
            }
            Some(_) => Ok(self
                .samples()
                .map(|(i, p, r)| p * (r + discount * valuefunction[i]))
                .sum()),
        }
    }
    /// Expected immediate reward: Σ p_i · r_i.
    pub fn mean_reward(&self) -> Result<Utility, MdpError> {
        if self.is_empty() {
            return Err(MdpError::precondition("mean reward of a transition with no successors"));
        }
        Ok(self.samples().map(|(_, p, r)| p * r).sum())
    }

    /// Adds scaled probabilities into a dense vector. Rewards are ignored.
    pub fn probabilities_addto(&self, scale: Probability, dense: &mut [Probability]) -> Result<(), MdpError> {
        if let Some(max) = self.max_index() {
            if max >= dense.len() {
                return Err(MdpError::range("dense vector", max, dense.len()));
            }
        }
        self.samples().for_each(|(i, p, _)| dense[i] += scale * p);
        Ok(())
    }
    /// Adds scaled probabilities, with their rewards, into another transition.
    /// Rewards of shared successors combine as in [`Transition::add_sample`].
    pub fn transition_addto(&self, scale: Probability, other: &mut Transition) -> Result<(), MdpError> {
        if !scale.is_finite() || scale < 0. {
            return Err(MdpError::invalid(format!(
                "scale must be finite and non-negative, got {}",
                scale
            )));
        }
        self.samples()
            .try_for_each(|(i, p, r)| other.add_sample(i, scale * p, r))
    }

    /// Dense probabilities of the given size, zero where no transition exists.
    pub fn probabilities_vector(&self, size: usize) -> Result<Vec<Probability>, MdpError> {
        let mut dense = vec![0.; size];
        self.probabilities_addto(1., &mut dense)?;
        Ok(dense)
    }
    /// Dense rewards of the given size, zero where no transition exists.
    pub fn rewards_vector(&self, size: usize) -> Result<Vec<Utility>, MdpError> {
        let mut dense = vec![0.; size];
        if let Some(max) = self.max_index() {
            if max >= size {
                return Err(MdpError::range("dense vector", max, size));
            }
        }
        self.samples().for_each(|(i, _, r)| dense[i] = r);
        Ok(dense)
    }

    /// (index, probability, reward) triples in increasing index order.
    pub fn samples(&self) -> impl Iterator<Item = (usize, Probability, Utility)> + '_ {
        self.indices
            .iter()
            .zip(&self.probabilities)
            .zip(&self.rewards)
            .map(|((&i, &p), &r)| (i, p, r))
    }
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
    pub fn probabilities(&self) -> &[Probability] {
        &self.probabilities
    }
    pub fn rewards(&self) -> &[Utility] {
        &self.rewards
    }
    /// Number of successors with positive probability.
    pub fn size(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    /// Largest successor index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }
    /// Reward of the sample at the given position (not successor index).
    pub fn reward(&self, position: usize) -> Result<Utility, MdpError> {
        self.rewards
            .get(position)
            .copied()
            .ok_or_else(|| MdpError::range("sample", position, self.size()))
    }
    /// Overwrites the reward of the sample at the given position.
    pub fn set_reward(&mut self, position: usize, reward: Utility) -> Result<(), MdpError> {
        if !reward.is_finite() {
            return Err(MdpError::invalid(format!("reward must be finite, got {}", reward)));
        }
        let size = self.size();
        self.rewards
            .get_mut(position)
            .map(|r| *r = reward)
            .ok_or_else(|| MdpError::range("sample", position, size))
    }
}

impl Arbitrary for Transition {
    fn random() -> Self {
        const N: usize = 8;
        const S: usize = 16;
        let mut transition = (0..rand::random_range(1..=N))
            .map(|_| {
                (
                    rand::random_range(0..S),
                    rand::random_range(0.01..1.0),
                    rand::random_range(-1.0..1.0),
                )
            })
            .fold(Self::default(), |mut t, (i, p, r)| {
                t.add_sample(i, p, r).expect("positive finite sample");
                t
            });
        transition.normalize().expect("positive mass");
        transition
    }
}
