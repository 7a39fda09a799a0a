use crate::*;

/// Sense in which nature optimizes action values.
///
/// Directions are zero-sized markers passed as type parameters, so the
/// pessimistic and optimistic searches cannot be confused at a call site.
pub trait Direction {
    /// Maps a value into the minimizing frame. Applying it twice is the identity.
    fn orient(value: Utility) -> Utility;
    /// Whether `candidate` is strictly better than `incumbent` in this sense.
    fn improves(candidate: Utility, incumbent: Utility) -> bool {
        Self::orient(candidate) < Self::orient(incumbent)
    }
}

/// Pessimistic nature: drives the value down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimize;

impl Direction for Minimize {
    fn orient(value: Utility) -> Utility {
        value
    }
}

/// Optimistic nature: drives the value up.
#[derive(Debug, Clone, Copy, Default)]
pub struct Maximize;

impl Direction for Maximize {
    fn orient(value: Utility) -> Utility {
        -value
    }
}
