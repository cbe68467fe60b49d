use serde::{Deserialize, Serialize};

use crate::common::MAX_PREFERENCES;
use crate::error::ValidationError;

/// Edge cost of placing a student in a course, by preference rank.
///
/// More negative is more desirable. Unranked placements cost 0: they mean
/// "no preference expressed", not "worst outcome".
///
/// Deserialization goes through [`PreferenceCosts::new`], so a scale read
/// from a config file is checked like one built in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "[i64; MAX_PREFERENCES]",
    into = "[i64; MAX_PREFERENCES]"
)]
pub struct PreferenceCosts([i64; MAX_PREFERENCES]);

/// Largest accepted cost magnitude.
///
/// Keeps flow costs, potentials and assignment totals far inside `i64` for
/// any instance that fits in memory.
pub const MAX_COST_MAGNITUDE: i64 = 1_000_000_000;

impl PreferenceCosts {
    pub const DEFAULT: PreferenceCosts = PreferenceCosts([-100, -70, -30]);

    /// Rejects scales that are not negative, strictly increasing by rank and
    /// within [`MAX_COST_MAGNITUDE`].
    pub fn new(costs: [i64; MAX_PREFERENCES]) -> Result<Self, ValidationError> {
        let in_range = costs
            .iter()
            .all(|c| (-MAX_COST_MAGNITUDE..0).contains(c));
        let increasing = costs.windows(2).all(|w| w[0] < w[1]);
        if !in_range || !increasing {
            return Err(ValidationError::InvalidCostScale(costs.to_vec()));
        }
        Ok(PreferenceCosts(costs))
    }
    /// Cost of a placement at `rank`, `None` meaning the course is not on the list.
    ///
    /// Ranks past the scale are treated as unranked.
    pub fn cost(&self, rank: Option<usize>) -> i64 {
        rank.and_then(|r| self.0.get(r).copied()).unwrap_or(0)
    }
    pub fn as_array(&self) -> [i64; MAX_PREFERENCES] {
        self.0
    }
}

impl TryFrom<[i64; MAX_PREFERENCES]> for PreferenceCosts {
    type Error = ValidationError;

    fn try_from(costs: [i64; MAX_PREFERENCES]) -> Result<Self, Self::Error> {
        Self::new(costs)
    }
}

impl From<PreferenceCosts> for [i64; MAX_PREFERENCES] {
    fn from(costs: PreferenceCosts) -> Self {
        costs.0
    }
}

impl Default for PreferenceCosts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let costs = PreferenceCosts::default();
        assert_eq!(costs.cost(Some(0)), -100);
        assert_eq!(costs.cost(Some(1)), -70);
        assert_eq!(costs.cost(Some(2)), -30);
        assert_eq!(costs.cost(None), 0);
        assert_eq!(costs.cost(Some(3)), 0);
    }

    #[test]
    fn test_rejects_bad_scales() {
        assert!(PreferenceCosts::new([-10, -5, -1]).is_ok());
        assert_eq!(
            PreferenceCosts::new([-10, -10, -1]),
            Err(ValidationError::InvalidCostScale(vec![-10, -10, -1]))
        );
        assert!(PreferenceCosts::new([-30, -70, -100]).is_err());
        assert!(PreferenceCosts::new([-10, -5, 0]).is_err());
    }

    #[test]
    fn test_rejects_oversized_costs() {
        assert!(PreferenceCosts::new([-MAX_COST_MAGNITUDE, -2, -1]).is_ok());
        assert_eq!(
            PreferenceCosts::new([i64::MIN / 2 - 1, -2, -1]),
            Err(ValidationError::InvalidCostScale(vec![i64::MIN / 2 - 1, -2, -1]))
        );
        assert!(PreferenceCosts::new([-MAX_COST_MAGNITUDE - 1, -2, -1]).is_err());
    }

    #[test]
    fn test_json_scale_is_checked() {
        let costs: PreferenceCosts = serde_json::from_str("[-9, -4, -1]").unwrap();
        assert_eq!(costs.as_array(), [-9, -4, -1]);
        assert_eq!(serde_json::to_string(&costs).unwrap(), "[-9,-4,-1]");

        let err = serde_json::from_str::<PreferenceCosts>("[50, 0, 100]").unwrap_err();
        assert!(err.to_string().contains("strictly increasing"), "{err}");
        assert!(serde_json::from_str::<PreferenceCosts>("[-10, -10, -1]").is_err());
        assert!(serde_json::from_str::<PreferenceCosts>("[-4611686018427387905, -2, -1]").is_err());
    }
}
