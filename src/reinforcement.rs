//! Reinforcement learning theories
//!
//! A theory turns a vector of variables into a scalar that is added to the
//! weight of a visual-to-action link. A model selects one theory and keeps
//! it for the rest of its life.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ChrestError, ChrestResult};

/// Closed set of reinforcement theories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReinforcementTheory {
    /// Reward discounted by how long ago the action was taken.
    ///
    /// Variables: `[reward, discount_rate, current_time, action_time]`.
    /// Value: `reward * discount_rate ^ (current_time - action_time)`.
    ProfitSharingWithDiscountRate,
}

impl ReinforcementTheory {
    pub const ALL: [ReinforcementTheory; 1] = [ReinforcementTheory::ProfitSharingWithDiscountRate];

    pub fn name(self) -> &'static str {
        match self {
            ReinforcementTheory::ProfitSharingWithDiscountRate => {
                "profit_sharing_with_discount_rate"
            }
        }
    }

    /// Number of variables the theory consumes.
    pub fn variable_count(self) -> usize {
        match self {
            ReinforcementTheory::ProfitSharingWithDiscountRate => 4,
        }
    }

    pub fn correct_number_of_variables(self, variables: &[f64]) -> bool {
        variables.len() == self.variable_count()
    }

    /// Reinforcement value for `variables`. Fails when the theory expects
    /// a different number of variables.
    pub fn calculate_reinforcement_value(self, variables: &[f64]) -> ChrestResult<f64> {
        match (self, variables) {
            (ReinforcementTheory::ProfitSharingWithDiscountRate, &[reward, discount, now, then]) => {
                Ok(reward * discount.powf(now - then))
            }
            _ => Err(ChrestError::IncorrectVariableCount {
                theory: self.name(),
                got: variables.len(),
            }),
        }
    }
}

impl fmt::Display for ReinforcementTheory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReinforcementTheory {
    type Err = ChrestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChrestError::config(format!("unknown reinforcement theory {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_sharing_variable_count() {
        let theory = ReinforcementTheory::ProfitSharingWithDiscountRate;
        assert!(theory.correct_number_of_variables(&[1.0, 0.5, 2.0, 1.0]));
        assert!(!theory.correct_number_of_variables(&[1.0, 0.5, 2.0]));
        assert!(!theory.correct_number_of_variables(&[1.0, 0.5, 2.0, 1.0, 0.0]));
    }

    #[test]
    fn test_profit_sharing_value() {
        let theory = ReinforcementTheory::ProfitSharingWithDiscountRate;
        let value = theory.calculate_reinforcement_value(&[1.0, 0.5, 2.0, 1.0]).unwrap();
        assert!((value - 0.5).abs() < 1e-12);

        let immediate = theory.calculate_reinforcement_value(&[3.0, 0.5, 4.0, 4.0]).unwrap();
        assert!((immediate - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_variable_count_is_an_error() {
        let theory = ReinforcementTheory::ProfitSharingWithDiscountRate;
        for vars in [&[][..], &[1.0][..], &[1.0, 0.5, 2.0][..], &[1.0, 0.5, 2.0, 1.0, 9.0][..]] {
            assert_eq!(
                theory.calculate_reinforcement_value(vars),
                Err(ChrestError::IncorrectVariableCount {
                    theory: "profit_sharing_with_discount_rate",
                    got: vars.len(),
                })
            );
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let theory: ReinforcementTheory = "profit_sharing_with_discount_rate".parse().unwrap();
        assert_eq!(theory, ReinforcementTheory::ProfitSharingWithDiscountRate);
        assert!("nonsense".parse::<ReinforcementTheory>().is_err());
    }
}
