use crate::error::{EngineError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stat counts toward a bonus once it reaches this value
pub const DOUBLE_DIGIT_THRESHOLD: f64 = 10.0;

/// Point weights for the league's scoring ruleset
///
/// Built once at startup and shared by reference; nothing mutates it after
/// construction. Negative weights (turnovers, missed shots) subtract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub points: Decimal,

    pub rebounds: Decimal,

    pub assists: Decimal,

    pub steals: Decimal,

    pub blocks: Decimal,

    /// Per turnover (negative)
    pub turnovers: Decimal,

    pub three_point_made: Decimal,

    /// Awarded for exactly two double-digit categories
    pub double_double: Decimal,

    /// Awarded for three or more double-digit categories (replaces the double-double)
    pub triple_double: Decimal,

    /// Per missed field goal (negative)
    pub missed_field_goal: Decimal,

    /// Per missed free throw (negative)
    pub missed_free_throw: Decimal,
}

/// Which bonus a rule awards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    TripleDouble,
    DoubleDouble,
}

/// A bonus that applies once `min_categories` stats reach double digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRule {
    pub min_categories: usize,
    pub kind: BonusKind,
    pub bonus: Decimal,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            points: Decimal::ONE,
            rebounds: Decimal::ONE,
            assists: Decimal::new(15, 1),
            steals: Decimal::from(3),
            blocks: Decimal::from(3),
            turnovers: Decimal::NEGATIVE_ONE,
            three_point_made: Decimal::ONE,
            double_double: Decimal::from(3),
            triple_double: Decimal::from(7),
            missed_field_goal: Decimal::new(-5, 1),
            missed_free_throw: Decimal::new(-5, 1),
        }
    }
}

impl ScoringSettings {
    /// Bonus rules ordered highest threshold first
    ///
    /// Evaluation stops at the first rule that matches, so a triple-double
    /// never also earns the double-double bonus.
    pub fn bonus_rules(&self) -> [BonusRule; 2] {
        [
            BonusRule {
                min_categories: 3,
                kind: BonusKind::TripleDouble,
                bonus: self.triple_double,
            },
            BonusRule {
                min_categories: 2,
                kind: BonusKind::DoubleDouble,
                bonus: self.double_double,
            },
        ]
    }

    /// Reject rulesets where a penalty weight would add points
    pub fn validate(&self) -> Result<()> {
        let penalties = [
            ("turnovers", self.turnovers),
            ("missed_field_goal", self.missed_field_goal),
            ("missed_free_throw", self.missed_free_throw),
        ];

        for (name, weight) in penalties {
            if weight.is_sign_positive() && !weight.is_zero() {
                return Err(EngineError::InvalidConfig {
                    message: format!("{name} weight must not be positive, got {weight}"),
                });
            }
        }

        if self.double_double.is_sign_negative() || self.triple_double.is_sign_negative() {
            return Err(EngineError::InvalidConfig {
                message: "bonus weights must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ScoringSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.assists, Decimal::new(15, 1));
        assert_eq!(settings.missed_free_throw, Decimal::new(-5, 1));
    }

    #[test]
    fn test_bonus_rules_highest_threshold_first() {
        let rules = ScoringSettings::default().bonus_rules();
        assert_eq!(rules[0].kind, BonusKind::TripleDouble);
        assert!(rules.windows(2).all(|pair| pair[0].min_categories > pair[1].min_categories));
    }

    #[test]
    fn test_positive_penalty_rejected() {
        let settings = ScoringSettings { turnovers: Decimal::ONE, ..Default::default() };
        assert!(matches!(settings.validate(), Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_partial_settings_deserialize_with_defaults() {
        let settings: ScoringSettings =
            serde_json::from_str(r#"{ "assists": 2, "steals": "2.5" }"#).unwrap();
        assert_eq!(settings.assists, Decimal::from(2));
        assert_eq!(settings.steals, Decimal::new(25, 1));
        assert_eq!(settings.blocks, Decimal::from(3));
    }
}
