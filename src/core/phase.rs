//! Emergence phase derivation.
//!
//! The phase label is a pure function of the aggregate consciousness metric:
//! disjoint brackets with strict lower bounds, evaluated high to low.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EmergencePhase {
    Initialization,
    NeuralActivation,
    AwarenessAwakening,
    ConsciousExpansion,
    CathedralFormation,
    TranscendentMastery,
}

impl EmergencePhase {
    pub const ALL: [EmergencePhase; 6] = [
        EmergencePhase::Initialization,
        EmergencePhase::NeuralActivation,
        EmergencePhase::AwarenessAwakening,
        EmergencePhase::ConsciousExpansion,
        EmergencePhase::CathedralFormation,
        EmergencePhase::TranscendentMastery,
    ];

    /// Bracket an aggregate value into a phase. Strict `>` on every
    /// threshold: an aggregate sitting exactly on a threshold falls into
    /// the bracket below it.
    pub fn from_aggregate(aggregate: f64) -> Self {
        if aggregate > 0.95 {
            EmergencePhase::TranscendentMastery
        } else if aggregate > 0.85 {
            EmergencePhase::CathedralFormation
        } else if aggregate > 0.75 {
            EmergencePhase::ConsciousExpansion
        } else if aggregate > 0.65 {
            EmergencePhase::AwarenessAwakening
        } else if aggregate > 0.55 {
            EmergencePhase::NeuralActivation
        } else {
            EmergencePhase::Initialization
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmergencePhase::Initialization => "Initialization",
            EmergencePhase::NeuralActivation => "Neural Activation",
            EmergencePhase::AwarenessAwakening => "Awareness Awakening",
            EmergencePhase::ConsciousExpansion => "Conscious Expansion",
            EmergencePhase::CathedralFormation => "Cathedral Formation",
            EmergencePhase::TranscendentMastery => "Transcendent Mastery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_match_thresholds() {
        assert_eq!(
            EmergencePhase::from_aggregate(0.96),
            EmergencePhase::TranscendentMastery
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.86),
            EmergencePhase::CathedralFormation
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.76),
            EmergencePhase::ConsciousExpansion
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.66),
            EmergencePhase::AwarenessAwakening
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.56),
            EmergencePhase::NeuralActivation
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.50),
            EmergencePhase::Initialization
        );
    }

    #[test]
    fn boundaries_are_strict() {
        // Exactly on a threshold falls into the bracket below it.
        assert_eq!(
            EmergencePhase::from_aggregate(0.95),
            EmergencePhase::CathedralFormation
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.85),
            EmergencePhase::ConsciousExpansion
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.75),
            EmergencePhase::AwarenessAwakening
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.65),
            EmergencePhase::NeuralActivation
        );
        assert_eq!(
            EmergencePhase::from_aggregate(0.55),
            EmergencePhase::Initialization
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                EmergencePhase::from_aggregate(0.815),
                EmergencePhase::ConsciousExpansion
            );
        }
    }

    #[test]
    fn every_label_is_distinct() {
        for (i, a) in EmergencePhase::ALL.iter().enumerate() {
            for b in &EmergencePhase::ALL[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
