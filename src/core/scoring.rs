//! Success-probability scoring for plans and recovery strategies
//!
//! The weights are heuristics with no statistical derivation. They live in a
//! named [`ScoringWeights`] value so they can be recalibrated, and any other
//! model can be plugged in through [`SuccessScorer`].

use crate::core::models::{CreditLoad, GraduationGoal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named recovery strategies after a failed course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryKind {
    /// Retake in the next regular term offering the course
    ImmediateRetake,
    /// Retake in the following summer session
    OffCycleRetake,
    /// Spend one offering preparing, then retake
    PreparationThenRetake,
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ImmediateRetake => "immediate retake",
            Self::OffCycleRetake => "off-cycle retake",
            Self::PreparationThenRetake => "preparation then retake",
        };
        write!(f, "{label}")
    }
}

/// Inputs to the plan score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanFeatures {
    /// Credit-load preference the plan was built with
    pub load: CreditLoad,
    /// Graduation goal
    pub goal: GraduationGoal,
    /// Terms above the typical credit maximum
    pub heavy_terms: usize,
    /// Regular terms of delay caused by failed courses
    pub failure_delays: usize,
}

/// Inputs to a recovery-strategy score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryFeatures {
    /// Strategy being scored
    pub kind: RecoveryKind,
    /// Difficulty of the failed course (1-5)
    pub difficulty: u8,
    /// Regular terms the strategy adds to the timeline
    pub delay_terms: usize,
}

/// Pluggable success model. Implementations must be monotone: a more
/// aggressive load, an early goal, or more failure delays never raise the score.
pub trait SuccessScorer: Send + Sync {
    /// Probability in `[0, 1]` that the plan is completed as scheduled
    fn plan_success(&self, features: &PlanFeatures) -> f64;

    /// Probability in `[0, 1]` that the recovery strategy succeeds
    fn recovery_success(&self, features: &RecoveryFeatures) -> f64;
}

/// Additive weights for [`WeightedScorer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Starting score of a plan
    pub base: f64,
    /// Adjustment for a light load
    pub light_load: f64,
    /// Adjustment for a standard load
    pub standard_load: f64,
    /// Adjustment for a heavy load
    pub heavy_load: f64,
    /// Adjustment per overloaded term
    pub per_heavy_term: f64,
    /// Adjustment for an early graduation goal
    pub early_goal: f64,
    /// Adjustment per regular term of failure delay
    pub per_failure_delay: f64,
    /// Base score of an immediate retake
    pub immediate_retake: f64,
    /// Base score of an off-cycle retake
    pub off_cycle_retake: f64,
    /// Base score of preparing before retaking
    pub preparation_retake: f64,
    /// Adjustment per difficulty point of the failed course
    pub per_difficulty: f64,
    /// Lower clamp
    pub floor: f64,
    /// Upper clamp
    pub ceiling: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 0.75,
            light_load: 0.05,
            standard_load: 0.0,
            heavy_load: -0.15,
            per_heavy_term: -0.05,
            early_goal: -0.1,
            per_failure_delay: -0.1,
            immediate_retake: 0.7,
            off_cycle_retake: 0.6,
            preparation_retake: 0.85,
            per_difficulty: -0.03,
            floor: 0.1,
            ceiling: 0.95,
        }
    }
}

/// Default scorer: a clamped sum of [`ScoringWeights`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    /// Create a scorer with custom weights
    #[must_use]
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Weights in use
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.weights.floor, self.weights.ceiling)
    }
}

#[allow(clippy::cast_precision_loss)]
impl SuccessScorer for WeightedScorer {
    fn plan_success(&self, features: &PlanFeatures) -> f64 {
        let w = &self.weights;
        let load = match features.load {
            CreditLoad::Light => w.light_load,
            CreditLoad::Standard => w.standard_load,
            CreditLoad::Heavy => w.heavy_load,
        };
        let goal = if features.goal == GraduationGoal::Early {
            w.early_goal
        } else {
            0.0
        };

        self.clamp(
            w.base
                + load
                + goal
                + w.per_heavy_term * features.heavy_terms as f64
                + w.per_failure_delay * features.failure_delays as f64,
        )
    }

    fn recovery_success(&self, features: &RecoveryFeatures) -> f64 {
        let w = &self.weights;
        let base = match features.kind {
            RecoveryKind::ImmediateRetake => w.immediate_retake,
            RecoveryKind::OffCycleRetake => w.off_cycle_retake,
            RecoveryKind::PreparationThenRetake => w.preparation_retake,
        };

        self.clamp(
            base + w.per_difficulty * f64::from(features.difficulty)
                + w.per_failure_delay * 0.5 * features.delay_terms as f64,
        )
    }
}
