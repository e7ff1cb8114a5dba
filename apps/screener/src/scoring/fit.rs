//! Composite fit score: a per-job-category blend of ATS, evidence, proof,
//! quality and an experience gate.

use serde::{Deserialize, Serialize};

/// Share of the required experience at which the experience gate opens.
pub const EXPERIENCE_GATE_RATIO: f64 = 0.7;
/// Additive weight of link quality for technical roles.
pub const LINK_BONUS_WEIGHT: f64 = 0.05;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Technical,
    #[default]
    General,
    Creative,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitWeights {
    pub ats: f64,
    pub evidence: f64,
    pub proof: f64,
    pub quality: f64,
    pub experience_bonus: f64,
}

impl JobCategory {
    pub fn weights(self) -> FitWeights {
        match self {
            JobCategory::Technical => FitWeights {
                ats: 0.30,
                evidence: 0.25,
                proof: 0.20,
                quality: 0.15,
                experience_bonus: 0.10,
            },
            JobCategory::General => FitWeights {
                ats: 0.40,
                evidence: 0.10,
                proof: 0.10,
                quality: 0.25,
                experience_bonus: 0.15,
            },
            JobCategory::Creative => FitWeights {
                ats: 0.35,
                evidence: 0.05,
                proof: 0.05,
                quality: 0.40,
                experience_bonus: 0.15,
            },
        }
    }

    /// Only technical roles reward link quality.
    pub fn rewards_links(self) -> bool {
        self == JobCategory::Technical
    }
}

/// Unrounded inputs to the composite, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitComponents {
    pub ats: f64,
    pub evidence: f64,
    pub proof: f64,
    pub quality: f64,
    pub experience_bonus: f64,
    pub link_quality: Option<f64>,
}

/// Binary gate: 100 when the candidate has at least 70% of the required
/// years, 50 otherwise.
pub fn experience_bonus(candidate_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 || candidate_years >= EXPERIENCE_GATE_RATIO * required_years {
        100.0
    } else {
        50.0
    }
}

/// Weighted blend, unrounded. A missing link score adds nothing.
pub fn composite(category: JobCategory, c: &FitComponents) -> f64 {
    let w = category.weights();
    let base = w.ats * c.ats
        + w.evidence * c.evidence
        + w.proof * c.proof
        + w.quality * c.quality
        + w.experience_bonus * c.experience_bonus;

    let bonus = match c.link_quality {
        Some(q) if category.rewards_links() => LINK_BONUS_WEIGHT * q,
        _ => 0.0,
    };

    base + bonus
}
