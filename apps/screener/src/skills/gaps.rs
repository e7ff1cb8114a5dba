use serde::{Deserialize, Serialize};

use crate::skills::models::{weighted_percent, MatchSet, MatchStatus, Priority};

/// Skill gaps derived from the MatchSet used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub missing: Vec<String>,
    pub critical_gaps: Vec<String>,
    pub nice_to_have_gaps: Vec<String>,
    /// Priority-weighted coverage in [0, 100], same partial-credit rule as
    /// the ATS category scores.
    pub coverage: f64,
}

/// Reads gaps off an existing MatchSet. Never re-runs matching.
pub fn analyze_gaps(match_set: &MatchSet) -> GapReport {
    let mut critical_gaps = Vec::new();
    let mut nice_to_have_gaps = Vec::new();

    for m in match_set
        .matches()
        .iter()
        .filter(|m| m.status == MatchStatus::Missing)
    {
        if m.priority == Priority::Critical {
            critical_gaps.push(m.jd_skill.clone());
        } else {
            nice_to_have_gaps.push(m.jd_skill.clone());
        }
    }

    GapReport {
        missing: match_set.missing_skills(),
        critical_gaps,
        nice_to_have_gaps,
        coverage: weighted_percent(match_set.matches()),
    }
}
