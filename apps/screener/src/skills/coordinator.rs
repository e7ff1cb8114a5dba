//! Semantic Match Coordinator: picks exactly one authoritative match source
//! per request. Local and external results are never spliced together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::skills::matcher::match_skill_sets;
use crate::skills::models::{JobSkills, MatchSet, Priority, SkillCategory, SkillMatch, SkillSet};
use crate::skills::synonyms::equivalent;

/// Local match ratio below which an external result takes over.
pub const EXTERNAL_PREFERENCE_RATIO: f64 = 0.5;

/// One pair as reported by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalMatch {
    pub jd_skill: String,
    #[serde(default)]
    pub resume_skill: Option<String>,
    pub confidence: f64,
    /// As reported. The JD's own lists decide the scored category and priority.
    #[serde(default)]
    pub category: Option<SkillCategory>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Where the authoritative MatchSet came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "match_set", rename_all = "snake_case")]
pub enum MatchSource {
    Local(MatchSet),
    External(MatchSet),
}

impl MatchSource {
    pub fn match_set(&self) -> &MatchSet {
        match self {
            MatchSource::Local(set) | MatchSource::External(set) => set,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchSource::Local(_) => "local",
            MatchSource::External(_) => "external",
        }
    }
}

/// Builds one SkillMatch per JD skill from external pairs.
///
/// Each JD skill takes the confidence and résumé skill of the strongest
/// external pair whose `jd_skill` is equivalent to it, or is Missing when no
/// pair names it. Pairs naming no JD skill are dropped. Category and priority
/// always come from the JD, and statuses go through the shared thresholds.
pub fn external_match_set(jd: &JobSkills, external: &[ExternalMatch]) -> MatchSet {
    let matches = jd
        .categorized()
        .into_iter()
        .map(|(jd_skill, category)| {
            let best = external
                .iter()
                .filter(|pair| equivalent(&pair.jd_skill, jd_skill))
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence));

            SkillMatch::new(
                jd_skill,
                best.and_then(|pair| pair.resume_skill.clone()),
                best.map_or(0.0, |pair| pair.confidence),
                category,
                jd.priority_of(jd_skill, category),
            )
        })
        .collect();

    MatchSet::new(matches)
}

/// Always computes the local result first. The external result is used
/// wholesale only when it is present, non-empty, and the local match ratio
/// is below `EXTERNAL_PREFERENCE_RATIO`.
pub fn resolve_matches(
    jd: &JobSkills,
    candidate: &SkillSet,
    external: Option<&[ExternalMatch]>,
) -> MatchSource {
    let local = match_skill_sets(jd, candidate);
    let ratio = local.match_ratio();

    match external {
        Some(pairs) if !pairs.is_empty() && ratio < EXTERNAL_PREFERENCE_RATIO => {
            debug!(
                local_ratio = ratio,
                external_pairs = pairs.len(),
                "Local matching weak; using external match result"
            );
            MatchSource::External(external_match_set(jd, pairs))
        }
        _ => MatchSource::Local(local),
    }
}
