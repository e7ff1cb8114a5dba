//! ATS score: résumé-to-JD alignment, independent of external evidence.
//!
//! ats = 0.35·skill + 0.25·tool + 0.10·soft + 0.15·experience + 0.15·keyword_density

use serde::{Deserialize, Serialize};

use crate::skills::models::{weighted_percent, JobSkills, MatchSet, SkillCategory};
use crate::skills::synonyms::normalize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsWeights {
    pub skill: f64,
    pub tool: f64,
    pub soft: f64,
    pub experience: f64,
    pub keyword_density: f64,
}

impl Default for AtsWeights {
    fn default() -> Self {
        Self {
            skill: 0.35,
            tool: 0.25,
            soft: 0.10,
            experience: 0.15,
            keyword_density: 0.15,
        }
    }
}

/// Unrounded ATS components, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtsComponents {
    pub skill: f64,
    pub tool: f64,
    pub soft: f64,
    pub experience: f64,
    pub keyword_density: f64,
}

impl AtsComponents {
    pub fn compute(
        match_set: &MatchSet,
        jd: &JobSkills,
        candidate_years: f64,
        resume_text: &str,
    ) -> Self {
        Self {
            skill: weighted_percent(match_set.in_category(SkillCategory::Technical)),
            tool: weighted_percent(match_set.in_category(SkillCategory::Tools)),
            soft: weighted_percent(match_set.in_category(SkillCategory::Soft)),
            experience: experience_match(candidate_years, jd.required_experience),
            keyword_density: keyword_density(jd, resume_text),
        }
    }

    pub fn total(&self, weights: &AtsWeights) -> f64 {
        weights.skill * self.skill
            + weights.tool * self.tool
            + weights.soft * self.soft
            + weights.experience * self.experience
            + weights.keyword_density * self.keyword_density
    }
}

/// Step function over `candidate / required`. Below 0.4 of the requirement
/// scores 0; no requirement at all scores 100.
pub fn experience_match(candidate_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 {
        return 100.0;
    }

    match candidate_years.max(0.0) / required_years {
        r if r >= 1.0 => 100.0,
        r if r >= 0.8 => 70.0,
        r if r >= 0.6 => 50.0,
        r if r >= 0.4 => 30.0,
        _ => 0.0,
    }
}

/// Percentage of JD skills literally present in the résumé text, by raw or
/// normalized form. No JD skills scores 100.
pub fn keyword_density(jd: &JobSkills, resume_text: &str) -> f64 {
    let haystack = resume_text.to_lowercase();
    let skills = jd.categorized();

    if skills.is_empty() {
        return 100.0;
    }

    let found = skills
        .iter()
        .filter(|(skill, _)| {
            let raw = skill.trim().to_lowercase();
            contains_term(&haystack, &raw) || contains_term(&haystack, &normalize(skill))
        })
        .count();

    found as f64 / skills.len() as f64 * 100.0
}

/// Whole-term containment: the match may not be flanked by alphanumerics,
/// so "go" is not found in "good".
fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
