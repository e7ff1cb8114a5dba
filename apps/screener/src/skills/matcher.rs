//! Local Matcher: deterministic skill matching over normalized forms.
//!
//! Algorithm, first hit wins:
//! 1. normalized forms equal → 0.95
//! 2. one normalized form contains the other → 0.85
//! 3. otherwise → 0.0

use crate::skills::models::{JobSkills, MatchSet, SkillMatch, SkillSet};
use crate::skills::synonyms::normalize;

pub const EXACT_CONFIDENCE: f64 = 0.95;
pub const CONTAINMENT_CONFIDENCE: f64 = 0.85;

/// Shorter strings than this never match by containment ("c", "go", "r").
const MIN_CONTAINMENT_LEN: usize = 3;

/// Best candidate skill for one JD skill.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMatch {
    pub resume_skill: Option<String>,
    pub confidence: f64,
}

/// Matches `jd_skill` against `candidate_skills`. The earliest candidate
/// skill with the highest confidence wins.
pub fn match_skill<'a>(
    jd_skill: &str,
    candidate_skills: impl IntoIterator<Item = &'a String>,
) -> LocalMatch {
    let target = normalize(jd_skill);
    let mut best = LocalMatch {
        resume_skill: None,
        confidence: 0.0,
    };

    if target.is_empty() {
        return best;
    }

    for skill in candidate_skills {
        let confidence = pair_confidence(&target, &normalize(skill));
        if confidence > best.confidence {
            best = LocalMatch {
                resume_skill: Some(skill.clone()),
                confidence,
            };
            if confidence >= EXACT_CONFIDENCE {
                break;
            }
        }
    }

    best
}

fn pair_confidence(target: &str, candidate: &str) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    if target == candidate {
        return EXACT_CONFIDENCE;
    }

    let shorter = target.len().min(candidate.len());
    if shorter >= MIN_CONTAINMENT_LEN && (target.contains(candidate) || candidate.contains(target))
    {
        CONTAINMENT_CONFIDENCE
    } else {
        0.0
    }
}

/// Runs the local matcher for every JD skill against the candidate's full
/// skill set, producing one SkillMatch per JD skill.
pub fn match_skill_sets(jd: &JobSkills, candidate: &SkillSet) -> MatchSet {
    let matches = jd
        .categorized()
        .into_iter()
        .map(|(jd_skill, category)| {
            let found = match_skill(jd_skill, candidate.all());
            SkillMatch::new(
                jd_skill,
                found.resume_skill,
                found.confidence,
                category,
                jd.priority_of(jd_skill, category),
            )
        })
        .collect();

    MatchSet::new(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::models::{MatchStatus, Priority, SkillCategory};

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_equivalence_via_alias() {
        let found = match_skill("Kubernetes", &skills(&["docker", "k8s"]));
        assert_eq!(found.confidence, EXACT_CONFIDENCE);
        assert_eq!(found.resume_skill.as_deref(), Some("k8s"));
    }

    #[test]
    fn test_containment_either_direction() {
        let found = match_skill("AWS", &skills(&["aws lambda"]));
        assert_eq!(found.confidence, CONTAINMENT_CONFIDENCE);

        let found = match_skill("distributed systems design", &skills(&["distributed systems"]));
        assert_eq!(found.confidence, CONTAINMENT_CONFIDENCE);
    }

    #[test]
    fn test_exact_beats_earlier_containment() {
        let found = match_skill("rust", &skills(&["rust embedded", "Rust"]));
        assert_eq!(found.confidence, EXACT_CONFIDENCE);
        assert_eq!(found.resume_skill.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_short_tokens_do_not_match_by_containment() {
        let found = match_skill("R", &skills(&["react", "rust"]));
        assert_eq!(found.confidence, 0.0);
        assert!(found.resume_skill.is_none());
    }

    #[test]
    fn test_no_match_is_zero() {
        let found = match_skill("docker", &skills(&["kubernetes"]));
        assert_eq!(found.confidence, 0.0);
    }

    #[test]
    fn test_match_skill_sets_one_entry_per_jd_skill() {
        let jd = JobSkills {
            skills: SkillSet {
                technical: skills(&["Python"]),
                tools: skills(&["Docker"]),
                soft: skills(&["Communication"]),
            },
            ..Default::default()
        };
        let candidate = SkillSet {
            technical: skills(&["python"]),
            tools: skills(&["kubernetes"]),
            soft: skills(&["communication skills"]),
        };

        let set = match_skill_sets(&jd, &candidate);
        assert_eq!(set.total(), 3);
        assert_eq!(set.matched(), 2);
        assert_eq!(set.missing(), 1);

        let docker = &set.matches()[1];
        assert_eq!(docker.category, SkillCategory::Tools);
        assert_eq!(docker.priority, Priority::Preferred);
        assert_eq!(docker.status, MatchStatus::Missing);
    }
}
