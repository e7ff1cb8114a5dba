//! Scoring Engine: pure functions from a MatchSet, evidence and quality
//! signals to a ScoreBreakdown.
//!
//! Every intermediate value stays an unrounded `f64`; rounding and clamping
//! to [0, 100] happen once, in `finalize`.

pub mod ats;
pub mod evidence;
pub mod fit;
pub mod proof;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceProfile;
use crate::scoring::ats::{AtsComponents, AtsWeights};
use crate::scoring::fit::{composite, experience_bonus, FitComponents, JobCategory};
use crate::scoring::proof::{proof_score, SkillProof};
use crate::skills::gaps::GapReport;
use crate::skills::models::{JobSkills, MatchSet};

/// Everything the scoring engine reads for one (candidate, JD) pair.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub match_set: &'a MatchSet,
    pub jd: &'a JobSkills,
    pub resume_text: &'a str,
    pub candidate_years: f64,
    pub proofs: &'a [SkillProof],
    pub evidence: &'a EvidenceProfile,
    pub quality: f64,
    pub link_quality: Option<f64>,
    pub job_category: JobCategory,
}

/// Final integer scores, each in [0, 100].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_match: u32,
    pub tool_match: u32,
    pub soft_match: u32,
    pub experience_match: u32,
    pub keyword_density: u32,
    pub ats: u32,
    pub evidence: u32,
    pub proof: u32,
    pub quality: u32,
    pub experience_bonus: u32,
    pub link_quality: Option<u32>,
    pub composite: u32,
    /// JD skills the candidate is missing, read off the same MatchSet as the
    /// gap report.
    pub missing_skills: Vec<String>,
}

/// Rounds to the nearest integer and clamps to [0, 100]. Non-finite values are 0.
pub fn finalize(value: f64) -> u32 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

pub fn score_candidate(inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
    let ats = AtsComponents::compute(
        inputs.match_set,
        inputs.jd,
        inputs.candidate_years,
        inputs.resume_text,
    );
    let ats_total = ats.total(&AtsWeights::default());

    let components = FitComponents {
        ats: ats_total,
        evidence: evidence::evidence_score(inputs.evidence),
        proof: proof_score(inputs.proofs),
        quality: inputs.quality.clamp(0.0, 100.0),
        experience_bonus: experience_bonus(inputs.candidate_years, inputs.jd.required_experience),
        link_quality: inputs.link_quality,
    };
    let fit = composite(inputs.job_category, &components);

    ScoreBreakdown {
        skill_match: finalize(ats.skill),
        tool_match: finalize(ats.tool),
        soft_match: finalize(ats.soft),
        experience_match: finalize(ats.experience),
        keyword_density: finalize(ats.keyword_density),
        ats: finalize(ats_total),
        evidence: finalize(components.evidence),
        proof: finalize(components.proof),
        quality: finalize(components.quality),
        experience_bonus: finalize(components.experience_bonus),
        link_quality: components.link_quality.map(finalize),
        composite: finalize(fit),
        missing_skills: inputs.match_set.missing_skills(),
    }
}

/// Builds a human-readable recommendation from the composite score and gaps.
pub fn build_recommendation(score: u32, gaps: &GapReport) -> String {
    let top_gaps: Vec<&str> = gaps
        .critical_gaps
        .iter()
        .chain(gaps.nice_to_have_gaps.iter())
        .take(3)
        .map(String::as_str)
        .collect();

    if score >= 80 && gaps.critical_gaps.is_empty() {
        "Strong fit. The candidate covers the critical requirements and backs them with evidence."
            .to_string()
    } else if score >= 60 {
        if top_gaps.is_empty() {
            format!("Moderate fit ({score}/100). Skills align; evidence or experience is thinner.")
        } else {
            format!(
                "Moderate fit ({score}/100). Probe in interview: {}.",
                top_gaps.join(", ")
            )
        }
    } else if top_gaps.is_empty() {
        format!("Low fit ({score}/100). Skills align but supporting signals are weak.")
    } else {
        format!(
            "Low fit ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::proof::{verify_claims, ProofLevel};
    use crate::skills::coordinator::resolve_matches;
    use crate::skills::gaps::analyze_gaps;
    use crate::skills::models::SkillSet;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn python_docker_jd() -> JobSkills {
        JobSkills {
            skills: SkillSet {
                technical: list(&["Python"]),
                tools: list(&["Docker"]),
                soft: vec![],
            },
            critical: list(&["Python"]),
            preferred: list(&["Docker"]),
            bonus: vec![],
            required_experience: 3.0,
        }
    }

    fn python_profile() -> EvidenceProfile {
        EvidenceProfile {
            languages: ["python".to_string()].into_iter().collect(),
            total_repos: 4,
            original_repos: 4,
            active_repos: 2,
            total_stars: 12,
            ..EvidenceProfile::empty("pydev")
        }
    }

    #[test]
    fn test_python_docker_scenario() {
        let jd = python_docker_jd();
        let candidate = SkillSet {
            technical: list(&["python"]),
            tools: list(&["kubernetes"]),
            soft: vec![],
        };
        let source = resolve_matches(&jd, &candidate, None);
        let claimed = SkillSet {
            technical: list(&["python"]),
            tools: list(&["docker"]),
            soft: vec![],
        };
        let profile = python_profile();
        let proofs = verify_claims(&claimed, &profile);

        let scores = score_candidate(&ScoreInputs {
            match_set: source.match_set(),
            jd: &jd,
            resume_text: "Python developer running services on kubernetes",
            candidate_years: 4.0,
            proofs: &proofs,
            evidence: &profile,
            quality: 70.0,
            link_quality: None,
            job_category: JobCategory::Technical,
        });
        let gaps = analyze_gaps(source.match_set());

        assert_eq!(scores.skill_match, 100);
        assert_eq!(scores.tool_match, 0);
        assert_eq!(scores.soft_match, 100);
        assert_eq!(proofs[0].level, ProofLevel::Proven);
        assert_eq!(proofs[0].weight, 100.0);
        assert_eq!(proofs[1].level, ProofLevel::Missing);
        assert_eq!(proofs[1].weight, 0.0);
        assert!(gaps.critical_gaps.is_empty());
        assert_eq!(gaps.nice_to_have_gaps, vec!["Docker"]);
    }

    #[test]
    fn test_missing_lists_agree() {
        let jd = python_docker_jd();
        let source = resolve_matches(&jd, &SkillSet::default(), None);
        let profile = EvidenceProfile::empty("");
        let scores = score_candidate(&ScoreInputs {
            match_set: source.match_set(),
            jd: &jd,
            resume_text: "",
            candidate_years: 0.0,
            proofs: &[],
            evidence: &profile,
            quality: 0.0,
            link_quality: None,
            job_category: JobCategory::General,
        });
        let gaps = analyze_gaps(source.match_set());
        assert_eq!(scores.missing_skills, gaps.missing);
        assert_eq!(scores.missing_skills.len(), 2);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let jd = python_docker_jd();
        let candidate = SkillSet {
            technical: list(&["python"]),
            ..Default::default()
        };
        let profile = python_profile();
        let proofs = verify_claims(&candidate, &profile);

        let run = || {
            let source = resolve_matches(&jd, &candidate, None);
            let scores = score_candidate(&ScoreInputs {
                match_set: source.match_set(),
                jd: &jd,
                resume_text: "python",
                candidate_years: 2.0,
                proofs: &proofs,
                evidence: &profile,
                quality: 55.5,
                link_quality: Some(90.0),
                job_category: JobCategory::Technical,
            });
            (source, scores)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_rounding_happens_once() {
        assert_eq!(finalize(49.5), 50);
        assert_eq!(finalize(49.49), 49);
        assert_eq!(finalize(140.0), 100);
        assert_eq!(finalize(-3.0), 0);
        assert_eq!(finalize(f64::NAN), 0);
    }

    #[test]
    fn test_recommendation_strong() {
        let gaps = analyze_gaps(&MatchSet::new(vec![]));
        assert!(build_recommendation(85, &gaps).contains("Strong fit"));
    }

    #[test]
    fn test_recommendation_lists_critical_gaps_first() {
        let gaps = GapReport {
            missing: list(&["Docker", "Rust"]),
            critical_gaps: list(&["Rust"]),
            nice_to_have_gaps: list(&["Docker"]),
            coverage: 40.0,
        };
        let rec = build_recommendation(45, &gaps);
        assert!(rec.contains("45"));
        assert!(rec.starts_with("Low fit"));
        assert!(rec.contains("Rust, Docker"));
    }

    #[test]
    fn test_recommendation_high_score_with_critical_gap_is_moderate() {
        let gaps = GapReport {
            missing: list(&["Rust"]),
            critical_gaps: list(&["Rust"]),
            nice_to_have_gaps: vec![],
            coverage: 60.0,
        };
        assert!(build_recommendation(82, &gaps).starts_with("Moderate fit"));
    }
}
