//! Proof score: how much of a candidate's claimed skill set is backed by
//! languages detected in their public code.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceProfile;
use crate::skills::models::SkillSet;
use crate::skills::synonyms::normalize;

pub const PROVEN_WEIGHT: f64 = 100.0;

/// Normalized skill → languages that imply it, and the weight of that inference.
const SKILL_LANGUAGES: &[(&str, &[&str], f64)] = &[
    ("react", &["javascript", "typescript"], 70.0),
    ("vue", &["javascript", "typescript", "vue"], 70.0),
    ("angular", &["typescript", "javascript"], 70.0),
    ("next.js", &["javascript", "typescript"], 70.0),
    ("node.js", &["javascript", "typescript"], 70.0),
    ("express", &["javascript", "typescript"], 70.0),
    ("django", &["python"], 70.0),
    ("flask", &["python"], 70.0),
    ("fastapi", &["python"], 70.0),
    ("pandas", &["python", "jupyter notebook"], 50.0),
    ("numpy", &["python", "jupyter notebook"], 50.0),
    ("scikit-learn", &["python", "jupyter notebook"], 50.0),
    ("tensorflow", &["python", "jupyter notebook"], 50.0),
    ("pytorch", &["python", "jupyter notebook"], 50.0),
    ("machine learning", &["python", "jupyter notebook", "r"], 50.0),
    ("spring boot", &["java", "kotlin"], 70.0),
    ("spring", &["java", "kotlin"], 70.0),
    ("android", &["kotlin", "java"], 50.0),
    ("ios", &["swift", "objective-c"], 50.0),
    ("ruby on rails", &["ruby"], 70.0),
    ("laravel", &["php"], 70.0),
    ("symfony", &["php"], 70.0),
    (".net", &["c#"], 70.0),
    ("unity", &["c#"], 50.0),
    ("flutter", &["dart"], 70.0),
    ("tokio", &["rust"], 70.0),
    ("actix", &["rust"], 70.0),
    ("axum", &["rust"], 70.0),
    ("sass", &["scss"], 70.0),
    ("terraform", &["hcl"], 70.0),
    ("postgresql", &["plpgsql"], 50.0),
    ("docker", &["dockerfile"], 50.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofLevel {
    Proven,
    Inferred,
    Missing,
}

/// Verification outcome for one claimed skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProof {
    pub skill: String,
    pub level: ProofLevel,
    /// The detected language that backs the claim.
    pub language: Option<String>,
    pub weight: f64,
}

/// Classifies every claimed skill (technical + tools) against the profile.
pub fn verify_claims(claimed: &SkillSet, profile: &EvidenceProfile) -> Vec<SkillProof> {
    let languages: BTreeSet<String> = profile.languages.iter().map(|l| normalize(l)).collect();
    claimed
        .claimed()
        .map(|skill| classify_skill(skill, &languages))
        .collect()
}

/// Mean proof weight, capped at 100. Nothing claimed proves nothing.
pub fn proof_score(proofs: &[SkillProof]) -> f64 {
    if proofs.is_empty() {
        return 0.0;
    }
    let sum: f64 = proofs.iter().map(|p| p.weight).sum();
    (sum / proofs.len() as f64).min(PROVEN_WEIGHT)
}

/// Tries the whole skill, then its whitespace-separated words, then its
/// punctuation-separated fragments. The first direct or inferred hit wins.
pub fn classify_skill(skill: &str, languages: &BTreeSet<String>) -> SkillProof {
    for term in candidate_terms(skill) {
        if languages.contains(&term) {
            return SkillProof {
                skill: skill.to_string(),
                level: ProofLevel::Proven,
                language: Some(term),
                weight: PROVEN_WEIGHT,
            };
        }

        if let Some((language, weight)) = infer_language(&term, languages) {
            return SkillProof {
                skill: skill.to_string(),
                level: ProofLevel::Inferred,
                language: Some(language),
                weight,
            };
        }
    }

    SkillProof {
        skill: skill.to_string(),
        level: ProofLevel::Missing,
        language: None,
        weight: 0.0,
    }
}

fn infer_language(term: &str, languages: &BTreeSet<String>) -> Option<(String, f64)> {
    SKILL_LANGUAGES
        .iter()
        .find(|(skill, _, _)| *skill == term)
        .and_then(|(_, implied, weight)| {
            implied
                .iter()
                .map(|l| normalize(l))
                .find(|l| languages.contains(l))
                .map(|l| (l, *weight))
        })
}

/// Normalized lookup terms for a skill phrase, most specific first, deduplicated.
fn candidate_terms(skill: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        let term = normalize(raw);
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    push(skill);
    for word in skill.split(|c: char| c.is_whitespace() || "/,;()|&".contains(c)) {
        push(word);
    }
    for fragment in skill.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#')) {
        push(fragment);
    }

    terms
}
