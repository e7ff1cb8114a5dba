//! Extraction: turns résumé and JD free text into comparable skill sets.
//!
//! The pipeline only sees the `Extractor` trait; `LlmExtractor` is the
//! production backend.

pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;
use crate::extraction::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::scoring::fit::JobCategory;
use crate::skills::coordinator::ExternalMatch;
use crate::skills::models::{JobSkills, SkillSet};

/// The résumé side of extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(flatten)]
    pub skills: SkillSet,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub education_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: f64,
    #[serde(default)]
    pub formatting: f64,
    #[serde(default)]
    pub achievements: f64,
    #[serde(default)]
    pub clarity: f64,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateCluster {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub traits: Vec<String>,
}

/// Full structured output of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub resume: ResumeProfile,
    pub jd: JobSkills,
    pub quality: QualityAssessment,
    #[serde(default)]
    pub cluster: CandidateCluster,
    /// Semantic pairs judged by the model; absent when it skipped them.
    #[serde(default)]
    pub matches: Option<Vec<ExternalMatch>>,
    #[serde(default)]
    pub job_category: JobCategory,
}

#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, resume_text: &str, jd_text: &str)
        -> Result<Extraction, ScreeningError>;
}

/// Extraction via Claude. One call per (résumé, JD) pair.
pub struct LlmExtractor(pub LlmClient);

#[async_trait]
impl Extractor for LlmExtractor {
    async fn extract(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<Extraction, ScreeningError> {
        let prompt = build_prompt(resume_text, jd_text);
        let extraction = self
            .0
            .call_json::<Extraction>(&prompt, EXTRACTION_SYSTEM)
            .await?;
        Ok(extraction)
    }
}

fn build_prompt(resume_text: &str, jd_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{jd_text}", jd_text)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::models::{Priority, SkillCategory};

    #[test]
    fn test_extraction_full_deserializes_correctly() {
        let json = r#"{
            "resume": {
                "technical": ["Python"],
                "tools": ["Kubernetes"],
                "soft": [],
                "experience_years": 4,
                "education_level": "bachelor"
            },
            "jd": {
                "technical": ["Python"],
                "tools": ["Docker"],
                "soft": [],
                "critical": ["Python"],
                "preferred": ["Docker"],
                "required_experience": 3
            },
            "quality": {
                "score": 72,
                "formatting": 80,
                "achievements": 60,
                "clarity": 75,
                "improvements": ["Add metrics"]
            },
            "cluster": {"type": "backend_engineer", "confidence": 0.8, "traits": ["apis"]},
            "matches": [
                {
                    "jd_skill": "Docker",
                    "resume_skill": null,
                    "confidence": 0.1,
                    "category": "tools",
                    "priority": "preferred"
                }
            ],
            "job_category": "technical"
        }"#;

        let extraction: Extraction = serde_json::from_str(json).unwrap();
        assert_eq!(extraction.resume.skills.technical, vec!["Python".to_string()]);
        assert_eq!(extraction.resume.experience_years, 4.0);
        assert_eq!(extraction.jd.critical, vec!["Python".to_string()]);
        assert_eq!(extraction.cluster.kind, "backend_engineer");
        assert_eq!(extraction.job_category, JobCategory::Technical);

        let matches = extraction.matches.unwrap();
        assert_eq!(matches[0].category, Some(SkillCategory::Tools));
        assert_eq!(matches[0].priority, Some(Priority::Preferred));
        assert!(matches[0].resume_skill.is_none());
    }

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{
            "resume": {"technical": ["Go"]},
            "jd": {"technical": ["Go"]},
            "quality": {"score": 50}
        }"#;
        let extraction: Extraction = serde_json::from_str(json).unwrap();
        assert!(extraction.matches.is_none());
        assert_eq!(extraction.job_category, JobCategory::General);
        assert!(extraction.cluster.traits.is_empty());
    }

    #[test]
    fn test_prompt_embeds_both_documents() {
        let prompt = build_prompt("RESUME BODY", "JD BODY");
        assert!(prompt.contains("RESUME BODY"));
        assert!(prompt.contains("JD BODY"));
        assert!(prompt.contains("CRITICAL: Only extract"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
