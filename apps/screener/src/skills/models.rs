use serde::{Deserialize, Serialize};

use crate::skills::synonyms::equivalent;

/// Confidence at or above which a pair counts as a full match.
pub const MATCHED_THRESHOLD: f64 = 0.8;
/// Confidence at or above which a pair counts as a partial match.
pub const PARTIAL_THRESHOLD: f64 = 0.5;

/// Skills extracted from a résumé or job description, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

impl SkillSet {
    /// All skills in category order (technical, tools, soft).
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(self.tools.iter())
            .chain(self.soft.iter())
    }

    /// Skills a candidate can plausibly back with code: technical + tools.
    pub fn claimed(&self) -> impl Iterator<Item = &String> {
        self.technical.iter().chain(self.tools.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.tools.is_empty() && self.soft.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Tools,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    Preferred,
    Bonus,
}

impl Priority {
    /// Weight of a skill of this priority in category scores and coverage.
    pub fn weight(self) -> f64 {
        match self {
            Priority::Critical => 2.0,
            Priority::Preferred => 1.0,
            Priority::Bonus => 0.5,
        }
    }

    /// Priority a JD skill gets when the description does not rank it explicitly.
    pub fn default_for(category: SkillCategory) -> Self {
        match category {
            SkillCategory::Technical => Priority::Critical,
            SkillCategory::Tools => Priority::Preferred,
            SkillCategory::Soft => Priority::Bonus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Partial,
    Missing,
}

impl MatchStatus {
    /// Classifies a confidence value. Every matching path goes through here.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= MATCHED_THRESHOLD {
            MatchStatus::Matched
        } else if confidence >= PARTIAL_THRESHOLD {
            MatchStatus::Partial
        } else {
            MatchStatus::Missing
        }
    }

    /// Share of a skill's weight credited for this status.
    pub fn credit(self) -> f64 {
        match self {
            MatchStatus::Matched => 1.0,
            MatchStatus::Partial => 0.5,
            MatchStatus::Missing => 0.0,
        }
    }
}

/// The JD side of extraction: required skills with explicit priorities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSkills {
    #[serde(flatten)]
    pub skills: SkillSet,
    #[serde(default)]
    pub critical: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
    #[serde(default)]
    pub bonus: Vec<String>,
    #[serde(default)]
    pub required_experience: f64,
}

impl JobSkills {
    /// Resolves the priority of a JD skill. Explicit lists win (by normalized
    /// equivalence), in critical > preferred > bonus order.
    pub fn priority_of(&self, skill: &str, category: SkillCategory) -> Priority {
        let listed = |list: &[String]| list.iter().any(|s| equivalent(s, skill));

        if listed(&self.critical) {
            Priority::Critical
        } else if listed(&self.preferred) {
            Priority::Preferred
        } else if listed(&self.bonus) {
            Priority::Bonus
        } else {
            Priority::default_for(category)
        }
    }

    /// JD skills with their category, in category order.
    pub fn categorized(&self) -> Vec<(&str, SkillCategory)> {
        let lists = [
            (&self.skills.technical, SkillCategory::Technical),
            (&self.skills.tools, SkillCategory::Tools),
            (&self.skills.soft, SkillCategory::Soft),
        ];

        let mut out = Vec::new();
        for (list, category) in lists {
            out.extend(list.iter().map(|s| (s.as_str(), category)));
        }
        out
    }
}

/// Outcome of matching one JD skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub jd_skill: String,
    pub resume_skill: Option<String>,
    pub confidence: f64,
    pub status: MatchStatus,
    pub category: SkillCategory,
    pub priority: Priority,
}

impl SkillMatch {
    /// Builds a match, deriving status from confidence.
    ///
    /// A pair without a résumé skill is always Missing, and a Missing pair
    /// never carries a résumé skill.
    pub fn new(
        jd_skill: impl Into<String>,
        resume_skill: Option<String>,
        confidence: f64,
        category: SkillCategory,
        priority: Priority,
    ) -> Self {
        let resume_skill = resume_skill.filter(|s| !s.trim().is_empty());
        let confidence = if resume_skill.is_some() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let status = MatchStatus::from_confidence(confidence);
        let resume_skill = if status == MatchStatus::Missing {
            None
        } else {
            resume_skill
        };

        Self {
            jd_skill: jd_skill.into(),
            resume_skill,
            confidence,
            status,
            category,
            priority,
        }
    }
}

/// The canonical list of per-skill outcomes for one request.
///
/// Counts are computed on construction and only readable afterwards.
/// Deserializing rebuilds the set from its matches, re-deriving each status
/// from its confidence, so serialized counts are never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredMatchSet")]
pub struct MatchSet {
    matches: Vec<SkillMatch>,
    total: usize,
    matched: usize,
    partial: usize,
    missing: usize,
}

#[derive(Deserialize)]
struct StoredMatchSet {
    #[serde(default)]
    matches: Vec<SkillMatch>,
}

impl From<StoredMatchSet> for MatchSet {
    fn from(stored: StoredMatchSet) -> Self {
        MatchSet::new(
            stored
                .matches
                .into_iter()
                .map(|m| {
                    SkillMatch::new(
                        m.jd_skill,
                        m.resume_skill,
                        m.confidence,
                        m.category,
                        m.priority,
                    )
                })
                .collect(),
        )
    }
}

impl MatchSet {
    pub fn new(matches: Vec<SkillMatch>) -> Self {
        let count = |status: MatchStatus| {
            matches.iter().filter(|m| m.status == status).count()
        };
        let matched = count(MatchStatus::Matched);
        let partial = count(MatchStatus::Partial);
        let missing = count(MatchStatus::Missing);

        Self {
            total: matches.len(),
            matched,
            partial,
            missing,
            matches,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn partial(&self) -> usize {
        self.partial
    }

    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn matches(&self) -> &[SkillMatch] {
        &self.matches
    }

    /// `matched / total`; an empty set counts as fully matched.
    pub fn match_ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn in_category(&self, category: SkillCategory) -> impl Iterator<Item = &SkillMatch> {
        self.matches.iter().filter(move |m| m.category == category)
    }

    /// JD skills with status Missing, in order.
    pub fn missing_skills(&self) -> Vec<String> {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Missing)
            .map(|m| m.jd_skill.clone())
            .collect()
    }
}

/// Priority-weighted credit over a set of matches, in [0, 100].
///
/// Matched counts its full weight, Partial half of it. An empty set is a
/// vacuous pass.
pub fn weighted_percent<'a>(matches: impl IntoIterator<Item = &'a SkillMatch>) -> f64 {
    let mut earned = 0.0_f64;
    let mut possible = 0.0_f64;

    for m in matches {
        let weight = m.priority.weight();
        possible += weight;
        earned += weight * m.status.credit();
    }

    if possible > 0.0 {
        earned / possible * 100.0
    } else {
        100.0
    }
}
