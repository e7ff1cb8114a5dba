/// System prompt for résumé/JD extraction: enforces JSON-only output.
pub const EXTRACTION_SYSTEM: &str =
    "You are an expert technical recruiter and resume analyst. \
    Read a resume and a job description and extract structured, comparable skill data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template.
/// Replace: {grounding_instruction}, {resume_text}, {jd_text}
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Compare the resume with the job description. Return a JSON object with this EXACT schema (no extra fields):
{
  "resume": {
    "technical": ["Python", "SQL"],
    "tools": ["Docker", "Git"],
    "soft": ["Communication"],
    "experience_years": 4,
    "education_level": "bachelor"
  },
  "jd": {
    "technical": ["Python"],
    "tools": ["Docker", "Kubernetes"],
    "soft": ["Leadership"],
    "critical": ["Python"],
    "preferred": ["Docker"],
    "bonus": ["Kubernetes"],
    "required_experience": 3
  },
  "quality": {
    "score": 72,
    "formatting": 80,
    "achievements": 60,
    "clarity": 75,
    "improvements": ["Quantify the impact of the data pipeline work"]
  },
  "cluster": {
    "type": "backend_engineer",
    "confidence": 0.8,
    "traits": ["api design", "data modelling"]
  },
  "matches": [
    {
      "jd_skill": "Kubernetes",
      "resume_skill": "container orchestration",
      "confidence": 0.7,
      "category": "tools",
      "priority": "bonus"
    }
  ],
  "job_category": "technical"
}

Rules:

SKILL CATEGORIES:
- technical: languages, frameworks, libraries, methods
- tools: platforms, infrastructure, databases, products
- soft: interpersonal and organisational skills

JD PRIORITIES: "critical" lists must-haves ("required", "must have", minimum years),
"preferred" lists nice-to-haves ("preferred", "a plus"), "bonus" lists anything merely mentioned.

MATCHES: one entry per JD skill, judged semantically. confidence is 0.0–1.0.
Use "resume_skill": null when the resume has nothing comparable.
category is one of "technical", "tools", "soft"; priority is one of "critical", "preferred", "bonus".

QUALITY: all scores are integers 0–100.

EDUCATION LEVEL: "none", "high_school", "associate", "bachelor", "master", "doctorate".

JOB CATEGORY (pick exactly one): "technical", "general", "creative".

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}"#;
