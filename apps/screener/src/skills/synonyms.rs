//! Skill alias table. Every comparison between skill strings goes through
//! `normalize`, so two spellings of the same skill are equivalent everywhere.

/// Canonical form followed by its aliases.
const SKILL_ALIASES: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript", "es6", "es2015"]),
    ("typescript", &["ts"]),
    ("python", &["py", "python3", "python 3"]),
    ("golang", &["go", "go lang"]),
    ("c++", &["cpp", "cplusplus"]),
    ("c#", &["csharp", "c sharp"]),
    ("react", &["reactjs", "react.js", "react js"]),
    ("vue", &["vuejs", "vue.js"]),
    ("angular", &["angularjs", "angular.js"]),
    ("node.js", &["node", "nodejs", "node js"]),
    ("next.js", &["nextjs", "next"]),
    ("express", &["expressjs", "express.js"]),
    (".net", &["dotnet", ".net core", "asp.net"]),
    ("postgresql", &["postgres", "psql", "pgsql"]),
    ("mongodb", &["mongo"]),
    ("mysql", &["my sql"]),
    ("kubernetes", &["k8s", "kube"]),
    ("docker", &["docker engine", "containers"]),
    ("aws", &["amazon web services"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("azure", &["microsoft azure"]),
    ("ci/cd", &["cicd", "ci cd", "continuous integration"]),
    ("machine learning", &["ml"]),
    ("artificial intelligence", &["ai"]),
    ("natural language processing", &["nlp"]),
    ("tensorflow", &["tf"]),
    ("scikit-learn", &["sklearn", "scikit learn"]),
    ("spring boot", &["springboot", "spring-boot"]),
    ("ruby on rails", &["rails", "ror"]),
    ("rest api", &["rest", "restful", "restful api", "rest apis"]),
    ("graphql", &["gql"]),
    ("shell", &["bash", "shell scripting", "sh"]),
    ("communication", &["communication skills", "verbal communication"]),
    ("teamwork", &["team work", "collaboration", "team player"]),
    ("leadership", &["team leadership", "leading teams"]),
    ("problem solving", &["problem-solving", "analytical thinking"]),
];

/// Lower-cases and trims `skill`, then maps it to its canonical form.
/// Unknown skills come back trimmed and lower-cased.
pub fn normalize(skill: &str) -> String {
    let cleaned = skill.trim().to_lowercase();

    for (canonical, aliases) in SKILL_ALIASES {
        if cleaned == *canonical || aliases.iter().any(|a| *a == cleaned) {
            return (*canonical).to_string();
        }
    }

    cleaned
}

/// Two skills are equivalent iff their normalized forms are equal.
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
