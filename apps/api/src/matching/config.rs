//! Matcher configuration: stopwords, the known-skills taxonomy and skill synonyms.
//!
//! Built once at startup (from the built-in defaults or a JSON file) and shared
//! read-only by every scoring call, so tests can substitute their own fixtures.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_STOPWORDS: &[&str] = &[
    // English function words
    "the", "a", "an", "and", "or", "for", "to", "of", "in", "on", "with", "by", "at", "as",
    "is", "are", "was", "were", "be", "been", "being", "this", "that", "these", "those", "from",
    "it", "its", "we", "you", "they", "their", "our", "your", "but", "not", "will", "can", "may",
    "should", "would", "could", "if", "then", "than", "so", "such", "into", "over", "under",
    "about", "across", "all", "any", "also", "has", "have", "had", "who", "what", "which",
    "when", "where", "while", "within", "via", "per", "etc", "more", "most", "other", "some",
    "well", "must", "nice", "plus",
    // JD boilerplate
    "required", "requirements", "preferred", "responsibilities", "qualifications", "including",
    "ability", "candidate", "ideal", "looking", "join", "bonus", "minimum",
];

const DEFAULT_SKILLS: &[&str] = &[
    "javascript", "typescript", "react", "node", "next.js", "python", "java", "c++", "c#",
    "sql", "nosql", "mongodb", "postgres", "postgresql", "mysql", "redis", "aws", "gcp",
    "azure", "docker", "kubernetes", "ci/cd", "jenkins", "github actions", "nlp",
    "machine learning", "tensorflow", "pytorch", "golang", "rust", "ruby", "php", "scala",
    "kotlin", "swift", "html", "css", "tailwind", "jira", "git", "agile", "scrum", "kafka",
    "spark", "hadoop", "airflow", "linux", "bash", "rest api", "graphql", "microservices",
    "terraform", "ansible", "django", "flask", "fastapi", "spring boot", "pandas", "numpy",
    "tableau", "power bi", "excel", "figma", "selenium", "snowflake",
];

const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("kubernetes", &["k8s"]),
    ("javascript", &["ecmascript"]),
    ("node", &["node.js", "nodejs"]),
    ("react", &["react.js", "reactjs"]),
    ("postgres", &["postgresql"]),
    ("postgresql", &["postgres"]),
    ("golang", &["go lang"]),
    ("aws", &["amazon web services"]),
    ("gcp", &["google cloud"]),
    ("ci/cd", &["continuous integration", "continuous delivery"]),
    ("nlp", &["natural language processing"]),
    ("machine learning", &["ml engineer", "deep learning"]),
];

#[derive(Debug, Error)]
pub enum MatcherConfigError {
    #[error("failed to read matcher config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid matcher config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Vocabulary the matching engine runs against.
///
/// All entries are lowercase. Missing fields in a JSON override fall back to the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub stopwords: HashSet<String>,
    pub known_skills: Vec<String>,
    pub synonyms: HashMap<String, Vec<String>>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            known_skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(term, variants)| {
                    (
                        term.to_string(),
                        variants.iter().map(|v| v.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl MatcherConfig {
    /// Loads a config from a JSON file, lowercasing every entry.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MatcherConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| MatcherConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| MatcherConfigError::Parse {
            path: display,
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let config: MatcherConfig = serde_json::from_str(raw)?;
        Ok(config.normalized())
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn synonyms_for(&self, term: &str) -> &[String] {
        self.synonyms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    fn normalized(self) -> Self {
        Self {
            stopwords: self.stopwords.iter().map(|s| s.trim().to_lowercase()).collect(),
            known_skills: self
                .known_skills
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            synonyms: self
                .synonyms
                .into_iter()
                .map(|(term, variants)| {
                    (
                        term.trim().to_lowercase(),
                        variants.iter().map(|v| v.trim().to_lowercase()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contains_boilerplate_stopwords() {
        let config = MatcherConfig::default();
        assert!(config.is_stopword("required"));
        assert!(config.is_stopword("responsibilities"));
        assert!(!config.is_stopword("python"));
    }

    #[test]
    fn test_partial_json_keeps_default_stopwords() {
        let config = MatcherConfig::from_json_str(r#"{"known_skills": ["Elixir", "  Phoenix "]}"#)
            .unwrap();
        assert_eq!(config.known_skills, vec!["elixir", "phoenix"]);
        assert!(config.is_stopword("the"));
    }

    #[test]
    fn test_synonyms_lookup() {
        let config = MatcherConfig::default();
        assert_eq!(config.synonyms_for("kubernetes"), ["k8s".to_string()]);
        assert!(config.synonyms_for("cobol").is_empty());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(MatcherConfig::from_json_str(r#"{"stopwords": 3}"#).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = MatcherConfig::from_json_file("/nonexistent/matcher.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/matcher.json"));
    }
}
