use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    UnitId,
    "Stable unit identifier (lowercase slug, pattern: `[a-z0-9]+(-[a-z0-9]+)*`).",
    r"^[a-z0-9]+(-[a-z0-9]+)*$"
);

impl UnitId {
    /// Derives an id from chassis and model, e.g. `Atlas` + `AS7-D` → `atlas-as7-d`.
    pub fn from_names(chassis: &str, model: &str) -> Self {
        Self::from_text(&format!("{} {}", chassis, model))
    }

    /// Derives an id from arbitrary text such as a file stem.
    pub fn from_text(text: &str) -> Self {
        let mut slug = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                'a'..='z' | '0'..='9' => slug.push(ch),
                'A'..='Z' => slug.push(ch.to_ascii_lowercase()),
                '\'' | '"' | '.' | ',' | '(' | ')' => {}
                _ => {
                    if !slug.ends_with('-') {
                        slug.push('-');
                    }
                }
            }
        }
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            Self("unit".to_string())
        } else {
            Self(slug.to_string())
        }
    }

    /// Appends a numeric suffix, used to de-duplicate ids within a run.
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{}", self.0, n))
    }
}
