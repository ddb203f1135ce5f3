//! Locale identifiers (`ru_RU`, `de`, `pt_BR.UTF-8`) and their fallback chains.

use std::fmt;
use std::str::FromStr;

use crate::error::LingoError;

/// A parsed locale identifier: a language with an optional territory.
///
/// Accepts POSIX-style names (`ru_RU.UTF-8@euro`) and BCP 47-style names
/// (`ru-RU`); codeset and modifier are dropped. The canonical form uses an
/// underscore, matching TS file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    territory: Option<String>,
}

impl Locale {
    /// Language subtag, lowercase (`ru`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Territory subtag, uppercase (`RU`), if any.
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    /// Names to try, most specific first: `ru_RU`, then `ru`.
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut chain = Vec::with_capacity(2);
        if self.territory.is_some() {
            chain.push(self.to_string());
        }
        chain.push(self.language.clone());
        chain
    }

    /// Whether `other` names the same language (territory ignored).
    pub fn same_language(&self, other: &Locale) -> bool {
        self.language == other.language
    }

    /// Detect the process locale from `LC_ALL`, `LC_MESSAGES`, then `LANG`.
    ///
    /// The `C` and `POSIX` locales mean "no translation" and yield `None`.
    pub fn from_env() -> Option<Self> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
            .and_then(|v| v.parse().ok())
    }
}

impl FromStr for Locale {
    type Err = LingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Drop codeset (`.UTF-8`) and modifier (`@euro`).
        let base = trimmed
            .split(['.', '@'])
            .next()
            .unwrap_or_default();

        if base.is_empty() || base == "C" || base == "POSIX" {
            return Err(LingoError::Config(format!(
                "'{trimmed}' does not name a translatable locale"
            )));
        }

        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        let territory = parts.next();
        if parts.next().is_some() {
            return Err(LingoError::Config(format!(
                "unsupported locale identifier '{trimmed}'"
            )));
        }

        if language.len() < 2
            || language.len() > 3
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LingoError::Config(format!(
                "invalid language subtag in '{trimmed}'"
            )));
        }
        if let Some(t) = territory {
            if t.is_empty() || !t.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LingoError::Config(format!(
                    "invalid territory subtag in '{trimmed}'"
                )));
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            territory: territory.map(|t| t.to_ascii_uppercase()),
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.territory {
            Some(t) => write!(f, "{}_{}", self.language, t),
            None => f.write_str(&self.language),
        }
    }
}
