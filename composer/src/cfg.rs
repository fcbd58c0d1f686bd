//! Runtime configuration loaded from environment variables.

use crate::error::ComposerError;

/// Upper bound on documents per prompt and per citation list.
pub const MAX_HITS_LIMIT: usize = 10;

/// Prompt budget knobs. Unset variables fall back to the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposerConfig {
    /// Maximum number of documents considered for the prompt and the citations.
    pub max_hits: usize,
    /// Word-count budget for the query plus the appended documents.
    pub max_tokens: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_hits: MAX_HITS_LIMIT,
            max_tokens: 30_000,
        }
    }
}

impl ComposerConfig {
    /// Build from `MAX_HITS` and `MAX_PROMPT_TOKENS`.
    ///
    /// # Errors
    /// [`ComposerError::Config`] if a set variable is not a number, or if
    /// `MAX_HITS` is outside `1..=10`.
    pub fn from_env() -> Result<Self, ComposerError> {
        Self::from_values(
            std::env::var("MAX_HITS").ok().as_deref(),
            std::env::var("MAX_PROMPT_TOKENS").ok().as_deref(),
        )
    }

    fn from_values(max_hits: Option<&str>, max_tokens: Option<&str>) -> Result<Self, ComposerError> {
        let d = Self::default();
        let max_hits = parse("MAX_HITS", max_hits, d.max_hits)?;
        if max_hits == 0 || max_hits > MAX_HITS_LIMIT {
            return Err(ComposerError::Config {
                key: "MAX_HITS",
                value: max_hits.to_string(),
                reason: "must be in 1..=10",
            });
        }

        Ok(Self {
            max_hits,
            max_tokens: parse("MAX_PROMPT_TOKENS", max_tokens, d.max_tokens)?,
        })
    }
}

fn parse(key: &'static str, raw: Option<&str>, dflt: usize) -> Result<usize, ComposerError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(dflt),
        Some(v) => v.parse().map_err(|_| ComposerError::Config {
            key,
            value: v.to_string(),
            reason: "expected a non-negative integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_use_defaults() {
        let cfg = ComposerConfig::from_values(None, Some(" ")).unwrap();
        assert_eq!(cfg, ComposerConfig::default());
    }

    #[test]
    fn set_values_are_parsed() {
        let cfg = ComposerConfig::from_values(Some("3"), Some("500")).unwrap();
        assert_eq!(cfg.max_hits, 3);
        assert_eq!(cfg.max_tokens, 500);
    }

    #[test]
    fn unparsable_budget_is_rejected() {
        let err = ComposerConfig::from_values(None, Some("thirty-thousand")).unwrap_err();
        assert!(matches!(
            err,
            ComposerError::Config { key: "MAX_PROMPT_TOKENS", .. }
        ));
    }

    #[test]
    fn max_hits_is_capped_at_ten() {
        for raw in ["0", "11", "25"] {
            assert!(
                matches!(
                    ComposerConfig::from_values(Some(raw), None),
                    Err(ComposerError::Config { key: "MAX_HITS", .. })
                ),
                "MAX_HITS={raw} accepted"
            );
        }
        assert_eq!(
            ComposerConfig::from_values(Some("10"), None).unwrap().max_hits,
            10
        );
    }
}
