use std::str::FromStr;

use crate::env_or;

/// How submissions are scored against each question's correct option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoringMode {
    /// A question is credited when the selected option equals the correct
    /// option, where both an unanswered question and a question without a
    /// correct option count as "none". An unanswered question with no
    /// correct option is therefore credited.
    #[default]
    Literal,
    /// Only an answered question whose selection is the flagged correct
    /// option is credited.
    Strict,
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScoringConfig {
    pub mode: ScoringMode,
}

impl ScoringConfig {
    pub fn from_env() -> Self {
        Self {
            mode: env_or("SCORING_MODE", ScoringMode::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("literal".parse(), Ok(ScoringMode::Literal));
        assert_eq!("STRICT".parse(), Ok(ScoringMode::Strict));
        assert!("lenient".parse::<ScoringMode>().is_err());
    }
}
