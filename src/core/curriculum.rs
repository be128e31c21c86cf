use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a learner can practise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Spanish, Language::French];

    pub fn label(self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }

    /// Exact, case-sensitive match against the offered labels.
    pub fn from_label(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|lang| lang.label() == input)
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|lang| lang.label().to_string()).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CEFR proficiency level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub const ALL: [Level; 6] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1, Level::C2];

    pub fn label(self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }

    pub fn from_label(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|level| level.label() == input)
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|level| level.label().to_string()).collect()
    }

    /// Rough word range a text at this level is expected to hit.
    pub fn expected_words(self) -> (usize, usize) {
        match self {
            Level::A1 => (25, 60),
            Level::A2 => (40, 90),
            Level::B1 => (80, 150),
            Level::B2 => (120, 200),
            Level::C1 => (180, 280),
            Level::C2 => (220, 350),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_matching_is_exact() {
        assert_eq!(Language::from_label("Spanish"), Some(Language::Spanish));
        assert_eq!(Language::from_label(" French "), Some(Language::French));
        assert_eq!(Language::from_label("spanish"), None);
        assert_eq!(Language::from_label("German"), None);
        assert_eq!(Language::from_label(""), None);
    }

    #[test]
    fn level_matching_covers_cefr_scale() {
        for level in Level::ALL {
            assert_eq!(Level::from_label(level.label()), Some(level));
        }
        assert_eq!(Level::from_label("b1"), None);
        assert_eq!(Level::from_label("D1"), None);
        assert_eq!(Level::labels().len(), 6);
    }
}
