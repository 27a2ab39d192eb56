//! Control modes reported for digital outputs.

use std::fmt;

/// Device-reported control mode of a digital output.
///
/// `HAND` is manual override, `AUTO` is the controller's own program.
/// Unknown tokens are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputMode {
    Hand,
    Auto,
    Other(String),
}

impl OutputMode {
    /// Parse a device token, keeping unknown tokens verbatim.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "HAND" => Self::Hand,
            "AUTO" => Self::Auto,
            other => Self::Other(other.to_string()),
        }
    }

    /// The token as the device spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hand => "HAND",
            Self::Auto => "AUTO",
            Self::Other(token) => token,
        }
    }

    /// Whether the output is under manual override.
    ///
    /// Everything that is not `HAND` counts as automated.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Hand)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_tokens() {
        assert_eq!(OutputMode::parse("HAND"), OutputMode::Hand);
        assert_eq!(OutputMode::parse("AUTO"), OutputMode::Auto);
    }

    #[test]
    fn should_keep_unknown_tokens_verbatim() {
        let mode = OutputMode::parse("ZEIT");
        assert_eq!(mode, OutputMode::Other("ZEIT".to_string()));
        assert_eq!(mode.as_str(), "ZEIT");
    }

    #[test]
    fn should_treat_only_hand_as_manual() {
        assert!(OutputMode::Hand.is_manual());
        assert!(!OutputMode::Auto.is_manual());
        assert!(!OutputMode::Other("ZEIT".to_string()).is_manual());
    }
}
