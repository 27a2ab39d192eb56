//! Commands accepted by the gateway for a digital output.

use std::fmt;

/// One of the three commands a digital output understands.
///
/// `Ein`/`Aus` force the output on or off (effective while the output is
/// not in `AUTO` mode); `Auto` hands control back to the controller's
/// program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCommand {
    Ein,
    Aus,
    Auto,
}

impl OutputCommand {
    /// The token as the device spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ein => "EIN",
            Self::Aus => "AUS",
            Self::Auto => "AUTO",
        }
    }
}

impl fmt::Display for OutputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_device_tokens() {
        assert_eq!(OutputCommand::Ein.to_string(), "EIN");
        assert_eq!(OutputCommand::Aus.to_string(), "AUS");
        assert_eq!(OutputCommand::Auto.to_string(), "AUTO");
    }
}
