use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Policy could not be written back out as TOML.
    ConfigSerialize(String),
    /// Policy validation error (threshold out of range, bad table entry, etc.).
    ConfigValidation(String),
    /// A threshold value outside its allowed range.
    ThresholdRange { name: &'static str, value: f64 },
    /// An abbreviation output is itself an abbreviation key.
    AbbreviationChain { from: String, to: String },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigSerialize(msg) => write!(f, "config serialize error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::ThresholdRange { name, value } => {
                write!(f, "threshold '{name}' must be within (0, 1], got {value}")
            }
            Self::AbbreviationChain { from, to } => {
                write!(f, "abbreviation '{from}' -> '{to}': output is itself an abbreviation key")
            }
        }
    }
}

impl std::error::Error for MatchError {}
