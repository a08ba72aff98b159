use serde::{Deserialize, Serialize};
use std::fmt;

/// LIN protocol / language revision understood by this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LinVersion {
    V2_0,
    V2_1,
}

impl LinVersion {
    /// Parses a version token as it appears in LDF text, quotes included (`"2.1"`).
    ///
    /// Surrounding quotes are optional; unknown revisions return `None`.
    pub fn from_ldf_token(token: &str) -> Option<LinVersion> {
        match token.trim().trim_matches('"') {
            "2.0" => Some(LinVersion::V2_0),
            "2.1" => Some(LinVersion::V2_1),
            _ => None,
        }
    }

    /// Returns the bare version number (e.g., `"2.1"`).
    pub fn to_str(&self) -> &'static str {
        match self {
            LinVersion::V2_0 => "2.0",
            LinVersion::V2_1 => "2.1",
        }
    }
}

impl fmt::Display for LinVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ldf_token() {
        assert_eq!(LinVersion::from_ldf_token("\"2.1\""), Some(LinVersion::V2_1));
        assert_eq!(LinVersion::from_ldf_token(" \"2.0\" "), Some(LinVersion::V2_0));
        assert_eq!(LinVersion::from_ldf_token("2.1"), Some(LinVersion::V2_1));
        assert_eq!(LinVersion::from_ldf_token("\"1.3\""), None);
        assert_eq!(LinVersion::from_ldf_token(""), None);
    }

    #[test]
    fn test_ordering() {
        assert!(LinVersion::V2_0 < LinVersion::V2_1);
        assert_eq!(LinVersion::V2_1.to_string(), "2.1");
    }
}
