use serde::{Deserialize, Serialize};

/// Code returned for strings outside an encoder's vocabulary.
pub const UNKNOWN_CODE: i64 = -1;

// ---------------------------------------------------------------------------
// LabelEncoder – fitted categorical string ↔ integer code mapping
// ---------------------------------------------------------------------------

/// A fitted categorical encoder: an ordered vocabulary of strings where the
/// code of a value is its position in the list.
///
/// The vocabulary is fixed at training time; this type only looks values up.
/// Strings outside the vocabulary encode to [`UNKNOWN_CODE`] rather than
/// failing, so a prediction can still proceed on unexpected input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Encode a string to its integer code, or [`UNKNOWN_CODE`] if it is not
    /// part of the vocabulary.
    pub fn encode(&self, value: &str) -> i64 {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|i| i as i64)
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Decode an integer code back to its string, if in range.
    pub fn decode(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }

    /// The fitted vocabulary, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder {
            classes: vec!["Fell".to_string(), "Found".to_string()],
        }
    }

    #[test]
    fn known_values_round_trip() {
        let le = encoder();
        for class in le.classes() {
            let code = le.encode(class);
            assert_eq!(le.decode(code), Some(class.as_str()));
        }
    }

    #[test]
    fn unknown_value_encodes_to_sentinel() {
        let le = encoder();
        assert_eq!(le.encode("Imagined"), UNKNOWN_CODE);
        assert_eq!(le.decode(UNKNOWN_CODE), None);
        assert_eq!(le.decode(99), None);
    }
}
