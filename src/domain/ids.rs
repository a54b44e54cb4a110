//! Domain identifier types with validation
//!
//! Newtype wrappers for record identifiers. Upstream CRUD flows hand the
//! reconciler integer primary keys; the wrapper rejects non-positive values
//! so an id that parses is always a plausible store key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Financial record identifier newtype wrapper
///
/// Identifies an invoice or payment row in the record store.
///
/// # Examples
///
/// ```
/// use ledgersync::domain::ids::RecordId;
///
/// let id = RecordId::new(42).unwrap();
/// assert_eq!(id.value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates a new RecordId from an integer
    ///
    /// # Returns
    ///
    /// Returns `Ok(RecordId)` if the id is positive, `Err` otherwise
    pub fn new(id: i64) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Record id must be positive, got {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid record id: {s}"))?;
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_creation() {
        let id = RecordId::new(7).unwrap();
        assert_eq!(id.value(), 7);
    }

    #[test]
    fn test_record_id_rejects_non_positive() {
        assert!(RecordId::new(0).is_err());
        assert!(RecordId::new(-3).is_err());
    }

    #[test]
    fn test_record_id_display() {
        let id = RecordId::new(42).unwrap();
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_record_id_from_str() {
        let id: RecordId = " 15 ".parse().unwrap();
        assert_eq!(id.value(), 15);
        assert!("abc".parse::<RecordId>().is_err());
        assert!("-1".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_id_serialization_is_transparent() {
        let id = RecordId::new(9).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9");
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
