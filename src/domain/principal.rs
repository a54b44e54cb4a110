//! Authenticated caller identity
//!
//! The upstream web layer verifies credentials and attaches a principal to the
//! request before the reconciler is invoked. The reconciler only asserts that
//! the role is present and permitted; it never checks credentials itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role assigned to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Commercial,
    Director,
    Accountant,
}

impl Role {
    /// Returns the role as its lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Commercial => "commercial",
            Self::Director => "director",
            Self::Accountant => "accountant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "commercial" => Ok(Self::Commercial),
            "director" => Ok(Self::Director),
            "accountant" => Ok(Self::Accountant),
            other => Err(format!(
                "Invalid role: {other}. Must be one of: admin, commercial, director, accountant"
            )),
        }
    }
}

/// A pre-verified caller with an assigned role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable subject identifier (user email or id from the auth layer)
    pub subject: String,
    /// Role attached by the auth layer
    pub role: Role,
}

impl Principal {
    /// Creates a new principal
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.subject, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("admin", Role::Admin)]
    #[test_case("Accountant", Role::Accountant)]
    #[test_case("DIRECTOR", Role::Director)]
    #[test_case("commercial", Role::Commercial)]
    fn test_role_from_str(input: &str, expected: Role) {
        assert_eq!(input.parse::<Role>().unwrap(), expected);
    }

    #[test]
    fn test_role_from_str_invalid() {
        assert!("root".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_principal_display() {
        let p = Principal::new("marie@example.com", Role::Accountant);
        assert_eq!(format!("{}", p), "marie@example.com (accountant)");
    }
}
