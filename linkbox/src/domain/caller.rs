// linkbox/src/domain/caller.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the authenticated requester.
///
/// Passed explicitly into every operation that creates bookmarks; the stored
/// `user_id` is always taken from here and never from client data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct CallerId(i32);

impl CallerId {
    pub fn new(id: i32) -> DomainResult<Self> {
        if id <= 0 {
            return Err(DomainError::InvalidCaller(format!(
                "user id must be positive, got {}",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for CallerId {
    type Error = DomainError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<CallerId> for i32 {
    fn from(caller: CallerId) -> Self {
        caller.0
    }
}

impl FromStr for CallerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i32>()
            .map_err(|e| DomainError::InvalidCaller(format!("'{}': {}", s, e)))?;
        Self::new(id)
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_positive_id_when_new_then_ok() {
        let caller = CallerId::new(7).unwrap();
        assert_eq!(caller.value(), 7);
        assert_eq!(caller.to_string(), "7");
    }

    #[test]
    fn given_zero_or_negative_id_when_new_then_error() {
        assert!(matches!(CallerId::new(0), Err(DomainError::InvalidCaller(_))));
        assert!(matches!(CallerId::new(-3), Err(DomainError::InvalidCaller(_))));
    }

    #[test]
    fn given_header_value_when_parse_then_trims_and_validates() {
        assert_eq!(" 42 ".parse::<CallerId>().unwrap().value(), 42);
        assert!("abc".parse::<CallerId>().is_err());
        assert!("".parse::<CallerId>().is_err());
    }
}
