//! Identifier types

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque user identifier (UUID v4)
///
/// Assigned once at creation and never reused. The canonical text form is the
/// hyphenated lowercase UUID, which is also what session tokens carry.
///
/// ```
/// use kernel::id::UserId;
///
/// let id = UserId::new();
/// let parsed: UserId = id.to_string().parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_v4_and_distinct() {
        let a = UserId::new();
        assert_eq!(a.as_uuid().get_version_num(), 4);
        assert_ne!(a, UserId::new());
    }

    #[test]
    fn test_text_form() {
        let uuid = Uuid::parse_str("7d3a2a8e-4d6f-4a8e-9a4a-2b1f0c9e8d7c").unwrap();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.to_string(), "7d3a2a8e-4d6f-4a8e-9a4a-2b1f0c9e8d7c");
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }
}
