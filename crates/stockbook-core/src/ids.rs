//! Injectable id generation.

use uuid::Uuid;

/// Source of fresh record and entry ids.
///
/// Behind a trait so tests can substitute deterministic sequential ids;
/// production uses [`UuidIds`].
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random uuid v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_uuid_ids_are_hyphenated_uuids() {
        let id = UuidIds.next_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
