use chrono::{DateTime, Utc};
use contracts::domain::common::EntityMetadata;

/// Rebuild lifecycle metadata from the standard table columns
pub fn metadata_from_row(
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    version: i32,
) -> EntityMetadata {
    EntityMetadata {
        created_at: created_at.unwrap_or_else(Utc::now),
        updated_at: updated_at.unwrap_or_else(Utc::now),
        is_deleted,
        version,
    }
}

/// Parse a stored id; rows always hold ids we generated
pub fn parse_stored_id(id: &str) -> uuid::Uuid {
    uuid::Uuid::parse_str(id).unwrap_or_else(|_| {
        tracing::warn!("Malformed id in database: {}", id);
        uuid::Uuid::nil()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::aggregate::Customer;
    use contracts::domain::a004_visit::aggregate::Visit;
    use contracts::domain::a007_document::aggregate::Document;
    use contracts::domain::a009_corrective_action::aggregate::CorrectiveAction;
    use contracts::domain::common::AggregateRoot;
    use sea_orm::EntityName;

    #[test]
    fn test_entities_use_aggregate_table_names() {
        use crate::domain::{a001_customer, a004_visit, a007_document, a009_corrective_action};

        assert_eq!(a001_customer::repository::Entity.table_name(), Customer::full_name());
        assert_eq!(a004_visit::repository::Entity.table_name(), Visit::full_name());
        assert_eq!(a007_document::repository::Entity.table_name(), Document::full_name());
        assert_eq!(
            a009_corrective_action::repository::Entity.table_name(),
            CorrectiveAction::full_name()
        );
    }

    #[test]
    fn test_malformed_id_becomes_nil() {
        assert_eq!(parse_stored_id("not-a-uuid"), uuid::Uuid::nil());
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_stored_id(&id.to_string()), id);
    }

    #[test]
    fn test_metadata_defaults_missing_timestamps() {
        let meta = metadata_from_row(None, None, true, 3);
        assert!(meta.is_deleted);
        assert_eq!(meta.version, 3);
    }
}
