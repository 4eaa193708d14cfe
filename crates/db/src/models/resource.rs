//! Shared resource model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::ResourceType;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resource {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub room_id: DbId,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Resource {
    fn definition() -> &'static EntityDef {
        &entities::RESOURCES
    }
}

/// DTO for sharing a resource. Without an explicit `kind`, a resource with a
/// non-blank URL is stored as `Link` and anything else as `Document`.
#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceType>,
    pub room_id: DbId,
    pub uploaded_by: DbId,
}

impl CreateResource {
    pub fn resolved_kind(&self) -> ResourceType {
        match (self.kind, self.url.as_deref()) {
            (Some(kind), _) => kind,
            (None, Some(url)) if !url.trim().is_empty() => ResourceType::Link,
            (None, _) => ResourceType::Document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(url: Option<&str>, kind: Option<ResourceType>) -> CreateResource {
        CreateResource {
            title: "Notes".into(),
            description: None,
            url: url.map(str::to_string),
            kind,
            room_id: DbId::nil(),
            uploaded_by: DbId::nil(),
        }
    }

    #[test]
    fn url_without_kind_resolves_to_link() {
        assert_eq!(resource(Some("https://x.test"), None).resolved_kind(), ResourceType::Link);
    }

    #[test]
    fn blank_url_resolves_to_document() {
        assert_eq!(resource(Some("   "), None).resolved_kind(), ResourceType::Document);
        assert_eq!(resource(None, None).resolved_kind(), ResourceType::Document);
    }

    #[test]
    fn explicit_kind_wins() {
        let r = resource(Some("https://x.test"), Some(ResourceType::Video));
        assert_eq!(r.resolved_kind(), ResourceType::Video);
    }
}
