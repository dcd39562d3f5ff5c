//! Entity-creation request and response.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityType, Provider};
use crate::ids::{ChatId, EntityId, IntegrationId, OrganizationId};

/// What a newly created entity gets linked to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkTarget {
    /// Link to a Telegram chat.
    Chat { chat_id: ChatId },
    /// Link to an existing provider entity.
    Entity {
        entity_type: EntityType,
        entity_id: EntityId,
    },
}

impl std::fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat { chat_id } => write!(f, "chat:{}", chat_id),
            Self::Entity {
                entity_type,
                entity_id,
            } => write!(f, "{}:{}", entity_type, entity_id),
        }
    }
}

/// Flat key-value payload plus routing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    pub provider: Provider,
    pub entity_type: EntityType,
    pub integration_id: IntegrationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl CreateEntityRequest {
    /// Logical action key used to reject duplicate submissions.
    pub fn action_key(&self) -> String {
        match &self.link {
            Some(link) => format!("create:{}:{}:{}", self.provider, self.entity_type, link),
            None => format!("create:{}:{}", self.provider, self.entity_type),
        }
    }
}

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntity {
    pub id: EntityId,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(link: Option<LinkTarget>) -> CreateEntityRequest {
        CreateEntityRequest {
            provider: Provider::Hubspot,
            entity_type: EntityType::Deal,
            integration_id: IntegrationId(3),
            organization_id: None,
            link,
            fields: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_action_key_includes_link() {
        assert_eq!(request(None).action_key(), "create:hubspot:deal");
        let linked = request(Some(LinkTarget::Chat { chat_id: ChatId(9) }));
        assert_eq!(linked.action_key(), "create:hubspot:deal:chat:9");
    }

    #[test]
    fn test_link_target_serde() {
        let link = LinkTarget::Entity {
            entity_type: EntityType::Company,
            entity_id: EntityId::from_string("77"),
        };
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(
            value,
            json!({"kind": "entity", "entity_type": "company", "entity_id": "77"})
        );
    }
}
