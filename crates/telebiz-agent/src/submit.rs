//! Entity form submission.

use telebiz_client::EntityApi;
use telebiz_core::{FormState, InFlightGuard};
use telebiz_models::{
    CreateEntityRequest, CreatedEntity, EntityType, IntegrationId, LinkTarget, OrganizationId,
    Provider,
};
use tracing::{info, warn};

use crate::error::Result;

/// A filled-in form bound to the integration it will be created in.
#[derive(Debug, Clone)]
pub struct EntityForm {
    provider: Provider,
    entity_type: EntityType,
    integration_id: IntegrationId,
    organization_id: Option<OrganizationId>,
    link: Option<LinkTarget>,
    state: FormState,
}

impl EntityForm {
    pub fn new(
        provider: Provider,
        entity_type: EntityType,
        integration_id: IntegrationId,
        state: FormState,
    ) -> Self {
        Self {
            provider,
            entity_type,
            integration_id,
            organization_id: None,
            link: None,
            state,
        }
    }

    pub fn with_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Links the created entity to a chat or another entity.
    pub fn with_link(mut self, link: LinkTarget) -> Self {
        self.link = Some(link);
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    /// Request carrying the form's normalized values.
    pub fn request(&self) -> CreateEntityRequest {
        CreateEntityRequest {
            provider: self.provider,
            entity_type: self.entity_type,
            integration_id: self.integration_id,
            organization_id: self.organization_id,
            link: self.link.clone(),
            fields: self.state.values(),
        }
    }

    /// Creates the entity.
    ///
    /// A second submit of the same provider, entity type and link while
    /// the first is outstanding fails with
    /// [`GuardError::AlreadyInFlight`](telebiz_core::GuardError::AlreadyInFlight)
    /// without calling `api`. Use
    /// [`AgentError::user_message`](crate::AgentError::user_message) to
    /// present failures.
    pub async fn submit<A: EntityApi + ?Sized>(
        &self,
        api: &A,
        guard: &InFlightGuard,
    ) -> Result<CreatedEntity> {
        let request = self.request();
        let _ticket = guard.acquire(request.action_key())?;

        match api.create_entity(&request).await {
            Ok(created) => {
                info!(
                    "Created {} {} in {}",
                    self.entity_type, created.id, self.provider
                );
                Ok(created)
            }
            Err(e) => {
                warn!(
                    "Creating {} in {} failed: {}",
                    self.entity_type, self.provider, e
                );
                Err(e.into())
            }
        }
    }
}
