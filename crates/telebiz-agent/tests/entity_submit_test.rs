//! Integration tests for building and submitting entity forms.

mod common;

use std::sync::Arc;

use chrono::{Local, TimeZone};
use serde_json::json;
use telebiz_agent::{AgentError, EntityForm};
use telebiz_core::forms::{BuildMode, BuildOptions, FormBuilder, FormCatalog};
use telebiz_core::{FixedClock, GuardError, InFlightGuard};
use telebiz_models::{
    ChatId, EntityType, FieldOption, IntegrationId, LinkTarget, PropertyOptions, PropertyType,
    Provider, ProviderProperty,
};

use common::{FakeEntities, Gate};

fn company_form() -> EntityForm {
    let properties = vec![
        ProviderProperty::new("name", PropertyType::Text),
        ProviderProperty::new("domain", PropertyType::Url),
        ProviderProperty::new("industry", PropertyType::Enum).with_options(PropertyOptions::Flat(vec![
            FieldOption::new("Software", "software"),
            FieldOption::new("Retail", "retail"),
        ])),
    ];
    let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let state = FormBuilder::new(Arc::new(FormCatalog::builtin()))
        .with_clock(Arc::new(FixedClock::new(now)))
        .build_state(
            EntityType::Company,
            Provider::Hubspot,
            &properties,
            BuildMode::Full,
            &BuildOptions::default(),
        )
        .unwrap();

    EntityForm::new(Provider::Hubspot, EntityType::Company, IntegrationId(11), state)
        .with_link(LinkTarget::Chat { chat_id: ChatId(99) })
}

#[tokio::test]
async fn test_submit_sends_normalized_values() {
    let api = FakeEntities::default();
    let guard = InFlightGuard::new();
    let mut form = company_form();
    form.state_mut().set_value("name", "Acme");
    form.state_mut()
        .set_raw("industry", &json!({"label": "Retail", "value": "retail"}));

    let created = form.submit(&api, &guard).await.unwrap();
    assert_eq!(created.id.as_str(), "company-1");

    let sent = api.requests.lock().unwrap()[0].clone();
    assert_eq!(sent.integration_id, IntegrationId(11));
    assert_eq!(sent.fields["name"], json!("Acme"));
    assert_eq!(sent.fields["industry"], json!("retail"));
    assert!(!sent.fields.contains_key("domain"));
    assert!(guard.is_empty());
}

#[tokio::test]
async fn test_double_submit_makes_one_call() {
    let gate = Gate::closed();
    let api = FakeEntities::gated(gate.clone());
    let guard = InFlightGuard::new();
    let form = company_form();

    let (first, second) = tokio::join!(form.submit(&api, &guard), async {
        let result = form.submit(&api, &guard).await;
        gate.open();
        result
    });

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(matches!(err, AgentError::Guard(GuardError::AlreadyInFlight(_))));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_different_links_do_not_collide() {
    let api = FakeEntities::default();
    let guard = InFlightGuard::new();
    let chat_form = company_form();
    let other_form = company_form().with_link(LinkTarget::Chat { chat_id: ChatId(100) });

    let _held = guard.acquire(chat_form.request().action_key()).unwrap();

    assert!(other_form.submit(&api, &guard).await.is_ok());
    assert!(matches!(
        chat_form.submit(&api, &guard).await,
        Err(AgentError::Guard(_))
    ));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_validation_error_is_readable() {
    let api = FakeEntities::default();
    *api.reject_with.lock().unwrap() = Some(
        r#"Request failed: {"message":"Company is invalid","errors":{"domain":["is taken"]}}"#.into(),
    );
    let guard = InFlightGuard::new();

    let err = company_form().submit(&api, &guard).await.unwrap_err();
    assert!(err.is_user_facing());
    assert_eq!(err.user_message(), "Company is invalid\n- domain: is taken");
}
