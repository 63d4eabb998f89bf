//! Model provider configuration
//!
//! Administrators register external model endpoints together with their API
//! keys. Keys are stored as given and only ever leave this module through
//! [`ModelProviderService::get_model_provider`]; every other read returns a
//! [`ModelProviderView`] with the key masked.

use crate::db::models::{ModelProvider, ModelProviderActiveModel};
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::metrics::record_provider_change;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Mask shown in place of a stored API key
pub const API_KEY_PLACEHOLDER: &str = "***";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelProviderInput {
    #[validate(required, length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub provider: Option<String>,

    #[validate(required, length(min = 1, max = 2000))]
    pub endpoint: Option<String>,

    #[serde(rename = "apiKey")]
    #[validate(required, length(min = 1))]
    pub api_key: Option<String>,

    pub enabled: Option<bool>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelProviderInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    /// An empty string clears the description
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub provider: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub endpoint: Option<String>,

    #[serde(rename = "apiKey")]
    #[validate(length(min = 1))]
    pub api_key: Option<String>,

    pub enabled: Option<bool>,
}

/// Provider config as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProviderView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub provider: String,
    pub endpoint: String,
    /// `***` when a key is stored, empty otherwise
    pub api_key: String,
    pub enabled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<ModelProvider> for ModelProviderView {
    fn from(model: ModelProvider) -> Self {
        let api_key = if model.api_key.is_empty() {
            String::new()
        } else {
            API_KEY_PLACEHOLDER.to_string()
        };

        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            provider: model.provider,
            endpoint: model.endpoint,
            api_key,
            enabled: model.enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Unwrap a field `validator` has already checked as required
fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}

/// Trim a field a partial update supplied; blank values are rejected
fn supplied(value: Option<String>, field: &str) -> Result<Option<String>> {
    value.map(|v| required(Some(v), field)).transpose()
}

pub struct ModelProviderService {
    repo: Repository,
}

impl ModelProviderService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list_model_providers(&self) -> Result<Vec<ModelProviderView>> {
        let providers = self.repo.list_model_providers().await?;
        Ok(providers.into_iter().map(ModelProviderView::from).collect())
    }

    /// Unredacted record for server-side callers
    pub async fn get_model_provider(&self, id: Uuid) -> Result<Option<ModelProvider>> {
        self.repo.find_model_provider(id).await
    }

    pub async fn create_model_provider(&self, input: CreateModelProviderInput) -> Result<ModelProviderView> {
        input.validate()?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = ModelProviderActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(required(input.name, "name")?),
            description: Set(input.description.filter(|d| !d.trim().is_empty())),
            provider: Set(required(input.provider, "provider")?),
            endpoint: Set(required(input.endpoint, "endpoint")?),
            api_key: Set(required(input.api_key, "apiKey")?),
            enabled: Set(input.enabled.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = self.repo.insert_model_provider(model).await?;

        record_provider_change("create");
        tracing::info!(
            provider_id = %created.id,
            name = %created.name,
            provider = %created.provider,
            "Model provider created"
        );

        Ok(created.into())
    }

    pub async fn update_model_provider(&self, id: Uuid, input: UpdateModelProviderInput) -> Result<ModelProviderView> {
        input.validate()?;

        let name = supplied(input.name, "name")?;
        let provider = supplied(input.provider, "provider")?;
        let endpoint = supplied(input.endpoint, "endpoint")?;
        let api_key = supplied(input.api_key, "apiKey")?;

        let key_changed = api_key.is_some();
        let updated = self
            .repo
            .update_model_provider(id, |active| {
                if let Some(name) = name {
                    active.name = Set(name);
                }
                if let Some(description) = input.description {
                    active.description = Set(Some(description.trim().to_string()).filter(|d| !d.is_empty()));
                }
                if let Some(provider) = provider {
                    active.provider = Set(provider);
                }
                if let Some(endpoint) = endpoint {
                    active.endpoint = Set(endpoint);
                }
                if let Some(api_key) = api_key {
                    active.api_key = Set(api_key);
                }
                if let Some(enabled) = input.enabled {
                    active.enabled = Set(enabled);
                }
            })
            .await?
            .ok_or_else(|| AppError::not_found("ModelProvider", id))?;

        record_provider_change("update");
        tracing::info!(provider_id = %id, key_changed, "Model provider updated");

        Ok(updated.into())
    }

    pub async fn delete_model_provider(&self, id: Uuid) -> Result<()> {
        if !self.repo.delete_model_provider(id).await? {
            return Err(AppError::not_found("ModelProvider", id));
        }

        record_provider_change("delete");
        tracing::info!(provider_id = %id, "Model provider deleted");
        Ok(())
    }

    pub async fn toggle_model_provider(&self, id: Uuid, enabled: bool) -> Result<ModelProviderView> {
        let updated = self
            .repo
            .update_model_provider(id, |active| active.enabled = Set(enabled))
            .await?
            .ok_or_else(|| AppError::not_found("ModelProvider", id))?;

        record_provider_change("toggle");
        tracing::info!(provider_id = %id, enabled, "Model provider toggled");

        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::repo;

    fn create_input() -> CreateModelProviderInput {
        CreateModelProviderInput {
            name: Some("OpenAI".to_string()),
            description: None,
            provider: Some("openai".to_string()),
            endpoint: Some("https://api.openai.com/v1".to_string()),
            api_key: Some("sk-live-secret".to_string()),
            enabled: None,
        }
    }

    async fn service() -> ModelProviderService {
        ModelProviderService::new(repo().await)
    }

    #[tokio::test]
    async fn test_create_redacts_and_defaults_enabled() {
        let svc = service().await;
        let view = svc.create_model_provider(create_input()).await.unwrap();

        assert_eq!(view.api_key, API_KEY_PLACEHOLDER);
        assert!(view.enabled);

        let stored = svc.get_model_provider(view.id).await.unwrap().unwrap();
        assert_eq!(stored.api_key, "sk-live-secret");
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let svc = service().await;

        let mut input = create_input();
        input.api_key = None;
        let err = svc.create_model_provider(input).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        let mut input = create_input();
        input.name = Some(String::new());
        assert!(svc.create_model_provider(input).await.is_err());

        let mut input = create_input();
        input.endpoint = Some("   ".to_string());
        assert!(svc.create_model_provider(input).await.is_err());

        assert!(svc.list_model_providers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_redacted() {
        let svc = service().await;
        svc.create_model_provider(create_input()).await.unwrap();

        let listed = svc.list_model_providers().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].api_key, "***");

        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains("sk-live-secret"));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let svc = service().await;
        let created = svc.create_model_provider(create_input()).await.unwrap();

        let updated = svc
            .update_model_provider(
                created.id,
                UpdateModelProviderInput {
                    endpoint: Some("https://proxy.internal/v1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.endpoint, "https://proxy.internal/v1");
        assert_eq!(updated.name, "OpenAI");
        assert_eq!(updated.api_key, "***");
        assert!(updated.updated_at >= created.updated_at);

        let stored = svc.get_model_provider(created.id).await.unwrap().unwrap();
        assert_eq!(stored.api_key, "sk-live-secret");
    }

    #[tokio::test]
    async fn test_update_rejects_blank_and_trims() {
        let svc = service().await;
        let created = svc.create_model_provider(create_input()).await.unwrap();

        let err = svc
            .update_model_provider(
                created.id,
                UpdateModelProviderInput {
                    name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: Some(ref f), .. } if f == "name"));

        let err = svc
            .update_model_provider(
                created.id,
                UpdateModelProviderInput {
                    endpoint: Some(" \t ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        let stored = svc.get_model_provider(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "OpenAI");
        assert_eq!(stored.endpoint, "https://api.openai.com/v1");

        let updated = svc
            .update_model_provider(
                created.id,
                UpdateModelProviderInput {
                    name: Some("  Azure  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Azure");
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let svc = service().await;
        let created = svc.create_model_provider(create_input()).await.unwrap();

        let toggled = svc.toggle_model_provider(created.id, false).await.unwrap();
        assert!(!toggled.enabled);

        svc.delete_model_provider(created.id).await.unwrap();
        assert!(svc.get_model_provider(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_provider_is_not_found() {
        let svc = service().await;
        let id = Uuid::new_v4();

        assert!(matches!(
            svc.toggle_model_provider(id, true).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            svc.update_model_provider(id, UpdateModelProviderInput::default()).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_model_provider(id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_key_redacts_to_empty() {
        let now = Utc::now().into();
        let view = ModelProviderView::from(ModelProvider {
            id: Uuid::new_v4(),
            name: "Local".to_string(),
            description: None,
            provider: "ollama".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: String::new(),
            enabled: true,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(view.api_key, "");
    }

    #[test]
    fn test_input_uses_camel_case() {
        let input: CreateModelProviderInput = serde_json::from_value(serde_json::json!({
            "name": "Azure",
            "provider": "azure-openai",
            "endpoint": "https://example.openai.azure.com",
            "apiKey": "k"
        }))
        .unwrap();
        assert_eq!(input.api_key.as_deref(), Some("k"));
        assert!(input.validate().is_ok());
    }
}
