//! Organisation and user settings over the key/value settings store.
//!
//! Values are stored as JSON strings, one row per (org, user, key).
//! Org-wide settings use [`UserId::SYSTEM`] as their user scope.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use docq_core::config::ChatConfig;
use docq_core::error::AppError;
use docq_core::types::{FeatureType, OrgId, UserId};
use docq_core::AppResult;
use docq_database::repositories::SettingsRepository;
use docq_entity::settings::{Setting, SettingsKey};
use docq_extension::{EventContext, EventDispatcher, LifecycleEvent};
use docq_llm::ModelCollections;

use crate::context::RequestContext;

/// Reads and writes scoped settings.
#[derive(Clone)]
pub struct SettingsService {
    /// Settings repository.
    settings: Arc<SettingsRepository>,
    /// Known model settings collections, used to validate writes.
    collections: Arc<ModelCollections>,
    /// Dispatcher for firing lifecycle events.
    dispatcher: Arc<EventDispatcher>,
    /// Collection key used when an organisation has not chosen one.
    default_collection: String,
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("default_collection", &self.default_collection)
            .finish()
    }
}

impl SettingsService {
    /// Creates a new settings service.
    pub fn new(
        settings: Arc<SettingsRepository>,
        collections: Arc<ModelCollections>,
        dispatcher: Arc<EventDispatcher>,
        chat_config: &ChatConfig,
    ) -> Self {
        Self {
            settings,
            collections,
            dispatcher,
            default_collection: chat_config.default_model_collection.clone(),
        }
    }

    /// All org-wide settings of an organisation.
    pub async fn org_settings(
        &self,
        org_id: OrgId,
    ) -> AppResult<HashMap<String, serde_json::Value>> {
        self.scope_settings(org_id, UserId::SYSTEM).await
    }

    /// All settings of one user within an organisation.
    pub async fn user_settings(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<HashMap<String, serde_json::Value>> {
        self.scope_settings(org_id, user_id).await
    }

    /// Writes org-wide settings.
    pub async fn update_org_settings(
        &self,
        ctx: &RequestContext,
        org_id: OrgId,
        values: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()> {
        self.write_settings(ctx, org_id, UserId::SYSTEM, values).await
    }

    /// Writes settings scoped to one user.
    pub async fn update_user_settings(
        &self,
        ctx: &RequestContext,
        org_id: OrgId,
        user_id: UserId,
        values: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()> {
        self.write_settings(ctx, org_id, user_id, values).await
    }

    /// Features switched on for an organisation, all of them by default.
    pub async fn enabled_features(&self, org_id: OrgId) -> AppResult<Vec<FeatureType>> {
        let stored = self
            .settings
            .get(org_id, UserId::SYSTEM, SettingsKey::EnabledFeatures.as_str())
            .await?;
        let Some(setting) = stored else {
            return Ok(vec![
                FeatureType::AskShared,
                FeatureType::AskPublic,
                FeatureType::ChatPrivate,
            ]);
        };
        let names: Vec<String> = setting.parse()?;
        names.iter().map(|name| name.parse()).collect()
    }

    /// The model settings collection key an organisation resolves to.
    ///
    /// Falls back to the configured default when the organisation has
    /// not saved a choice.
    pub async fn model_collection_key(&self, org_id: OrgId) -> AppResult<String> {
        match self
            .settings
            .get(org_id, UserId::SYSTEM, SettingsKey::ModelCollection.as_str())
            .await?
        {
            Some(setting) => setting.parse(),
            None => Ok(self.default_collection.clone()),
        }
    }

    async fn scope_settings(
        &self,
        org_id: OrgId,
        user_id: UserId,
    ) -> AppResult<HashMap<String, serde_json::Value>> {
        let rows = self.settings.list_for_scope(org_id, user_id).await?;
        let mut values = HashMap::with_capacity(rows.len());
        for row in rows {
            let value = row.parse()?;
            values.insert(row.key, value);
        }
        Ok(values)
    }

    /// Validates every value before writing any, so a bad request
    /// changes nothing.
    async fn write_settings(
        &self,
        ctx: &RequestContext,
        org_id: OrgId,
        user_id: UserId,
        values: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()> {
        for (key, value) in values {
            self.validate(key, value)?;
        }

        for (key, value) in values {
            self.settings
                .upsert(&Setting {
                    user_id,
                    org_id,
                    key: key.clone(),
                    val: value.to_string(),
                })
                .await?;
        }

        let mut keys: Vec<&str> = values.keys().map(String::as_str).collect();
        keys.sort_unstable();

        info!(
            user_id = %ctx.user_id,
            org_id = %org_id,
            keys = ?keys,
            "Settings updated"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::SettingsUpdated)
                    .with_actor(ctx.user_id)
                    .with_int("org_id", org_id.as_i64())
                    .with_data("keys", serde_json::json!(keys)),
            )
            .await;

        Ok(())
    }

    fn validate(&self, key: &str, value: &serde_json::Value) -> AppResult<()> {
        if key == SettingsKey::ModelCollection.as_str() {
            let name = value
                .as_str()
                .ok_or_else(|| AppError::validation("Model Collection must be a string"))?;
            if !self.collections.contains(name) {
                return Err(AppError::validation(format!(
                    "Unknown model settings collection '{name}'"
                )));
            }
        } else if key == SettingsKey::EnabledFeatures.as_str() {
            let features = value.as_array().ok_or_else(|| {
                AppError::validation("Enabled Features must be an array of feature names")
            })?;
            for feature in features {
                let name = feature.as_str().ok_or_else(|| {
                    AppError::validation("Enabled Features must be an array of feature names")
                })?;
                name.parse::<FeatureType>()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_dispatcher, setup_db, RecordingObserver};
    use docq_core::error::ErrorKind;
    use docq_llm::collections::ENV_OPENAI_API_KEY;

    async fn fixture() -> (SettingsService, Arc<RecordingObserver>) {
        let pool = setup_db().await.into_pool();
        let observer = Arc::new(RecordingObserver::default());
        let collections = Arc::new(ModelCollections::from_lookup(|name| {
            (name == ENV_OPENAI_API_KEY).then(|| "sk-test".to_string())
        }));
        let service = SettingsService::new(
            Arc::new(SettingsRepository::new(pool)),
            collections,
            empty_dispatcher(observer.clone()),
            &ChatConfig::default(),
        );
        (service, observer)
    }

    fn ctx() -> RequestContext {
        RequestContext::new(UserId::new(1), OrgId::new(1))
    }

    #[tokio::test]
    async fn test_update_and_read_org_settings() {
        let (service, observer) = fixture().await;
        let org = OrgId::new(1);

        let mut values = HashMap::new();
        values.insert(
            SettingsKey::ModelCollection.as_str().to_string(),
            serde_json::json!("openai_latest"),
        );
        values.insert(
            SettingsKey::EnabledFeatures.as_str().to_string(),
            serde_json::json!(["chat_private"]),
        );
        service.update_org_settings(&ctx(), org, &values).await.unwrap();

        let stored = service.org_settings(org).await.unwrap();
        assert_eq!(stored, values);

        let events = observer.events.lock().unwrap().clone();
        assert_eq!(events, vec!["dal.settings.updated"]);
    }

    #[tokio::test]
    async fn test_unknown_collection_rejected_before_any_write() {
        let (service, _observer) = fixture().await;
        let org = OrgId::new(1);

        let mut values = HashMap::new();
        values.insert(
            SettingsKey::EnabledFeatures.as_str().to_string(),
            serde_json::json!(["chat_private"]),
        );
        values.insert(
            SettingsKey::ModelCollection.as_str().to_string(),
            serde_json::json!("no_such_collection"),
        );

        let err = service
            .update_org_settings(&ctx(), org, &values)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        // The valid key in the same request was not written either.
        assert!(service.org_settings(org).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_scope_is_separate_from_org_scope() {
        let (service, _observer) = fixture().await;
        let ctx = ctx();
        let org = OrgId::new(1);
        let user = UserId::new(7);

        let mut values = HashMap::new();
        values.insert("theme".to_string(), serde_json::json!("dark"));
        service
            .update_user_settings(&ctx, org, user, &values)
            .await
            .unwrap();

        assert!(service.org_settings(org).await.unwrap().is_empty());
        assert_eq!(
            service.user_settings(org, user).await.unwrap()["theme"],
            serde_json::json!("dark")
        );
    }

    #[tokio::test]
    async fn test_enabled_features_default_to_all() {
        let (service, _observer) = fixture().await;
        let features = service.enabled_features(OrgId::new(1)).await.unwrap();
        assert_eq!(
            features,
            vec![
                FeatureType::AskShared,
                FeatureType::AskPublic,
                FeatureType::ChatPrivate,
            ]
        );
    }

    #[tokio::test]
    async fn test_enabled_features_reads_stored_list() {
        let (service, _observer) = fixture().await;
        let org = OrgId::new(1);

        let mut values = HashMap::new();
        values.insert(
            SettingsKey::EnabledFeatures.as_str().to_string(),
            serde_json::json!(["chat_private", "ask_shared"]),
        );
        service.update_org_settings(&ctx(), org, &values).await.unwrap();

        let features = service.enabled_features(org).await.unwrap();
        assert_eq!(
            features,
            vec![FeatureType::ChatPrivate, FeatureType::AskShared]
        );
    }

    #[tokio::test]
    async fn test_invalid_feature_name_rejected() {
        let (service, _observer) = fixture().await;
        let mut values = HashMap::new();
        values.insert(
            SettingsKey::EnabledFeatures.as_str().to_string(),
            serde_json::json!(["time_travel"]),
        );
        let err = service
            .update_org_settings(&ctx(), OrgId::new(1), &values)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_model_collection_key_falls_back_to_default() {
        let (service, _observer) = fixture().await;
        let org = OrgId::new(1);

        assert_eq!(
            service.model_collection_key(org).await.unwrap(),
            ChatConfig::default().default_model_collection
        );

        let mut values = HashMap::new();
        values.insert(
            SettingsKey::ModelCollection.as_str().to_string(),
            serde_json::json!("openai_latest"),
        );
        service.update_org_settings(&ctx(), org, &values).await.unwrap();

        assert_eq!(
            service.model_collection_key(org).await.unwrap(),
            "openai_latest"
        );
    }
}
