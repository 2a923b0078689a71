//! Key-value persistence and typed accessors over it.

use serde_json::Value;
use tm_core::OverrideRecord;

use crate::error::{Error, Result};
use crate::keys::{tab_icon_key, tab_name_key, INTERVAL_KEY, RULES_KEY};

/// Extension-storage style key-value store.
///
/// Implementations must be safe to call from interleaved tasks; each call is
/// independent and there is no transaction support.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

// =============================================================================
// Overrides
// =============================================================================

/// Read both override fields for `url`.
pub async fn load_override<S: Store>(store: &S, url: &str) -> Result<OverrideRecord> {
    let name_key = tab_name_key(url);
    let icon_key = tab_icon_key(url);
    let (name, icon_url) = futures::try_join!(store.get(&name_key), store.get(&icon_key))?;

    Ok(OverrideRecord {
        name: optional_string(&name_key, name)?,
        icon_url: optional_string(&icon_key, icon_url)?,
    })
}

/// Persist both override fields for `url`. `None` fields are removed.
pub async fn save_override<S: Store>(store: &S, url: &str, record: &OverrideRecord) -> Result<()> {
    let name_key = tab_name_key(url);
    let icon_key = tab_icon_key(url);

    match &record.name {
        Some(name) => store.set(&name_key, Value::String(name.clone())).await?,
        None => store.remove(&name_key).await?,
    }
    match &record.icon_url {
        Some(icon_url) => store.set(&icon_key, Value::String(icon_url.clone())).await?,
        None => store.remove(&icon_key).await?,
    }
    Ok(())
}

/// Remove both override fields for `url`.
pub async fn clear_override<S: Store>(store: &S, url: &str) -> Result<()> {
    store.remove(&tab_name_key(url)).await?;
    store.remove(&tab_icon_key(url)).await
}

fn optional_string(key: &str, value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::InvalidValue {
            key: key.to_string(),
            message: format!("expected string, found {}", other),
        }),
    }
}

// =============================================================================
// Settings
// =============================================================================

/// User settings edited on the general settings page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub rules_text: String,
    /// Sweep period; 0 disables the periodic sweep.
    pub interval_minutes: u32,
}

pub async fn load_rules_text<S: Store>(store: &S) -> Result<String> {
    match store.get(RULES_KEY).await? {
        Some(Value::String(text)) => Ok(text),
        _ => Ok(String::new()),
    }
}

pub async fn load_interval_minutes<S: Store>(store: &S) -> Result<u32> {
    Ok(store
        .get(INTERVAL_KEY)
        .await?
        .as_ref()
        .map(interval_from_value)
        .unwrap_or(0))
}

pub async fn load_settings<S: Store>(store: &S) -> Result<Settings> {
    let (rules_text, interval_minutes) =
        futures::try_join!(load_rules_text(store), load_interval_minutes(store))?;
    Ok(Settings {
        rules_text,
        interval_minutes,
    })
}

pub async fn save_settings<S: Store>(store: &S, settings: &Settings) -> Result<()> {
    store
        .set(RULES_KEY, Value::String(settings.rules_text.clone()))
        .await?;
    store
        .set(INTERVAL_KEY, Value::from(settings.interval_minutes))
        .await
}

/// Interpret a stored interval. Numbers and numeric strings are floored to
/// whole minutes; anything else, including negatives, means disabled.
pub fn interval_from_value(value: &Value) -> u32 {
    let minutes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match minutes {
        Some(m) if m.is_finite() && m >= 1.0 => m.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    #[test]
    fn interval_parsing() {
        assert_eq!(interval_from_value(&json!(15)), 15);
        assert_eq!(interval_from_value(&json!(2.7)), 2);
        assert_eq!(interval_from_value(&json!("30")), 30);
        assert_eq!(interval_from_value(&json!(0)), 0);
        assert_eq!(interval_from_value(&json!(-5)), 0);
        assert_eq!(interval_from_value(&json!(0.5)), 0);
        assert_eq!(interval_from_value(&json!("soon")), 0);
        assert_eq!(interval_from_value(&json!(null)), 0);
        assert_eq!(interval_from_value(&json!(true)), 0);
    }

    #[tokio::test]
    async fn override_round_trip_keeps_empty_icon() {
        let store = MemoryStore::new();
        let url = "https://example.com/a";
        let record = OverrideRecord {
            name: Some("Mine".into()),
            icon_url: Some(String::new()),
        };
        save_override(&store, url, &record).await.unwrap();
        assert_eq!(load_override(&store, url).await.unwrap(), record);

        clear_override(&store, url).await.unwrap();
        assert!(load_override(&store, url).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn override_rejects_non_string() {
        let store = MemoryStore::new();
        let url = "https://example.com/";
        store.set(&tab_name_key(url), json!(42)).await.unwrap();
        let err = load_override(&store, url).await.unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn missing_settings_use_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store).await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let store = MemoryStore::new();
        let settings = Settings {
            rules_text: "example;Example".into(),
            interval_minutes: 15,
        };
        save_settings(&store, &settings).await.unwrap();
        assert_eq!(load_settings(&store).await.unwrap(), settings);
        assert_eq!(store.get(INTERVAL_KEY).await.unwrap(), Some(json!(15)));
    }
}
