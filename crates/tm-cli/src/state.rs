use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tm_core::TabInfo;
use tm_runtime::RuntimeConfig;

/// Offline browser state: extension storage plus open tabs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDocument {
    pub storage: BTreeMap<String, Value>,
    pub tabs: Vec<TabInfo>,
}

pub fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

pub fn read_state(path: &Path) -> Result<StateDocument, String> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Invalid state document '{}': {}", path.display(), e))
}

pub fn write_state(path: &Path, state: &StateDocument) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| format!("Failed to serialize state: {}", e))?;
    fs::write(path, json)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

pub fn read_config(path: Option<&Path>) -> Result<RuntimeConfig, String> {
    match path {
        Some(path) => {
            let text = read_text(path)?;
            serde_json::from_str(&text)
                .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
        }
        None => Ok(RuntimeConfig::default()),
    }
}
