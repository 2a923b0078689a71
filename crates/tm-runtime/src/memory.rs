//! In-memory store and platform.
//!
//! `MemoryPlatform` keeps a list of tabs, applies titles to them the way a
//! document title change would, and records every call it receives. It
//! backs offline sweeps and the test suites.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tm_core::{TabId, TabInfo};

use crate::error::{Error, Result};
use crate::platform::{ConfigDialog, DialogOutcome, DialogRequest, PageMutator, TabControl, TabInventory, Timer};
use crate::store::Store;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
    failing_prefixes: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            values: Mutex::new(entries.into_iter().collect()),
            failing_prefixes: Mutex::new(Vec::new()),
        }
    }

    /// Make every access to keys starting with `prefix` fail.
    pub fn fail_keys_with_prefix(&self, prefix: &str) {
        lock(&self.failing_prefixes).push(prefix.to_string());
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        lock(&self.values).clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        lock(&self.values).contains_key(key)
    }

    fn check(&self, key: &str) -> Result<()> {
        if lock(&self.failing_prefixes).iter().any(|p| key.starts_with(p.as_str())) {
            return Err(Error::Storage(format!("access to '{}' failed", key)));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check(key)?;
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check(key)?;
        lock(&self.values).insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        lock(&self.values).remove(key);
        Ok(())
    }
}

// =============================================================================
// MemoryPlatform
// =============================================================================

/// A call received by [`MemoryPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    SetTitle { tab_id: TabId, title: String },
    SetIcon { tab_id: TabId, icon_url: String },
    ScheduleRecurring { name: String, period_minutes: u32 },
    CancelTimer { name: String },
    ReloadTab { tab_id: TabId },
    OpenSettingsPage,
    OpenConfigDialog { tab_id: TabId, request: DialogRequest },
}

#[derive(Debug, Default)]
pub struct MemoryPlatform {
    tabs: Mutex<Vec<TabInfo>>,
    calls: Mutex<Vec<PlatformCall>>,
    alarms: Mutex<BTreeMap<String, u32>>,
    icons: Mutex<BTreeMap<TabId, String>>,
    dialog_outcome: Mutex<Option<DialogOutcome>>,
    failing_tabs: Mutex<HashSet<TabId>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tabs(tabs: Vec<TabInfo>) -> Self {
        Self {
            tabs: Mutex::new(tabs),
            ..Self::default()
        }
    }

    /// Add a tab, or replace the tab with the same id.
    pub fn upsert_tab(&self, tab: TabInfo) {
        let mut tabs = lock(&self.tabs);
        match tabs.iter_mut().find(|t| t.id == tab.id) {
            Some(existing) => *existing = tab,
            None => tabs.push(tab),
        }
    }

    pub fn remove_tab(&self, tab_id: TabId) {
        lock(&self.tabs).retain(|t| t.id != tab_id);
    }

    pub fn tab(&self, tab_id: TabId) -> Option<TabInfo> {
        lock(&self.tabs).iter().find(|t| t.id == tab_id).cloned()
    }

    /// Icon URL last applied to a tab.
    pub fn icon_of(&self, tab_id: TabId) -> Option<String> {
        lock(&self.icons).get(&tab_id).cloned()
    }

    /// Outcome returned by the next configure dialogs; `None` cancels.
    pub fn set_dialog_outcome(&self, outcome: Option<DialogOutcome>) {
        *lock(&self.dialog_outcome) = outcome;
    }

    /// Make page mutations on `tab_id` fail, as if the tab navigated away.
    pub fn fail_page_mutations(&self, tab_id: TabId) {
        lock(&self.failing_tabs).insert(tab_id);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        lock(&self.calls).clone()
    }

    pub fn take_calls(&self) -> Vec<PlatformCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    pub fn active_alarms(&self) -> BTreeMap<String, u32> {
        lock(&self.alarms).clone()
    }

    fn record(&self, call: PlatformCall) {
        lock(&self.calls).push(call);
    }

    fn check_page(&self, tab_id: TabId) -> Result<()> {
        if lock(&self.failing_tabs).contains(&tab_id) {
            return Err(Error::page(tab_id, "cannot access contents of the page"));
        }
        if !lock(&self.tabs).iter().any(|t| t.id == tab_id) {
            return Err(Error::page(tab_id, "no tab with id"));
        }
        Ok(())
    }
}

impl PageMutator for MemoryPlatform {
    async fn set_title(&self, tab_id: TabId, title: &str) -> Result<()> {
        self.record(PlatformCall::SetTitle {
            tab_id,
            title: title.to_string(),
        });
        self.check_page(tab_id)?;
        if let Some(tab) = lock(&self.tabs).iter_mut().find(|t| t.id == tab_id) {
            tab.title = Some(title.to_string());
        }
        Ok(())
    }

    async fn set_icon(&self, tab_id: TabId, icon_url: &str) -> Result<()> {
        self.record(PlatformCall::SetIcon {
            tab_id,
            icon_url: icon_url.to_string(),
        });
        self.check_page(tab_id)?;
        lock(&self.icons).insert(tab_id, icon_url.to_string());
        Ok(())
    }
}

impl TabInventory for MemoryPlatform {
    async fn list_all_tabs(&self) -> Result<Vec<TabInfo>> {
        Ok(lock(&self.tabs).clone())
    }
}

impl Timer for MemoryPlatform {
    async fn schedule_recurring(&self, name: &str, period_minutes: u32) -> Result<()> {
        self.record(PlatformCall::ScheduleRecurring {
            name: name.to_string(),
            period_minutes,
        });
        lock(&self.alarms).insert(name.to_string(), period_minutes);
        Ok(())
    }

    async fn cancel(&self, name: &str) -> Result<()> {
        self.record(PlatformCall::CancelTimer { name: name.to_string() });
        lock(&self.alarms).remove(name);
        Ok(())
    }
}

impl TabControl for MemoryPlatform {
    async fn reload_tab(&self, tab_id: TabId) -> Result<()> {
        self.record(PlatformCall::ReloadTab { tab_id });
        Ok(())
    }

    async fn open_settings_page(&self) -> Result<()> {
        self.record(PlatformCall::OpenSettingsPage);
        Ok(())
    }
}

impl ConfigDialog for MemoryPlatform {
    async fn open_config_dialog(&self, tab_id: TabId, request: DialogRequest) -> Result<Option<DialogOutcome>> {
        self.record(PlatformCall::OpenConfigDialog { tab_id, request });
        Ok(lock(&self.dialog_outcome).clone())
    }
}
