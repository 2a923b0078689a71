//! Last known URL per open tab.
//!
//! A tab-removal event carries only the tab id, so the router remembers
//! which URL each tab last showed in order to find its override keys.
//! Entries are written on every tab update with a URL and removed exactly
//! when the tab is removed. Concurrent updates for the same tab keep the
//! last write.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tm_core::TabId;

#[derive(Debug, Default)]
pub struct TabTable {
    urls: Mutex<HashMap<TabId, String>>,
}

impl TabTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tab_id: TabId, url: &str) {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.insert(tab_id, url.to_string());
    }

    /// Drop the entry for `tab_id`, returning its last URL.
    pub fn forget(&self, tab_id: TabId) -> Option<String> {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.remove(&tab_id)
    }

    pub fn url_of(&self, tab_id: TabId) -> Option<String> {
        let urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.get(&tab_id).cloned()
    }

    /// Whether any tracked tab currently shows `url`.
    pub fn is_url_open(&self, url: &str) -> bool {
        let urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.values().any(|u| u == url)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
