//! Browser collaborators consumed by the runtime.
//!
//! Each trait is a thin seam over one browser API. Page mutations must be
//! idempotent: calling `set_title` or `set_icon` twice with the same value
//! has the same effect as calling it once.

use tm_core::{IconEntry, TabId, TabInfo};

use crate::error::Result;

/// Applies a title or icon to a page's document.
#[allow(async_fn_in_trait)]
pub trait PageMutator {
    async fn set_title(&self, tab_id: TabId, title: &str) -> Result<()>;

    /// Replace the page's icons with `icon_url`; an empty URL removes them.
    async fn set_icon(&self, tab_id: TabId, icon_url: &str) -> Result<()>;
}

/// Enumerates open tabs.
#[allow(async_fn_in_trait)]
pub trait TabInventory {
    async fn list_all_tabs(&self) -> Result<Vec<TabInfo>>;
}

/// Named recurring timer. Scheduling a name that is already registered
/// replaces its period.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn schedule_recurring(&self, name: &str, period_minutes: u32) -> Result<()>;
    async fn cancel(&self, name: &str) -> Result<()>;
}

/// Tab-level actions outside the document.
#[allow(async_fn_in_trait)]
pub trait TabControl {
    async fn reload_tab(&self, tab_id: TabId) -> Result<()>;

    /// Open the general settings page, or focus it if already open.
    async fn open_settings_page(&self) -> Result<()>;
}

/// Initial values shown by the configure-tab dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub current_name: String,
    pub current_icon_url: String,
    pub icons: Vec<IconEntry>,
}

/// What the user chose in the configure-tab dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Reset,
    Save { name: String, icon_url: String },
}

/// In-page dialog for configuring one tab. `Ok(None)` means cancelled.
#[allow(async_fn_in_trait)]
pub trait ConfigDialog {
    async fn open_config_dialog(&self, tab_id: TabId, request: DialogRequest) -> Result<Option<DialogOutcome>>;
}

/// Everything the event router needs from the browser.
pub trait Platform: PageMutator + TabInventory + Timer + TabControl + ConfigDialog {}

impl<T> Platform for T where T: PageMutator + TabInventory + Timer + TabControl + ConfigDialog {}
