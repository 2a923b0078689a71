//! Event Router
//!
//! Every browser signal is turned into an [`Event`] and fed through
//! [`EventRouter::handle`]. Handlers run to completion but suspend on each
//! storage or page call, so events for different tabs interleave freely.
//! Reconciliation is idempotent and the only shared state is the
//! per-tab URL table, so no locking beyond that table is needed.

use serde_json::{json, Value};
use tm_core::url::{is_restricted_url, resolve_tab_url};
use tm_core::{AppliedFlags, IconCatalog, OverrideRecord, TabChange, TabId, TabInfo};

use crate::config::{RemovalPolicy, RuntimeConfig};
use crate::error::Result;
use crate::platform::{DialogOutcome, DialogRequest, Platform};
use crate::reconcile::{AppearancePlan, PlanSource, Reconciler, SweepReport};
use crate::schedule::{ScheduleController, ScheduleState};
use crate::store::{clear_override, load_override, save_override, save_settings, Settings, Store};
use crate::tabs::TabTable;

/// A browser signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Extension installed or updated.
    Installed,
    /// Browser profile started.
    Startup,
    TabUpdated {
        tab_id: TabId,
        change: TabChange,
        tab: TabInfo,
    },
    TabRemoved {
        tab_id: TabId,
    },
    MenuClicked {
        menu_id: String,
        tab: Option<TabInfo>,
    },
    /// Toolbar button clicked.
    ActionClicked {
        tab: Option<TabInfo>,
    },
    AlarmFired {
        name: String,
    },
    /// Runtime message, identified by its `type` field.
    Message {
        kind: String,
    },
    /// The settings page saved new settings.
    SettingsSaved(Settings),
}

/// Result of the configure-tab flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Cancelled,
    Reset,
    Saved,
}

/// What handling an event did.
#[derive(Debug)]
pub enum Outcome {
    Ignored,
    Reconciled(AppliedFlags),
    Swept(SweepReport),
    Scheduled(ScheduleState),
    Configured(ConfigureOutcome),
    SettingsOpened,
    /// Tab forgotten; `cleared` tells whether its overrides were removed.
    Removed { cleared: bool },
    /// Reply to a runtime message.
    Reply(Value),
}

pub struct EventRouter<S, P> {
    store: S,
    platform: P,
    config: RuntimeConfig,
    icons: IconCatalog,
    tabs: TabTable,
}

impl<S: Store, P: Platform> EventRouter<S, P> {
    pub fn new(store: S, platform: P, config: RuntimeConfig) -> Self {
        let icons = IconCatalog::new(&config.icon_base_url);
        Self {
            store,
            platform,
            config,
            icons,
            tabs: TabTable::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn tabs(&self) -> &TabTable {
        &self.tabs
    }

    fn reconciler(&self) -> Reconciler<'_, S, P> {
        Reconciler::new(&self.store, &self.platform, &self.icons)
    }

    fn scheduler(&self) -> ScheduleController<'_, P> {
        ScheduleController::new(&self.platform, &self.config.alarm_name)
    }

    /// Handle one event.
    pub async fn handle(&self, event: Event) -> Result<Outcome> {
        match event {
            Event::Installed | Event::Startup => {
                let state = self.scheduler().apply_from_store(&self.store).await?;
                Ok(Outcome::Scheduled(state))
            }
            Event::TabUpdated { tab_id, change, tab } => self.on_tab_updated(tab_id, &change, &tab).await,
            Event::TabRemoved { tab_id } => self.on_tab_removed(tab_id).await,
            Event::MenuClicked { menu_id, tab } => self.on_menu_clicked(&menu_id, tab.as_ref()).await,
            Event::ActionClicked { tab } => match tab {
                Some(tab) => self.configure_tab(&tab).await,
                None => Ok(Outcome::Ignored),
            },
            Event::AlarmFired { name } => {
                if name != self.config.alarm_name {
                    return Ok(Outcome::Ignored);
                }
                Ok(Outcome::Swept(self.sweep().await?))
            }
            Event::Message { kind } => {
                if kind != self.config.refresh_message {
                    return Ok(Outcome::Ignored);
                }
                self.sweep().await?;
                Ok(Outcome::Reply(json!({ "ok": true })))
            }
            Event::SettingsSaved(settings) => {
                save_settings(&self.store, &settings).await?;
                let state = self.scheduler().apply(settings.interval_minutes).await?;
                let report = self.sweep().await?;
                log::debug!("settings saved ({:?}), swept {} tab(s)", state, report.tabs);
                Ok(Outcome::Swept(report))
            }
        }
    }

    /// Reconcile every open tab, remembering each tab's URL on the way.
    pub async fn sweep(&self) -> Result<SweepReport> {
        let tabs = self.platform.list_all_tabs().await?;
        for tab in &tabs {
            if let Some(url) = resolve_tab_url(tab, None) {
                self.tabs.record(tab.id, url);
            }
        }
        Ok(self.reconciler().refresh_tabs(&tabs).await)
    }

    async fn on_tab_updated(&self, tab_id: TabId, change: &TabChange, tab: &TabInfo) -> Result<Outcome> {
        let url = match resolve_tab_url(tab, Some(change)) {
            Some(url) => url,
            None => return Ok(Outcome::Ignored),
        };
        self.tabs.record(tab_id, url);

        if !change.triggers_refresh() {
            return Ok(Outcome::Ignored);
        }

        let tab = TabInfo {
            id: tab_id,
            ..tab.clone()
        };
        let applied = self.reconciler().refresh_tab(&tab, Some(url)).await?;
        Ok(Outcome::Reconciled(applied))
    }

    async fn on_tab_removed(&self, tab_id: TabId) -> Result<Outcome> {
        let url = match self.tabs.forget(tab_id) {
            Some(url) => url,
            None => return Ok(Outcome::Ignored),
        };

        let clear = match self.config.removal_policy {
            RemovalPolicy::Retain => false,
            RemovalPolicy::ClearWhenLastTab => !self.tabs.is_url_open(&url),
        };
        if clear {
            clear_override(&self.store, &url).await?;
        }
        Ok(Outcome::Removed { cleared: clear })
    }

    async fn on_menu_clicked(&self, menu_id: &str, tab: Option<&TabInfo>) -> Result<Outcome> {
        let menu = &self.config.menu;
        if menu_id == menu.general_settings {
            self.platform.open_settings_page().await?;
            return Ok(Outcome::SettingsOpened);
        }
        if menu_id != menu.configure_page && menu_id != menu.configure_action {
            return Ok(Outcome::Ignored);
        }
        match tab {
            Some(tab) => self.configure_tab(tab).await,
            None => Ok(Outcome::Ignored),
        }
    }

    /// Show the configure dialog for a tab and persist the choice.
    async fn configure_tab(&self, tab: &TabInfo) -> Result<Outcome> {
        let url = match resolve_tab_url(tab, None) {
            Some(url) if !is_restricted_url(url) => url,
            _ => return Ok(Outcome::Ignored),
        };
        self.tabs.record(tab.id, url);

        let stored = load_override(&self.store, url).await?;
        let request = DialogRequest {
            current_name: stored
                .name
                .clone()
                .or_else(|| tab.title.clone())
                .unwrap_or_default(),
            current_icon_url: stored.icon_url.clone().unwrap_or_default(),
            icons: self.icons.available(),
        };

        let outcome = match self.platform.open_config_dialog(tab.id, request).await? {
            Some(outcome) => outcome,
            None => return Ok(Outcome::Configured(ConfigureOutcome::Cancelled)),
        };

        match outcome {
            DialogOutcome::Reset => {
                clear_override(&self.store, url).await?;
                self.platform.reload_tab(tab.id).await?;
                Ok(Outcome::Configured(ConfigureOutcome::Reset))
            }
            DialogOutcome::Save { name, icon_url } => {
                let record = OverrideRecord {
                    name: Some(name),
                    icon_url: Some(icon_url),
                };
                save_override(&self.store, url, &record).await?;

                let plan = AppearancePlan {
                    title: record.name,
                    title_source: Some(PlanSource::Override),
                    icon_url: record.icon_url,
                    icon_source: Some(PlanSource::Override),
                };
                self.reconciler().apply(tab.id, &plan).await;
                Ok(Outcome::Configured(ConfigureOutcome::Saved))
            }
        }
    }
}
