//! Appearance Reconciler
//!
//! Decides what title and icon a tab should show and applies only what is
//! needed. Three sources compete, in order of precedence:
//!
//! 1. the override record stored for the tab's URL,
//! 2. the first rule matching the URL,
//! 3. the page's own state (left untouched).
//!
//! Title and icon are resolved independently. The decision itself is the
//! pure [`plan_appearance`]; [`Reconciler`] wraps it with persistence reads
//! and page mutations.

use futures::future::join_all;
use tm_core::url::{is_restricted_url, resolve_tab_url};
use tm_core::{find_match, AppliedFlags, IconCatalog, OverrideRecord, RuleSet, TabId, TabInfo};
use tm_rules::parse_rules;

use crate::error::{Error, Result};
use crate::platform::PageMutator;
use crate::store::{load_override, load_rules_text, Store};

// =============================================================================
// Plan
// =============================================================================

/// Where a planned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Override,
    /// Rule at this index in the rule set.
    Rule(usize),
}

/// Target appearance for one tab. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppearancePlan {
    pub title: Option<String>,
    pub title_source: Option<PlanSource>,
    /// Icon URL to apply; `Some("")` removes the page's icons.
    pub icon_url: Option<String>,
    pub icon_source: Option<PlanSource>,
}

impl AppearancePlan {
    pub fn is_noop(&self) -> bool {
        self.title.is_none() && self.icon_url.is_none()
    }
}

/// Compute the target appearance for `url`.
///
/// The title is only planned when it differs from `native_title`. Icons
/// carry no change detection since applying one is idempotent. Restricted
/// URLs always produce an empty plan.
pub fn plan_appearance(
    url: &str,
    native_title: Option<&str>,
    overrides: &OverrideRecord,
    rules: &RuleSet,
    icons: &IconCatalog,
) -> AppearancePlan {
    let mut plan = AppearancePlan::default();
    if url.is_empty() || is_restricted_url(url) {
        return plan;
    }

    let needs_rule = overrides.name.is_none() || overrides.icon_url.is_none();
    let rule_match = if needs_rule { find_match(rules, url) } else { None };

    match overrides.name.as_deref() {
        // An empty stored name suppresses the rule title.
        Some("") => {}
        Some(name) => {
            if native_title != Some(name) {
                plan.title = Some(name.to_string());
                plan.title_source = Some(PlanSource::Override);
            }
        }
        None => {
            if let Some(m) = rule_match.as_ref().filter(|m| m.rule.has_name()) {
                let title = m.render_name();
                if !title.is_empty() && native_title != Some(title.as_str()) {
                    plan.title = Some(title);
                    plan.title_source = Some(PlanSource::Rule(m.rule_index));
                }
            }
        }
    }

    match overrides.icon_url.as_deref() {
        Some(icon_url) => {
            plan.icon_url = Some(icon_url.to_string());
            plan.icon_source = Some(PlanSource::Override);
        }
        None => {
            if let Some(m) = rule_match.as_ref().filter(|m| m.rule.has_icon()) {
                plan.icon_url = Some(icons.resolve(&m.render_icon()));
                plan.icon_source = Some(PlanSource::Rule(m.rule_index));
            }
        }
    }

    plan
}

// =============================================================================
// Reconciler
// =============================================================================

/// Outcome of a sweep over many tabs.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub tabs: usize,
    /// Tabs where at least one mutation was applied.
    pub changed: usize,
    pub failures: Vec<(TabId, Error)>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads state for a tab, plans its appearance and applies the plan.
pub struct Reconciler<'a, S, P> {
    store: &'a S,
    page: &'a P,
    icons: &'a IconCatalog,
}

impl<'a, S: Store, P: PageMutator> Reconciler<'a, S, P> {
    pub fn new(store: &'a S, page: &'a P, icons: &'a IconCatalog) -> Self {
        Self { store, page, icons }
    }

    /// Reconcile a single tab.
    ///
    /// `url` overrides the URL taken from `tab`. Storage failures are
    /// returned; page mutation failures are logged and left for the next
    /// trigger to correct.
    pub async fn refresh_tab(&self, tab: &TabInfo, url: Option<&str>) -> Result<AppliedFlags> {
        let url = match url.filter(|u| !u.is_empty()).or_else(|| resolve_tab_url(tab, None)) {
            Some(url) => url,
            None => return Ok(AppliedFlags::empty()),
        };
        if is_restricted_url(url) {
            log::debug!("tab {}: skipping restricted url {}", tab.id, url);
            return Ok(AppliedFlags::empty());
        }

        let (overrides, rules_text) =
            futures::try_join!(load_override(self.store, url), load_rules_text(self.store))?;
        let rules = parse_rules(&rules_text);

        let plan = plan_appearance(url, tab.title.as_deref(), &overrides, &rules, self.icons);
        Ok(self.apply(tab.id, &plan).await)
    }

    /// Apply a plan to a tab, returning what was successfully applied.
    pub async fn apply(&self, tab_id: TabId, plan: &AppearancePlan) -> AppliedFlags {
        let mut applied = AppliedFlags::empty();

        if let Some(title) = &plan.title {
            match self.page.set_title(tab_id, title).await {
                Ok(()) => applied |= AppliedFlags::TITLE,
                Err(e) => log::debug!("tab {}: title not applied: {}", tab_id, e),
            }
        }

        if let Some(icon_url) = &plan.icon_url {
            match self.page.set_icon(tab_id, icon_url).await {
                Ok(()) => applied |= AppliedFlags::ICON,
                Err(e) => log::debug!("tab {}: icon not applied: {}", tab_id, e),
            }
        }

        applied
    }

    /// Reconcile every tab concurrently. One tab's failure never affects
    /// another.
    pub async fn refresh_tabs(&self, tabs: &[TabInfo]) -> SweepReport {
        let results = join_all(tabs.iter().map(|tab| self.refresh_tab(tab, None))).await;

        let mut report = SweepReport {
            tabs: tabs.len(),
            ..SweepReport::default()
        };
        for (tab, result) in tabs.iter().zip(results) {
            match result {
                Ok(applied) if !applied.is_empty() => report.changed += 1,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("tab {}: reconciliation failed: {}", tab.id, e);
                    report.failures.push((tab.id, e));
                }
            }
        }
        report
    }
}
