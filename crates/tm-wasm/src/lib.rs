//! WebAssembly bindings for TabMagic
//!
//! The extension's JavaScript owns the browser APIs; it calls into these
//! functions for every decision that involves rules.

use std::sync::{Arc, Mutex, PoisonError};

use wasm_bindgen::prelude::*;
use tm_core::{IconCatalog, OverrideRecord, RuleSet};
use tm_rules::{parse_rules_with_report, ParseReport};
use tm_runtime::{keys, plan_appearance, preview_url, INTERVAL_PRESETS};

struct CachedRules {
    text: String,
    rules: Arc<RuleSet>,
}

// Rule text changes rarely compared to how often tabs update.
static RULE_CACHE: Mutex<Option<CachedRules>> = Mutex::new(None);

fn cached_rules(text: &str) -> Arc<RuleSet> {
    let mut cache = RULE_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(cached) = cache.as_ref() {
        if cached.text == text {
            return Arc::clone(&cached.rules);
        }
    }

    let report = parse_rules_with_report(text);
    warn_rejected(&report);
    let rules = Arc::new(report.rules);
    *cache = Some(CachedRules {
        text: text.to_string(),
        rules: Arc::clone(&rules),
    });
    rules
}

fn warn_rejected(report: &ParseReport) {
    for rejected in &report.rejected {
        let message = format!(
            "TabMagic: invalid rule on line {}: {} ({})",
            rejected.line_number, rejected.reason, rejected.text
        );
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &key.into(), value);
}

#[wasm_bindgen]
pub fn parse_rules(rules_text: &str) -> JsValue {
    let report = parse_rules_with_report(rules_text);
    warn_rejected(&report);

    let js_result = js_sys::Object::new();

    let rules = js_sys::Array::new();
    for rule in report.rules.iter() {
        let obj = js_sys::Object::new();
        set(&obj, "pattern", &JsValue::from_str(rule.pattern_source()));
        set(&obj, "nameTemplate", &JsValue::from_str(rule.name_template()));
        set(&obj, "iconTemplate", &JsValue::from_str(rule.icon_template()));
        set(&obj, "hasIcon", &JsValue::from(rule.has_icon()));
        rules.push(&obj);
    }
    set(&js_result, "rules", &rules);

    let rejected = js_sys::Array::new();
    for line in &report.rejected {
        let obj = js_sys::Object::new();
        set(&obj, "line", &JsValue::from(line.line_number as u32));
        set(&obj, "text", &JsValue::from_str(&line.text));
        set(&obj, "reason", &JsValue::from_str(&line.reason.to_string()));
        rejected.push(&obj);
    }
    set(&js_result, "rejected", &rejected);

    js_result.into()
}

/// Decide the title and icon for a tab.
///
/// Returns `{ title?, iconUrl? }`; a missing field means "leave as is".
#[wasm_bindgen]
pub fn plan_tab_appearance(
    url: &str,
    native_title: Option<String>,
    stored_name: Option<String>,
    stored_icon_url: Option<String>,
    rules_text: &str,
    icon_base_url: &str,
) -> JsValue {
    let rules = cached_rules(rules_text);
    let overrides = OverrideRecord {
        name: stored_name,
        icon_url: stored_icon_url,
    };
    let icons = IconCatalog::new(icon_base_url);
    let plan = plan_appearance(url, native_title.as_deref(), &overrides, &rules, &icons);

    let js_result = js_sys::Object::new();
    if let Some(title) = &plan.title {
        set(&js_result, "title", &JsValue::from_str(title));
    }
    if let Some(icon_url) = &plan.icon_url {
        set(&js_result, "iconUrl", &JsValue::from_str(icon_url));
    }
    js_result.into()
}

/// Preview a rule set against tab URLs for the settings page.
#[wasm_bindgen]
pub fn preview_rules(rules_text: &str, urls: JsValue) -> JsValue {
    let rules = cached_rules(rules_text);
    let url_array = js_sys::Array::from(&urls);

    let entries = js_sys::Array::new();
    for value in url_array.iter() {
        let url = value.as_string().unwrap_or_default();
        let entry = preview_url(&rules, &url);

        let obj = js_sys::Object::new();
        set(&obj, "url", &JsValue::from_str(&entry.url));
        if let Some(title) = &entry.title {
            set(&obj, "title", &JsValue::from_str(title));
        }
        if let Some(icon) = &entry.icon {
            set(&obj, "icon", &JsValue::from_str(icon));
        }
        set(&obj, "summary", &JsValue::from_str(&entry.to_string()));
        entries.push(&obj);
    }

    entries.into()
}

#[wasm_bindgen]
pub fn resolve_icon_url(icon_name: &str, icon_base_url: &str) -> String {
    IconCatalog::new(icon_base_url).resolve(icon_name)
}

#[wasm_bindgen]
pub fn available_icons(icon_base_url: &str) -> JsValue {
    let icons = js_sys::Array::new();
    for entry in IconCatalog::new(icon_base_url).available() {
        let obj = js_sys::Object::new();
        set(&obj, "name", &JsValue::from_str(entry.name));
        set(&obj, "url", &JsValue::from_str(&entry.url));
        icons.push(&obj);
    }
    icons.into()
}

#[wasm_bindgen]
pub fn interval_presets() -> JsValue {
    let presets = js_sys::Array::new();
    for (label, minutes) in INTERVAL_PRESETS {
        let obj = js_sys::Object::new();
        set(&obj, "label", &JsValue::from_str(label));
        set(&obj, "value", &JsValue::from(*minutes));
        presets.push(&obj);
    }
    presets.into()
}

#[wasm_bindgen]
pub fn tab_name_key(url: &str) -> String {
    keys::tab_name_key(url)
}

#[wasm_bindgen]
pub fn tab_icon_key(url: &str) -> String {
    keys::tab_icon_key(url)
}

#[wasm_bindgen]
pub fn is_restricted_url(url: &str) -> bool {
    tm_core::is_restricted_url(url)
}
