use crate::analysis::dashboard::DashboardOptions;
use crate::analysis::sla::SlaPolicy;
use crate::models::ticket::{IssueCategory, Priority};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;
const PRIORITIES: [Priority; 4] = [Priority::Critical, Priority::High, Priority::Medium, Priority::Low];
const ISSUE_CATEGORIES: [&str; 3] = ["Ticket Type", "Ticket Subject", "Product Purchased"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub sla: SlaPolicy,
    pub dashboard: DashboardOptions,
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_settings(dataset_path: String) -> Result<Value, String> {
    load_settings_from_disk(&dataset_path)
}

pub fn load_effective_settings(dataset_path: &str) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(dataset_path)?;
    Ok(effective_settings(&settings))
}

/// Settings are read-only: a missing or unparseable file falls back to
/// defaults and nothing is ever written back.
pub fn load_settings_from_disk(dataset_path: &str) -> Result<Value, String> {
    let path = settings_path(dataset_path);

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unparseable {}: {e}", path.display());
            json!({})
        })
    } else {
        json!({})
    };

    Ok(migrate_settings(original))
}

pub fn settings_path(dataset_path: &str) -> PathBuf {
    Path::new(dataset_path)
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(".slalens")
        .join("settings.json")
}

fn effective_settings(settings: &Value) -> EffectiveSettings {
    let defaults = SlaPolicy::default();
    let threshold = |priority: Priority, default: u32| {
        settings
            .get("slaThresholdsHrs")
            .and_then(|t| t.get(priority.as_str()))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    };
    let number = |key: &str, default: u64| settings.get(key).and_then(Value::as_u64).unwrap_or(default);

    let sla = SlaPolicy {
        critical_hrs: threshold(Priority::Critical, defaults.critical_hrs),
        high_hrs: threshold(Priority::High, defaults.high_hrs),
        medium_hrs: threshold(Priority::Medium, defaults.medium_hrs),
        low_hrs: threshold(Priority::Low, defaults.low_hrs),
        fallback_hrs: u32::try_from(number("fallbackSlaHrs", u64::from(defaults.fallback_hrs)))
            .unwrap_or(defaults.fallback_hrs),
    };

    let dashboard_defaults = DashboardOptions::default();
    let dashboard = DashboardOptions {
        rolling_window_days: number("rollingWindowDays", 7) as usize,
        top_categories: number("topCategories", 5) as usize,
        default_issue_category: settings
            .get("defaultIssueCategory")
            .and_then(Value::as_str)
            .and_then(IssueCategory::parse)
            .unwrap_or(dashboard_defaults.default_issue_category),
    };

    EffectiveSettings { sla, dashboard }
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        migrate_flat_sla_hours(&mut out);
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    let sla = SlaPolicy::default();
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "slaThresholdsHrs": {
            "Critical": sla.critical_hrs,
            "High": sla.high_hrs,
            "Medium": sla.medium_hrs,
            "Low": sla.low_hrs
        },
        "fallbackSlaHrs": sla.fallback_hrs,
        "rollingWindowDays": 7,
        "topCategories": 5,
        "defaultIssueCategory": "Ticket Subject"
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

/// v0 kept thresholds in a flat `slaHours` map
fn migrate_flat_sla_hours(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };
    let Some(Value::Object(legacy)) = obj.remove("slaHours") else {
        return;
    };

    let thresholds = obj
        .entry("slaThresholdsHrs".to_string())
        .or_insert_with(|| json!({}));
    if let Some(threshold_obj) = thresholds.as_object_mut() {
        for (key, value) in legacy {
            threshold_obj.insert(key, value);
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    let sla = SlaPolicy::default();
    clamp_u64(obj, "fallbackSlaHrs", 1, 720, u64::from(sla.fallback_hrs));
    clamp_u64(obj, "rollingWindowDays", 1, 90, 7);
    clamp_u64(obj, "topCategories", 1, 50, 5);
    sanitize_enum(obj, "defaultIssueCategory", &ISSUE_CATEGORIES, "Ticket Subject");

    let thresholds = obj
        .entry("slaThresholdsHrs".to_string())
        .or_insert_with(|| json!({}));
    if !thresholds.is_object() {
        *thresholds = json!({});
    }
    if let Some(threshold_obj) = thresholds.as_object_mut() {
        for priority in PRIORITIES {
            clamp_u64(
                threshold_obj,
                priority.as_str(),
                1,
                720,
                u64::from(sla.threshold_for(Some(priority.as_str()))),
            );
        }
    }
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}
