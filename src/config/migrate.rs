use crate::config::Config;
use crate::ui::messages::{info, success};
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Keys a complete config file must carry, with their default YAML values.
/// Older releases shipped without the retry / progress-reset settings;
/// `run_config_migration` fills the gaps in place.
fn expected_keys() -> Vec<(&'static str, Value)> {
    vec![
        ("tenant_code", Value::String("acme".into())),
        ("project_code", Value::String("retail".into())),
        ("session_ttl_minutes", Value::Number(720_i64.into())),
        ("identity_retry_count", Value::Number(3_i64.into())),
        ("identity_retry_interval_ms", Value::Number(200_i64.into())),
        ("clear_progress_on_logout", Value::Bool(true)),
        ("otp_length", Value::Number(6_i64.into())),
        ("separator_char", Value::String("-".into())),
    ]
}

/// Return the keys missing from the config file on disk.
/// Used by `config --check`.
pub fn missing_keys(path: &Path) -> io::Result<Vec<&'static str>> {
    let content = fs::read_to_string(path)?;

    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| io::Error::other(format!("Failed to parse {:?}: {}", path, e)))?;

    let mut missing = Vec::new();

    if let Some(map) = yaml.as_mapping() {
        for (key, _) in expected_keys() {
            if !map.contains_key(&Value::String(key.to_string())) {
                missing.push(key);
            }
        }
    }

    Ok(missing)
}

/// Add any missing keys to the config file, preserving existing values.
///
/// Returns:
///   Ok(true)  → config updated
///   Ok(false) → no change needed
pub fn run_config_migration() -> io::Result<bool> {
    let path = Config::config_file();

    if !path.exists() {
        // Nothing to migrate
        return Ok(false);
    }

    let content = fs::read_to_string(&path)?;

    let mut yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| io::Error::other(format!("Failed to parse {:?}: {}", path, e)))?;

    let Some(map) = yaml.as_mapping_mut() else {
        return Ok(false);
    };

    let mut added = Vec::new();

    for (key, default) in expected_keys() {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            map.insert(k, default);
            added.push(key);
        }
    }

    if added.is_empty() {
        return Ok(false);
    }

    for key in &added {
        info(format!("Adding missing config key '{}'", key));
    }

    let serialized = serde_yaml::to_string(&yaml)
        .map_err(|e| io::Error::other(format!("Failed to serialize YAML for {:?}: {}", path, e)))?;

    fs::write(&path, serialized)?;

    success(format!(
        "Config migration completed: {} key(s) added.",
        added.len()
    ));

    Ok(true)
}
