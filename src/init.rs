use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPreset {
    Permissive,
    Standard,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Updated,
}

/// Write `preset` into the config file at `path`, creating it if needed.
/// Keys the preset sets are replaced; everything else in the file is kept.
pub fn generate_config_at_path<P: AsRef<Path>>(path: P, preset: InitPreset) -> Result<InitOutcome> {
    let config_path = path.as_ref();
    let preset_value: toml::Value = toml::from_str(get_preset_config(preset))
        .context("Invalid preset config format")?;
    let preset_table = preset_value
        .as_table()
        .ok_or_else(|| anyhow!("Invalid preset config format"))?;

    if !config_path.exists() {
        // Fresh files keep the preset's own comments
        fs::write(config_path, get_preset_config(preset))
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        return Ok(InitOutcome::Created);
    }

    let existing = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let mut doc = existing
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    for (key, value) in preset_table {
        doc[key.as_str()] = toml_value_to_edit_item(value)?;
    }
    fs::write(config_path, doc.to_string())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(InitOutcome::Updated)
}

fn get_preset_config(preset: InitPreset) -> &'static str {
    match preset {
        InitPreset::Permissive => include_str!("../presets/permissive.toml"),
        InitPreset::Standard => include_str!("../presets/standard.toml"),
        InitPreset::Strict => include_str!("../presets/strict.toml"),
    }
}

fn toml_value_to_edit_item(value: &toml::Value) -> Result<toml_edit::Item> {
    match value {
        toml::Value::String(s) => Ok(toml_edit::value(s.as_str())),
        toml::Value::Integer(i) => Ok(toml_edit::value(*i)),
        toml::Value::Boolean(b) => Ok(toml_edit::value(*b)),
        toml::Value::Array(arr) => {
            let mut edit_arr = toml_edit::Array::new();
            for item in arr {
                match item {
                    toml::Value::String(s) => edit_arr.push(s.as_str()),
                    _ => return Err(anyhow!("Unsupported array item type: {:?}", item)),
                }
            }
            Ok(toml_edit::Item::Value(edit_arr.into()))
        }
        toml::Value::Table(table) => {
            let mut edit_table = toml_edit::Table::new();
            for (key, val) in table {
                edit_table[key.as_str()] = toml_value_to_edit_item(val)?;
            }
            Ok(toml_edit::Item::Table(edit_table))
        }
        _ => Err(anyhow!("Unsupported TOML value type")),
    }
}
