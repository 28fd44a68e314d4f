//! Internationalization (i18n) of interface strings
//!
//! Built-in strings for both locales are embedded in the binary. A
//! `languages/` directory in the site folder may override them with
//! `en.yml` / `sq.yml` files. Lookups fall back to English, then to the key.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::Locale;

const BUILTIN_EN: &str = include_str!("en.yml");
const BUILTIN_SQ: &str = include_str!("sq.yml");

type Strings = HashMap<String, serde_yaml::Value>;

/// Interface strings for every locale
#[derive(Debug, Clone, Default)]
pub struct I18n {
    translations: HashMap<Locale, Strings>,
}

impl I18n {
    /// Strings shipped with the binary
    pub fn builtin() -> Result<Self> {
        let mut i18n = Self::default();
        i18n.translations
            .insert(Locale::En, serde_yaml::from_str(BUILTIN_EN)?);
        i18n.translations
            .insert(Locale::Sq, serde_yaml::from_str(BUILTIN_SQ)?);
        Ok(i18n)
    }

    /// Merge override files from a directory (`en.yml`, `sq.yml`)
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(locale) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Locale::from_code)
            else {
                tracing::debug!("Skipping language file for unsupported locale: {:?}", path);
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Strings>(&content) {
                Ok(data) => {
                    let target = self.translations.entry(locale).or_default();
                    merge(target, data);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get a translation by dotted key, e.g. `post.min_read`
    pub fn get(&self, locale: Locale, key: &str) -> String {
        if let Some(value) = self.lookup(locale, key) {
            return value;
        }

        if locale != Locale::DEFAULT {
            if let Some(value) = self.lookup(Locale::DEFAULT, key) {
                return value;
            }
        }

        // Return key as fallback
        key.to_string()
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<String> {
        let data = self.translations.get(&locale)?;
        get_nested_value(data, key).map(yaml_value_to_string)
    }

    /// All strings for a locale as a nested map for templates, with English
    /// filling any gaps
    pub fn strings_for(&self, locale: Locale) -> serde_json::Value {
        let mut flat = HashMap::new();
        if let Some(en) = self.translations.get(&Locale::DEFAULT) {
            flatten_translations(en, "", &mut flat);
        }
        if locale != Locale::DEFAULT {
            if let Some(data) = self.translations.get(&locale) {
                flatten_translations(data, "", &mut flat);
            }
        }

        let mut root = serde_json::Map::new();
        for (key, value) in flat {
            insert_dotted(&mut root, &key, value);
        }
        serde_json::Value::Object(root)
    }
}

/// Deep-merge `overlay` into `base`
fn merge(base: &mut Strings, overlay: Strings) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(serde_yaml::Value::Mapping(existing)), serde_yaml::Value::Mapping(new)) => {
                for (k, v) in new {
                    existing.insert(k, v);
                }
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Strings, key: &str) -> Option<&'a serde_yaml::Value> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current: Option<&serde_yaml::Value> = data.get(parts[0]);

    for part in &parts[1..] {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(data: &Strings, prefix: &str, result: &mut HashMap<String, String>) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: Strings = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {}
            other => {
                result.insert(full_key, yaml_value_to_string(other));
            }
        }
    }
}

/// Insert `a.b.c = value` into a nested JSON object
fn insert_dotted(root: &mut serde_json::Map<String, serde_json::Value>, key: &str, value: String) {
    match key.split_once('.') {
        None => {
            root.insert(key.to_string(), serde_json::Value::String(value));
        }
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if !child.is_object() {
                *child = serde_json::Value::Object(serde_json::Map::new());
            }
            if let serde_json::Value::Object(map) = child {
                insert_dotted(map, rest, value);
            }
        }
    }
}
