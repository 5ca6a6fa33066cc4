//! Configuration Source
//!
//! Dokumen INI sectioned key/value, dibaca seperti iniparser:
//!
//! ```ini
//! ; komentar
//! [server]
//! verbose = yes
//! name = node-1
//! key = 0a:1b:2c:3d
//! ```
//!
//! Nama section dan key case-insensitive. Key sebelum section pertama
//! dibaca dengan section `""`. File `*.toml` juga diterima: table jadi
//! section, scalar di-render ke text.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use ini::Ini;
use toml::{Table, Value};

use crate::error::ConfigError;

type Section = BTreeMap<String, String>;

/// Loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    sections: BTreeMap<String, Section>,
}

impl Config {
    /// Load dan parse file konfigurasi (INI, atau TOML jika ekstensi `.toml`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml(&text)?
        } else {
            Self::from_ini(&text)?
        };

        tracing::debug!(
            path = %path.display(),
            sections = config.sections.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Parse dokumen INI
    pub fn from_ini(text: &str) -> Result<Self, ConfigError> {
        let document = Ini::load_from_str(text)?;
        let mut config = Self::default();
        for (section, properties) in &document {
            for (key, value) in properties.iter() {
                config.insert(section.unwrap_or(""), key, value.trim().to_string());
            }
        }
        Ok(config)
    }

    /// Parse dokumen TOML (table level atas = section)
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let root: Table = toml::from_str(text)?;
        let mut config = Self::default();
        for (name, value) in &root {
            match value {
                Value::Table(table) => {
                    for (key, value) in table {
                        if let Some(text) = render(value) {
                            config.insert(name, key, text);
                        }
                    }
                }
                other => {
                    if let Some(text) = render(other) {
                        config.insert("", name, text);
                    }
                }
            }
        }
        Ok(config)
    }

    fn insert(&mut self, section: &str, key: &str, value: String) {
        self.sections
            .entry(section.to_ascii_lowercase())
            .or_default()
            .insert(key.to_ascii_lowercase(), value);
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_ascii_lowercase())?
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Boolean value berdasarkan karakter pertama:
    /// `y`/`t`/`1` → true, `n`/`f`/`0` → false (case-insensitive).
    /// Value lain dianggap tidak ada.
    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        match self.lookup(section, key)?.chars().next()? {
            'y' | 'Y' | 't' | 'T' | '1' => Some(true),
            'n' | 'N' | 'f' | 'F' | '0' => Some(false),
            _ => None,
        }
    }

    pub fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key).map(str::to_string)
    }

    /// Byte sequence dari hex string (`0a1b2c`, `0x0A 1B 2C`, `0a:1b:2c`)
    pub fn get_bytes(&self, section: &str, key: &str) -> Result<Vec<u8>, ConfigError> {
        let text = self
            .lookup(section, key)
            .ok_or_else(|| ConfigError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })?;

        hex::decode(normalize_hex(text)).map_err(|source| ConfigError::InvalidHex {
            section: section.to_string(),
            key: key.to_string(),
            source,
        })
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_ini(text)
    }
}

/// Scalar TOML → text; array dan table bersarang dilewati
fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(x) => Some(x.to_string()),
        Value::Boolean(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn normalize_hex(text: &str) -> String {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ':' | '-' | ','))
        .collect()
}
