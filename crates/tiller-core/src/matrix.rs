//! Build-matrix entry parsing and formatting.
//!
//! Each matrix entry is a whitespace-separated list of `KEY=value` or
//! `KEY="quoted value"` pairs. An entry carrying a `TEST_SUITE` key is a
//! bucket slot; everything else passes through untouched.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::TillerResult;

/// The variable holding a bucket's space-joined file list.
pub const TEST_SUITE_KEY: &str = "TEST_SUITE";

const VAR_PATTERN: &str = r#"([A-Za-z_][A-Za-z0-9_]*)=(?:"([^"]*)"|(\S*))"#;
const IGNORE_PATTERN: &str = r#"IGNORE_SPECS="\s*([^"]+)""#;

/// One `KEY=value` pair inside a matrix entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
    pub quoted: bool,
}

impl EnvVar {
    fn render(&self) -> String {
        if self.quoted || self.value.is_empty() || self.value.contains(char::is_whitespace) {
            format!("{}=\"{}\"", self.key, self.value)
        } else {
            format!("{}={}", self.key, self.value)
        }
    }
}

/// A parsed `env.matrix` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixEntry {
    raw: String,
    vars: Vec<EnvVar>,
    dirty: bool,
}

impl MatrixEntry {
    /// Parse a single entry.
    pub fn parse(raw: &str) -> TillerResult<Self> {
        let re = Regex::new(VAR_PATTERN)?;
        Ok(Self::parse_with(&re, raw))
    }

    /// Parse every entry of a matrix, compiling the pattern once.
    pub fn parse_all(entries: &[String]) -> TillerResult<Vec<Self>> {
        let re = Regex::new(VAR_PATTERN)?;
        Ok(entries.iter().map(|raw| Self::parse_with(&re, raw)).collect())
    }

    fn parse_with(re: &Regex, raw: &str) -> Self {
        let vars = re
            .captures_iter(raw)
            .map(|caps| {
                let (value, quoted) = match caps.get(2) {
                    Some(q) => (q.as_str().to_string(), true),
                    None => (
                        caps.get(3).map_or("", |m| m.as_str()).to_string(),
                        false,
                    ),
                };
                EnvVar {
                    key: caps[1].to_string(),
                    value,
                    quoted,
                }
            })
            .collect();

        Self {
            raw: raw.to_string(),
            vars,
            dirty: false,
        }
    }

    /// A fresh slot with an empty `TEST_SUITE`.
    pub fn empty_slot() -> Self {
        Self {
            raw: String::new(),
            vars: vec![EnvVar {
                key: TEST_SUITE_KEY.to_string(),
                value: String::new(),
                quoted: true,
            }],
            dirty: true,
        }
    }

    pub fn vars(&self) -> &[EnvVar] {
        &self.vars
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Set `key`, replacing an existing value in place or appending.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.vars.iter_mut().find(|v| v.key == key) {
            Some(var) => var.value = value,
            None => self.vars.push(EnvVar {
                key: key.to_string(),
                value,
                quoted: key == TEST_SUITE_KEY,
            }),
        }
        self.dirty = true;
    }

    pub fn is_bucket_slot(&self) -> bool {
        self.get(TEST_SUITE_KEY).is_some()
    }

    /// File identifiers held by this slot. Empty when not a slot.
    pub fn test_suite(&self) -> Vec<String> {
        self.get(TEST_SUITE_KEY)
            .map(|suite| {
                suite
                    .replace('"', "")
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_test_suite(&mut self, ids: &[String]) {
        self.set(TEST_SUITE_KEY, ids.join(" "));
    }

    /// Render back to matrix syntax. Untouched entries keep their exact text.
    pub fn render(&self) -> String {
        if !self.dirty {
            return self.raw.clone();
        }
        self.vars
            .iter()
            .map(EnvVar::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collect the ignore set from `IGNORE_SPECS="a b c"` strings.
pub fn parse_ignore_set(global: &[String]) -> TillerResult<BTreeSet<String>> {
    let re = Regex::new(IGNORE_PATTERN)?;
    let ignored = global
        .iter()
        .filter_map(|row| re.captures(row))
        .flat_map(|caps| {
            caps[1]
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    Ok(ignored)
}
