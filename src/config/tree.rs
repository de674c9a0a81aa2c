//! Nested configuration trees
//!
//! A [`ConfigTree`] holds the parsed contents of one configuration file before
//! it is merged with other layers. Leaves are `config::Value` scalars; interior
//! nodes are tables keyed by string.

use std::path::Path;

use config::{File, Map, Source, Value, ValueKind};

use crate::config::error::ConfigError;

/// Ordered mapping from keys to scalar values or nested tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one configuration file into a tree
    ///
    /// `path` names the file without its extension (`configs/main`); the format
    /// is picked from whichever supported extension exists on disk
    /// (`toml`, `yaml`, `yml`, `json`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if no such file exists or it fails to parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let name = path.to_string_lossy();
        let entries = File::with_name(&name)
            .required(true)
            .collect()
            .map_err(|e| ConfigError::load(path, e))?;

        tracing::debug!(path = %path.display(), keys = entries.len(), "Loaded configuration file");
        Ok(Self { entries })
    }

    /// Top-level entries in insertion order
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Look up a dotted key path such as `jwt.access_token.max_age`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = match &current.kind {
                ValueKind::Table(table) => table.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Deep-merge `other` into this tree; `other` wins on conflicts
    ///
    /// Tables present on both sides are merged recursively. Any other pairing,
    /// including a table against a scalar, is resolved by taking `other`'s value.
    pub fn merge(&mut self, other: ConfigTree) {
        merge_tables(&mut self.entries, other.entries);
    }

    /// Store `value` at `path` only if the tree has nothing there yet
    ///
    /// Explicit values, including empty strings and zeroes, are kept. A null
    /// leaf counts as missing. If a scalar sits on an intermediate segment the
    /// default is skipped and the scalar is left alone.
    ///
    /// Returns whether the default was stored.
    pub fn seed_default(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let (parents, leaf) = split_path(path);
        let mut table = &mut self.entries;
        for segment in parents {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(empty_table);
            if is_nil(entry) {
                *entry = empty_table();
            }
            table = match &mut entry.kind {
                ValueKind::Table(inner) => inner,
                _ => return false,
            };
        }

        if table.get(leaf).is_some_and(|existing| !is_nil(existing)) {
            return false;
        }
        table.insert(leaf.to_string(), value.into());
        true
    }
}

impl FromIterator<(String, Value)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn merge_tables(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, src_value) in src {
        match dst.get_mut(&key) {
            Some(dst_value) => merge_value(dst_value, src_value),
            None => {
                dst.insert(key, src_value);
            }
        }
    }
}

fn merge_value(dst: &mut Value, src: Value) {
    if is_table(dst) && is_table(&src) {
        if let (ValueKind::Table(dst_table), ValueKind::Table(src_table)) = (&mut dst.kind, src.kind) {
            merge_tables(dst_table, src_table);
        }
    } else {
        *dst = src;
    }
}

fn split_path(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parents, leaf)) => (parents.split('.').collect(), leaf),
        None => (Vec::new(), path),
    }
}

fn empty_table() -> Value {
    Value::new(None, ValueKind::Table(Map::new()))
}

fn is_table(value: &Value) -> bool {
    matches!(value.kind, ValueKind::Table(_))
}

fn is_nil(value: &Value) -> bool {
    matches!(value.kind, ValueKind::Nil)
}
