//! Style override trees.
//!
//! Overrides are written as a nested mapping. Nested groups are joined with
//! `.` into setting paths, so these two forms are equivalent:
//!
//! ```yaml
//! frames.shadowColor: "#0004"
//! frames:
//!   shadowColor: "#0004"
//! ```
//!
//! The top-level keys `dark` and `light` hold overrides that only apply to
//! themes of that kind:
//!
//! ```yaml
//! borderRadius: 0
//! codeBackground: ["#0d1117", "#ffffff"]
//! dark:
//!   borderColor: "#30363d"
//! ```

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use super::value::StyleValue;
use crate::theme::ThemeKind;

/// Override values keyed by setting path, with optional per-kind sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    base: BTreeMap<String, StyleValue>,
    dark: BTreeMap<String, StyleValue>,
    light: BTreeMap<String, StyleValue>,
}

impl StyleOverrides {
    /// Creates an empty override tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an override for every theme.
    pub fn with(mut self, path: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.base.insert(path.into(), value.into());
        self
    }

    /// Sets an override for themes of `kind` only.
    pub fn with_kind(
        mut self,
        kind: ThemeKind,
        path: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Self {
        self.section_mut(kind).insert(path.into(), value.into());
        self
    }

    /// Returns the override that applies to every theme.
    pub fn get(&self, path: &str) -> Option<&StyleValue> {
        self.base.get(path)
    }

    /// Returns the override from the `kind` section only.
    pub fn get_for_kind(&self, kind: ThemeKind, path: &str) -> Option<&StyleValue> {
        self.section(kind).get(path)
    }

    /// Returns the value that applies to a theme of `kind`: the kind section
    /// wins over the shared entries, and a `[dark, light]` pair is narrowed
    /// to `kind`.
    pub fn lookup(&self, kind: ThemeKind, path: &str) -> Option<&str> {
        self.get_for_kind(kind, path)
            .or_else(|| self.get(path))
            .map(|value| value.for_kind(kind))
    }

    /// Iterates over every path mentioned anywhere in the tree.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.base
            .keys()
            .chain(self.dark.keys())
            .chain(self.light.keys())
            .map(String::as_str)
    }

    /// Returns `true` when no override is set.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.dark.is_empty() && self.light.is_empty()
    }

    fn section(&self, kind: ThemeKind) -> &BTreeMap<String, StyleValue> {
        match kind {
            ThemeKind::Dark => &self.dark,
            ThemeKind::Light => &self.light,
        }
    }

    fn section_mut(&mut self, kind: ThemeKind) -> &mut BTreeMap<String, StyleValue> {
        match kind {
            ThemeKind::Dark => &mut self.dark,
            ThemeKind::Light => &mut self.light,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Node {
    Value(StyleValue),
    Group(BTreeMap<String, Node>),
}

fn flatten_into(prefix: &str, node: Node, out: &mut BTreeMap<String, StyleValue>) {
    match node {
        Node::Value(value) => {
            out.insert(prefix.to_string(), value);
        }
        Node::Group(children) => {
            for (key, child) in children {
                flatten_into(&format!("{prefix}.{key}"), child, out);
            }
        }
    }
}

impl<'de> Deserialize<'de> for StyleOverrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tree = BTreeMap::<String, Node>::deserialize(deserializer)?;
        let mut overrides = StyleOverrides::new();

        for (key, node) in tree {
            let kind = match key.as_str() {
                "dark" => Some(ThemeKind::Dark),
                "light" => Some(ThemeKind::Light),
                _ => None,
            };
            match (kind, node) {
                (Some(kind), Node::Group(children)) => {
                    let section = overrides.section_mut(kind);
                    for (child_key, child) in children {
                        flatten_into(&child_key, child, section);
                    }
                }
                (Some(_), Node::Value(_)) => {
                    return Err(D::Error::custom(format!(
                        "'{key}' must be a mapping of overrides for {key} themes"
                    )));
                }
                (None, node) => flatten_into(&key, node, &mut overrides.base),
            }
        }

        Ok(overrides)
    }
}
