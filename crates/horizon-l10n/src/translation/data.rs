//! Translation data tree.

use std::collections::BTreeMap;

use crate::config::MergeStrategy;
use crate::error::ProviderError;

/// A node of the translation tree: either a localized string or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationNode {
    /// Localized text.
    Text(String),
    /// Nested keys.
    Map(BTreeMap<String, TranslationNode>),
}

impl TranslationNode {
    /// The text of a leaf node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(_) => None,
        }
    }

    fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::String(text) => Some(Self::Text(text)),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            Value::Object(map) => Some(Self::Map(
                map.into_iter()
                    .filter_map(|(key, value)| Self::from_json(value).map(|node| (key, node)))
                    .collect(),
            )),
            Value::Null | Value::Array(_) => None,
        }
    }

    fn from_toml(value: toml::Value) -> Option<Self> {
        use toml::Value;

        match value {
            Value::String(text) => Some(Self::Text(text)),
            Value::Integer(n) => Some(Self::Text(n.to_string())),
            Value::Float(n) => Some(Self::Text(n.to_string())),
            Value::Boolean(b) => Some(Self::Text(b.to_string())),
            Value::Datetime(dt) => Some(Self::Text(dt.to_string())),
            Value::Table(table) => Some(Self::Map(
                table
                    .into_iter()
                    .filter_map(|(key, value)| Self::from_toml(value).map(|node| (key, node)))
                    .collect(),
            )),
            Value::Array(_) => None,
        }
    }
}

/// Translations for one language: a tree of string keys.
///
/// Keys are looked up with dot-delimited paths: `"home.title"` walks the
/// `home` mapping and returns its `title` text.
///
/// ```
/// use horizon_l10n::translation::TranslationData;
///
/// let data = TranslationData::new()
///     .with("home.title", "Welcome")
///     .with("home.greeting", "Hello {name}");
///
/// assert_eq!(data.get("home.title"), Some("Welcome"));
/// assert_eq!(data.get("home"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationData {
    root: BTreeMap<String, TranslationNode>,
}

impl TranslationData {
    /// Create empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object.
    ///
    /// Numbers and booleans become text; `null` and arrays are skipped.
    pub fn from_json_value(
        value: serde_json::Value,
        location: &str,
    ) -> Result<Self, ProviderError> {
        match TranslationNode::from_json(value) {
            Some(TranslationNode::Map(root)) => Ok(Self { root }),
            _ => Err(ProviderError::parse(location, "expected a JSON object")),
        }
    }

    /// Parse a JSON document.
    pub fn parse_json(source: &str, location: &str) -> Result<Self, ProviderError> {
        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| ProviderError::parse(location, e.to_string()))?;
        Self::from_json_value(value, location)
    }

    /// Parse a TOML document.
    pub fn parse_toml(source: &str, location: &str) -> Result<Self, ProviderError> {
        let table: toml::Table =
            toml::from_str(source).map_err(|e| ProviderError::parse(location, e.to_string()))?;
        match TranslationNode::from_toml(toml::Value::Table(table)) {
            Some(TranslationNode::Map(root)) => Ok(Self { root }),
            _ => Err(ProviderError::parse(location, "expected a TOML table")),
        }
    }

    /// Insert text at a dotted path, creating intermediate mappings.
    ///
    /// Text found on the way is replaced by a mapping.
    pub fn insert(&mut self, path: &str, text: impl Into<String>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut map = &mut self.root;
        for segment in segments {
            let node = map
                .entry(segment.to_string())
                .or_insert_with(|| TranslationNode::Map(BTreeMap::new()));
            if !matches!(node, TranslationNode::Map(_)) {
                *node = TranslationNode::Map(BTreeMap::new());
            }
            map = match node {
                TranslationNode::Map(inner) => inner,
                TranslationNode::Text(_) => return,
            };
        }
        map.insert(last.to_string(), TranslationNode::Text(text.into()));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: &str, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Node at a dotted path.
    pub fn node(&self, path: &str) -> Option<&TranslationNode> {
        let mut segments = path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                TranslationNode::Map(map) => node = map.get(segment)?,
                TranslationNode::Text(_) => return None,
            }
        }
        Some(node)
    }

    /// Text at a dotted path. A path ending on a mapping has no text.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.node(path).and_then(TranslationNode::as_text)
    }

    /// Returns true if `path` resolves to text.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of texts in the tree.
    pub fn len(&self) -> usize {
        fn count(map: &BTreeMap<String, TranslationNode>) -> usize {
            map.values()
                .map(|node| match node {
                    TranslationNode::Text(_) => 1,
                    TranslationNode::Map(inner) => count(inner),
                })
                .sum()
        }
        count(&self.root)
    }

    /// Returns true if the tree holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All dotted paths that resolve to text, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        fn collect(map: &BTreeMap<String, TranslationNode>, prefix: &str, out: &mut Vec<String>) {
            for (key, node) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                match node {
                    TranslationNode::Text(_) => out.push(path),
                    TranslationNode::Map(inner) => collect(inner, &path, out),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, "", &mut out);
        out
    }

    /// Merge `other` into `self`; `other` wins collisions.
    pub fn merge(&mut self, other: TranslationData, strategy: MergeStrategy) {
        match strategy {
            MergeStrategy::Deep => merge_deep(&mut self.root, other.root),
            MergeStrategy::Shallow => self.root.extend(other.root),
        }
    }
}

fn merge_deep(target: &mut BTreeMap<String, TranslationNode>, source: BTreeMap<String, TranslationNode>) {
    for (key, incoming) in source {
        match incoming {
            TranslationNode::Map(incoming) => match target.get_mut(&key) {
                Some(TranslationNode::Map(existing)) => merge_deep(existing, incoming),
                _ => {
                    target.insert(key, TranslationNode::Map(incoming));
                }
            },
            text => {
                target.insert(key, text);
            }
        }
    }
}
