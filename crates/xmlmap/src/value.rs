/// Key under which the character data of a mixed element is stored.
pub const TEXT_KEY: &str = "#text";

/// Prefix distinguishing attribute keys from child-element keys.
pub const ATTRIBUTE_PREFIX: &str = "@";

/// A parsed XML node.
///
/// Keys are the qualified names exactly as written in the document,
/// namespace prefixes included. Attributes live next to child elements under
/// [`ATTRIBUTE_PREFIX`]ed keys, character data of a mixed element under
/// [`TEXT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Element carrying attributes and/or child elements.
    Map(Map),
    /// Repeated sibling elements sharing one tag name.
    List(Vec<Value>),
    /// Element carrying only character data; also an attribute value.
    Text(String),
    /// Element with no attributes, children or text.
    Null,
}

impl Value {
    /// Descend through `path` one mapping at a time.
    ///
    /// Every failure is an explicit error value describing which key could
    /// not be resolved and why; this never panics, whatever the shape of the
    /// tree.
    pub fn walk(&self, path: &[&str]) -> Result<&Self, PathError> {
        let mut current = self;
        for (depth, key) in path.iter().enumerate() {
            let Self::Map(map) = current else {
                return Err(PathError::NotAMapping {
                    at: walked_prefix(path, depth),
                    key: (*key).to_owned(),
                    found: current.kind(),
                });
            };
            current = map.get(key).ok_or_else(|| PathError::MissingKey {
                at: walked_prefix(path, depth),
                key: (*key).to_owned(),
            })?;
        }
        Ok(current)
    }

    /// Character data of this node: the text itself for a text node, the
    /// [`TEXT_KEY`] entry for a mixed element.
    pub fn inner_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(map) => match map.get(TEXT_KEY) {
                Some(Self::Text(text)) => Some(text),
                _ => None,
            },
            Self::List(_) | Self::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Map(_) => "mapping",
            Self::List(_) => "list",
            Self::Text(_) => "text",
            Self::Null => "empty element",
        }
    }
}

fn walked_prefix(path: &[&str], depth: usize) -> String {
    if depth == 0 {
        "document root".to_owned()
    } else {
        path[..depth].join("/")
    }
}

/// Insertion-ordered string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name.as_str() == key)
            .map(|(_, value)| value)
    }

    /// Insert preserving document order. A repeated key collects its values
    /// into a [`Value::List`], first duplicate promoting the existing entry.
    pub fn insert(&mut self, key: String, value: Value) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            match existing {
                Value::List(items) => items.push(value),
                _ => {
                    let first = std::mem::replace(existing, Value::Null);
                    *existing = Value::List(vec![first, value]);
                }
            }
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Failure of a [`Value::walk`] lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("no '{key}' entry under '{at}'")]
    MissingKey { at: String, key: String },

    #[error("cannot descend into '{key}' at '{at}': expected a mapping, found {found}")]
    NotAMapping {
        at: String,
        key: String,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault_tree() -> Value {
        let mut value = Map::new();
        value.insert("s:Value".to_owned(), Value::Text("s:Sender".to_owned()));
        let mut fault = Map::new();
        fault.insert("s:Code".to_owned(), Value::Map(value));
        let mut body = Map::new();
        body.insert("s:Fault".to_owned(), Value::Map(fault));
        let mut envelope = Map::new();
        envelope.insert("s:Body".to_owned(), Value::Map(body));
        let mut document = Map::new();
        document.insert("s:Envelope".to_owned(), Value::Map(envelope));
        Value::Map(document)
    }

    #[test]
    fn walk_resolves_a_nested_path() {
        let tree = fault_tree();
        let node = tree
            .walk(&["s:Envelope", "s:Body", "s:Fault", "s:Code", "s:Value"])
            .expect("path should resolve");
        assert_eq!(node.inner_text(), Some("s:Sender"));
    }

    #[test]
    fn walk_reports_the_missing_key_and_its_position() {
        let tree = fault_tree();
        let error = tree
            .walk(&["s:Envelope", "s:Body", "s:Fault", "s:Reason"])
            .expect_err("s:Reason is not present");
        assert_eq!(
            error,
            PathError::MissingKey {
                at: "s:Envelope/s:Body/s:Fault".to_owned(),
                key: "s:Reason".to_owned(),
            }
        );
    }

    #[test]
    fn walk_refuses_to_descend_into_text() {
        let tree = fault_tree();
        let error = tree
            .walk(&["s:Envelope", "s:Body", "s:Fault", "s:Code", "s:Value", "deeper"])
            .expect_err("s:Value holds text, not a mapping");
        assert!(matches!(error, PathError::NotAMapping { found: "text", .. }));
    }

    #[test]
    fn walk_with_missing_root_key_names_the_document_root() {
        let error = fault_tree()
            .walk(&["wrong:Envelope"])
            .expect_err("root key differs");
        assert_eq!(
            error.to_string(),
            "no 'wrong:Envelope' entry under 'document root'"
        );
    }

    #[test]
    fn inner_text_reads_the_text_entry_of_a_mixed_element() {
        let mut text_node = Map::new();
        text_node.insert("@xml:lang".to_owned(), Value::Text("en-US".to_owned()));
        text_node.insert(TEXT_KEY.to_owned(), Value::Text("Access is denied.".to_owned()));
        assert_eq!(Value::Map(text_node).inner_text(), Some("Access is denied."));
        assert_eq!(Value::Null.inner_text(), None);
        assert_eq!(Value::List(vec![]).inner_text(), None);
    }

    #[test]
    fn repeated_keys_collect_into_a_list() {
        let mut map = Map::new();
        map.insert("item".to_owned(), Value::Text("a".to_owned()));
        map.insert("item".to_owned(), Value::Text("b".to_owned()));
        map.insert("item".to_owned(), Value::Text("c".to_owned()));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("item"),
            Some(&Value::List(vec![
                Value::Text("a".to_owned()),
                Value::Text("b".to_owned()),
                Value::Text("c".to_owned()),
            ]))
        );
    }
}
