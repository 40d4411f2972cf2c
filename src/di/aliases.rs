use crate::di::ComponentKind;
use indexmap::IndexMap;
use std::str::FromStr;

/// Maps the dependency names a component declares (`"service:database"`) to
/// the aliases they were registered under in this application (`"pg"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    map: IndexMap<String, String>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a declared dependency name to a registered alias.
    pub fn bind(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.map.insert(name.into(), alias.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Aliases
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(name, alias)| (name.into(), alias.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Aliases
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A parsed `"<type>:<logicalName>"` dependency name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyName {
    pub kind: ComponentKind,
    pub name: String,
}

impl DependencyName {
    pub fn parse(input: &str) -> Option<Self> {
        let (kind, name) = input.split_once(':')?;
        let kind = ComponentKind::from_str(kind).ok()?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            name: name.to_string(),
        })
    }
}
