use std::collections::{BTreeMap, HashMap, HashSet};
use std::iter::FromIterator;

use html5ever::LocalName;

use crate::normalize::{normalize_key, normalize_scheme};

/// The rules for a single element: which attributes it may keep, which attributes are forced
/// onto it, and which URI schemes its URL-valued attributes may use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tagdef {
    tag: LocalName,
    allowed_attrs: HashSet<String>,
    enforced_attrs: BTreeMap<String, String>,
    protocols: HashMap<String, HashSet<String>>,
    // Only consulted for attributes that have a protocol policy.
    allow_relative_links: bool,
}

impl Tagdef {
    pub fn new<T: Into<LocalName>>(tag: T, attrs: &[&str]) -> Tagdef {
        Tagdef {
            tag: tag.into(),
            allowed_attrs: attrs.iter().map(|attr| normalize_key(attr)).collect(),
            enforced_attrs: BTreeMap::new(),
            protocols: HashMap::new(),
            allow_relative_links: false,
        }
    }

    /// Forces `key` to `value` on every kept element, whatever the input said.
    pub fn enforce_attr(mut self, key: &str, value: &str) -> Tagdef {
        self.enforced_attrs
            .insert(normalize_key(key), value.to_owned());
        self
    }

    /// Restricts `attr` to URLs using one of `protocols`, replacing any earlier restriction.
    /// Schemes that do not survive normalization are ignored.
    pub fn enforce_protocols(mut self, attr: &str, protocols: &[&str]) -> Tagdef {
        let protocols = protocols
            .iter()
            .filter_map(|protocol| normalize_scheme(protocol))
            .collect();
        self.protocols.insert(normalize_key(attr), protocols);
        self
    }

    pub fn allow_relative_links(mut self) -> Tagdef {
        self.allow_relative_links = true;
        self
    }

    pub fn tag(&self) -> &LocalName {
        &self.tag
    }

    pub fn allows_attr(&self, key: &str) -> bool {
        self.allowed_attrs.contains(key)
    }

    pub fn allowed_attrs(&self) -> &HashSet<String> {
        &self.allowed_attrs
    }

    pub fn enforced_attrs(&self) -> &BTreeMap<String, String> {
        &self.enforced_attrs
    }

    pub fn protocols_for(&self, key: &str) -> Option<&HashSet<String>> {
        self.protocols.get(key)
    }

    pub fn allows_relative_links(&self) -> bool {
        self.allow_relative_links
    }
}

/// Tags absent from a whitelist are removed during cleaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    tags: HashMap<LocalName, Tagdef>,
}

impl Whitelist {
    pub fn new() -> Whitelist {
        Whitelist::default()
    }

    pub fn with(mut self, tagdef: Tagdef) -> Whitelist {
        self.insert(tagdef);
        self
    }

    /// Adds `tagdef`, replacing any existing rules for the same tag.
    pub fn insert(&mut self, tagdef: Tagdef) -> Option<Tagdef> {
        self.tags.insert(tagdef.tag.clone(), tagdef)
    }

    pub fn remove(&mut self, tag: &LocalName) -> Option<Tagdef> {
        self.tags.remove(tag)
    }

    pub fn get(&self, tag: &LocalName) -> Option<&Tagdef> {
        self.tags.get(tag)
    }

    pub fn contains(&self, tag: &LocalName) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tagdef> {
        self.tags.values()
    }
}

impl FromIterator<Tagdef> for Whitelist {
    fn from_iter<I: IntoIterator<Item = Tagdef>>(iter: I) -> Whitelist {
        let mut whitelist = Whitelist::new();
        for tagdef in iter {
            whitelist.insert(tagdef);
        }
        whitelist
    }
}

impl Extend<Tagdef> for Whitelist {
    fn extend<I: IntoIterator<Item = Tagdef>>(&mut self, iter: I) {
        for tagdef in iter {
            self.insert(tagdef);
        }
    }
}
