//! Attribute addressing
//!
//! A namespace is the dot-joined chain of relation segments leading from
//! the root record to a nested one. The root namespace is the empty
//! string, so root attributes carry bare names.

use crate::types::Attribute;
use std::collections::HashSet;

pub const SEPARATOR: char = '.';

/// Namespace of the relation `segment` below `parent`
pub fn child(parent: &str, segment: &str) -> String {
    qualify(parent, segment)
}

/// Full attribute name for `name` inside `namespace`
pub fn qualify(namespace: &str, name: &str) -> String {
    format!("{namespace}{SEPARATOR}{name}")
        .trim_matches(SEPARATOR)
        .to_string()
}

/// Split an attribute name into its namespace and bare name at the last dot
pub fn split(name: &str) -> (&str, &str) {
    match name.rfind(SEPARATOR) {
        Some(index) => (&name[..index], &name[index + 1..]),
        None => ("", name),
    }
}

/// Number of relation levels below the root
pub fn depth(namespace: &str) -> usize {
    if namespace.is_empty() {
        0
    } else {
        namespace.matches(SEPARATOR).count() + 1
    }
}

/// Distinct namespaces of `attributes`, in order of first appearance
pub fn discover(attributes: &[Attribute]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut namespaces = Vec::new();
    for attribute in attributes {
        let (namespace, _) = split(&attribute.name);
        if seen.insert(namespace) {
            namespaces.push(namespace.to_string());
        }
    }
    namespaces
}
