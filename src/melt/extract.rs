//! Row slicing
//!
//! N child records stored under one namespace show up as N occurrences of
//! each bare name, in record order. One extraction pass takes the first
//! remaining occurrence of every bare name at the namespace, which is
//! exactly one record. Surplus occurrences stay in the remainder, in their
//! original order, so the next pass over the remainder yields the next
//! record and an empty pass means there are none left.
//!
//! The format cannot tell "one record missing a field" apart from a
//! shifted row: records are only separated by call order.

use crate::namespace;
use crate::types::{AttributeList, AttributeValue, KEY_ATTRIBUTE};
use std::collections::HashSet;

/// One record's worth of attributes sliced off an attribute list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Value of the first `id` attribute at the namespace, if any
    pub key: Option<AttributeValue>,

    /// Attributes renamed to their bare names, first occurrence only
    pub attributes: AttributeList,
}

impl Extraction {
    /// An empty extraction signals that no record is left at the namespace
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Slice one record at `namespace` out of `list`.
///
/// Returns the extraction and the remainder: every attribute of another
/// namespace plus every repeated occurrence at this one, in original order.
pub fn extract(namespace: &str, list: AttributeList) -> (Extraction, AttributeList) {
    let mut extraction = Extraction::default();
    let mut remainder = Vec::with_capacity(list.len());
    let mut seen: HashSet<String> = HashSet::new();

    for mut attribute in list {
        let (attribute_namespace, bare) = namespace::split(&attribute.name);
        if attribute_namespace != namespace || seen.contains(bare) {
            remainder.push(attribute);
            continue;
        }

        let bare = bare.to_string();
        seen.insert(bare.clone());

        if bare == KEY_ATTRIBUTE {
            extraction.key = Some(attribute.value);
        } else {
            attribute.name = bare;
            extraction.attributes.push(attribute);
        }
    }

    (extraction, remainder)
}

/// In-place form of [`extract`]: `list` is left holding the remainder
pub fn extract_from(namespace: &str, list: &mut AttributeList) -> Extraction {
    let (extraction, remainder) = extract(namespace, std::mem::take(list));
    *list = remainder;
    extraction
}

/// Drain every record at `namespace`, in stored order
pub fn slice_rows(namespace: &str, list: &mut AttributeList) -> Vec<Extraction> {
    let mut rows = Vec::new();
    loop {
        let extraction = extract_from(namespace, list);
        if extraction.is_empty() {
            return rows;
        }
        rows.push(extraction);
    }
}
