//! # Sections
//!
//! A section is an independently navigable top-level tree, analogous to a
//! page. A document owns its sections in a map keyed by id; exactly one of
//! them is the home section.

use crate::element::Forest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sections keyed by id
pub type Sections = BTreeMap<String, Section>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub elements: Forest,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            is_home: false,
            elements: Vec::new(),
        }
    }

    pub fn home(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_home: true,
            ..Self::new(id, name)
        }
    }

    pub fn with_elements(mut self, elements: Forest) -> Self {
        self.elements = elements;
        self
    }
}

/// Lower-case, with runs of non-alphanumerics collapsed to `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Make sure exactly one section is marked home.
///
/// Keeps the first home section (by id) when several are marked; marks the
/// first section when none is.
pub fn ensure_single_home(sections: &mut Sections) {
    let mut seen_home = false;
    for section in sections.values_mut() {
        if section.is_home {
            if seen_home {
                section.is_home = false;
            }
            seen_home = true;
        }
    }
    if !seen_home {
        if let Some(first) = sections.values_mut().next() {
            first.is_home = true;
        }
    }
}

pub fn home_section(sections: &Sections) -> Option<&Section> {
    sections
        .values()
        .find(|s| s.is_home)
        .or_else(|| sections.values().next())
}

/// Home first, then the rest in id order
pub fn ordered_sections(sections: &Sections) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.values().collect();
    ordered.sort_by(|a, b| b.is_home.cmp(&a.is_home).then_with(|| a.id.cmp(&b.id)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(list: Vec<Section>) -> Sections {
        list.into_iter().map(|s| (s.id.clone(), s)).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("  Prices & Plans!! "), "prices-plans");
        assert_eq!(slugify("Ñandú 2024"), "ñandú-2024");
        assert_eq!(slugify("***"), "section");
    }

    #[test]
    fn test_single_home_enforced() {
        let mut sections = map(vec![
            Section::home("b", "B"),
            Section::home("c", "C"),
            Section::new("a", "A"),
        ]);
        ensure_single_home(&mut sections);
        let homes: Vec<_> = sections.values().filter(|s| s.is_home).map(|s| s.id.as_str()).collect();
        assert_eq!(homes, vec!["b"]);

        let mut none = map(vec![Section::new("z", "Z"), Section::new("y", "Y")]);
        ensure_single_home(&mut none);
        assert!(none["y"].is_home);
        assert!(!none["z"].is_home);
    }

    #[test]
    fn test_ordering_puts_home_first() {
        let sections = map(vec![
            Section::new("a", "A"),
            Section::home("m", "Main"),
            Section::new("b", "B"),
        ]);
        let ids: Vec<_> = ordered_sections(&sections).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["m", "a", "b"]);
        assert_eq!(home_section(&sections).unwrap().id, "m");
    }
}
