// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal selectors: a single class, tag, attribute-presence or universal match.

use crate::types::Element;

/// A parsed simple selector.
///
/// Only the forms needed to locate containers and items are supported:
/// `.class`, `tag`, `[attribute]` and `*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// `*`
    Universal,
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
    /// `[attribute]`
    Attribute(String),
}

impl Selector {
    /// Parse a selector string. Returns `None` for empty or unsupported input.
    ///
    /// ```
    /// use understory_document::Selector;
    ///
    /// assert_eq!(Selector::parse(".ticker"), Some(Selector::Class("ticker".into())));
    /// assert_eq!(Selector::parse("[data-ticker]"), Some(Selector::Attribute("data-ticker".into())));
    /// assert_eq!(Selector::parse(".a .b"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.is_empty() || s.contains(char::is_whitespace) {
            return None;
        }
        if s == "*" {
            return Some(Self::Universal);
        }
        if let Some(class) = s.strip_prefix('.') {
            return valid_ident(class).then(|| Self::Class(class.to_owned()));
        }
        if let Some(attr) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return valid_ident(attr).then(|| Self::Attribute(attr.to_owned()));
        }
        valid_ident(s).then(|| Self::Tag(s.to_ascii_lowercase()))
    }

    /// Returns true if `element` matches.
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Universal => true,
            Self::Class(c) => element.has_class(c),
            Self::Tag(t) => element.tag.eq_ignore_ascii_case(t),
            Self::Attribute(a) => element.attributes.contains_key(a),
        }
    }
}

fn valid_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
