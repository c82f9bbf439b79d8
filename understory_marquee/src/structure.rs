// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalizing a container into `element > viewport > track > items`.
//!
//! The element's own children are detached, not destroyed: they are the
//! original items (plus whatever wraps them) and come back on [`restore`].
//! The track receives one canonical copy of each item, and every later copy is
//! made from the originals.

use tracing::debug;

use crate::error::{Result, TickerError};
use crate::host::{Document, Presentation, PresentationFlags};

/// Class given to the generated viewport.
pub const VIEWPORT_CLASS: &str = "ticker-viewport";
/// Class given to the generated track.
pub const TRACK_CLASS: &str = "ticker-track";

const ARIA_ATTRIBUTES: [(&str, &str); 3] = [
    ("role", "marquee"),
    ("aria-live", "off"),
    ("aria-label", "Scrolling content"),
];

/// Element state captured before the first mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedElement<N> {
    children: Vec<N>,
    presentation: Presentation,
    attributes: Vec<(&'static str, Option<String>)>,
}

/// Nodes created for, and captured from, one ticker element.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure<N> {
    viewport: N,
    track: N,
    originals: Vec<N>,
    canonical: Vec<N>,
    saved: SavedElement<N>,
}

impl<N: Copy> Structure<N> {
    /// The clipping viewport.
    pub fn viewport(&self) -> N {
        self.viewport
    }

    /// The moving track.
    pub fn track(&self) -> N {
        self.track
    }

    /// Original items in document order. Never mutated.
    pub fn originals(&self) -> &[N] {
        &self.originals
    }

    /// The copies in the track that assistive technology reads.
    pub fn canonical(&self) -> &[N] {
        &self.canonical
    }
}

/// Presentation applied to every item copy placed in the track.
pub fn item_presentation<D: Document + ?Sized>(doc: &D, node: D::Node) -> Presentation {
    let mut p = doc.presentation(node);
    p.flags |= PresentationFlags::NO_SHRINK | PresentationFlags::NO_WRAP;
    p
}

/// Presentation of the track for a given gap.
pub fn track_presentation(gap: f64) -> Presentation {
    Presentation::new(
        PresentationFlags::ROW | PresentationFlags::NO_WRAP | PresentationFlags::COMPOSITED,
    )
    .with_gap(gap)
}

/// Copy an original item for the track. `hidden` marks it hidden from assistive technology.
pub fn copy_item<D: Document + ?Sized>(doc: &mut D, original: D::Node, hidden: bool) -> Option<D::Node> {
    let copy = doc.clone_node(original)?;
    if hidden {
        doc.set_attribute(copy, "aria-hidden", "true");
    } else {
        doc.remove_attribute(copy, "aria-hidden");
    }
    let p = item_presentation(doc, copy);
    doc.set_presentation(copy, p);
    Some(copy)
}

/// Build the viewport and track inside `element`.
///
/// Leaves the element untouched and returns [`TickerError::ContentAbsent`] when
/// nothing inside matches `item_selector`.
pub fn build<D: Document + ?Sized>(
    doc: &mut D,
    element: D::Node,
    item_selector: &str,
    gap: f64,
) -> Result<Structure<D::Node>> {
    let originals = doc.query_within(element, item_selector);
    if originals.is_empty() {
        return Err(TickerError::ContentAbsent {
            item_selector: item_selector.to_owned(),
        });
    }

    let saved = SavedElement {
        children: doc.children(element),
        presentation: doc.presentation(element),
        attributes: ARIA_ATTRIBUTES
            .iter()
            .map(|(name, _)| (*name, doc.attribute(element, name)))
            .collect(),
    };
    for child in &saved.children {
        doc.detach(*child);
    }

    let mut p = saved.presentation;
    p.flags |= PresentationFlags::CLIP | PresentationFlags::FILL_WIDTH;
    doc.set_presentation(element, p);
    for (name, value) in ARIA_ATTRIBUTES {
        doc.set_attribute(element, name, value);
    }

    let viewport = doc.create_element(VIEWPORT_CLASS);
    doc.set_presentation(
        viewport,
        Presentation::new(PresentationFlags::CLIP | PresentationFlags::FILL_WIDTH),
    );
    let track = doc.create_element(TRACK_CLASS);
    doc.set_presentation(track, track_presentation(gap));
    doc.append_child(element, viewport);
    doc.append_child(viewport, track);

    let mut canonical = Vec::with_capacity(originals.len());
    for original in &originals {
        if let Some(copy) = copy_item(doc, *original, false) {
            doc.append_child(track, copy);
            canonical.push(copy);
        }
    }
    debug!(items = originals.len(), "ticker structure built");

    Ok(Structure {
        viewport,
        track,
        originals,
        canonical,
        saved,
    })
}

/// Undo [`build`]: drop generated nodes and put the element back as it was.
pub fn restore<D: Document + ?Sized>(doc: &mut D, element: D::Node, structure: Structure<D::Node>) {
    doc.remove(structure.viewport);
    let saved = structure.saved;
    doc.set_presentation(element, saved.presentation);
    for (name, value) in saved.attributes {
        match value {
            Some(v) => doc.set_attribute(element, name, &v),
            None => doc.remove_attribute(element, name),
        }
    }
    for child in saved.children {
        doc.append_child(element, child);
    }
}

#[cfg(all(test, feature = "document_adapter"))]
mod tests {
    use kurbo::Size;
    use understory_document::{Document as Headless, Element, StyleFlags};

    use super::*;

    fn fixture() -> (Headless, understory_document::NodeId) {
        let mut doc = Headless::new(Size::new(400.0, 300.0));
        let ticker = doc.insert(
            doc.root(),
            Element::new("div")
                .with_class("ticker")
                .with_attribute("aria-label", "News"),
        );
        for i in 0..3 {
            doc.insert(
                ticker,
                Element::new("span")
                    .with_class("ticker-item")
                    .with_attribute("aria-hidden", "true")
                    .with_width(100.0)
                    .with_text(format!("item {i}")),
            );
        }
        (doc, ticker)
    }

    #[test]
    fn builds_viewport_track_and_canonical_copy() {
        let (mut doc, ticker) = fixture();
        let originals = Headless::children(&doc, ticker).to_vec();
        let s = build(&mut doc, ticker, ".ticker-item", 20.0).unwrap();

        assert_eq!(s.originals(), originals.as_slice());
        assert_eq!(Headless::children(&doc, ticker), &[s.viewport()]);
        assert_eq!(Headless::children(&doc, s.viewport()), &[s.track()]);
        assert_eq!(Headless::children(&doc, s.track()), s.canonical());
        for copy in s.canonical() {
            assert_eq!(Headless::attribute(&doc, *copy, "aria-hidden"), None);
            assert!(
                doc.style(*copy)
                    .unwrap()
                    .flags
                    .contains(StyleFlags::NO_SHRINK)
            );
        }
        assert_eq!(Headless::attribute(&doc, ticker, "role"), Some("marquee"));
        assert_eq!(
            Headless::attribute(&doc, ticker, "aria-label"),
            Some("Scrolling content")
        );
        assert_eq!(doc.style(s.track()).unwrap().gap, 20.0);
        assert_eq!(doc.offset_width(s.track()), 340.0);
    }

    #[test]
    fn restore_puts_everything_back() {
        let (mut doc, ticker) = fixture();
        let before = doc.element(ticker).unwrap().clone();
        let children = Headless::children(&doc, ticker).to_vec();
        let s = build(&mut doc, ticker, ".ticker-item", 20.0).unwrap();
        let track = s.track();
        restore(&mut doc, ticker, s);

        assert_eq!(Headless::children(&doc, ticker), children.as_slice());
        assert_eq!(doc.element(ticker).unwrap(), &before);
        assert!(!doc.is_alive(track));
        assert_eq!(doc.query_all(".ticker-item").len(), 3);
    }

    #[test]
    fn no_items_leaves_element_untouched() {
        let mut doc = Headless::new(Size::new(400.0, 300.0));
        let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        let text = doc.insert(ticker, Element::new("p").with_width(50.0));
        let err = build(&mut doc, ticker, ".ticker-item", 20.0).unwrap_err();
        assert!(matches!(err, TickerError::ContentAbsent { .. }));
        assert_eq!(Headless::children(&doc, ticker), &[text]);
        assert_eq!(Headless::attribute(&doc, ticker, "role"), None);
    }
}
