// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host events delivered to [`Engine::handle_event`](crate::Engine::handle_event).

use kurbo::{Point, Size};

use crate::host::Listeners;

/// An event observed by the host.
///
/// Node-targeted events are routed to the ticker whose element contains the
/// target and which is subscribed to the matching [`Listeners`] kind. Window
/// events are accepted only while the engine holds the matching window
/// subscription.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent<N> {
    /// Pointer entered a node.
    PointerEnter {
        /// Node the pointer entered.
        target: N,
    },
    /// Pointer left a node.
    PointerLeave {
        /// Node the pointer left.
        target: N,
    },
    /// Focus moved into a node.
    FocusIn {
        /// Node that received focus.
        target: N,
    },
    /// Focus left a node.
    FocusOut {
        /// Node that lost focus.
        target: N,
        /// Node receiving focus next, if any.
        related: Option<N>,
    },
    /// A touch began.
    TouchStart {
        /// Touched node.
        target: N,
        /// Client position of the first touch point.
        at: Point,
    },
    /// A touch point moved.
    TouchMove {
        /// Touched node.
        target: N,
        /// Client position of the first touch point.
        at: Point,
    },
    /// A touch ended.
    TouchEnd {
        /// Touched node.
        target: N,
    },
    /// A touch was cancelled by the platform.
    TouchCancel {
        /// Touched node.
        target: N,
    },
    /// An image or other asset inside a node finished loading.
    AssetLoaded {
        /// Node whose asset loaded.
        target: N,
    },
    /// Content inside a node changed size or structure.
    ContentChanged {
        /// Changed node.
        target: N,
    },
    /// A node's intersection with the viewport changed.
    Intersection {
        /// Observed node.
        target: N,
        /// Whether any part of it is visible.
        visible: bool,
    },
    /// Page visibility changed.
    VisibilityChanged {
        /// Whether the page is now hidden.
        hidden: bool,
    },
    /// The reduced-motion preference changed.
    ReducedMotionChanged {
        /// Whether reduced motion is now requested.
        reduce: bool,
    },
    /// The viewport was resized.
    Resize(Size),
    /// The device orientation changed.
    OrientationChange,
}

impl<N: Copy> HostEvent<N> {
    /// The node an event is aimed at, or `None` for window events.
    pub fn target(&self) -> Option<N> {
        match *self {
            Self::PointerEnter { target }
            | Self::PointerLeave { target }
            | Self::FocusIn { target }
            | Self::FocusOut { target, .. }
            | Self::TouchStart { target, .. }
            | Self::TouchMove { target, .. }
            | Self::TouchEnd { target }
            | Self::TouchCancel { target }
            | Self::AssetLoaded { target }
            | Self::ContentChanged { target }
            | Self::Intersection { target, .. } => Some(target),
            Self::VisibilityChanged { .. }
            | Self::ReducedMotionChanged { .. }
            | Self::Resize(_)
            | Self::OrientationChange => None,
        }
    }

    /// The listener kind that must be attached for this event to be handled.
    pub fn kind(&self) -> Listeners {
        match self {
            Self::PointerEnter { .. } | Self::PointerLeave { .. } => Listeners::POINTER,
            Self::FocusIn { .. } | Self::FocusOut { .. } => Listeners::FOCUS,
            Self::TouchStart { .. }
            | Self::TouchMove { .. }
            | Self::TouchEnd { .. }
            | Self::TouchCancel { .. } => Listeners::TOUCH,
            Self::AssetLoaded { .. } | Self::ContentChanged { .. } => Listeners::LOAD,
            Self::Intersection { .. } => Listeners::INTERSECTION,
            Self::VisibilityChanged { .. } => Listeners::VISIBILITY,
            Self::ReducedMotionChanged { .. } => Listeners::MEDIA,
            Self::Resize(_) => Listeners::RESIZE,
            Self::OrientationChange => Listeners::ORIENTATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_events_have_no_target() {
        let e: HostEvent<u32> = HostEvent::Resize(Size::new(10.0, 10.0));
        assert_eq!(e.target(), None);
        assert_eq!(e.kind(), Listeners::RESIZE);

        let e = HostEvent::FocusOut {
            target: 3_u32,
            related: Some(4),
        };
        assert_eq!(e.target(), Some(3));
        assert_eq!(e.kind(), Listeners::FOCUS);
    }
}
