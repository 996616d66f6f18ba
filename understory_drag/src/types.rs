// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the drag engine: cursors, buttons, hits, offsets, and resolutions.
//!
//! ## Overview
//!
//! These types describe what the engine consumes each frame (button edges and
//! pre-resolved hits) and what it reports back (how each drag ended).
//! They are referenced by the [`dispatcher`](crate::dispatcher) and the
//! [`registry`](crate::registry).

use kurbo::{Point, Vec2};

/// Identity of one logical cursor (a mouse, or one touch contact).
///
/// Each [`CursorDispatcher`](crate::dispatcher::CursorDispatcher) is bound to
/// exactly one cursor; several dispatchers may share a single
/// [`DragRegistry`](crate::registry::DragRegistry).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CursorId(pub u32);

bitflags::bitflags! {
    /// Logical pointer buttons.
    ///
    /// A [`ButtonEdge`] carries a single button; a
    /// [`DragConfig`](crate::config::DragConfig) carries the set of buttons
    /// that may start and end a drag.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PointerButtons: u8 {
        /// Primary button (left mouse button, first touch contact).
        const PRIMARY   = 0b0000_0001;
        /// Secondary button (right mouse button).
        const SECONDARY = 0b0000_0010;
        /// Auxiliary button (middle mouse button).
        const AUXILIARY = 0b0000_0100;
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::PRIMARY
    }
}

/// Direction of a button transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// The button went down this frame.
    Down,
    /// The button went up this frame.
    Up,
}

/// An edge-triggered button event reported by an
/// [`InputSource`](crate::host::InputSource).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonEdge {
    /// The button that changed.
    pub button: PointerButtons,
    /// Whether it went down or up.
    pub kind: EdgeKind,
}

impl ButtonEdge {
    /// A button-down edge for `button`.
    pub const fn down(button: PointerButtons) -> Self {
        Self {
            button,
            kind: EdgeKind::Down,
        }
    }

    /// A button-up edge for `button`.
    pub const fn up(button: PointerButtons) -> Self {
        Self {
            button,
            kind: EdgeKind::Up,
        }
    }
}

/// Primary depth ordering across heterogeneous hits.
///
/// Carried by [`CursorHit`] and used when a press has to pick the topmost
/// draggable under the cursor.
///
/// Precondition: `Distance` should be finite (no NaN) for meaningful ordering.
/// If NaN is encountered, ranking falls back to stable order.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthKey {
    /// 2D z-index; higher is nearer to the user.
    Z(i32),
    /// 3D ray distance; lower is nearer to the user.
    Distance(f32),
}

impl Default for DepthKey {
    fn default() -> Self {
        Self::Z(0)
    }
}

impl Eq for DepthKey {}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        use core::cmp::Ordering::*;
        match (*self, *other) {
            (Self::Z(a), Self::Z(b)) => a.cmp(&b),
            (Self::Distance(a), Self::Distance(b)) => b.partial_cmp(&a).unwrap_or(Equal),
            // Z outranks Distance when kinds differ.
            (Self::Z(_), Self::Distance(_)) => Greater,
            (Self::Distance(_), Self::Z(_)) => Less,
        }
    }
}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(Ord::cmp(self, other))
    }
}

/// One target currently under a cursor, as reported by a
/// [`HitSource`](crate::host::HitSource).
///
/// The configured drag plane is reported like any other target; the
/// dispatcher recognizes it by key and uses its `point` as the motion
/// intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CursorHit<K> {
    /// Entity under the cursor.
    pub target: K,
    /// World-space point where the cursor meets the target.
    pub point: Point,
    /// Nearness of this hit relative to the others in the same frame.
    pub depth_key: DepthKey,
}

impl<K> CursorHit<K> {
    /// A hit at `point` with the default depth.
    pub fn new(target: K, point: Point) -> Self {
        Self {
            target,
            point,
            depth_key: DepthKey::default(),
        }
    }

    /// Replace the depth key.
    #[must_use]
    pub fn with_depth(mut self, depth_key: DepthKey) -> Self {
        self.depth_key = depth_key;
        self
    }
}

/// Offsets applied on top of the drag-plane intersection when moving things.
///
/// Both are measured in world space and added before the source's
/// click offset is subtracted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragOffsets {
    /// Offset for the dragged object itself.
    pub object: Vec2,
    /// Offset for the visual proxy.
    pub proxy: Vec2,
}

/// How a drag ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Resolution {
    /// Dropped onto this many (non-zero) valid receivers.
    Accepted(usize),
    /// Released over no valid receiver; `on_drag_stop` fired.
    Dropped,
    /// Cancelled before release, by the source invalidating itself or
    /// disappearing from the scene.
    Cancelled,
}

impl Resolution {
    /// Number of receivers that accepted the drop.
    pub fn accepted(self) -> usize {
        match self {
            Self::Accepted(n) => n,
            Self::Dropped | Self::Cancelled => 0,
        }
    }
}

/// A resolution tagged with the source it belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Resolved<K> {
    /// The source whose drag ended.
    pub source: K,
    /// How it ended.
    pub resolution: Resolution,
}
