// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts the engine consumes from its host.
//!
//! The engine does not perform hit testing, input polling, or rendering.
//! A host supplies:
//!
//! - [`CapabilityLookup`]: key → source/receiver roles.
//! - [`ProxyDisplay`]: spawn, destroy, and position visual proxies and dragged objects.
//! - [`HitSource`]: the targets under a cursor this frame.
//! - [`InputSource`]: the button edges for a cursor this frame.
//!
//! Registry and session operations take a [`DragScene`], which is any type
//! implementing both [`CapabilityLookup`] and [`ProxyDisplay`].

use alloc::vec::Vec;

use kurbo::Point;

use crate::capability::{DragSource, DropReceiver};
use crate::types::{ButtonEdge, CursorHit, CursorId};

/// Resolve entity keys to their capabilities.
///
/// Returning `None` means the entity lacks the role or no longer exists.
/// The engine treats a vanished source as a cancellation and a vanished
/// receiver as silently gone.
pub trait CapabilityLookup<K> {
    /// The source role of `key`, if any.
    fn source_of(&mut self, key: K) -> Option<&mut dyn DragSource<K>>;

    /// The receiver role of `key`, if any.
    fn receiver_of(&mut self, key: K) -> Option<&mut dyn DropReceiver<K>>;
}

/// Visual proxy factory and transform sink.
pub trait ProxyDisplay<K> {
    /// Instantiate `prefab` as a proxy, returning its key.
    fn spawn_proxy(&mut self, prefab: K) -> Option<K>;

    /// Destroy a proxy previously returned by [`spawn_proxy`](Self::spawn_proxy).
    fn destroy_proxy(&mut self, proxy: K);

    /// Move a proxy to `at`.
    fn set_proxy_position(&mut self, proxy: K, at: Point);

    /// Move a dragged object to `at`.
    fn set_object_position(&mut self, object: K, at: Point);
}

/// A host that offers both capability lookup and proxy display.
pub trait DragScene<K>: CapabilityLookup<K> + ProxyDisplay<K> {}

impl<K, T: CapabilityLookup<K> + ProxyDisplay<K> + ?Sized> DragScene<K> for T {}

/// Per-frame hits under a cursor.
pub trait HitSource<K> {
    /// Every target currently under `cursor`, including the drag plane.
    fn hits(&mut self, cursor: CursorId) -> Vec<CursorHit<K>>;
}

/// Per-frame button edges for a cursor.
pub trait InputSource {
    /// Button transitions observed for `cursor` since the previous frame.
    fn button_edges(&mut self, cursor: CursorId) -> Vec<ButtonEdge>;
}
