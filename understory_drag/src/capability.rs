// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable capabilities: the two roles a scene entity may expose.
//!
//! ## Overview
//!
//! - [`DragSource`]: the entity can be picked up and dragged.
//! - [`DropReceiver`]: the entity can accept a dropped source.
//!
//! The roles are independent; an entity may implement zero, one, or both.
//! The engine never holds on to implementations. It refers to entities by key
//! and asks a [`CapabilityLookup`](crate::host::CapabilityLookup) for the role
//! whenever it needs to invoke a callback.
//!
//! All callbacks run synchronously inside the engine's frame step and must
//! not block.

use kurbo::{Point, Vec2};

use crate::types::CursorId;

/// Per-source drag state, owned by the source entity and written by the engine.
///
/// The engine sets `dragging`, `valid`, `cursor` and `proxy` when a drag
/// begins and clears `dragging` and `proxy` when it ends. The source itself
/// may flip `valid` to `false` at any time to cancel its own drag.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceState<K> {
    /// World point of the press that started the current drag.
    pub click_origin: Point,
    /// Vector from the object to `click_origin`, kept for the whole drag.
    pub click_offset: Vec2,
    /// True while a drag session exists for this source.
    pub dragging: bool,
    /// Cleared by the source to cancel its drag on the next drop pass.
    pub valid: bool,
    /// Cursor that started the current drag, if any.
    pub cursor: Option<CursorId>,
    /// Visual proxy spawned for the current drag, if any.
    pub proxy: Option<K>,
}

impl<K> Default for SourceState<K> {
    fn default() -> Self {
        Self {
            click_origin: Point::ORIGIN,
            click_offset: Vec2::ZERO,
            dragging: false,
            valid: false,
            cursor: None,
            proxy: None,
        }
    }
}

impl<K> SourceState<K> {
    /// Record the press point and derive the click offset from the object's position.
    pub fn seed_click(&mut self, origin: Point, object_position: Point) {
        self.click_origin = origin;
        self.click_offset = origin - object_position;
    }
}

/// An entity that can be picked up and dragged.
pub trait DragSource<K> {
    /// Drag state owned by this source.
    fn state(&self) -> &SourceState<K>;

    /// Mutable access to the drag state.
    fn state_mut(&mut self) -> &mut SourceState<K>;

    /// Current world position of the object.
    fn position(&self) -> Point;

    /// Whether the object itself follows the cursor, in addition to any proxy.
    fn drags_self(&self) -> bool {
        false
    }

    /// Prefab to spawn as a visual proxy while dragging, if any.
    fn proxy_prefab(&self) -> Option<K> {
        None
    }

    /// Queried once on press. Returning `false` silently aborts the pick.
    fn can_drag_start(&mut self) -> bool;

    /// The drag session for this source was created.
    fn on_drag_start(&mut self) {}

    /// The drag ended with no accepting receiver.
    fn on_drag_stop(&mut self) {}

    /// The drop was accepted by `receiver`. Called once per accepting receiver.
    fn on_received_by(&mut self, receiver: K) {
        let _ = receiver;
    }

    /// The drag moved over `receiver`; `valid` is the receiver's cached answer.
    fn enter_target(&mut self, receiver: K, valid: bool) {
        let _ = (receiver, valid);
    }

    /// The drag moved off `receiver`.
    fn exit_target(&mut self, receiver: K) {
        let _ = receiver;
    }
}

/// An entity that can accept a dropped source.
///
/// Receivers keep no per-drag state in the engine; validity is asked once per
/// source per unbroken overlap run and cached by the session.
pub trait DropReceiver<K> {
    /// Whether this receiver would accept `source`.
    fn is_valid_draggable(&mut self, source: K) -> bool;

    /// `source` moved over this receiver; `valid` is the cached answer.
    fn draggable_entered(&mut self, source: K, valid: bool) {
        let _ = (source, valid);
    }

    /// `source` moved off this receiver, or its drag ended without a drop here.
    fn draggable_left(&mut self, source: K) {
        let _ = source;
    }

    /// `source` was dropped onto this receiver.
    fn on_receive_draggable(&mut self, source: K) {
        let _ = source;
    }
}
