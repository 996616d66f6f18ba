// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made capability implementations backed by handler lists.
//!
//! ## Overview
//!
//! Hosts that do not want to implement [`DragSource`] and [`DropReceiver`] by
//! hand can attach a [`CallbackSource`] or [`CallbackReceiver`] to an entity
//! and bind closures to its [`Multicast`] lists. Every callback is delivered as
//! a mutable [`DragEvent`]; handlers run in bind order and may overwrite
//! `accept`.
//!
//! The two queries, [`DragSource::can_drag_start`] and
//! [`DropReceiver::is_valid_draggable`], start with `accept = false` and
//! return whatever the handlers leave behind. With no handler bound they
//! answer `false`.
//!
//! ```
//! use understory_drag::callbacks::CallbackReceiver;
//! use understory_drag::capability::DropReceiver;
//!
//! let mut bin = CallbackReceiver::new(7_u32);
//! assert!(!bin.is_valid_draggable(1));
//!
//! bin.is_valid.bind(|e| e.accept = e.source % 2 == 1);
//! assert!(bin.is_valid_draggable(1));
//! assert!(!bin.is_valid_draggable(2));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::capability::{DragSource, DropReceiver, SourceState};
use crate::types::CursorId;

/// Payload handed to every bound handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DragEvent<K> {
    /// The dragged source.
    pub source: K,
    /// The receiver involved, if the callback concerns one.
    pub receiver: Option<K>,
    /// Query answer for `can_drag_start`/`is_valid`; the cached validity for
    /// enter callbacks; `true` for delivered drops.
    pub accept: bool,
    /// Cursor driving the drag, when known.
    pub cursor: Option<CursorId>,
}

/// Ordered list of handlers for one callback.
pub struct Multicast<E> {
    handlers: Vec<Box<dyn FnMut(&mut E)>>,
}

impl<E> Default for Multicast<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Multicast<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multicast")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<E> Multicast<E> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after every handler bound before it.
    pub fn bind(&mut self, handler: impl FnMut(&mut E) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Number of bound handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handler is bound.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler in bind order against `event`.
    pub fn invoke(&mut self, event: &mut E) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }
}

/// A [`DragSource`] whose callbacks are forwarded to bound handlers.
#[derive(Debug)]
pub struct CallbackSource<K> {
    key: K,
    position: Point,
    state: SourceState<K>,
    /// Whether the object itself follows the cursor.
    pub drags_self: bool,
    /// Prefab spawned as the visual proxy, if any.
    pub proxy_prefab: Option<K>,
    /// Asked on press; set `accept` to allow the drag.
    pub can_drag_start: Multicast<DragEvent<K>>,
    /// The drag started.
    pub on_start: Multicast<DragEvent<K>>,
    /// The drag ended without an accepting receiver.
    pub on_stop: Multicast<DragEvent<K>>,
    /// The drag moved over a receiver.
    pub enter_receiver: Multicast<DragEvent<K>>,
    /// The drag moved off a receiver.
    pub exit_receiver: Multicast<DragEvent<K>>,
    /// A receiver accepted the drop.
    pub on_received: Multicast<DragEvent<K>>,
}

impl<K: Copy> CallbackSource<K> {
    /// A source for entity `key` at `position`, with no handlers bound.
    pub fn new(key: K, position: Point) -> Self {
        Self {
            key,
            position,
            state: SourceState::default(),
            drags_self: false,
            proxy_prefab: None,
            can_drag_start: Multicast::new(),
            on_start: Multicast::new(),
            on_stop: Multicast::new(),
            enter_receiver: Multicast::new(),
            exit_receiver: Multicast::new(),
            on_received: Multicast::new(),
        }
    }

    /// The entity this source belongs to.
    pub fn key(&self) -> K {
        self.key
    }

    /// Move the object. Hosts call this from their object transform sink.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn event(&self, receiver: Option<K>, accept: bool) -> DragEvent<K> {
        DragEvent {
            source: self.key,
            receiver,
            accept,
            cursor: self.state.cursor,
        }
    }
}

impl<K: Copy> DragSource<K> for CallbackSource<K> {
    fn state(&self) -> &SourceState<K> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SourceState<K> {
        &mut self.state
    }

    fn position(&self) -> Point {
        self.position
    }

    fn drags_self(&self) -> bool {
        self.drags_self
    }

    fn proxy_prefab(&self) -> Option<K> {
        self.proxy_prefab
    }

    fn can_drag_start(&mut self) -> bool {
        if self.can_drag_start.is_empty() {
            return false;
        }
        let mut event = self.event(None, false);
        self.can_drag_start.invoke(&mut event);
        event.accept
    }

    fn on_drag_start(&mut self) {
        let mut event = self.event(None, false);
        self.on_start.invoke(&mut event);
    }

    fn on_drag_stop(&mut self) {
        let mut event = self.event(None, false);
        self.on_stop.invoke(&mut event);
    }

    fn on_received_by(&mut self, receiver: K) {
        let mut event = self.event(Some(receiver), true);
        self.on_received.invoke(&mut event);
    }

    fn enter_target(&mut self, receiver: K, valid: bool) {
        let mut event = self.event(Some(receiver), valid);
        self.enter_receiver.invoke(&mut event);
    }

    fn exit_target(&mut self, receiver: K) {
        let mut event = self.event(Some(receiver), false);
        self.exit_receiver.invoke(&mut event);
    }
}

/// A [`DropReceiver`] whose callbacks are forwarded to bound handlers.
#[derive(Debug)]
pub struct CallbackReceiver<K> {
    key: K,
    /// Asked once per overlap run; set `accept` to take the source.
    pub is_valid: Multicast<DragEvent<K>>,
    /// A source was dropped here.
    pub on_accept: Multicast<DragEvent<K>>,
    /// A source moved over this receiver.
    pub on_enter: Multicast<DragEvent<K>>,
    /// A source moved off, or its drag ended without a drop here.
    pub on_leave: Multicast<DragEvent<K>>,
}

impl<K: Copy> CallbackReceiver<K> {
    /// A receiver for entity `key`, with no handlers bound.
    pub fn new(key: K) -> Self {
        Self {
            key,
            is_valid: Multicast::new(),
            on_accept: Multicast::new(),
            on_enter: Multicast::new(),
            on_leave: Multicast::new(),
        }
    }

    /// The entity this receiver belongs to.
    pub fn key(&self) -> K {
        self.key
    }

    fn event(&self, source: K, accept: bool) -> DragEvent<K> {
        DragEvent {
            source,
            receiver: Some(self.key),
            accept,
            cursor: None,
        }
    }
}

impl<K: Copy> DropReceiver<K> for CallbackReceiver<K> {
    fn is_valid_draggable(&mut self, source: K) -> bool {
        if self.is_valid.is_empty() {
            return false;
        }
        let mut event = self.event(source, false);
        self.is_valid.invoke(&mut event);
        event.accept
    }

    fn draggable_entered(&mut self, source: K, valid: bool) {
        let mut event = self.event(source, valid);
        self.on_enter.invoke(&mut event);
    }

    fn draggable_left(&mut self, source: K) {
        let mut event = self.event(source, false);
        self.on_leave.invoke(&mut event);
    }

    fn on_receive_draggable(&mut self, source: K) {
        let mut event = self.event(source, true);
        self.on_accept.invoke(&mut event);
    }
}
