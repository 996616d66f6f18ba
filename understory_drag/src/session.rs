// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session: the live state of one in-flight drag.
//!
//! ## Overview
//!
//! A [`DragSession`] owns the dragged source's key, its visual proxy, and two
//! disjoint sets of receivers the drag currently overlaps: those that said
//! they would accept the source, and those that refused.
//!
//! A session is resolved exactly once, either by [`DragSession::resolve`]
//! (a release) or by [`DragSession::cancel`] (the source invalidated itself or
//! vanished), and then torn down with [`DragSession::finish`].
//!
//! Sessions are normally driven through the
//! [`DragRegistry`](crate::registry::DragRegistry), which guarantees one
//! session per source and rejects self-drops before they reach here.

use alloc::vec::Vec;

use kurbo::Point;

use crate::host::DragScene;
use crate::types::{CursorId, DragOffsets};

/// Lifecycle of the visual proxy that follows the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ProxyState<K> {
    proxy: Option<K>,
}

impl<K: Copy> ProxyState<K> {
    fn spawn(scene: &mut impl DragScene<K>, source: K) -> Self {
        let prefab = scene.source_of(source).and_then(|s| s.proxy_prefab());
        let proxy = prefab.and_then(|p| scene.spawn_proxy(p));
        if let Some(s) = scene.source_of(source) {
            s.state_mut().proxy = proxy;
        }
        Self { proxy }
    }

    fn destroy(&mut self, scene: &mut impl DragScene<K>, source: K) {
        if let Some(proxy) = self.proxy.take() {
            scene.destroy_proxy(proxy);
        }
        if let Some(s) = scene.source_of(source) {
            s.state_mut().proxy = None;
        }
    }
}

/// One in-flight drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession<K> {
    source: K,
    cursor: CursorId,
    proxy: ProxyState<K>,
    valid: Vec<K>,
    invalid: Vec<K>,
    resolved: bool,
}

impl<K: Copy + Eq> DragSession<K> {
    /// Start a session for `source`.
    ///
    /// Marks the source as dragging and valid, records `cursor`, and spawns a
    /// proxy when the source declares a prefab. Returns `None` when the
    /// source is not present in the scene.
    pub fn begin(scene: &mut impl DragScene<K>, source: K, cursor: CursorId) -> Option<Self> {
        let s = scene.source_of(source)?;
        let state = s.state_mut();
        state.dragging = true;
        state.valid = true;
        state.cursor = Some(cursor);
        let proxy = ProxyState::spawn(scene, source);
        Some(Self {
            source,
            cursor,
            proxy,
            valid: Vec::new(),
            invalid: Vec::new(),
            resolved: false,
        })
    }

    /// The dragged source.
    pub fn source(&self) -> K {
        self.source
    }

    /// The cursor that started this drag.
    pub fn cursor(&self) -> CursorId {
        self.cursor
    }

    /// The spawned visual proxy, if any.
    pub fn proxy(&self) -> Option<K> {
        self.proxy.proxy
    }

    /// Receivers currently overlapped that accept the source, in entry order.
    pub fn valid_receivers(&self) -> &[K] {
        &self.valid
    }

    /// Receivers currently overlapped that refused the source, in entry order.
    pub fn invalid_receivers(&self) -> &[K] {
        &self.invalid
    }

    /// Whether `receiver` is currently overlapped, valid or not.
    pub fn contains(&self, receiver: K) -> bool {
        self.valid.contains(&receiver) || self.invalid.contains(&receiver)
    }

    /// Whether [`resolve`](Self::resolve) or [`cancel`](Self::cancel) already ran.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Record that the drag overlaps `receiver`, with its validity answer.
    ///
    /// Enter callbacks fire once per unbroken overlap run: a receiver already
    /// in either set is only moved to the set matching `valid`. Returns `true`
    /// if the enter callbacks fired.
    pub fn add_receiver(&mut self, scene: &mut impl DragScene<K>, receiver: K, valid: bool) -> bool {
        let (into, from) = if valid {
            (&mut self.valid, &mut self.invalid)
        } else {
            (&mut self.invalid, &mut self.valid)
        };
        if into.contains(&receiver) {
            return false;
        }
        if let Some(i) = from.iter().position(|r| *r == receiver) {
            from.remove(i);
            into.push(receiver);
            return false;
        }
        into.push(receiver);
        if let Some(s) = scene.source_of(self.source) {
            s.enter_target(receiver, valid);
        }
        if let Some(r) = scene.receiver_of(receiver) {
            r.draggable_entered(self.source, valid);
        }
        true
    }

    /// Record that the drag no longer overlaps `receiver`.
    ///
    /// Returns `false` (and fires nothing) if it was never added.
    pub fn remove_receiver(&mut self, scene: &mut impl DragScene<K>, receiver: K) -> bool {
        let removed = take(&mut self.valid, receiver) || take(&mut self.invalid, receiver);
        if !removed {
            return false;
        }
        if let Some(r) = scene.receiver_of(receiver) {
            r.draggable_left(self.source);
        }
        if let Some(s) = scene.source_of(self.source) {
            s.exit_target(receiver);
        }
        true
    }

    /// Deliver the drop, once.
    ///
    /// Each valid receiver gets `on_received_by` on the source followed by
    /// `on_receive_draggable` on the receiver, in entry order. Valid receivers
    /// that no longer exist in the scene are skipped and do not count. Each
    /// invalid receiver gets `draggable_left`. Returns the number of accepting
    /// receivers; a second call fires nothing and returns `0`.
    pub fn resolve(&mut self, scene: &mut impl DragScene<K>) -> usize {
        if self.resolved {
            return 0;
        }
        self.resolved = true;
        let mut count = 0;
        for &receiver in &self.valid {
            if scene.receiver_of(receiver).is_none() {
                continue;
            }
            count += 1;
            if let Some(s) = scene.source_of(self.source) {
                s.on_received_by(receiver);
            }
            if let Some(r) = scene.receiver_of(receiver) {
                r.on_receive_draggable(self.source);
            }
        }
        for &receiver in &self.invalid {
            if let Some(r) = scene.receiver_of(receiver) {
                r.draggable_left(self.source);
            }
        }
        count
    }

    /// Abandon the drag, once: every overlapped receiver gets `draggable_left`
    /// and nothing is accepted. Returns `false` if already resolved.
    pub fn cancel(&mut self, scene: &mut impl DragScene<K>) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        for &receiver in self.valid.iter().chain(&self.invalid) {
            if let Some(r) = scene.receiver_of(receiver) {
                r.draggable_left(self.source);
            }
        }
        true
    }

    /// Position the proxy, and the object itself if it drags itself, relative
    /// to the drag-plane intersection `at`.
    pub fn move_to(&self, scene: &mut impl DragScene<K>, at: Point, offsets: DragOffsets) {
        let Some(s) = scene.source_of(self.source) else {
            return;
        };
        let click = s.state().click_offset;
        let drags_self = s.drags_self();
        if let Some(proxy) = self.proxy.proxy {
            scene.set_proxy_position(proxy, at + offsets.proxy - click);
        }
        if drags_self {
            scene.set_object_position(self.source, at + offsets.object - click);
        }
    }

    /// Tear down: destroy the proxy and mark the source idle.
    pub fn finish(mut self, scene: &mut impl DragScene<K>) {
        self.proxy.destroy(scene, self.source);
        if let Some(s) = scene.source_of(self.source) {
            let state = s.state_mut();
            state.dragging = false;
            state.cursor = None;
        }
    }
}

fn take<K: Eq>(set: &mut Vec<K>, item: K) -> bool {
    match set.iter().position(|r| *r == item) {
        Some(i) => {
            set.remove(i);
            true
        }
        None => false,
    }
}
