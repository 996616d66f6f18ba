// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag registry: the pool of all concurrently active drag sessions.
//!
//! ## Overview
//!
//! The [`DragRegistry`] is the only mutation surface for starting, moving,
//! and ending drags. It holds at most one [`DragSession`] per source, keyed by
//! the source's entity key, in the order the drags started.
//!
//! ## Resolution
//!
//! Every session ends exactly once with a [`Resolution`]:
//! - [`release`](DragRegistry::release) and [`stop_dragging`](DragRegistry::stop_dragging)
//!   deliver the drop to every valid receiver, or fire `on_drag_stop` when there is none.
//! - [`handle_drops`](DragRegistry::handle_drops) cancels sessions whose source set
//!   `valid = false` or vanished from the scene. Overlapped receivers get
//!   `draggable_left`, and the source (if it still exists) gets `on_drag_stop`.
//!
//! ## No-ops
//!
//! Starting a drag that already exists, removing a receiver that was never
//! added, dropping a source onto itself, and addressing a source with no
//! session are silently ignored.

use alloc::vec::Vec;

use kurbo::Point;

use crate::host::DragScene;
use crate::session::DragSession;
use crate::types::{CursorId, DragOffsets, Resolution, Resolved};

/// Pool of active drag sessions, at most one per source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragRegistry<K> {
    sessions: Vec<DragSession<K>>,
}

impl<K: Copy + Eq + core::fmt::Debug> Default for DragRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + core::fmt::Debug> DragRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
        }
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when nothing is being dragged.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whether `source` has an active session.
    pub fn is_dragging(&self, source: K) -> bool {
        self.index_of(source).is_some()
    }

    /// The session for `source`, if any.
    pub fn session(&self, source: K) -> Option<&DragSession<K>> {
        self.sessions.iter().find(|s| s.source() == source)
    }

    /// Active sessions in the order their drags started.
    pub fn sessions(&self) -> impl Iterator<Item = &DragSession<K>> + '_ {
        self.sessions.iter()
    }

    /// Sources of all active sessions, in start order.
    pub fn sources(&self) -> impl Iterator<Item = K> + '_ {
        self.sessions.iter().map(DragSession::source)
    }

    fn index_of(&self, source: K) -> Option<usize> {
        self.sessions.iter().position(|s| s.source() == source)
    }

    /// Begin dragging `source` on behalf of `cursor`.
    ///
    /// Creates and registers a session, then fires `on_drag_start`. Returns
    /// `false` without side effects when the source is already dragging or is
    /// missing from the scene.
    pub fn start_dragging(
        &mut self,
        scene: &mut impl DragScene<K>,
        source: K,
        cursor: CursorId,
    ) -> bool {
        if self.is_dragging(source) {
            log::trace!("{source:?} is already dragging");
            return false;
        }
        let Some(session) = DragSession::begin(scene, source, cursor) else {
            return false;
        };
        self.sessions.push(session);
        if let Some(s) = scene.source_of(source) {
            s.on_drag_start();
        }
        log::debug!("drag started: {source:?} by cursor {}", cursor.0);
        true
    }

    /// Release every session (global button-up or teardown).
    pub fn stop_dragging(&mut self, scene: &mut impl DragScene<K>) -> Vec<Resolved<K>> {
        let sessions = core::mem::take(&mut self.sessions);
        sessions
            .into_iter()
            .map(|session| {
                let source = session.source();
                let resolution = Self::finish(scene, session, false);
                Resolved { source, resolution }
            })
            .collect()
    }

    /// Release the session for `source` and deliver its drop.
    ///
    /// A source that no longer exists in the scene, or that cleared its
    /// `valid` flag since the last [`handle_drops`](Self::handle_drops), is
    /// cancelled instead.
    pub fn release(&mut self, scene: &mut impl DragScene<K>, source: K) -> Option<Resolution> {
        let i = self.index_of(source)?;
        let session = self.sessions.remove(i);
        Some(Self::finish(scene, session, false))
    }

    /// Cancel the session for `source` without delivering a drop.
    pub fn cancel(&mut self, scene: &mut impl DragScene<K>, source: K) -> Option<Resolution> {
        let i = self.index_of(source)?;
        let session = self.sessions.remove(i);
        Some(Self::finish(scene, session, true))
    }

    fn finish(scene: &mut impl DragScene<K>, mut session: DragSession<K>, cancel: bool) -> Resolution {
        let source = session.source();
        let valid = match scene.source_of(source) {
            Some(s) => s.state().valid,
            None => {
                log::warn!("drag source {source:?} vanished mid-drag; cancelling");
                false
            }
        };
        let resolution = if cancel || !valid {
            session.cancel(scene);
            Resolution::Cancelled
        } else {
            match session.resolve(scene) {
                0 => Resolution::Dropped,
                n => Resolution::Accepted(n),
            }
        };
        if let Some(s) = scene.source_of(source) {
            s.state_mut().dragging = false;
            if resolution.accepted() == 0 {
                s.on_drag_stop();
            }
        }
        session.finish(scene);
        log::debug!("drag ended: {source:?} -> {resolution:?}");
        resolution
    }

    /// Record that the drag of `source` overlaps `receiver`.
    ///
    /// No-op if `source` has no session, `receiver` is the source itself, or
    /// `receiver` has no receiver role in the scene. Returns `true` if the
    /// enter callbacks fired.
    pub fn add_receiver(
        &mut self,
        scene: &mut impl DragScene<K>,
        source: K,
        receiver: K,
        valid: bool,
    ) -> bool {
        if source == receiver {
            return false;
        }
        let Some(i) = self.index_of(source) else {
            return false;
        };
        if scene.receiver_of(receiver).is_none() {
            log::trace!("{receiver:?} is not a drop receiver");
            return false;
        }
        let entered = self.sessions[i].add_receiver(scene, receiver, valid);
        if entered {
            log::trace!("{source:?} entered {receiver:?} (valid: {valid})");
        }
        entered
    }

    /// Record that the drag of `source` no longer overlaps `receiver`.
    ///
    /// Returns `true` if the leave callbacks fired.
    pub fn remove_receiver(&mut self, scene: &mut impl DragScene<K>, source: K, receiver: K) -> bool {
        let Some(i) = self.index_of(source) else {
            return false;
        };
        let left = self.sessions[i].remove_receiver(scene, receiver);
        if left {
            log::trace!("{source:?} left {receiver:?}");
        }
        left
    }

    /// Ask `receiver` whether it accepts `source`, then record the overlap.
    ///
    /// The validity question is asked once per unbroken overlap run: a
    /// receiver the session already holds is not asked again. Self-drops and
    /// unknown receivers are ignored. Returns `true` if the enter callbacks fired.
    pub fn offer_receiver(&mut self, scene: &mut impl DragScene<K>, source: K, receiver: K) -> bool {
        if source == receiver {
            return false;
        }
        let Some(i) = self.index_of(source) else {
            return false;
        };
        if self.sessions[i].contains(receiver) {
            return false;
        }
        let Some(r) = scene.receiver_of(receiver) else {
            return false;
        };
        let valid = r.is_valid_draggable(source);
        self.add_receiver(scene, source, receiver, valid)
    }

    /// Broadcast a receiver entering (`add`) or leaving the cursor's overlap
    /// set to every active session.
    ///
    /// On entry, the receiver is offered to each session through
    /// [`offer_receiver`](Self::offer_receiver).
    pub fn process_receiver(&mut self, scene: &mut impl DragScene<K>, receiver: K, add: bool) {
        for i in 0..self.sessions.len() {
            let source = self.sessions[i].source();
            if add {
                self.offer_receiver(scene, source, receiver);
            } else {
                self.remove_receiver(scene, source, receiver);
            }
        }
    }

    /// Cancel every session whose source invalidated itself or vanished.
    ///
    /// Runs before motion each frame so a cancelled drag never sees a stale move.
    pub fn handle_drops(&mut self, scene: &mut impl DragScene<K>) -> Vec<Resolved<K>> {
        let dropped: Vec<K> = self
            .sessions
            .iter()
            .map(DragSession::source)
            .filter(|&k| scene.source_of(k).is_none_or(|s| !s.state().valid))
            .collect();
        dropped
            .into_iter()
            .filter_map(|source| {
                let resolution = self.cancel(scene, source)?;
                Some(Resolved { source, resolution })
            })
            .collect()
    }

    /// Move the proxy (and object) of `source` relative to the drag-plane point `at`.
    pub fn move_source(
        &mut self,
        scene: &mut impl DragScene<K>,
        source: K,
        at: Point,
        offsets: DragOffsets,
    ) {
        if let Some(session) = self.session(source) {
            session.move_to(scene, at, offsets);
        }
    }

    /// Cancel invalidated drags, then move every remaining one to `at`.
    pub fn move_all(
        &mut self,
        scene: &mut impl DragScene<K>,
        at: Point,
        offsets: DragOffsets,
    ) -> Vec<Resolved<K>> {
        let dropped = self.handle_drops(scene);
        for session in &self.sessions {
            session.move_to(scene, at, offsets);
        }
        dropped
    }
}
