// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracker: compute enter/leave transitions from per-frame overlap sets.
//!
//! ## Usage
//!
//! 1) Call [`HoverTracker::start_tracking`] at the start of the frame.
//! 2) Call [`HoverTracker::track`] for every target the cursor overlaps.
//! 3) Call [`HoverTracker::completed_tracking`], then read
//!    [`entered`](HoverTracker::entered) and [`exited`](HoverTracker::exited).
//!
//! [`HoverTracker::update`] bundles the three steps and returns the
//! transitions as [`HoverEvent`]s.
//!
//! ## Minimal example
//!
//! ```
//! use understory_drag::hover::{HoverEvent, HoverTracker};
//! let mut h: HoverTracker<u32> = HoverTracker::new();
//! assert_eq!(h.update([1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update([2, 3]), vec![HoverEvent::Leave(1), HoverEvent::Enter(3)]);
//! assert!(h.update([2, 3]).is_empty());
//! ```
//!
//! ## Semantics
//!
//! A target is known while it is reported in every frame since it was first
//! seen. Missing a single frame produces exactly one leave, and the target
//! must enter again if it comes back. There is no debouncing.

use alloc::vec::Vec;

/// Frame-to-frame overlap tracker for one active drag.
///
/// Storage is a set of small vectors; membership checks are linear, which is
/// fine for the handful of targets a cursor overlaps at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverTracker<K: Copy + Eq> {
    known: Vec<K>,
    frame: Vec<K>,
    entered: Vec<K>,
    exited: Vec<K>,
}

/// A hover transition event.
///
/// Returned by [`HoverTracker::update`]; leaves come before enters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The cursor started overlapping the target.
    Enter(K),
    /// The cursor stopped overlapping the target.
    Leave(K),
}

impl<K: Copy + Eq> HoverTracker<K> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            known: Vec::new(),
            frame: Vec::new(),
            entered: Vec::new(),
            exited: Vec::new(),
        }
    }

    /// Forget everything, without producing leave events (e.g. button up).
    pub fn reset(&mut self) {
        self.known.clear();
        self.frame.clear();
        self.entered.clear();
        self.exited.clear();
    }

    /// Begin a new frame.
    pub fn start_tracking(&mut self) {
        self.frame.clear();
        self.entered.clear();
        self.exited.clear();
    }

    /// Report that `target` is overlapped this frame.
    pub fn track(&mut self, target: K) {
        if self.frame.contains(&target) {
            return;
        }
        self.frame.push(target);
        if !self.known.contains(&target) {
            self.known.push(target);
            self.entered.push(target);
        }
    }

    /// Finish the frame: every known target not seen this frame becomes an exit.
    pub fn completed_tracking(&mut self) {
        for &k in &self.known {
            if !self.frame.contains(&k) {
                self.exited.push(k);
            }
        }
        let exited = &self.exited;
        self.known.retain(|k| !exited.contains(k));
    }

    /// Targets that entered during the last completed frame.
    pub fn entered(&self) -> &[K] {
        &self.entered
    }

    /// Targets that exited during the last completed frame.
    pub fn exited(&self) -> &[K] {
        &self.exited
    }

    /// Targets currently considered entered.
    pub fn known(&self) -> &[K] {
        &self.known
    }

    /// Run one full frame over `targets` and return its transitions.
    ///
    /// Leaves are emitted before enters, each in the order the targets were
    /// first seen.
    pub fn update(&mut self, targets: impl IntoIterator<Item = K>) -> Vec<HoverEvent<K>> {
        self.start_tracking();
        for t in targets {
            self.track(t);
        }
        self.completed_tracking();
        self.exited
            .iter()
            .map(|&k| HoverEvent::Leave(k))
            .chain(self.entered.iter().map(|&k| HoverEvent::Enter(k)))
            .collect()
    }
}
