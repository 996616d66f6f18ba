// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor event dispatcher: the per-frame driver for one cursor.
//!
//! ## Overview
//!
//! A [`CursorDispatcher`] turns button edges and pre-resolved hits into
//! [`DragRegistry`] calls. It is a two-state machine over the accepted drag
//! buttons:
//!
//! - `Up → Down` (press): rank hits by [`DepthKey`](crate::types::DepthKey),
//!   ask source-bearing hits `can_drag_start`, seed the click origin, and
//!   start their drags. The hover tracker starts fresh and, if anything was
//!   picked up, is fed the press frame's hits right away.
//! - `Down`: every frame, feed the receivers under the cursor to the
//!   [`HoverTracker`] and forward its enter/leave transitions, then move the
//!   drags to the drag-plane intersection.
//! - `Down → Up` (release): resolve the drags and reset the tracker.
//!
//! ## Frame order
//!
//! 1) [`DragRegistry::handle_drops`]: cancelled drags end first.
//! 2) Hover and motion, if the button was already down.
//! 3) Press, followed by hover and motion when a drag started.
//! 4) Release.
//!
//! A drag cancelled in a frame therefore never receives that frame's move.
//! A press and release in the same frame over a source and a receiver
//! delivers the drop to that receiver.
//!
//! ## Several cursors
//!
//! Run one dispatcher per cursor, all sharing one registry. With
//! [`TrackingScope::Cursor`] each dispatcher only touches the drags its cursor
//! started; with [`TrackingScope::Global`] it broadcasts to every drag.

use alloc::vec::Vec;

use crate::config::{ConfigError, DragConfig, PickMode, TrackingScope};
use crate::host::{DragScene, HitSource, InputSource};
use crate::hover::{HoverEvent, HoverTracker};
use crate::registry::DragRegistry;
use crate::types::{ButtonEdge, CursorHit, CursorId, EdgeKind, Resolved};

/// State of the accepted drag buttons for one cursor.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ButtonState {
    /// No accepted button is held.
    #[default]
    Up,
    /// An accepted button is held.
    Down,
}

/// Input for one frame of one cursor.
#[derive(Copy, Clone, Debug)]
pub struct CursorFrame<'a, K> {
    /// Button transitions since the previous frame.
    pub edges: &'a [ButtonEdge],
    /// Everything under the cursor, including the drag plane.
    pub hits: &'a [CursorHit<K>],
}

/// Per-cursor driver translating input into registry operations.
#[derive(Clone, Debug)]
pub struct CursorDispatcher<K: Copy + Eq> {
    cursor: CursorId,
    plane: K,
    config: DragConfig<K>,
    state: ButtonState,
    hover: HoverTracker<K>,
    held: Vec<K>,
}

impl<K: Copy + Eq + core::fmt::Debug> CursorDispatcher<K> {
    /// Create a dispatcher for `cursor`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`DragConfig::validate`]; the engine
    /// refuses to run without a drag plane or an accepted button.
    pub fn new(cursor: CursorId, config: DragConfig<K>) -> Result<Self, ConfigError> {
        let plane = config.validate()?;
        Ok(Self {
            cursor,
            plane,
            config,
            state: ButtonState::Up,
            hover: HoverTracker::new(),
            held: Vec::new(),
        })
    }

    /// The cursor this dispatcher drives.
    pub fn cursor(&self) -> CursorId {
        self.cursor
    }

    /// The validated configuration.
    pub fn config(&self) -> &DragConfig<K> {
        &self.config
    }

    /// Current button state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Sources this cursor started and that are still dragging.
    pub fn held_sources(&self) -> &[K] {
        &self.held
    }

    /// True while this cursor holds at least one drag.
    pub fn is_busy(&self) -> bool {
        !self.held.is_empty()
    }

    /// The hover tracker for the current press.
    pub fn hover(&self) -> &HoverTracker<K> {
        &self.hover
    }

    /// Pull this frame's edges and hits from the host and run [`step`](Self::step).
    pub fn update(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        input: &mut impl InputSource,
        hits: &mut impl HitSource<K>,
    ) -> Vec<Resolved<K>> {
        let edges = input.button_edges(self.cursor);
        let hits = hits.hits(self.cursor);
        self.step(
            registry,
            scene,
            CursorFrame {
                edges: &edges,
                hits: &hits,
            },
        )
    }

    /// Run one frame. Returns every drag that ended during it.
    pub fn step(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        frame: CursorFrame<'_, K>,
    ) -> Vec<Resolved<K>> {
        let mut ended = registry.handle_drops(scene);
        self.held.retain(|&s| registry.is_dragging(s));

        let (pressed, released) = self.accepted_edges(frame.edges);

        if self.state == ButtonState::Down {
            self.track_hover(registry, scene, frame.hits);
            ended.extend(self.apply_motion(registry, scene, frame.hits));
        }
        if pressed {
            if self.state == ButtonState::Up {
                if self.press(registry, scene, frame.hits) {
                    self.track_hover(registry, scene, frame.hits);
                    ended.extend(self.apply_motion(registry, scene, frame.hits));
                }
            } else {
                log::trace!("cursor {}: press while already down", self.cursor.0);
            }
        }
        if released && self.state == ButtonState::Down {
            ended.extend(self.release(registry, scene));
        }
        ended
    }

    /// Release everything this cursor holds and return to `Up`.
    pub fn teardown(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
    ) -> Vec<Resolved<K>> {
        self.release(registry, scene)
    }

    fn accepted_edges(&self, edges: &[ButtonEdge]) -> (bool, bool) {
        let mut pressed = false;
        let mut released = false;
        for edge in edges {
            if !self.config.buttons.intersects(edge.button) {
                log::trace!("cursor {}: ignoring {:?}", self.cursor.0, edge);
                continue;
            }
            match edge.kind {
                EdgeKind::Down => pressed = true,
                EdgeKind::Up => released = true,
            }
        }
        (pressed, released)
    }

    fn press(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        hits: &[CursorHit<K>],
    ) -> bool {
        self.state = ButtonState::Down;
        self.hover.reset();
        let before = self.held.len();

        // Nearest first; equal depths prefer the later hit.
        let mut ranked: Vec<&CursorHit<K>> =
            hits.iter().rev().filter(|h| h.target != self.plane).collect();
        ranked.sort_by(|a, b| b.depth_key.cmp(&a.depth_key));

        for hit in ranked {
            if scene.source_of(hit.target).is_none() {
                continue;
            }
            if self.pick(registry, scene, hit) {
                self.held.push(hit.target);
            }
            if self.config.pick == PickMode::Topmost {
                break;
            }
        }
        self.held.len() > before
    }

    fn pick(
        &self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        hit: &CursorHit<K>,
    ) -> bool {
        let Some(source) = scene.source_of(hit.target) else {
            return false;
        };
        if source.state().dragging {
            log::trace!("{:?} is held by another cursor", hit.target);
            return false;
        }
        if !source.can_drag_start() {
            log::trace!("{:?} refused to start dragging", hit.target);
            return false;
        }
        let position = source.position();
        source.state_mut().seed_click(hit.point, position);
        registry.start_dragging(scene, hit.target, self.cursor)
    }

    fn track_hover(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        hits: &[CursorHit<K>],
    ) {
        let plane = self.plane;
        let receivers: Vec<K> = hits
            .iter()
            .map(|h| h.target)
            .filter(|&t| t != plane && scene.receiver_of(t).is_some())
            .collect();
        for event in self.hover.update(receivers) {
            match event {
                HoverEvent::Enter(r) => self.enter(registry, scene, r),
                HoverEvent::Leave(r) => self.leave(registry, scene, r),
            }
        }
    }

    fn enter(&self, registry: &mut DragRegistry<K>, scene: &mut impl DragScene<K>, receiver: K) {
        match self.config.scope {
            TrackingScope::Global => registry.process_receiver(scene, receiver, true),
            TrackingScope::Cursor => {
                for &source in &self.held {
                    registry.offer_receiver(scene, source, receiver);
                }
            }
        }
    }

    fn leave(&self, registry: &mut DragRegistry<K>, scene: &mut impl DragScene<K>, receiver: K) {
        match self.config.scope {
            TrackingScope::Global => registry.process_receiver(scene, receiver, false),
            TrackingScope::Cursor => {
                for &source in &self.held {
                    registry.remove_receiver(scene, source, receiver);
                }
            }
        }
    }

    fn apply_motion(
        &self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
        hits: &[CursorHit<K>],
    ) -> Vec<Resolved<K>> {
        let Some(hit) = hits.iter().find(|h| h.target == self.plane) else {
            return Vec::new();
        };
        let offsets = self.config.offsets();
        match self.config.scope {
            TrackingScope::Global => registry.move_all(scene, hit.point, offsets),
            TrackingScope::Cursor => {
                for &source in &self.held {
                    registry.move_source(scene, source, hit.point, offsets);
                }
                Vec::new()
            }
        }
    }

    fn release(
        &mut self,
        registry: &mut DragRegistry<K>,
        scene: &mut impl DragScene<K>,
    ) -> Vec<Resolved<K>> {
        self.state = ButtonState::Up;
        self.hover.reset();
        match self.config.scope {
            TrackingScope::Global => {
                self.held.clear();
                registry.stop_dragging(scene)
            }
            TrackingScope::Cursor => self
                .held
                .drain(..)
                .filter_map(|source| {
                    let resolution = registry.release(scene, source)?;
                    Some(Resolved { source, resolution })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scene::{Call, Node, TestScene};
    use crate::types::{DepthKey, PointerButtons, Resolution};
    use alloc::collections::VecDeque;
    use alloc::vec;
    use kurbo::{Point, Vec2};

    const S: Node = Node(1);
    const T: Node = Node(4);
    const R: Node = Node(2);
    const X: Node = Node(3);
    const PLANE: Node = Node(99);

    const DOWN: ButtonEdge = ButtonEdge::down(PointerButtons::PRIMARY);
    const UP: ButtonEdge = ButtonEdge::up(PointerButtons::PRIMARY);

    fn hit(target: Node, x: f64, y: f64) -> CursorHit<Node> {
        CursorHit::new(target, Point::new(x, y))
    }

    fn scene() -> TestScene {
        let mut scene = TestScene::new();
        scene.add_source(S, Point::new(10.0, 10.0));
        scene.add_source(T, Point::new(10.0, 10.0));
        scene.add_receiver(R, true);
        scene.add_receiver(X, false);
        scene
    }

    fn dispatcher(cursor: u32) -> CursorDispatcher<Node> {
        CursorDispatcher::new(CursorId(cursor), DragConfig::new(PLANE)).unwrap()
    }

    struct Rig {
        scene: TestScene,
        registry: DragRegistry<Node>,
        cursor: CursorDispatcher<Node>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scene: scene(),
                registry: DragRegistry::new(),
                cursor: dispatcher(0),
            }
        }

        fn frame(&mut self, edges: &[ButtonEdge], hits: &[CursorHit<Node>]) -> Vec<Resolved<Node>> {
            self.cursor
                .step(&mut self.registry, &mut self.scene, CursorFrame { edges, hits })
        }
    }

    #[test]
    fn missing_plane_refuses_to_start() {
        let err = CursorDispatcher::<Node>::new(CursorId(0), DragConfig::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingDragPlane);
    }

    // Scenario A.
    #[test]
    fn press_on_source_starts_one_session() {
        let mut rig = Rig::new();
        let out = rig.frame(&[DOWN], &[hit(S, 12.0, 10.0), hit(PLANE, 12.0, 10.0)]);
        assert!(out.is_empty());
        assert_eq!(rig.registry.len(), 1);
        assert_eq!(rig.scene.count(Call::CanDragStart(S)), 1);
        assert_eq!(rig.scene.count(Call::DragStart(S)), 1);
        assert_eq!(rig.cursor.state(), ButtonState::Down);
        assert_eq!(rig.cursor.held_sources(), &[S]);
        let state = &rig.scene.source(S).state;
        assert_eq!(state.click_origin, Point::new(12.0, 10.0));
        assert_eq!(state.click_offset, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn refused_press_starts_nothing() {
        let mut rig = Rig::new();
        rig.scene.source(S).can_start = false;
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        assert!(rig.registry.is_empty());
        assert_eq!(rig.scene.count(Call::DragStart(S)), 0);
        assert!(!rig.cursor.is_busy());
    }

    #[test]
    fn unaccepted_button_is_ignored() {
        let mut rig = Rig::new();
        rig.frame(
            &[ButtonEdge::down(PointerButtons::SECONDARY)],
            &[hit(S, 10.0, 10.0)],
        );
        assert!(rig.registry.is_empty());
        assert_eq!(rig.cursor.state(), ButtonState::Up);
    }

    // Scenario B.
    #[test]
    fn drop_on_valid_receiver_is_accepted() {
        let mut rig = Rig::new();
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0), hit(PLANE, 10.0, 10.0)]);
        let over = [hit(S, 30.0, 30.0), hit(R, 30.0, 30.0), hit(PLANE, 30.0, 30.0)];
        rig.frame(&[], &over);
        assert_eq!(rig.scene.count(Call::IsValid(R, S)), 1);
        assert_eq!(rig.scene.count(Call::Entered(R, S, true)), 1);

        let out = rig.frame(&[UP], &over);
        assert_eq!(
            out,
            vec![Resolved {
                source: S,
                resolution: Resolution::Accepted(1)
            }]
        );
        assert_eq!(rig.scene.count(Call::ReceivedBy(S, R)), 1);
        assert_eq!(rig.scene.count(Call::Receive(R, S)), 1);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 0);
        assert!(rig.registry.is_empty());
        assert_eq!(rig.cursor.state(), ButtonState::Up);
        assert!(!rig.scene.source(S).state.dragging);
    }

    // Scenario C.
    #[test]
    fn drop_over_nothing_stops() {
        let mut rig = Rig::new();
        let empty = [hit(S, 10.0, 10.0), hit(PLANE, 10.0, 10.0)];
        rig.frame(&[DOWN], &empty);
        rig.frame(&[], &empty);
        let out = rig.frame(&[UP], &empty);
        assert_eq!(out[0].resolution, Resolution::Dropped);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 1);
        assert_eq!(rig.scene.count(Call::ReceivedBy(S, R)), 0);
    }

    // Scenario D.
    #[test]
    fn self_cancel_leaves_receiver_before_release() {
        let mut rig = Rig::new();
        rig.scene.source(S).drags_self = true;
        let over = [hit(R, 30.0, 30.0), hit(PLANE, 30.0, 30.0)];
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0), hit(PLANE, 10.0, 10.0)]);
        rig.frame(&[], &over);
        let moves = rig.scene.object_moves.len();

        rig.scene.source(S).state.valid = false;
        let out = rig.frame(&[], &over);
        assert_eq!(
            out,
            vec![Resolved {
                source: S,
                resolution: Resolution::Cancelled
            }]
        );
        assert_eq!(rig.scene.count(Call::Left(R, S)), 1);
        assert_eq!(rig.scene.count(Call::Receive(R, S)), 0);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 1);
        // No stale move in the cancelling frame.
        assert_eq!(rig.scene.object_moves.len(), moves);
        assert!(!rig.cursor.is_busy());

        // The button is still down; releasing resolves nothing further.
        assert!(rig.frame(&[UP], &over).is_empty());
        assert_eq!(rig.scene.count(Call::DragStop(S)), 1);
    }

    #[test]
    fn one_frame_gap_leaves_and_reenters() {
        let mut rig = Rig::new();
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        rig.frame(&[], &[hit(R, 0.0, 0.0)]);
        rig.frame(&[], &[]);
        assert_eq!(rig.scene.count(Call::Left(R, S)), 1);
        assert_eq!(rig.scene.count(Call::ExitTarget(S, R)), 1);
        // The answer is asked again on re-entry.
        rig.scene.receiver(R).accepts = false;
        rig.frame(&[], &[hit(R, 0.0, 0.0)]);
        assert_eq!(rig.scene.count(Call::IsValid(R, S)), 2);
        assert_eq!(rig.scene.count(Call::Entered(R, S, false)), 1);
        assert_eq!(rig.cursor.hover().known(), &[R]);
        let session = rig.registry.session(S).unwrap();
        assert_eq!(session.invalid_receivers(), &[R]);
    }

    #[test]
    fn invalid_receiver_is_left_on_release() {
        let mut rig = Rig::new();
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        rig.frame(&[], &[hit(X, 0.0, 0.0)]);
        assert_eq!(rig.scene.count(Call::EnterTarget(S, X, false)), 1);
        let out = rig.frame(&[UP], &[hit(X, 0.0, 0.0)]);
        assert_eq!(out[0].resolution, Resolution::Dropped);
        assert_eq!(rig.scene.count(Call::Left(X, S)), 1);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 1);
    }

    #[test]
    fn motion_follows_plane_only() {
        let mut rig = Rig::new();
        {
            let s = rig.scene.source(S);
            s.drags_self = true;
            s.prefab = Some(Node(7));
        }
        rig.cursor.config.proxy_offset = Vec2::new(0.0, 1.0);
        rig.frame(&[DOWN], &[hit(S, 12.0, 10.0)]);
        // Plane not under the cursor: nothing moves.
        rig.frame(&[], &[hit(S, 12.0, 10.0)]);
        assert!(rig.scene.object_moves.is_empty());

        rig.frame(&[], &[hit(PLANE, 50.0, 50.0)]);
        assert_eq!(rig.scene.object_moves, vec![(S, Point::new(48.0, 50.0))]);
        let proxy = rig.registry.session(S).unwrap().proxy().unwrap();
        assert_eq!(rig.scene.proxy_moves, vec![(proxy, Point::new(48.0, 51.0))]);

        rig.frame(&[UP], &[]);
        assert!(rig.scene.live_proxies.is_empty());
    }

    #[test]
    fn topmost_pick_considers_only_nearest_source() {
        let mut rig = Rig::new();
        let hits = [
            hit(S, 10.0, 10.0).with_depth(DepthKey::Z(1)),
            hit(T, 10.0, 10.0).with_depth(DepthKey::Z(5)),
        ];
        rig.frame(&[DOWN], &hits);
        assert_eq!(rig.cursor.held_sources(), &[T]);
        assert_eq!(rig.scene.count(Call::CanDragStart(S)), 0);
    }

    #[test]
    fn topmost_refusal_does_not_fall_through() {
        let mut rig = Rig::new();
        rig.scene.source(T).can_start = false;
        let hits = [
            hit(S, 10.0, 10.0).with_depth(DepthKey::Z(1)),
            hit(T, 10.0, 10.0).with_depth(DepthKey::Z(5)),
        ];
        rig.frame(&[DOWN], &hits);
        assert!(rig.registry.is_empty());
    }

    #[test]
    fn pick_all_starts_every_source_nearest_first() {
        let mut rig = Rig::new();
        rig.cursor.config.pick = PickMode::All;
        let hits = [
            hit(S, 10.0, 10.0).with_depth(DepthKey::Distance(2.0)),
            hit(T, 10.0, 10.0).with_depth(DepthKey::Distance(1.0)),
        ];
        rig.frame(&[DOWN], &hits);
        assert_eq!(rig.cursor.held_sources(), &[T, S]);
        assert_eq!(rig.registry.sources().collect::<Vec<_>>(), vec![T, S]);
    }

    // The dragged object is always under the cursor; it must not receive itself.
    #[test]
    fn dragged_receiver_never_receives_itself() {
        let mut rig = Rig::new();
        rig.scene.add_receiver(S, true);
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        rig.frame(&[], &[hit(S, 10.0, 10.0)]);
        let out = rig.frame(&[UP], &[hit(S, 10.0, 10.0)]);
        assert_eq!(out[0].resolution, Resolution::Dropped);
        assert_eq!(rig.scene.count(Call::IsValid(S, S)), 0);
        assert_eq!(rig.scene.count(Call::Receive(S, S)), 0);
    }

    #[test]
    fn click_in_one_frame_starts_and_drops() {
        let mut rig = Rig::new();
        let out = rig.frame(&[DOWN, UP], &[hit(S, 10.0, 10.0)]);
        assert_eq!(out[0].resolution, Resolution::Dropped);
        assert_eq!(rig.scene.count(Call::DragStart(S)), 1);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 1);
        assert_eq!(rig.cursor.state(), ButtonState::Up);
    }

    #[test]
    fn click_over_source_and_receiver_delivers_in_one_frame() {
        let mut rig = Rig::new();
        let out = rig.frame(
            &[DOWN, UP],
            &[hit(S, 10.0, 10.0), hit(R, 10.0, 10.0), hit(PLANE, 10.0, 10.0)],
        );
        assert_eq!(out[0].resolution, Resolution::Accepted(1));
        assert_eq!(rig.scene.count(Call::IsValid(R, S)), 1);
        assert_eq!(rig.scene.count(Call::Receive(R, S)), 1);
        assert_eq!(rig.scene.count(Call::DragStop(S)), 0);
    }

    #[test]
    fn press_frame_enters_and_moves() {
        let mut rig = Rig::new();
        rig.scene.source(S).drags_self = true;
        rig.frame(
            &[DOWN],
            &[hit(S, 12.0, 10.0), hit(R, 12.0, 10.0), hit(PLANE, 12.0, 10.0)],
        );
        assert!(rig.registry.session(S).unwrap().contains(R));
        assert_eq!(rig.scene.object_moves, vec![(S, Point::new(10.0, 10.0))]);
        // The next frame over the same receiver does not re-enter it.
        rig.frame(&[], &[hit(R, 13.0, 10.0), hit(PLANE, 13.0, 10.0)]);
        assert_eq!(rig.scene.count(Call::Entered(R, S, true)), 1);
    }

    #[test]
    fn refused_press_tracks_nothing() {
        let mut rig = Rig::new();
        rig.scene.source(S).can_start = false;
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0), hit(R, 10.0, 10.0)]);
        assert!(rig.cursor.hover().known().is_empty());
        assert_eq!(rig.scene.count(Call::IsValid(R, S)), 0);
    }

    #[test]
    fn cursors_keep_their_own_drags() {
        let mut scene = scene();
        let mut registry = DragRegistry::new();
        let mut c0 = dispatcher(0);
        let mut c1 = dispatcher(1);

        c0.step(&mut registry, &mut scene, CursorFrame { edges: &[DOWN], hits: &[hit(S, 0.0, 0.0)] });
        c1.step(&mut registry, &mut scene, CursorFrame { edges: &[DOWN], hits: &[hit(T, 0.0, 0.0)] });
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.session(T).unwrap().cursor(), CursorId(1));

        // Only cursor 0 is over the receiver.
        c0.step(&mut registry, &mut scene, CursorFrame { edges: &[], hits: &[hit(R, 0.0, 0.0)] });
        c1.step(&mut registry, &mut scene, CursorFrame { edges: &[], hits: &[] });
        assert!(registry.session(S).unwrap().contains(R));
        assert!(!registry.session(T).unwrap().contains(R));

        let out = c0.step(&mut registry, &mut scene, CursorFrame { edges: &[UP], hits: &[hit(R, 0.0, 0.0)] });
        assert_eq!(out[0].resolution, Resolution::Accepted(1));
        assert!(registry.is_dragging(T));
        assert!(!registry.is_dragging(S));
    }

    #[test]
    fn second_cursor_cannot_steal_a_drag() {
        let mut scene = scene();
        let mut registry = DragRegistry::new();
        let mut c0 = dispatcher(0);
        let mut c1 = dispatcher(1);
        c0.step(&mut registry, &mut scene, CursorFrame { edges: &[DOWN], hits: &[hit(S, 0.0, 0.0)] });
        c1.step(&mut registry, &mut scene, CursorFrame { edges: &[DOWN], hits: &[hit(S, 5.0, 5.0)] });
        assert_eq!(scene.count(Call::CanDragStart(S)), 1);
        assert!(!c1.is_busy());
        // The click offset from the first press survives.
        assert_eq!(scene.source(S).state.click_origin, Point::new(0.0, 0.0));
    }

    #[test]
    fn global_scope_broadcasts_to_every_drag() {
        let mut rig = Rig::new();
        rig.cursor.config.scope = TrackingScope::Global;
        rig.registry.start_dragging(&mut rig.scene, T, CursorId(9));
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        rig.frame(&[], &[hit(R, 0.0, 0.0)]);
        assert!(rig.registry.session(S).unwrap().contains(R));
        assert!(rig.registry.session(T).unwrap().contains(R));

        let out = rig.frame(&[UP], &[hit(R, 0.0, 0.0)]);
        assert_eq!(out.len(), 2);
        assert!(rig.registry.is_empty());
    }

    #[test]
    fn teardown_releases_held_drags() {
        let mut rig = Rig::new();
        rig.frame(&[DOWN], &[hit(S, 10.0, 10.0)]);
        let out = rig.cursor.teardown(&mut rig.registry, &mut rig.scene);
        assert_eq!(out[0].resolution, Resolution::Dropped);
        assert_eq!(rig.cursor.state(), ButtonState::Up);
        assert!(rig.registry.is_empty());
    }

    struct Script {
        edges: VecDeque<Vec<ButtonEdge>>,
        hits: Vec<CursorHit<Node>>,
    }

    impl InputSource for Script {
        fn button_edges(&mut self, _cursor: CursorId) -> Vec<ButtonEdge> {
            self.edges.pop_front().unwrap_or_default()
        }
    }

    impl HitSource<Node> for Script {
        fn hits(&mut self, _cursor: CursorId) -> Vec<CursorHit<Node>> {
            self.hits.clone()
        }
    }

    #[test]
    fn update_pulls_from_host_sources() {
        let mut scene = scene();
        let mut registry = DragRegistry::new();
        let mut cursor = dispatcher(0);
        let mut input = Script {
            edges: VecDeque::from([vec![DOWN], vec![], vec![UP]]),
            hits: vec![hit(S, 10.0, 10.0), hit(R, 10.0, 10.0), hit(PLANE, 10.0, 10.0)],
        };
        let mut hits = Script {
            edges: VecDeque::new(),
            hits: input.hits.clone(),
        };
        let mut ended = Vec::new();
        for _ in 0..3 {
            ended.extend(cursor.update(&mut registry, &mut scene, &mut input, &mut hits));
        }
        assert_eq!(
            ended,
            vec![Resolved {
                source: S,
                resolution: Resolution::Accepted(1)
            }]
        );
    }
}
