// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory scene used by the unit tests.
//!
//! Every capability callback is appended to one shared log so tests can
//! assert ordering across sources and receivers.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Point;

use crate::capability::{DragSource, DropReceiver, SourceState};
use crate::host::{CapabilityLookup, ProxyDisplay};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Node(pub(crate) u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    CanDragStart(Node),
    DragStart(Node),
    DragStop(Node),
    ReceivedBy(Node, Node),
    EnterTarget(Node, Node, bool),
    ExitTarget(Node, Node),
    IsValid(Node, Node),
    Entered(Node, Node, bool),
    Left(Node, Node),
    Receive(Node, Node),
}

type Log = Rc<RefCell<Vec<Call>>>;

pub(crate) struct FakeSource {
    key: Node,
    log: Log,
    pub(crate) state: SourceState<Node>,
    pub(crate) position: Point,
    pub(crate) can_start: bool,
    pub(crate) drags_self: bool,
    pub(crate) prefab: Option<Node>,
}

impl DragSource<Node> for FakeSource {
    fn state(&self) -> &SourceState<Node> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SourceState<Node> {
        &mut self.state
    }

    fn position(&self) -> Point {
        self.position
    }

    fn drags_self(&self) -> bool {
        self.drags_self
    }

    fn proxy_prefab(&self) -> Option<Node> {
        self.prefab
    }

    fn can_drag_start(&mut self) -> bool {
        self.log.borrow_mut().push(Call::CanDragStart(self.key));
        self.can_start
    }

    fn on_drag_start(&mut self) {
        self.log.borrow_mut().push(Call::DragStart(self.key));
    }

    fn on_drag_stop(&mut self) {
        self.log.borrow_mut().push(Call::DragStop(self.key));
    }

    fn on_received_by(&mut self, receiver: Node) {
        self.log.borrow_mut().push(Call::ReceivedBy(self.key, receiver));
    }

    fn enter_target(&mut self, receiver: Node, valid: bool) {
        self.log
            .borrow_mut()
            .push(Call::EnterTarget(self.key, receiver, valid));
    }

    fn exit_target(&mut self, receiver: Node) {
        self.log.borrow_mut().push(Call::ExitTarget(self.key, receiver));
    }
}

pub(crate) struct FakeReceiver {
    key: Node,
    log: Log,
    pub(crate) accepts: bool,
}

impl DropReceiver<Node> for FakeReceiver {
    fn is_valid_draggable(&mut self, source: Node) -> bool {
        self.log.borrow_mut().push(Call::IsValid(self.key, source));
        self.accepts
    }

    fn draggable_entered(&mut self, source: Node, valid: bool) {
        self.log
            .borrow_mut()
            .push(Call::Entered(self.key, source, valid));
    }

    fn draggable_left(&mut self, source: Node) {
        self.log.borrow_mut().push(Call::Left(self.key, source));
    }

    fn on_receive_draggable(&mut self, source: Node) {
        self.log.borrow_mut().push(Call::Receive(self.key, source));
    }
}

#[derive(Default)]
pub(crate) struct TestScene {
    log: Log,
    sources: Vec<FakeSource>,
    receivers: Vec<FakeReceiver>,
    next_proxy: u32,
    pub(crate) refuse_spawn: bool,
    pub(crate) live_proxies: Vec<Node>,
    pub(crate) destroyed: Vec<Node>,
    pub(crate) proxy_moves: Vec<(Node, Point)>,
    pub(crate) object_moves: Vec<(Node, Point)>,
}

impl TestScene {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a source at `position` that accepts drag starts.
    pub(crate) fn add_source(&mut self, key: Node, position: Point) -> &mut FakeSource {
        self.sources.push(FakeSource {
            key,
            log: self.log.clone(),
            state: SourceState::default(),
            position,
            can_start: true,
            drags_self: false,
            prefab: None,
        });
        self.sources.last_mut().unwrap()
    }

    /// Add a receiver that answers `accepts` to every validity query.
    pub(crate) fn add_receiver(&mut self, key: Node, accepts: bool) {
        self.receivers.push(FakeReceiver {
            key,
            log: self.log.clone(),
            accepts,
        });
    }

    pub(crate) fn source(&mut self, key: Node) -> &mut FakeSource {
        self.sources.iter_mut().find(|s| s.key == key).unwrap()
    }

    pub(crate) fn receiver(&mut self, key: Node) -> &mut FakeReceiver {
        self.receivers.iter_mut().find(|r| r.key == key).unwrap()
    }

    /// Simulate the entity being destroyed (both roles vanish).
    pub(crate) fn despawn(&mut self, key: Node) {
        self.sources.retain(|s| s.key != key);
        self.receivers.retain(|r| r.key != key);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.log.borrow().iter().filter(|c| **c == call).count()
    }

    pub(crate) fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}

impl CapabilityLookup<Node> for TestScene {
    fn source_of(&mut self, key: Node) -> Option<&mut dyn DragSource<Node>> {
        self.sources
            .iter_mut()
            .find(|s| s.key == key)
            .map(|s| s as &mut dyn DragSource<Node>)
    }

    fn receiver_of(&mut self, key: Node) -> Option<&mut dyn DropReceiver<Node>> {
        self.receivers
            .iter_mut()
            .find(|r| r.key == key)
            .map(|r| r as &mut dyn DropReceiver<Node>)
    }
}

impl ProxyDisplay<Node> for TestScene {
    fn spawn_proxy(&mut self, prefab: Node) -> Option<Node> {
        if self.refuse_spawn {
            return None;
        }
        self.next_proxy += 1;
        let proxy = Node(prefab.0 * 1000 + self.next_proxy);
        self.live_proxies.push(proxy);
        Some(proxy)
    }

    fn destroy_proxy(&mut self, proxy: Node) {
        self.live_proxies.retain(|p| *p != proxy);
        self.destroyed.push(proxy);
    }

    fn set_proxy_position(&mut self, proxy: Node, at: Point) {
        self.proxy_moves.push((proxy, at));
    }

    fn set_object_position(&mut self, object: Node, at: Point) {
        self.object_moves.push((object, at));
        if let Some(s) = self.sources.iter_mut().find(|s| s.key == object) {
            s.position = at;
        }
    }
}
