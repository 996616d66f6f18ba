// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag basics.
//!
//! A card is picked up, carried over a slot that refuses it, then dropped on a
//! slot that accepts it. A proxy follows the cursor while the card stays put.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example drag_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use understory_drag::callbacks::{CallbackReceiver, CallbackSource};
use understory_drag::capability::{DragSource, DropReceiver};
use understory_drag::config::DragConfig;
use understory_drag::dispatcher::{CursorDispatcher, CursorFrame};
use understory_drag::host::{CapabilityLookup, ProxyDisplay};
use understory_drag::registry::DragRegistry;
use understory_drag::types::{ButtonEdge, CursorHit, CursorId, PointerButtons, Resolution};

const TABLE: u32 = 0;
const CARD: u32 = 1;
const DISCARD: u32 = 2;
const HAND: u32 = 3;
const CARD_GHOST: u32 = 100;

#[derive(Default)]
struct Table {
    cards: Vec<CallbackSource<u32>>,
    slots: Vec<CallbackReceiver<u32>>,
    proxies: Vec<(u32, Point)>,
    next_proxy: u32,
}

impl CapabilityLookup<u32> for Table {
    fn source_of(&mut self, key: u32) -> Option<&mut dyn DragSource<u32>> {
        self.cards
            .iter_mut()
            .find(|c| c.key() == key)
            .map(|c| c as &mut dyn DragSource<u32>)
    }

    fn receiver_of(&mut self, key: u32) -> Option<&mut dyn DropReceiver<u32>> {
        self.slots
            .iter_mut()
            .find(|s| s.key() == key)
            .map(|s| s as &mut dyn DropReceiver<u32>)
    }
}

impl ProxyDisplay<u32> for Table {
    fn spawn_proxy(&mut self, prefab: u32) -> Option<u32> {
        self.next_proxy += 1;
        let proxy = prefab + self.next_proxy;
        self.proxies.push((proxy, Point::ORIGIN));
        println!("  spawn proxy {proxy}");
        Some(proxy)
    }

    fn destroy_proxy(&mut self, proxy: u32) {
        self.proxies.retain(|(p, _)| *p != proxy);
        println!("  destroy proxy {proxy}");
    }

    fn set_proxy_position(&mut self, proxy: u32, at: Point) {
        if let Some(entry) = self.proxies.iter_mut().find(|(p, _)| *p == proxy) {
            entry.1 = at;
        }
    }

    fn set_object_position(&mut self, object: u32, at: Point) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.key() == object) {
            card.set_position(at);
        }
    }
}

fn main() {
    env_logger::init();

    let trace: Rc<RefCell<Vec<String>>> = Rc::default();
    let mut table = Table::default();

    let mut card = CallbackSource::new(CARD, Point::new(40.0, 40.0));
    card.proxy_prefab = Some(CARD_GHOST);
    card.can_drag_start.bind(|e| e.accept = true);
    let t = trace.clone();
    card.on_received.bind(move |e| {
        t.borrow_mut()
            .push(format!("card received by {:?}", e.receiver));
    });
    table.cards.push(card);

    let mut discard = CallbackReceiver::new(DISCARD);
    discard.is_valid.bind(|e| e.accept = false);
    let t = trace.clone();
    discard.on_enter.bind(move |e| {
        t.borrow_mut()
            .push(format!("discard entered (valid: {})", e.accept));
    });
    table.slots.push(discard);

    let mut hand = CallbackReceiver::new(HAND);
    hand.is_valid.bind(|e| e.accept = e.source == CARD);
    let t = trace.clone();
    hand.on_accept.bind(move |e| {
        t.borrow_mut().push(format!("hand took card {}", e.source));
    });
    table.slots.push(hand);

    let mut registry = DragRegistry::new();
    let mut cursor = CursorDispatcher::new(CursorId(0), DragConfig::new(TABLE))
        .expect("a table plane is configured");

    let down = [ButtonEdge::down(PointerButtons::PRIMARY)];
    let up = [ButtonEdge::up(PointerButtons::PRIMARY)];
    let at = |target: u32, x: f64, y: f64| {
        vec![
            CursorHit::new(target, Point::new(x, y)),
            CursorHit::new(TABLE, Point::new(x, y)),
        ]
    };

    let frames: Vec<(&[ButtonEdge], Vec<CursorHit<u32>>)> = vec![
        (&down[..], at(CARD, 45.0, 42.0)),
        (&[][..], at(DISCARD, 120.0, 60.0)),
        (&[][..], at(HAND, 200.0, 160.0)),
        (&up[..], at(HAND, 200.0, 160.0)),
    ];

    for (i, (edges, hits)) in frames.into_iter().enumerate() {
        println!("== Frame {i} ==");
        let ended = cursor.step(&mut registry, &mut table, CursorFrame { edges, hits: &hits });
        if let Some((proxy, p)) = table.proxies.first() {
            println!("  proxy {proxy} at ({:.0}, {:.0})", p.x, p.y);
        }
        for r in &ended {
            println!("  ended: {:?}", r);
        }
        if i == 3 {
            assert_eq!(ended[0].resolution, Resolution::Accepted(1));
        }
    }

    println!("== Trace ==");
    for line in trace.borrow().iter() {
        println!("  {line}");
    }
    assert!(table.proxies.is_empty());
    assert_eq!(table.cards[0].position(), Point::new(40.0, 40.0));
}
