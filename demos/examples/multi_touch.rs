// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two fingers, one registry.
//!
//! Each touch point gets its own dispatcher. Both drag a tile at the same
//! time; one tile gets too hot while dragged and cancels itself, the other is
//! dropped into a bin that only accepts even tiles.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example multi_touch`

use kurbo::Point;
use understory_drag::capability::{DragSource, DropReceiver, SourceState};
use understory_drag::config::DragConfig;
use understory_drag::dispatcher::{CursorDispatcher, CursorFrame};
use understory_drag::host::{CapabilityLookup, ProxyDisplay};
use understory_drag::registry::DragRegistry;
use understory_drag::types::{ButtonEdge, CursorHit, CursorId, PointerButtons, Resolution, Resolved};

const BOARD: u32 = 0;
const BIN: u32 = 50;
/// Each move while dragged warms a tile by one; past this it gives up.
const MAX_HEAT: u32 = 4;

#[derive(Debug)]
struct Tile {
    id: u32,
    at: Point,
    heat: u32,
    state: SourceState<u32>,
}

impl Tile {
    fn new(id: u32, at: Point) -> Self {
        Self {
            id,
            at,
            heat: 0,
            state: SourceState::default(),
        }
    }
}

impl DragSource<u32> for Tile {
    fn state(&self) -> &SourceState<u32> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SourceState<u32> {
        &mut self.state
    }

    fn position(&self) -> Point {
        self.at
    }

    fn drags_self(&self) -> bool {
        true
    }

    fn can_drag_start(&mut self) -> bool {
        true
    }

    fn on_drag_stop(&mut self) {
        println!("  tile {} put back", self.id);
    }
}

struct EvenBin {
    taken: Vec<u32>,
}

impl DropReceiver<u32> for EvenBin {
    fn is_valid_draggable(&mut self, source: u32) -> bool {
        source % 2 == 0
    }

    fn on_receive_draggable(&mut self, source: u32) {
        self.taken.push(source);
    }
}

struct Board {
    tiles: Vec<Tile>,
    bin: EvenBin,
}

impl CapabilityLookup<u32> for Board {
    fn source_of(&mut self, key: u32) -> Option<&mut dyn DragSource<u32>> {
        self.tiles
            .iter_mut()
            .find(|t| t.id == key)
            .map(|t| t as &mut dyn DragSource<u32>)
    }

    fn receiver_of(&mut self, key: u32) -> Option<&mut dyn DropReceiver<u32>> {
        (key == BIN).then_some(&mut self.bin as &mut dyn DropReceiver<u32>)
    }
}

impl ProxyDisplay<u32> for Board {
    fn spawn_proxy(&mut self, _prefab: u32) -> Option<u32> {
        None
    }

    fn destroy_proxy(&mut self, _proxy: u32) {}

    fn set_proxy_position(&mut self, _proxy: u32, _at: Point) {}

    fn set_object_position(&mut self, object: u32, at: Point) {
        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == object) {
            tile.at = at;
            if tile.state.dragging {
                tile.heat += 1;
                // Overheated tiles refuse to be carried any further.
                if tile.heat > MAX_HEAT {
                    tile.state.valid = false;
                }
            }
        }
    }
}

fn hits(target: Option<u32>, x: f64, y: f64) -> Vec<CursorHit<u32>> {
    let p = Point::new(x, y);
    let mut out: Vec<_> = target.map(|t| CursorHit::new(t, p)).into_iter().collect();
    out.push(CursorHit::new(BOARD, p));
    out
}

fn main() {
    env_logger::init();

    let mut board = Board {
        tiles: vec![
            Tile::new(1, Point::new(0.0, 0.0)),
            Tile::new(2, Point::new(10.0, 0.0)),
        ],
        bin: EvenBin { taken: Vec::new() },
    };
    // Tile 1 is already warm and overheats on its third move. Tile 2 moves on
    // every frame, release included, and ends exactly at the limit.
    board.tiles[0].heat = 2;

    let mut registry = DragRegistry::new();
    let mut fingers = [
        CursorDispatcher::new(CursorId(0), DragConfig::new(BOARD)).expect("plane configured"),
        CursorDispatcher::new(CursorId(1), DragConfig::new(BOARD)).expect("plane configured"),
    ];

    let down = [ButtonEdge::down(PointerButtons::PRIMARY)];
    let up = [ButtonEdge::up(PointerButtons::PRIMARY)];
    let none: [ButtonEdge; 0] = [];

    // (finger 0 edges, finger 0 hits, finger 1 edges, finger 1 hits)
    let script = [
        (&down[..], hits(Some(1), 1.0, 1.0), &down[..], hits(Some(2), 11.0, 1.0)),
        (&none[..], hits(None, 20.0, 5.0), &none[..], hits(Some(BIN), 40.0, 5.0)),
        (&none[..], hits(None, 30.0, 5.0), &none[..], hits(Some(BIN), 42.0, 6.0)),
        (&up[..], hits(None, 30.0, 5.0), &up[..], hits(Some(BIN), 42.0, 6.0)),
    ];

    let mut ended: Vec<Resolved<u32>> = Vec::new();
    for (frame, (e0, h0, e1, h1)) in script.iter().enumerate() {
        println!("== Frame {frame} ==");
        for (finger, (edges, hits)) in fingers.iter_mut().zip([(e0, h0), (e1, h1)]) {
            let out = finger.step(
                &mut registry,
                &mut board,
                CursorFrame {
                    edges: *edges,
                    hits: hits.as_slice(),
                },
            );
            for r in &out {
                println!("  finger {}: {:?}", finger.cursor().0, r);
            }
            ended.extend(out);
        }
        println!("  dragging: {:?}", registry.sources().collect::<Vec<_>>());
    }

    assert!(ended.contains(&Resolved { source: 1, resolution: Resolution::Cancelled }));
    assert!(ended.contains(&Resolved { source: 2, resolution: Resolution::Accepted(1) }));
    assert_eq!(board.bin.taken, vec![2]);
    assert_eq!(board.tiles[1].heat, MAX_HEAT);
    assert!(registry.is_empty());
}
