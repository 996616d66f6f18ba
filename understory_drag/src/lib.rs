// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Drag: a deterministic, `no_std` drag-and-drop engine.
//!
//! ## Overview
//!
//! This crate turns per-frame cursor input into drag sessions: it decides
//! which objects get picked up, tracks which drop receivers each drag is over,
//! moves visual proxies along a drag plane, and resolves every drag exactly
//! once when it is released or cancelled.
//! It does not perform hit testing, polling, or rendering.
//! Instead, feed it [`CursorHit`](crate::types::CursorHit) items (for example
//! from a box tree or a 3D ray cast) and [`ButtonEdge`](crate::types::ButtonEdge)
//! transitions, and it calls back into the entities of your scene.
//!
//! ## Inputs
//!
//! Entities are identified by a small `Copy` key. A host provides:
//! - [`CapabilityLookup`](crate::host::CapabilityLookup): the
//!   [`DragSource`](crate::capability::DragSource) and
//!   [`DropReceiver`](crate::capability::DropReceiver) roles of a key, if any.
//! - [`ProxyDisplay`](crate::host::ProxyDisplay): spawn and position visual proxies.
//! - Per frame, the hits under each cursor (including the drag-plane entity)
//!   and that cursor's button edges, either as a
//!   [`CursorFrame`](crate::dispatcher::CursorFrame) or through
//!   [`HitSource`](crate::host::HitSource) and [`InputSource`](crate::host::InputSource).
//!
//! The engine never stores references to your entities. A key whose role has
//! disappeared is treated as destroyed: a vanished source cancels its drag and
//! a vanished receiver is dropped silently.
//!
//! ## Ordering
//!
//! Hits are ranked by [`DepthKey`](crate::types::DepthKey).
//! For `Z`, higher is nearer. For `Distance`, lower is nearer. When kinds differ, `Z` ranks above `Distance`.
//! Equal-depth ties are stable and the later hit wins.
//!
//! ## Workflow
//!
//! 1) Configure. Build a [`DragConfig`](crate::config::DragConfig) naming the
//!    drag plane and create one [`CursorDispatcher`](crate::dispatcher::CursorDispatcher)
//!    per cursor. All dispatchers share one [`DragRegistry`](crate::registry::DragRegistry).
//! 2) Press. The nearest source-bearing hit is asked `can_drag_start`; if it agrees,
//!    a [`DragSession`](crate::session::DragSession) is registered and a proxy spawned.
//! 3) Hover. While the button is held, receivers under the cursor feed a
//!    [`HoverTracker`](crate::hover::HoverTracker). Each newly entered receiver is
//!    asked `is_valid_draggable` once and recorded as valid or invalid; each
//!    receiver that drops out of the hit list gets `draggable_left`.
//! 4) Move. The drag-plane hit point, minus the click offset, positions the
//!    proxy and (optionally) the object itself.
//! 5) Resolve. On release, every valid receiver gets the drop. With none, the
//!    source gets `on_drag_stop`. A source may clear its `valid` flag at any
//!    time to cancel its drag on the next frame.
//!
//! ## Frame order
//!
//! Within one [`step`](crate::dispatcher::CursorDispatcher::step):
//! cancellations, then hover and motion, then press (followed by hover and
//! motion if something was picked up), then release. A release also cancels
//! a source that cleared its `valid` flag earlier in the same frame.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_drag::callbacks::{CallbackReceiver, CallbackSource};
//! use understory_drag::capability::{DragSource, DropReceiver};
//! use understory_drag::config::DragConfig;
//! use understory_drag::dispatcher::{CursorDispatcher, CursorFrame};
//! use understory_drag::host::{CapabilityLookup, ProxyDisplay};
//! use understory_drag::registry::DragRegistry;
//! use understory_drag::types::{ButtonEdge, CursorHit, CursorId, PointerButtons, Resolution};
//!
//! struct Scene {
//!     card: CallbackSource<u32>,
//!     slot: CallbackReceiver<u32>,
//! }
//!
//! impl CapabilityLookup<u32> for Scene {
//!     fn source_of(&mut self, key: u32) -> Option<&mut dyn DragSource<u32>> {
//!         if key == 1 { Some(&mut self.card) } else { None }
//!     }
//!     fn receiver_of(&mut self, key: u32) -> Option<&mut dyn DropReceiver<u32>> {
//!         if key == 2 { Some(&mut self.slot) } else { None }
//!     }
//! }
//!
//! impl ProxyDisplay<u32> for Scene {
//!     fn spawn_proxy(&mut self, _prefab: u32) -> Option<u32> { None }
//!     fn destroy_proxy(&mut self, _proxy: u32) {}
//!     fn set_proxy_position(&mut self, _proxy: u32, _at: Point) {}
//!     fn set_object_position(&mut self, _object: u32, at: Point) {
//!         self.card.set_position(at);
//!     }
//! }
//!
//! let mut scene = Scene {
//!     card: CallbackSource::new(1, Point::new(10.0, 10.0)),
//!     slot: CallbackReceiver::new(2),
//! };
//! scene.card.can_drag_start.bind(|e| e.accept = true);
//! scene.slot.is_valid.bind(|e| e.accept = true);
//!
//! const PLANE: u32 = 0;
//! let mut registry = DragRegistry::new();
//! let mut cursor = CursorDispatcher::new(CursorId(0), DragConfig::new(PLANE)).unwrap();
//! let primary = PointerButtons::PRIMARY;
//!
//! let over_card = [CursorHit::new(1, Point::new(10.0, 10.0))];
//! let over_slot = [CursorHit::new(2, Point::new(80.0, 40.0))];
//! let press = [ButtonEdge::down(primary)];
//! let release = [ButtonEdge::up(primary)];
//!
//! cursor.step(&mut registry, &mut scene, CursorFrame { edges: &press, hits: &over_card });
//! cursor.step(&mut registry, &mut scene, CursorFrame { edges: &[], hits: &over_slot });
//! let ended = cursor.step(&mut registry, &mut scene, CursorFrame { edges: &release, hits: &over_slot });
//!
//! assert_eq!(ended[0].resolution, Resolution::Accepted(1));
//! assert!(registry.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod callbacks;
pub mod capability;
pub mod config;
pub mod dispatcher;
pub mod host;
pub mod hover;
pub mod registry;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_scene;
