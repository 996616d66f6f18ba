// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher configuration and its validation errors.

use kurbo::Vec2;
use thiserror::Error;

use crate::types::{DragOffsets, PointerButtons};

/// Which source-bearing hits a press tries to pick up.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickMode {
    /// Only the nearest hit that has a source role.
    #[default]
    Topmost,
    /// Every hit that has a source role, nearest first.
    All,
}

/// Which drags a dispatcher feeds its hover, motion, and release events to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingScope {
    /// Only the drags this dispatcher's cursor started.
    #[default]
    Cursor,
    /// Every drag in the registry, regardless of cursor.
    Global,
}

/// Configuration for a [`CursorDispatcher`](crate::dispatcher::CursorDispatcher).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragConfig<K> {
    /// Entity whose hit point drives motion. Required.
    pub drag_plane: Option<K>,
    /// Offset from the plane intersection at which a self-dragging object is placed.
    pub object_offset: Vec2,
    /// Offset from the plane intersection at which the visual proxy is placed.
    pub proxy_offset: Vec2,
    /// Buttons that start and end a drag. Must not be empty.
    pub buttons: PointerButtons,
    /// Which hits a press picks up.
    pub pick: PickMode,
    /// Which drags hover, motion, and release apply to.
    pub scope: TrackingScope,
}

impl<K> Default for DragConfig<K> {
    fn default() -> Self {
        Self {
            drag_plane: None,
            object_offset: Vec2::ZERO,
            proxy_offset: Vec2::ZERO,
            buttons: PointerButtons::PRIMARY,
            pick: PickMode::Topmost,
            scope: TrackingScope::Cursor,
        }
    }
}

impl<K: Copy> DragConfig<K> {
    /// Default configuration dragging over `drag_plane`.
    pub fn new(drag_plane: K) -> Self {
        Self {
            drag_plane: Some(drag_plane),
            ..Self::default()
        }
    }

    /// Offsets as consumed by the registry's move path.
    pub fn offsets(&self) -> DragOffsets {
        DragOffsets {
            object: self.object_offset,
            proxy: self.proxy_offset,
        }
    }

    /// Check the configuration and return the drag plane.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingDragPlane`] when no plane is set, and
    /// [`ConfigError::NoButtons`] when the button set is empty.
    pub fn validate(&self) -> Result<K, ConfigError> {
        let plane = self.drag_plane.ok_or(ConfigError::MissingDragPlane)?;
        if self.buttons.is_empty() {
            return Err(ConfigError::NoButtons);
        }
        Ok(plane)
    }
}

/// A configuration the engine refuses to start with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum ConfigError {
    /// No drag-plane entity configured.
    #[error("drag configuration has no drag plane")]
    MissingDragPlane,
    /// No button accepted for dragging.
    #[error("drag configuration accepts no buttons")]
    NoButtons,
}
