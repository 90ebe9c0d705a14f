// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Page Viewport: clamped pan/zoom over a pluggable rendering surface.
//!
//! This crate drives the world→screen transform of a 2D canvas editor where
//! the content lives on a bounded "page". It focuses on:
//! - Panning and zooming that can never scroll the page area fully out of view.
//! - Fitting and centering the world, and resizing it around a target object.
//! - Virtual scrollbars whose thumbs mirror the visible part of the page area.
//! - Keeping dragged objects inside a container object.
//!
//! It does **not** render anything. Callers are expected to:
//! - Implement [`RenderSurface`] over their scene or canvas, or use
//!   [`HeadlessSurface`] where nothing needs drawing.
//! - Forward wheel and pointer events as [`SurfaceEvent`]s to
//!   [`Viewport::handle_event`] and [`BoundsConstrainedDragger::handle_event`].
//! - Draw the scrollbars from [`Viewport::scrollbars`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_page_viewport::{HeadlessSurface, Viewport, ViewportOptions};
//!
//! let options = ViewportOptions::new(Size::new(800.0, 600.0), Size::new(4000.0, 3000.0));
//! let mut viewport = Viewport::new(options).unwrap();
//! viewport.install(HeadlessSurface::new(Size::new(800.0, 600.0))).unwrap();
//!
//! // Show the whole world, then try to pan far past its left edge.
//! viewport.fit_to_world();
//! viewport.translate(10_000.0, 0.0);
//!
//! let [_, _, _, _, tx, _] = viewport.viewport_transform().unwrap().as_coeffs();
//! let bounds = viewport.calculate_page_area_min_maxes(None).unwrap();
//! assert!(tx <= bounds.left + 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - Zoom is uniform and read from the transform's horizontal scale.
//! - Every pan and zoom commits through [`Viewport::set_transform`], which
//!   clamps the translation against [`page_area_min_maxes`].
//! - On an axis where the page area fits on screen, the translation is pinned
//!   to the position that centers the world.
//! - Missing surfaces, transforms or geometry make operations silent no-ops;
//!   only construction and [`Viewport::viewport_transform`] report errors.
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or the `libm` feature for floating-point math.

#![no_std]

extern crate alloc;

mod constrain;
mod drag;
mod error;
mod geometry;
mod headless;
mod options;
mod scrollbar;
mod surface;
mod viewport;

pub use constrain::BoundsConstrainedDragger;
pub use drag::DragContext;
pub use error::{Result, ViewportError};
pub use geometry::{
    Corners, Geometry, TranslateBounds, centered_translation, clamp_range, clamp_within,
    fit_scale, pad_rect, page_area_min_maxes, world_size_to_fit,
};
pub use headless::HeadlessSurface;
pub use options::ViewportOptions;
pub use scrollbar::{ScrollAxis, ScrollbarState, ScrollbarSync, ThumbState};
pub use surface::{
    EventKind, ListenerId, ListenerScope, Listeners, Modifiers, ObjectId, ObjectKind,
    PointerEvent, RenderSurface, SurfaceEvent, SurfaceObject, WheelEvent,
};
pub use viewport::{CenterOptions, Viewport};
