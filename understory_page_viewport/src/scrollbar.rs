// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual scrollbar state derived from the view and page-area rectangles.
//!
//! [`ScrollbarSync`] never owns the view: it is told the visible world
//! rectangle and the padded page-area rectangle after every committed
//! transform and derives thumb geometry from them. Thumb drags run the other
//! way, turning track pixels into world-space pan deltas that the viewport
//! applies.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::drag::DragContext;

/// Scrollbar axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    /// The horizontal scrollbar, below the surface.
    Horizontal,
    /// The vertical scrollbar, beside the surface.
    Vertical,
}

/// Display state of one scrollbar thumb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbState {
    /// Whether the scrollbar is shown. Hidden when the view spans the whole page area.
    pub visible: bool,
    /// Thumb length as a whole percentage of the track, in `[0, 100]`.
    pub size_percent: f64,
    /// Thumb offset along the track in whole pixels.
    pub offset_px: f64,
}

impl Default for ThumbState {
    fn default() -> Self {
        Self {
            visible: false,
            size_percent: 100.0,
            offset_px: 0.0,
        }
    }
}

/// Both thumbs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollbarState {
    /// Horizontal thumb.
    pub horizontal: ThumbState,
    /// Vertical thumb.
    pub vertical: ThumbState,
}

/// Keeps scrollbar thumbs in step with the view and converts thumb drags into pans.
#[derive(Clone, Debug)]
pub struct ScrollbarSync {
    track: Size,
    state: ScrollbarState,
    page_area: Option<Rect>,
    horizontal_drag: DragContext,
    vertical_drag: DragContext,
}

impl ScrollbarSync {
    /// Creates scrollbars whose tracks are `track.width` (horizontal) and
    /// `track.height` (vertical) pixels long.
    #[must_use]
    pub fn new(track: Size) -> Self {
        Self {
            track,
            state: ScrollbarState::default(),
            page_area: None,
            horizontal_drag: DragContext::Idle,
            vertical_drag: DragContext::Idle,
        }
    }

    /// Track lengths in pixels.
    #[must_use]
    pub fn track(&self) -> Size {
        self.track
    }

    /// Sets the track lengths. Takes effect on the next recalculation.
    pub fn set_track(&mut self, track: Size) {
        self.track = track;
    }

    /// Current thumb state.
    #[must_use]
    pub fn state(&self) -> ScrollbarState {
        self.state
    }

    /// Recomputes thumb geometry.
    ///
    /// `view` is the visible world rectangle and `page_area` the padded page
    /// area. Thumb offsets are always updated; visibility and size only when
    /// `force_resize` is set. A degenerate page area leaves the thumbs alone
    /// and disables thumb dragging until a usable one arrives.
    pub fn recalculate(&mut self, view: Rect, page_area: Rect, force_resize: bool) {
        if !(page_area.width() > 0.0 && page_area.height() > 0.0) {
            self.page_area = None;
            return;
        }
        self.page_area = Some(page_area);

        let head_room_pct = (view.y0 - page_area.y0) / page_area.height();
        let viewport_vertical_pct = view.height() / page_area.height();
        let left_room_pct = (view.x0 - page_area.x0) / page_area.width();
        let viewport_horizontal_pct = view.width() / page_area.width();

        if force_resize {
            resize_thumb(&mut self.state.vertical, viewport_vertical_pct);
            resize_thumb(&mut self.state.horizontal, viewport_horizontal_pct);
        }

        self.state.vertical.offset_px = (head_room_pct * self.track.height).round();
        self.state.horizontal.offset_px = (left_room_pct * self.track.width).round();
    }

    /// Starts a thumb drag on `axis` with the pointer at `pointer`.
    pub fn begin_drag(&mut self, axis: ScrollAxis, pointer: Point) {
        match axis {
            ScrollAxis::Horizontal => self.horizontal_drag.start(pointer),
            ScrollAxis::Vertical => self.vertical_drag.start(pointer),
        }
    }

    /// Feeds a pointer move and returns the world-space pan it calls for.
    ///
    /// Moving the pointer by `p` pixels along a track of length `L` moves the
    /// view by `p / L` of the page area's extent on that axis. The returned
    /// delta is expressed as a translation change: dragging a thumb toward the
    /// end of its track yields a negative value. Returns `None` when no thumb
    /// is being dragged.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Vec2> {
        let page_area = self.page_area?;
        let mut delta = Vec2::ZERO;
        let mut dragged = false;

        if let Some(moved) = self.horizontal_drag.update(pointer) {
            dragged = true;
            if self.track.width > 0.0 {
                delta.x = -moved.x * page_area.width() / self.track.width;
            }
        }
        if let Some(moved) = self.vertical_drag.update(pointer) {
            dragged = true;
            if self.track.height > 0.0 {
                delta.y = -moved.y * page_area.height() / self.track.height;
            }
        }

        dragged.then_some(delta)
    }

    /// Ends both thumb drags. Safe to call when nothing is being dragged.
    pub fn end_drags(&mut self) {
        self.horizontal_drag.end();
        self.vertical_drag.end();
    }

    /// Returns `true` while either thumb is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.horizontal_drag.is_dragging() || self.vertical_drag.is_dragging()
    }
}

fn resize_thumb(thumb: &mut ThumbState, viewport_pct: f64) {
    thumb.visible = viewport_pct < 1.0;
    thumb.size_percent = (viewport_pct * 100.0).round().clamp(0.0, 100.0);
}
