// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture drag state: compute movement deltas from successive pointer positions.
//!
//! ## Usage
//!
//! 1) Begin a gesture with [`DragContext::start`] at the initial pointer position.
//! 2) On each move, call [`DragContext::update`] to get the delta since the last update.
//! 3) End the gesture with [`DragContext::end`]; ending an idle context is a no-op.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_page_viewport::DragContext;
//!
//! let mut drag = DragContext::default();
//! drag.start(Point::new(10.0, 20.0));
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! drag.end();
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// State of one drag gesture, owned by the controller that started it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragContext {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress.
    Dragging {
        /// Pointer position when the gesture began.
        start: Point,
        /// Pointer position at the last update.
        last: Point,
    },
}

impl DragContext {
    /// Begins a gesture at `pos`, replacing any gesture in progress.
    pub fn start(&mut self, pos: Point) {
        *self = Self::Dragging {
            start: pos,
            last: pos,
        };
    }

    /// Records a new pointer position and returns the movement since the last one.
    ///
    /// Returns `None` when idle.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        match self {
            Self::Idle => None,
            Self::Dragging { last, .. } => {
                let delta = pos - *last;
                *last = pos;
                Some(delta)
            }
        }
    }

    /// Offset from the gesture's start position to `pos`.
    #[must_use]
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        match self {
            Self::Idle => None,
            Self::Dragging { start, .. } => Some(pos - *start),
        }
    }

    /// Ends the gesture.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    /// Returns `true` while a gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_context_ignores_updates() {
        let mut drag = DragContext::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.update(Point::new(1.0, 1.0)), None);
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn updates_report_incremental_deltas() {
        let mut drag = DragContext::default();
        drag.start(Point::ZERO);
        assert_eq!(drag.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(
            drag.total_offset(Point::new(8.0, 7.0)),
            Some(Vec2::new(8.0, 7.0))
        );
    }

    #[test]
    fn restart_replaces_previous_gesture() {
        let mut drag = DragContext::default();
        drag.start(Point::ZERO);
        drag.update(Point::new(10.0, 10.0));
        drag.start(Point::new(50.0, 60.0));
        assert_eq!(
            drag,
            DragContext::Dragging {
                start: Point::new(50.0, 60.0),
                last: Point::new(50.0, 60.0),
            }
        );
    }

    #[test]
    fn end_is_idempotent() {
        let mut drag = DragContext::default();
        drag.end();
        drag.start(Point::new(1.0, 2.0));
        drag.end();
        drag.end();
        assert_eq!(drag, DragContext::Idle);
    }
}
