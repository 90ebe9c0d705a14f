// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering-surface contract and the input events it emits.
//!
//! A [`RenderSurface`] is the scene the viewport drives: it stores drawable
//! objects, holds the world→screen transform and tracks which listeners are
//! subscribed to its events. Event delivery itself belongs to the embedding
//! application, which forwards each [`SurfaceEvent`] to the controllers; a
//! controller ignores event kinds it holds no live subscription for.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};
use peniko::Color;

use crate::geometry::{Corners, Geometry};

/// Handle to an object stored in a [`RenderSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Role of an object on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ObjectKind {
    /// The world background rectangle installed by the viewport.
    World,
    /// Any application object.
    #[default]
    Drawable,
}

/// A rectangular drawable object.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceObject {
    /// Role of the object.
    pub kind: ObjectKind,
    /// Placement, absent until the object has been measured.
    pub geometry: Option<Geometry>,
    /// Optional fill.
    pub fill: Option<Color>,
}

impl SurfaceObject {
    /// A drawable object with the given geometry and no fill.
    #[must_use]
    pub fn drawable(geometry: Geometry) -> Self {
        Self {
            kind: ObjectKind::Drawable,
            geometry: Some(geometry),
            fill: None,
        }
    }

    /// A drawable object that has not been measured yet.
    #[must_use]
    pub fn unmeasured() -> Self {
        Self {
            kind: ObjectKind::Drawable,
            geometry: None,
            fill: None,
        }
    }

    /// Returns a copy with the given fill.
    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Keyboard modifiers held during an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta / command key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt / option key.
    pub alt: bool,
    /// Space bar.
    pub space: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
        space: false,
    };

    /// Only Control held.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Only Space held.
    pub const SPACE: Self = Self {
        space: true,
        ..Self::NONE
    };
}

/// A wheel or trackpad scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Scroll delta in pixels.
    pub delta: Vec2,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// A pointer down / move / up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Movement since the previous pointer event.
    pub movement: Vec2,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A pointer event at `position` with no movement or modifiers.
    #[must_use]
    pub fn at(position: Point) -> Self {
        Self {
            position,
            movement: Vec2::ZERO,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Events a surface (or the document hosting it) emits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// Wheel over the surface.
    Wheel(WheelEvent),
    /// Pointer pressed.
    PointerDown(PointerEvent),
    /// Pointer moved.
    PointerMove(PointerEvent),
    /// Pointer released.
    PointerUp(PointerEvent),
    /// An object is being dragged.
    ObjectMoving {
        /// The dragged object.
        target: ObjectId,
        /// The pointer event driving the drag.
        pointer: PointerEvent,
    },
    /// An object finished a move, resize or scale.
    ObjectModified {
        /// The modified object.
        target: ObjectId,
    },
}

impl SurfaceEvent {
    /// The kind used for subscription matching.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Wheel(_) => EventKind::Wheel,
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::ObjectMoving { .. } => EventKind::ObjectMoving,
            Self::ObjectModified { .. } => EventKind::ObjectModified,
        }
    }
}

/// Discriminant of [`SurfaceEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`SurfaceEvent::Wheel`].
    Wheel,
    /// [`SurfaceEvent::PointerDown`].
    PointerDown,
    /// [`SurfaceEvent::PointerMove`].
    PointerMove,
    /// [`SurfaceEvent::PointerUp`].
    PointerUp,
    /// [`SurfaceEvent::ObjectMoving`].
    ObjectMoving,
    /// [`SurfaceEvent::ObjectModified`].
    ObjectModified,
}

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// Events that happen over the surface element.
    Surface,
    /// Events anywhere in the hosting document; used to keep drags alive when
    /// the pointer leaves the surface.
    Document,
}

/// Handle returned by [`RenderSurface::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The rendering surface a [`Viewport`](crate::Viewport) drives.
///
/// Implementors provide object storage, the viewport transform and listener
/// bookkeeping. Zoom and viewport-corner queries have default implementations
/// in terms of [`RenderSurface::viewport_transform`] and
/// [`RenderSurface::dimensions`].
pub trait RenderSurface {
    /// Current surface size in screen pixels.
    fn dimensions(&self) -> Size;

    /// Resizes the surface.
    fn set_dimensions(&mut self, size: Size);

    /// Adds an object and returns its handle.
    fn add_object(&mut self, object: SurfaceObject) -> ObjectId;

    /// Removes an object, returning it if it existed.
    fn remove_object(&mut self, id: ObjectId) -> Option<SurfaceObject>;

    /// Looks up an object.
    fn object(&self, id: ObjectId) -> Option<&SurfaceObject>;

    /// Looks up an object for mutation.
    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SurfaceObject>;

    /// Handles of all objects in paint order.
    fn object_ids(&self) -> Vec<ObjectId>;

    /// The world→screen transform, if the surface has one.
    fn viewport_transform(&self) -> Option<Affine>;

    /// Replaces the world→screen transform.
    fn set_viewport_transform(&mut self, transform: Affine);

    /// Schedules a repaint.
    fn request_render_all(&mut self);

    /// Registers a listener for `kind` events in `scope`.
    fn subscribe(&mut self, scope: ListenerScope, kind: EventKind) -> ListenerId;

    /// Removes a listener. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;

    /// Current zoom, read from the transform's horizontal scale.
    fn zoom(&self) -> f64 {
        self.viewport_transform().map_or(1.0, |t| t.as_coeffs()[0])
    }

    /// Sets the zoom, keeping the screen origin fixed.
    fn set_zoom(&mut self, zoom: f64) {
        self.zoom_to_point(Point::ZERO, zoom);
    }

    /// Sets the zoom so that the world point under `point` stays under `point`.
    fn zoom_to_point(&mut self, point: Point, zoom: f64) {
        let current = self.viewport_transform().unwrap_or(Affine::IDENTITY);
        let anchor = current.inverse() * point;
        let [_, b, c, _, _, _] = current.as_coeffs();
        let scaled = Affine::new([zoom, b, c, zoom, 0.0, 0.0]);
        let offset = point - scaled * anchor;
        self.set_viewport_transform(Affine::new([zoom, b, c, zoom, offset.x, offset.y]));
    }

    /// The four screen corners mapped into world coordinates.
    fn calc_viewport_boundaries(&self) -> Option<Corners> {
        let transform = self.viewport_transform()?;
        let size = self.dimensions();
        let screen = Corners {
            tl: Point::ZERO,
            tr: Point::new(size.width, 0.0),
            bl: Point::new(0.0, size.height),
            br: Point::new(size.width, size.height),
        };
        Some(screen.transformed(transform.inverse()))
    }

    /// Geometry of an object, if it exists and has been measured.
    fn geometry(&self, id: ObjectId) -> Option<Geometry> {
        self.object(id).and_then(|o| o.geometry)
    }
}

/// Lets a controller drive a surface it borrows rather than owns.
impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn dimensions(&self) -> Size {
        (**self).dimensions()
    }

    fn set_dimensions(&mut self, size: Size) {
        (**self).set_dimensions(size);
    }

    fn add_object(&mut self, object: SurfaceObject) -> ObjectId {
        (**self).add_object(object)
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SurfaceObject> {
        (**self).remove_object(id)
    }

    fn object(&self, id: ObjectId) -> Option<&SurfaceObject> {
        (**self).object(id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SurfaceObject> {
        (**self).object_mut(id)
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        (**self).object_ids()
    }

    fn viewport_transform(&self) -> Option<Affine> {
        (**self).viewport_transform()
    }

    fn set_viewport_transform(&mut self, transform: Affine) {
        (**self).set_viewport_transform(transform);
    }

    fn request_render_all(&mut self) {
        (**self).request_render_all();
    }

    fn subscribe(&mut self, scope: ListenerScope, kind: EventKind) -> ListenerId {
        (**self).subscribe(scope, kind)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        (**self).unsubscribe(id)
    }

    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn zoom_to_point(&mut self, point: Point, zoom: f64) {
        (**self).zoom_to_point(point, zoom);
    }

    fn calc_viewport_boundaries(&self) -> Option<Corners> {
        (**self).calc_viewport_boundaries()
    }
}

/// A set of live subscriptions owned by one controller.
///
/// Acquired in one call and released in one call; releasing twice is a no-op.
#[derive(Clone, Debug, Default)]
pub struct Listeners {
    active: Vec<(ListenerId, ListenerScope, EventKind)>,
}

impl Listeners {
    /// Subscribes every `(scope, kind)` pair on `surface`.
    pub fn acquire<S: RenderSurface + ?Sized>(
        surface: &mut S,
        wanted: &[(ListenerScope, EventKind)],
    ) -> Self {
        let active = wanted
            .iter()
            .map(|&(scope, kind)| (surface.subscribe(scope, kind), scope, kind))
            .collect();
        Self { active }
    }

    /// Unsubscribes everything. Safe to call repeatedly.
    pub fn release<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        for (id, _, _) in self.active.drain(..) {
            surface.unsubscribe(id);
        }
    }

    /// Returns `true` if a live subscription exists for `kind`.
    #[must_use]
    pub fn handles(&self, kind: EventKind) -> bool {
        self.active.iter().any(|&(_, _, k)| k == kind)
    }

    /// Returns `true` if any subscription is live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if no subscription is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
