// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keep dragged objects inside a container object.
//!
//! [`BoundsConstrainedDragger`] listens for object move and modify events on a
//! surface and clamps the affected object's origin so that its scaled extent
//! stays within the container's bounds. It is independent of the
//! [`Viewport`](crate::Viewport) and only shares the surface it is bound to.
//!
//! ```
//! use kurbo::{Point, Size};
//! use understory_page_viewport::{
//!     BoundsConstrainedDragger, Geometry, HeadlessSurface, RenderSurface, SurfaceEvent,
//!     SurfaceObject,
//! };
//!
//! let mut surface = HeadlessSurface::new(Size::new(800.0, 600.0));
//! let page = surface.add_object(SurfaceObject::drawable(Geometry::new(0.0, 0.0, 400.0, 300.0)));
//! let item = surface.add_object(SurfaceObject::drawable(Geometry::new(380.0, 10.0, 50.0, 50.0)));
//!
//! let mut dragger = BoundsConstrainedDragger::new(&mut surface);
//! dragger.constrain(page);
//! dragger.handle_event(&mut surface, &SurfaceEvent::ObjectModified { target: item });
//! assert_eq!(surface.geometry(item).unwrap().origin(), Point::new(350.0, 10.0));
//!
//! dragger.destroy(&mut surface);
//! ```

use kurbo::Vec2;

use crate::geometry::clamp_within;
use crate::surface::{EventKind, ListenerScope, Listeners, ObjectId, RenderSurface, SurfaceEvent};

/// Clamps object drags to a container's bounds.
#[derive(Clone, Debug, Default)]
pub struct BoundsConstrainedDragger {
    container: Option<ObjectId>,
    enabled: bool,
    listeners: Listeners,
}

impl BoundsConstrainedDragger {
    /// Binds to `surface`, subscribing to object move and modify events.
    ///
    /// The dragger starts without a container and therefore clamps nothing.
    pub fn new<S: RenderSurface + ?Sized>(surface: &mut S) -> Self {
        let listeners = Listeners::acquire(
            surface,
            &[
                (ListenerScope::Surface, EventKind::ObjectMoving),
                (ListenerScope::Surface, EventKind::ObjectModified),
            ],
        );
        Self {
            container: None,
            enabled: false,
            listeners,
        }
    }

    /// Constrains all object drags to `container` and enables clamping.
    pub fn constrain(&mut self, container: ObjectId) {
        self.container = Some(container);
        self.enabled = true;
    }

    /// Forgets the container and disables clamping.
    pub fn clear(&mut self) {
        self.container = None;
        self.enabled = false;
    }

    /// Re-enables clamping against the current container.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Suspends clamping without forgetting the container.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether clamping is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current container, if any.
    #[must_use]
    pub fn container(&self) -> Option<ObjectId> {
        self.container
    }

    /// Whether the dragger still holds its surface subscriptions.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.listeners.is_active()
    }

    /// Handles an event from the bound surface.
    ///
    /// Returns `true` if an object was clamped. Events are ignored after
    /// [`destroy`](Self::destroy), while disabled, without a container, or
    /// when either object lacks geometry.
    pub fn handle_event<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        event: &SurfaceEvent,
    ) -> bool {
        if !self.listeners.handles(event.kind()) {
            return false;
        }
        let Some(container) = self.container.filter(|_| self.enabled) else {
            return false;
        };
        match *event {
            SurfaceEvent::ObjectMoving { target, pointer } => {
                clamp_object(surface, target, container, Some(pointer.movement))
            }
            SurfaceEvent::ObjectModified { target } => {
                clamp_object(surface, target, container, None)
            }
            _ => false,
        }
    }

    /// Unsubscribes from the surface. Safe to call more than once.
    pub fn destroy<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        self.listeners.release(surface);
    }
}

fn clamp_object<S: RenderSurface + ?Sized>(
    surface: &mut S,
    target: ObjectId,
    container: ObjectId,
    movement: Option<Vec2>,
) -> bool {
    if target == container {
        return false;
    }
    let Some(container_geometry) = surface.geometry(container) else {
        log::trace!("constraint container {container:?} has no geometry");
        return false;
    };
    let bounds = container_geometry.corners().bounding_rect();
    let object = surface.object_mut(target);
    let Some(geometry) = object.and_then(|o| o.geometry.as_mut()) else {
        log::trace!("constrained object {target:?} has no geometry");
        return false;
    };
    let candidate = movement.map(|m| geometry.origin() + m);
    let clamped = clamp_within(geometry, bounds, candidate);
    geometry.set_origin(clamped);
    true
}
