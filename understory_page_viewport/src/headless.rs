// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`RenderSurface`] with no rendering backend.

use alloc::vec::Vec;

use kurbo::{Affine, Size};

use crate::surface::{EventKind, ListenerId, ListenerScope, ObjectId, RenderSurface, SurfaceObject};

/// A surface that stores objects and transform state without drawing anything.
///
/// Useful for tests, for server-side layout, and as a reference for
/// implementing [`RenderSurface`] over a real canvas.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    size: Size,
    transform: Option<Affine>,
    objects: Vec<(ObjectId, SurfaceObject)>,
    listeners: Vec<(ListenerId, ListenerScope, EventKind)>,
    next_object: u64,
    next_listener: u64,
    render_requests: u64,
}

impl HeadlessSurface {
    /// A surface of the given size with an identity transform.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Some(Affine::IDENTITY),
            objects: Vec::new(),
            listeners: Vec::new(),
            next_object: 0,
            next_listener: 0,
            render_requests: 0,
        }
    }

    /// A surface that reports no viewport transform until one is set.
    #[must_use]
    pub fn without_transform(size: Size) -> Self {
        Self {
            transform: None,
            ..Self::new(size)
        }
    }

    /// Number of repaints requested so far.
    #[must_use]
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    /// Number of live listeners in `scope`.
    #[must_use]
    pub fn listener_count(&self, scope: ListenerScope) -> usize {
        self.listeners.iter().filter(|(_, s, _)| *s == scope).count()
    }

    /// Returns `true` if a listener for `kind` is registered in `scope`.
    #[must_use]
    pub fn has_listener(&self, scope: ListenerScope, kind: EventKind) -> bool {
        self.listeners
            .iter()
            .any(|&(_, s, k)| s == scope && k == kind)
    }
}

impl RenderSurface for HeadlessSurface {
    fn dimensions(&self) -> Size {
        self.size
    }

    fn set_dimensions(&mut self, size: Size) {
        self.size = size;
    }

    fn add_object(&mut self, object: SurfaceObject) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push((id, object));
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SurfaceObject> {
        let idx = self.objects.iter().position(|(oid, _)| *oid == id)?;
        Some(self.objects.remove(idx).1)
    }

    fn object(&self, id: ObjectId) -> Option<&SurfaceObject> {
        self.objects
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, o)| o)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SurfaceObject> {
        self.objects
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, o)| o)
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|(id, _)| *id).collect()
    }

    fn viewport_transform(&self) -> Option<Affine> {
        self.transform
    }

    fn set_viewport_transform(&mut self, transform: Affine) {
        self.transform = Some(transform);
    }

    fn request_render_all(&mut self) {
        self.render_requests += 1;
    }

    fn subscribe(&mut self, scope: ListenerScope, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, scope, kind));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Affine, Point, Rect, Size};

    use super::HeadlessSurface;
    use crate::geometry::Geometry;
    use crate::surface::{EventKind, ListenerScope, RenderSurface, SurfaceObject};

    #[test]
    fn objects_roundtrip_in_paint_order() {
        let mut s = HeadlessSurface::new(Size::new(100.0, 100.0));
        let a = s.add_object(SurfaceObject::drawable(Geometry::new(0.0, 0.0, 1.0, 1.0)));
        let b = s.add_object(SurfaceObject::unmeasured());
        assert_eq!(s.object_ids(), vec![a, b]);
        assert!(s.geometry(b).is_none());
        assert!(s.remove_object(a).is_some());
        assert!(s.remove_object(a).is_none());
        assert_eq!(s.object_ids(), vec![b]);
    }

    #[test]
    fn zoom_to_point_keeps_anchor() {
        let mut s = HeadlessSurface::new(Size::new(800.0, 600.0));
        s.set_viewport_transform(Affine::new([1.0, 0.0, 0.0, 1.0, -40.0, 25.0]));
        let anchor = Point::new(300.0, 200.0);
        let world_before = s.viewport_transform().unwrap().inverse() * anchor;
        s.zoom_to_point(anchor, 2.5);
        let t = s.viewport_transform().unwrap();
        assert_eq!(s.zoom(), 2.5);
        let screen_after = t * world_before;
        assert!((screen_after - anchor).hypot() < 1e-9);
    }

    #[test]
    fn set_zoom_anchors_screen_origin() {
        let mut s = HeadlessSurface::new(Size::new(800.0, 600.0));
        s.set_viewport_transform(Affine::new([1.0, 0.0, 0.0, 1.0, 10.0, 20.0]));
        s.set_zoom(2.0);
        assert_eq!(
            s.viewport_transform().unwrap().as_coeffs(),
            [2.0, 0.0, 0.0, 2.0, 20.0, 40.0]
        );
    }

    #[test]
    fn viewport_boundaries_in_world_space() {
        let mut s = HeadlessSurface::new(Size::new(800.0, 600.0));
        s.set_viewport_transform(Affine::new([2.0, 0.0, 0.0, 2.0, -100.0, -50.0]));
        let corners = s.calc_viewport_boundaries().unwrap();
        let view = corners.view_rect();
        assert_eq!(view, Rect::new(50.0, 25.0, 450.0, 325.0));
        let bare = HeadlessSurface::without_transform(Size::new(1.0, 1.0));
        assert!(bare.calc_viewport_boundaries().is_none());
    }

    #[test]
    fn listeners_subscribe_and_unsubscribe() {
        let mut s = HeadlessSurface::new(Size::new(10.0, 10.0));
        let id = s.subscribe(ListenerScope::Document, EventKind::PointerUp);
        assert!(s.has_listener(ListenerScope::Document, EventKind::PointerUp));
        assert_eq!(s.listener_count(ListenerScope::Surface), 0);
        assert!(s.unsubscribe(id));
        assert!(!s.unsubscribe(id));
        assert_eq!(s.listener_count(ListenerScope::Document), 0);
    }
}
