// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;

use crate::drag::DragContext;
use crate::error::{Result, ViewportError};
use crate::geometry::{
    Geometry, TranslateBounds, centered_translation, clamp_range, fit_scale, pad_rect,
    page_area_min_maxes, world_size_to_fit,
};
use crate::options::ViewportOptions;
use crate::scrollbar::{ScrollAxis, ScrollbarState, ScrollbarSync};
use crate::surface::{
    EventKind, ListenerScope, Listeners, ObjectId, ObjectKind, PointerEvent, RenderSurface,
    SurfaceEvent, SurfaceObject, WheelEvent,
};

/// Which axes [`Viewport::center_to_world`] centers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CenterOptions {
    /// Center horizontally; otherwise the horizontal translation is reset to zero.
    pub horizontal: bool,
    /// Center vertically; otherwise the vertical translation is reset to zero.
    pub vertical: bool,
}

impl Default for CenterOptions {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
        }
    }
}

/// Pan/zoom controller over a [`RenderSurface`], clamped to a page area.
///
/// The viewport owns its surface once installed. Every pan and zoom path
/// funnels through [`Viewport::set_transform`], which clamps the translation
/// so that the page area (by default the whole world) can never be scrolled
/// fully out of view, commits the transform and resynchronizes the virtual
/// scrollbars.
///
/// Operations on a viewport without a surface, or whose page area has no
/// measurable geometry, are silent no-ops.
#[derive(Debug)]
pub struct Viewport<S: RenderSurface> {
    surface: Option<S>,
    screen: Size,
    world: Size,
    world_background: Color,
    world_object: Option<ObjectId>,
    page_area: Option<ObjectId>,
    padding: Vec2,
    min_zoom: f64,
    max_zoom: f64,
    dynamic_zoom: Option<(f64, f64)>,
    scroll_factor: f64,
    zoom_factor: f64,
    pan_while_space: bool,
    pan_drag: DragContext,
    scrollbars: Option<ScrollbarSync>,
    listeners: Listeners,
}

impl<S: RenderSurface> Viewport<S> {
    /// Creates an uninstalled viewport.
    ///
    /// Returns [`ViewportError::InvalidOptions`] if `options` fail validation.
    pub fn new(options: ViewportOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            surface: None,
            screen: options.screen,
            world: options.world,
            world_background: options.world_background,
            world_object: None,
            page_area: None,
            padding: options.page_area_padding,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            dynamic_zoom: options.dynamic_min_max_zoom,
            scroll_factor: options.scroll_factor,
            zoom_factor: options.zoom_factor,
            pan_while_space: options.panning_enabled_while_holding_space,
            pan_drag: DragContext::Idle,
            scrollbars: options
                .scrollbars
                .then(|| ScrollbarSync::new(options.scrollbar_track)),
            listeners: Listeners::default(),
        })
    }

    /// Installs the viewport on `surface`.
    ///
    /// Sizes the surface to the screen, adds the world background object,
    /// makes it the page-area target, subscribes to wheel and pointer events
    /// and lays out the scrollbars. If a surface is already installed, logs a
    /// warning and hands `surface` back untouched.
    pub fn install(&mut self, mut surface: S) -> core::result::Result<(), S> {
        if self.surface.is_some() {
            log::warn!("viewport is already installed on a rendering surface");
            return Err(surface);
        }

        surface.set_dimensions(self.screen);
        let world = SurfaceObject {
            kind: ObjectKind::World,
            geometry: Some(Geometry::from_rect(Rect::from_origin_size(
                Point::ZERO,
                self.world,
            ))),
            fill: Some(self.world_background),
        };
        let world_id = surface.add_object(world);

        let mut wanted = vec![
            (ListenerScope::Surface, EventKind::Wheel),
            (ListenerScope::Document, EventKind::PointerMove),
            (ListenerScope::Document, EventKind::PointerUp),
        ];
        if self.pan_while_space {
            wanted.push((ListenerScope::Surface, EventKind::PointerDown));
        }
        self.listeners = Listeners::acquire(&mut surface, &wanted);

        self.world_object = Some(world_id);
        self.page_area = Some(world_id);
        self.surface = Some(surface);
        log::debug!(
            "viewport installed: screen {:?}, world {:?}",
            self.screen,
            self.world
        );
        self.recalculate_scrollbars(true);
        Ok(())
    }

    /// Detaches from the surface and returns it.
    ///
    /// Releases every listener, removes the world background object and ends
    /// any gesture in progress. Returns `None` if nothing was installed.
    pub fn uninstall(&mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        self.listeners.release(&mut surface);
        if let Some(world) = self.world_object.take() {
            surface.remove_object(world);
        }
        self.page_area = None;
        self.pan_drag.end();
        if let Some(scrollbars) = self.scrollbars.as_mut() {
            scrollbars.end_drags();
        }
        log::debug!("viewport uninstalled");
        Some(surface)
    }

    /// Whether a surface is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.surface.is_some()
    }

    /// The installed surface.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// The installed surface, mutably.
    ///
    /// Changes made directly to the transform bypass clamping; follow them with
    /// `translate(0.0, 0.0)` to re-clamp.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Screen size in pixels.
    #[must_use]
    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// World size in world units.
    #[must_use]
    pub fn world_size(&self) -> Size {
        self.world
    }

    /// The world background object, once installed.
    #[must_use]
    pub fn world_object(&self) -> Option<ObjectId> {
        self.world_object
    }

    /// The object panning is clamped against.
    #[must_use]
    pub fn page_area_target(&self) -> Option<ObjectId> {
        self.page_area
    }

    /// Padding around the page area.
    #[must_use]
    pub fn page_area_padding(&self) -> Vec2 {
        self.padding
    }

    /// Current `(min_zoom, max_zoom)`.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets static zoom limits, normalized so that `min <= max`, and re-clamps
    /// the current zoom.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        if let Some(zoom) = self.zoom() {
            self.set_zoom(zoom);
        }
    }

    /// Current zoom, if installed.
    #[must_use]
    pub fn zoom(&self) -> Option<f64> {
        self.surface.as_ref().map(|s| s.zoom())
    }

    /// The committed world→screen transform.
    ///
    /// Fails with [`ViewportError::NotInstalled`] before installation and with
    /// [`ViewportError::MissingTransform`] if the surface has no transform.
    pub fn viewport_transform(&self) -> Result<Affine> {
        let surface = self.surface.as_ref().ok_or(ViewportError::NotInstalled)?;
        surface
            .viewport_transform()
            .ok_or(ViewportError::MissingTransform)
    }

    /// The padded page-area rectangle in world coordinates.
    ///
    /// `None` without a surface, without a page-area target, or when the
    /// target has no measurable geometry.
    #[must_use]
    pub fn page_area_bounds(&self) -> Option<Rect> {
        let surface = self.surface.as_ref()?;
        let geometry = surface.geometry(self.page_area?)?;
        if !geometry.is_measurable() {
            return None;
        }
        Some(pad_rect(geometry.bounding_rect(), self.padding))
    }

    /// Translation bounds for the page area at `zoom`, or at the current zoom.
    ///
    /// These are not the page area's bounds in world or screen space but the
    /// range the translation must stay in so the view cannot leave the page
    /// area. See [`page_area_min_maxes`](crate::geometry::page_area_min_maxes).
    #[must_use]
    pub fn calculate_page_area_min_maxes(&self, zoom: Option<f64>) -> Option<TranslateBounds> {
        let current = self.zoom()?;
        let page_area = self.page_area_bounds()?;
        Some(page_area_min_maxes(
            page_area,
            self.screen,
            self.world,
            zoom.unwrap_or(current),
        ))
    }

    /// Pans by `(delta_x, delta_y)` screen pixels, then clamps and commits.
    pub fn translate(&mut self, delta_x: f64, delta_y: f64) {
        let Ok(current) = self.viewport_transform() else {
            return;
        };
        let [a, b, c, d, tx, ty] = current.as_coeffs();
        self.set_transform(Affine::new([a, b, c, d, tx + delta_x, ty + delta_y]));
    }

    /// Commits `transform` with its translation clamped to the page-area bounds.
    ///
    /// Bounds are computed at the transform's own scale, which is the current
    /// zoom on every pan and zoom path. Does nothing if the bounds cannot be
    /// computed.
    pub fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, tx, ty] = transform.as_coeffs();
        let Some(bounds) = self.calculate_page_area_min_maxes(Some(a)) else {
            log::trace!("set_transform skipped: page area bounds unavailable");
            return;
        };
        let clamped = bounds.clamp(Vec2::new(tx, ty));
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.set_viewport_transform(Affine::new([a, b, c, d, clamped.x, clamped.y]));
        surface.request_render_all();
        self.recalculate_scrollbars(false);
    }

    /// Zooms to `zoom`, clamped to the zoom limits, keeping `point` fixed on screen.
    ///
    /// The translation is re-clamped afterwards, so the anchor only stays put
    /// when the clamped view allows it.
    pub fn zoom_to_point(&mut self, zoom: f64, point: Point) {
        let next = clamp_range(zoom, self.min_zoom, self.max_zoom);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.zoom_to_point(point, next);
        if let Ok(transform) = self.viewport_transform() {
            self.set_transform(transform);
        }
        self.recalculate_scrollbars(true);
    }

    /// Sets the zoom, clamped to the zoom limits, anchored at the screen origin.
    pub fn set_zoom(&mut self, zoom: f64) {
        let next = clamp_range(zoom, self.min_zoom, self.max_zoom);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.set_zoom(next);
        self.translate(0.0, 0.0);
        self.recalculate_scrollbars(true);
    }

    /// Zooms and centers so the whole world is visible.
    ///
    /// This establishes a fresh baseline view and bypasses both zoom limits and
    /// page-area clamping.
    pub fn fit_to_world(&mut self) {
        let zoom = fit_scale(self.screen, self.world);
        let t = centered_translation(self.screen, self.world, zoom);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.set_viewport_transform(Affine::new([zoom, 0.0, 0.0, zoom, t.x, t.y]));
        self.request_render_all();
    }

    /// Centers the world on the selected axes at the current zoom.
    ///
    /// An axis that is not selected has its translation reset to zero.
    pub fn center_to_world(&mut self, options: CenterOptions) {
        let Some(zoom) = self.zoom() else {
            return;
        };
        let centered = centered_translation(self.screen, self.world, zoom);
        let tx = if options.horizontal { centered.x } else { 0.0 };
        let ty = if options.vertical { centered.y } else { 0.0 };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.set_viewport_transform(Affine::new([zoom, 0.0, 0.0, zoom, tx, ty]));
        self.request_render_all();
    }

    /// Resizes the world to the screen's aspect ratio around `target` plus `padding`.
    ///
    /// `target` is moved to the center of the new world and every other
    /// object moves by the same offset, preserving their placement relative to
    /// `target`. The world background object is resized, not moved.
    pub fn resize_world_to_fit(&mut self, target: ObjectId, padding: Vec2) {
        let Some(world_id) = self.world_object else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(geometry) = surface.geometry(target).filter(Geometry::is_measurable) else {
            log::trace!("resize_world_to_fit skipped: {target:?} has no geometry");
            return;
        };

        let target_bounds = geometry.bounding_rect();
        let world = world_size_to_fit(pad_rect(target_bounds, padding).size(), self.screen);
        if let Some(obj) = surface.object_mut(world_id) {
            obj.geometry = Some(Geometry::new(0.0, 0.0, world.width, world.height));
        }

        let centered_origin = Point::new(
            (world.width - target_bounds.width()) / 2.0,
            (world.height - target_bounds.height()) / 2.0,
        );
        let offset = target_bounds.origin() - centered_origin;

        // One pass moves the target and everything else by the same offset.
        for id in surface.object_ids() {
            if id == world_id {
                continue;
            }
            let Some(obj) = surface.object_mut(id) else {
                continue;
            };
            if obj.kind == ObjectKind::World {
                continue;
            }
            if let Some(g) = obj.geometry.as_mut() {
                g.left -= offset.x;
                g.top -= offset.y;
            }
        }

        self.world = world;
        log::debug!("world resized to {world:?} around {target:?}");
        self.recalculate_scrollbars(true);
    }

    /// Replaces the page-area target.
    ///
    /// Recomputes dynamic zoom limits if configured and pulls the current zoom
    /// back inside them. Then re-clamps the translation against the new bounds
    /// and fully resyncs the scrollbars.
    pub fn set_page_area_target(&mut self, target: ObjectId) {
        self.page_area = Some(target);
        log::debug!("page area target set to {target:?}");
        self.update_zoom_min_max();
        if let Some(zoom) = self.zoom()
            && clamp_range(zoom, self.min_zoom, self.max_zoom) != zoom
        {
            self.set_zoom(zoom);
        }
        self.translate(0.0, 0.0);
        self.request_render_all();
    }

    /// Replaces the page-area padding and re-clamps.
    pub fn set_page_area_padding(&mut self, padding: Vec2) {
        self.padding = padding;
        self.translate(0.0, 0.0);
        self.request_render_all();
    }

    /// Whether the dominant screen axis fully contains `object` along that axis.
    ///
    /// The dominant axis is whichever of the visible world width or height is
    /// larger. Returns `false` if the object or the view cannot be measured.
    #[must_use]
    pub fn is_fully_contained(&self, object: ObjectId) -> bool {
        let Some(bounds) = self
            .surface
            .as_ref()
            .and_then(|s| s.geometry(object))
            .map(|g| g.bounding_rect())
        else {
            return false;
        };
        let Some(view) = self.calc_viewport_boundaries() else {
            return false;
        };
        if view.width() > view.height() {
            bounds.x0 >= view.x0 && bounds.x1 <= view.x1
        } else {
            bounds.y0 >= view.y0 && bounds.y1 <= view.y1
        }
    }

    /// The visible region in world coordinates.
    ///
    /// Derived from the surface's viewport corners: origin at the top-left
    /// corner, width to the top-right corner and height to the bottom-left.
    #[must_use]
    pub fn calc_viewport_boundaries(&self) -> Option<Rect> {
        self.surface
            .as_ref()?
            .calc_viewport_boundaries()
            .map(|c| c.view_rect())
    }

    /// Maps a screen point into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, point: Point) -> Option<Point> {
        self.viewport_transform().ok().map(|t| t.inverse() * point)
    }

    /// Maps a world point onto the screen.
    #[must_use]
    pub fn world_to_screen(&self, point: Point) -> Option<Point> {
        self.viewport_transform().ok().map(|t| t * point)
    }

    /// Whether a world point lies inside the world rectangle.
    #[must_use]
    pub fn is_within_world(&self, point: Point) -> bool {
        Rect::from_origin_size(Point::ZERO, self.world).contains(point)
    }

    /// Fully resyncs the scrollbars and requests a repaint.
    pub fn request_render_all(&mut self) {
        self.recalculate_scrollbars(true);
        if let Some(surface) = self.surface.as_mut() {
            surface.request_render_all();
        }
    }

    /// Scrollbar thumb state, if scrollbars are enabled.
    #[must_use]
    pub fn scrollbars(&self) -> Option<ScrollbarState> {
        self.scrollbars.as_ref().map(ScrollbarSync::state)
    }

    /// Updates the scrollbar track lengths and resyncs the thumbs.
    pub fn set_scrollbar_track(&mut self, track: Size) {
        if let Some(scrollbars) = self.scrollbars.as_mut() {
            scrollbars.set_track(track);
        }
        self.recalculate_scrollbars(true);
    }

    /// Starts dragging a scrollbar thumb; call from the thumb's pointer-down handler.
    ///
    /// The drag continues through document-level pointer moves routed to
    /// [`handle_event`](Self::handle_event) and ends on the next pointer-up.
    pub fn begin_thumb_drag(&mut self, axis: ScrollAxis, pointer: Point) {
        if let Some(scrollbars) = self.scrollbars.as_mut() {
            scrollbars.begin_drag(axis, pointer);
        }
    }

    /// Recomputes scrollbar thumbs from the committed transform.
    ///
    /// Thumb offsets are always updated; visibility and size only when
    /// `force_resize` is set.
    pub fn recalculate_scrollbars(&mut self, force_resize: bool) {
        if self.scrollbars.is_none() {
            return;
        }
        let Some(view) = self.calc_viewport_boundaries() else {
            return;
        };
        let Some(page_area) = self.page_area_bounds() else {
            return;
        };
        if let Some(scrollbars) = self.scrollbars.as_mut() {
            scrollbars.recalculate(view, page_area, force_resize);
        }
    }

    /// Routes a surface or document event.
    ///
    /// Returns `true` if the event was consumed. Events of a kind the viewport
    /// holds no subscription for are ignored.
    pub fn handle_event(&mut self, event: &SurfaceEvent) -> bool {
        if !self.listeners.handles(event.kind()) {
            return false;
        }
        match *event {
            SurfaceEvent::Wheel(wheel) => {
                self.handle_wheel(wheel);
                true
            }
            SurfaceEvent::PointerDown(pointer) => self.handle_pointer_down(pointer),
            SurfaceEvent::PointerMove(pointer) => self.handle_pointer_move(pointer),
            SurfaceEvent::PointerUp(_) => self.handle_pointer_up(),
            SurfaceEvent::ObjectMoving { .. } | SurfaceEvent::ObjectModified { .. } => false,
        }
    }

    fn handle_wheel(&mut self, wheel: WheelEvent) {
        if wheel.modifiers.ctrl || wheel.modifiers.meta {
            let Some(zoom) = self.zoom() else {
                return;
            };
            self.zoom_to_point(zoom - wheel.delta.y * self.zoom_factor, wheel.position);
            return;
        }
        self.translate(
            -wheel.delta.x * self.scroll_factor,
            -wheel.delta.y * self.scroll_factor,
        );
    }

    fn handle_pointer_down(&mut self, pointer: PointerEvent) -> bool {
        if !(self.pan_while_space && pointer.modifiers.space) {
            return false;
        }
        self.pan_drag.start(pointer.position);
        true
    }

    fn handle_pointer_move(&mut self, pointer: PointerEvent) -> bool {
        if let Some(delta) = self.pan_drag.update(pointer.position) {
            self.translate(delta.x, delta.y);
            return true;
        }
        let Some(world_delta) = self
            .scrollbars
            .as_mut()
            .and_then(|s| s.drag_to(pointer.position))
        else {
            return false;
        };
        let zoom = self.zoom().unwrap_or(1.0);
        self.translate(world_delta.x * zoom, world_delta.y * zoom);
        true
    }

    fn handle_pointer_up(&mut self) -> bool {
        let was_dragging = self.pan_drag.is_dragging()
            || self.scrollbars.as_ref().is_some_and(ScrollbarSync::is_dragging);
        self.pan_drag.end();
        if let Some(scrollbars) = self.scrollbars.as_mut() {
            scrollbars.end_drags();
        }
        was_dragging
    }

    fn update_zoom_min_max(&mut self) {
        let Some((min_scaler, max_scaler)) = self.dynamic_zoom else {
            return;
        };
        let fit = fit_scale(self.screen, self.world);
        self.min_zoom = fit * min_scaler;
        self.max_zoom = fit * max_scaler;
    }
}

impl<S: RenderSurface> Drop for Viewport<S> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.listeners.release(surface);
        }
    }
}
