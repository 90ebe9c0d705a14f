// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and clamp primitives shared by the viewport, scrollbar and drag constraint code.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Placement of a drawable object in world coordinates.
///
/// Objects are positioned by their unrotated top-left corner (`left`, `top`),
/// have an intrinsic `width`/`height`, an optional non-uniform scale and a
/// rotation in degrees about the top-left corner. Surfaces expose geometry as a
/// single optional aggregate so that callers check for presence once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// X coordinate of the object's origin.
    pub left: f64,
    /// Y coordinate of the object's origin.
    pub top: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in degrees, clockwise about the origin.
    pub angle: f64,
}

impl Geometry {
    /// Creates an unscaled, unrotated geometry.
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }

    /// Creates an unscaled, unrotated geometry covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Returns a copy with the given scale factors.
    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Returns a copy rotated by `angle` degrees.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// The object's origin (`left`, `top`).
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Moves the origin to `pos`.
    pub fn set_origin(&mut self, pos: Point) {
        self.left = pos.x;
        self.top = pos.y;
    }

    /// Width after scaling.
    #[must_use]
    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Height after scaling.
    #[must_use]
    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// Object-local to world transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin().to_vec2())
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// The four corners of the object in world coordinates.
    #[must_use]
    pub fn corners(&self) -> Corners {
        let t = self.transform();
        Corners {
            tl: t * Point::ZERO,
            tr: t * Point::new(self.width, 0.0),
            bl: t * Point::new(0.0, self.height),
            br: t * Point::new(self.width, self.height),
        }
    }

    /// Axis-aligned bounding rectangle of the transformed object.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        self.corners().bounding_rect()
    }

    /// Returns `true` when every field is finite and the object has a positive area.
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        let fields = [
            self.left,
            self.top,
            self.width,
            self.height,
            self.scale_x,
            self.scale_y,
            self.angle,
        ];
        fields.iter().all(|v| v.is_finite())
            && self.scaled_width().abs() > 0.0
            && self.scaled_height().abs() > 0.0
    }
}

/// Four corner points, either of an object or of the visible view in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    /// Top-left corner.
    pub tl: Point,
    /// Top-right corner.
    pub tr: Point,
    /// Bottom-left corner.
    pub bl: Point,
    /// Bottom-right corner.
    pub br: Point,
}

impl Corners {
    /// Corners of an axis-aligned rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            tl: Point::new(rect.x0, rect.y0),
            tr: Point::new(rect.x1, rect.y0),
            bl: Point::new(rect.x0, rect.y1),
            br: Point::new(rect.x1, rect.y1),
        }
    }

    /// Maps every corner through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: Affine) -> Self {
        Self {
            tl: transform * self.tl,
            tr: transform * self.tr,
            bl: transform * self.bl,
            br: transform * self.br,
        }
    }

    /// Smallest axis-aligned rectangle containing all four corners.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        let (p0, p1, p2, p3) = (self.tl, self.tr, self.bl, self.br);
        let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
        let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
        let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
        let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Rectangle anchored at `tl` whose width spans `tl → tr` and height spans `tl → bl`.
    ///
    /// This is how the visible region is read off the viewport corners; it is
    /// not a bounding box.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        Rect::from_origin_size(self.tl, Size::new(self.tr.x - self.tl.x, self.bl.y - self.tl.y))
    }
}

/// Legal range for the viewport translation.
///
/// `translate_x` must lie in `[right, left]` and `translate_y` in
/// `[bottom, top]`. When the page area fits on an axis both ends coincide and
/// the axis is pinned to the centered position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TranslateBounds {
    /// Largest allowed horizontal translation.
    pub left: f64,
    /// Smallest allowed horizontal translation.
    pub right: f64,
    /// Largest allowed vertical translation.
    pub top: f64,
    /// Smallest allowed vertical translation.
    pub bottom: f64,
}

impl TranslateBounds {
    /// Clamps a translation into these bounds.
    #[must_use]
    pub fn clamp(&self, translation: Vec2) -> Vec2 {
        Vec2::new(
            clamp_range(translation.x, self.right, self.left),
            clamp_range(translation.y, self.bottom, self.top),
        )
    }

    /// Returns `true` if `translation` lies within the bounds, allowing `eps` slack.
    #[must_use]
    pub fn contains(&self, translation: Vec2, eps: f64) -> bool {
        translation.x >= self.right - eps
            && translation.x <= self.left + eps
            && translation.y >= self.bottom - eps
            && translation.y <= self.top + eps
    }
}

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: an inverted range pins to `min`
/// and a NaN `value` resolves to `min`.
#[must_use]
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    value.max(min).min(max)
}

/// Expands `rect` by `padding` on every side.
#[must_use]
pub fn pad_rect(rect: Rect, padding: Vec2) -> Rect {
    rect.inflate(padding.x, padding.y)
}

/// Computes the translation bounds that keep `page_area` reachable at `zoom`.
///
/// `page_area` is the already padded page-area rectangle in world
/// coordinates. On an axis where the page area is larger than the screen the
/// view may pan from the page area's leading edge to its trailing edge; where
/// it fits, the world is centered on that axis and panning is disabled.
///
/// The leading-edge offset is taken from the padded rectangle, so it is
/// `(left - padding) * zoom` rather than the unpadded `left * zoom`.
#[must_use]
pub fn page_area_min_maxes(
    page_area: Rect,
    screen: Size,
    world: Size,
    zoom: f64,
) -> TranslateBounds {
    let width = page_area.width();
    let height = page_area.height();
    let offset_left = page_area.x0 * zoom;
    let offset_top = page_area.y0 * zoom;

    let mut right = -(width - screen.width + width * zoom - width) - offset_left;
    let mut bottom = -(height - screen.height + height * zoom - height) - offset_top;

    let horizontal_excess = width * zoom - screen.width;
    let vertical_excess = height * zoom - screen.height;

    let left = if horizontal_excess <= 0.0 {
        right = (screen.width - world.width * zoom) / 2.0;
        right
    } else {
        right + horizontal_excess
    };

    let top = if vertical_excess <= 0.0 {
        bottom = (screen.height - world.height * zoom) / 2.0;
        bottom
    } else {
        bottom + vertical_excess
    };

    TranslateBounds {
        left,
        right,
        top,
        bottom,
    }
}

/// Zoom factor at which `world` exactly fills `screen` on its limiting axis.
#[must_use]
pub fn fit_scale(screen: Size, world: Size) -> f64 {
    (screen.width / world.width).min(screen.height / world.height)
}

/// Translation that centers `world` on `screen` at `zoom`.
#[must_use]
pub fn centered_translation(screen: Size, world: Size, zoom: f64) -> Vec2 {
    Vec2::new(
        (screen.width - world.width * zoom) / 2.0,
        (screen.height - world.height * zoom) / 2.0,
    )
}

/// World size with the screen's aspect ratio that exactly bounds `content`.
///
/// Orientation is decided against the screen's aspect ratio rather than 1:
/// content narrower than the screen ratio keeps its height and the width is
/// derived from the ratio, while wider content keeps its width.
#[must_use]
pub fn world_size_to_fit(content: Size, screen: Size) -> Size {
    let screen_ratio = screen.width / screen.height;
    let content_ratio = content.width / content.height;
    if content_ratio < screen_ratio {
        Size::new(content.height * screen_ratio, content.height)
    } else {
        Size::new(content.width, content.width / screen_ratio)
    }
}

/// Clamps an object's position so that it stays inside `container`.
///
/// `candidate` is the proposed origin; when `None` the object's current origin
/// is clamped. The result keeps `left` within
/// `[container.x0, container.x1 - scaled_width]` and `top` within
/// `[container.y0, container.y1 - scaled_height]`. Objects larger than the
/// container are pinned to its top-left edge.
#[must_use]
pub fn clamp_within(object: &Geometry, container: Rect, candidate: Option<Point>) -> Point {
    let pos = candidate.unwrap_or_else(|| object.origin());
    Point::new(
        clamp_range(pos.x, container.x0, container.x1 - object.scaled_width()),
        clamp_range(pos.y, container.y0, container.y1 - object.scaled_height()),
    )
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size, Vec2};

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn clamp_range_handles_inverted_and_nan() {
        assert_eq!(clamp_range(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_range(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_range(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp_range(5.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp_range(f64::NAN, 1.0, 2.0), 1.0);
    }

    #[test]
    fn rotated_corners_and_bounding_rect() {
        let g = Geometry::new(10.0, 10.0, 20.0, 10.0).with_angle(90.0);
        let c = g.corners();
        assert!((c.tl.x - 10.0).abs() < EPS && (c.tl.y - 10.0).abs() < EPS);
        // Rotating clockwise by 90° sends the local +x axis to world +y.
        assert!((c.tr.x - 10.0).abs() < EPS && (c.tr.y - 30.0).abs() < EPS);
        let bb = g.bounding_rect();
        assert!((bb.x0 - 0.0).abs() < EPS);
        assert!((bb.x1 - 10.0).abs() < EPS);
        assert!((bb.y0 - 10.0).abs() < EPS);
        assert!((bb.y1 - 30.0).abs() < EPS);
    }

    #[test]
    fn scaled_geometry_reports_scaled_size() {
        let g = Geometry::new(0.0, 0.0, 10.0, 20.0).with_scale(2.0, 0.5);
        assert_eq!(g.scaled_width(), 20.0);
        assert_eq!(g.scaled_height(), 10.0);
        assert_eq!(g.bounding_rect(), Rect::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn unmeasurable_geometry() {
        assert!(Geometry::new(0.0, 0.0, 1.0, 1.0).is_measurable());
        assert!(!Geometry::new(0.0, 0.0, 0.0, 1.0).is_measurable());
        assert!(!Geometry::new(f64::NAN, 0.0, 1.0, 1.0).is_measurable());
    }

    #[test]
    fn view_rect_reads_extent_from_opposite_corners() {
        let corners = Corners::from_rect(Rect::new(5.0, 6.0, 25.0, 46.0));
        assert_eq!(corners.view_rect(), Rect::new(5.0, 6.0, 25.0, 46.0));
    }

    #[test]
    fn bounds_for_page_area_larger_than_screen() {
        let screen = Size::new(100.0, 100.0);
        let page = Rect::new(0.0, 0.0, 400.0, 300.0);
        let b = page_area_min_maxes(page, screen, page.size(), 1.0);
        // Leading edge at the screen origin, trailing edge at the screen end.
        assert_eq!(b.left, 0.0);
        assert_eq!(b.right, -300.0);
        assert_eq!(b.top, 0.0);
        assert_eq!(b.bottom, -200.0);
    }

    #[test]
    fn bounds_account_for_page_area_offset() {
        let screen = Size::new(100.0, 100.0);
        let page = Rect::new(50.0, 20.0, 450.0, 320.0);
        let b = page_area_min_maxes(page, screen, Size::new(1000.0, 1000.0), 2.0);
        assert_eq!(b.left, -100.0);
        assert_eq!(b.right, -100.0 - (800.0 - 100.0));
        assert_eq!(b.top, -40.0);
        assert_eq!(b.bottom, -40.0 - (600.0 - 100.0));
    }

    #[test]
    fn bounds_center_world_when_page_area_fits() {
        let screen = Size::new(1000.0, 800.0);
        let world = Size::new(500.0, 400.0);
        let page = Rect::from_origin_size(Point::ZERO, world);
        let b = page_area_min_maxes(page, screen, world, 1.0);
        assert_eq!(b.left, 250.0);
        assert_eq!(b.right, 250.0);
        assert_eq!(b.top, 200.0);
        assert_eq!(b.bottom, 200.0);
        assert_eq!(b.clamp(Vec2::new(-999.0, 999.0)), Vec2::new(250.0, 200.0));
    }

    #[test]
    fn fit_and_center_helpers() {
        let screen = Size::new(1080.0, 810.0);
        let world = Size::new(6000.0, 2000.0);
        let z = fit_scale(screen, world);
        assert!((z - 0.18).abs() < EPS);
        let t = centered_translation(screen, world, z);
        assert!(t.x.abs() < 1e-6);
        assert!((t.y - 225.0).abs() < 1e-6);
    }

    #[test]
    fn world_size_to_fit_matches_screen_ratio_and_bounds_content() {
        let screen = Size::new(400.0, 300.0);
        for content in [
            Size::new(100.0, 300.0),
            Size::new(300.0, 100.0),
            Size::new(120.0, 100.0),
        ] {
            let world = world_size_to_fit(content, screen);
            assert!((world.width / world.height - 4.0 / 3.0).abs() < EPS);
            assert!(world.width >= content.width - EPS);
            assert!(world.height >= content.height - EPS);
        }
    }

    #[test]
    fn clamp_within_container() {
        let container = Rect::new(0.0, 0.0, 100.0, 100.0);
        let obj = Geometry::new(10.0, 10.0, 20.0, 20.0).with_scale(2.0, 1.0);
        assert_eq!(
            clamp_within(&obj, container, Some(Point::new(90.0, -5.0))),
            Point::new(60.0, 0.0)
        );
        assert_eq!(clamp_within(&obj, container, None), Point::new(10.0, 10.0));

        let huge = Geometry::new(30.0, 30.0, 500.0, 500.0);
        assert_eq!(clamp_within(&huge, container, None), Point::new(0.0, 0.0));
    }
}
