// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;

use kurbo::{Size, Vec2};
use peniko::Color;

use crate::error::{Result, ViewportError};

/// Construction-time configuration for a [`Viewport`](crate::Viewport).
///
/// Only `screen` and `world` are required; everything else has a default
/// suitable for a mouse-and-trackpad canvas editor.
#[derive(Clone, Copy, Debug)]
pub struct ViewportOptions {
    /// Visible viewport size in screen pixels.
    pub screen: Size,
    /// Initial world size in world units.
    pub world: Size,
    /// Fill of the world background object.
    pub world_background: Color,
    /// Whether virtual scrollbars are maintained.
    pub scrollbars: bool,
    /// Lower zoom limit.
    pub min_zoom: f64,
    /// Upper zoom limit.
    pub max_zoom: f64,
    /// Enables drag-to-pan while Space is held.
    pub panning_enabled_while_holding_space: bool,
    /// `(min_scaler, max_scaler)` applied to the fit scale whenever the page
    /// area target changes.
    pub dynamic_min_max_zoom: Option<(f64, f64)>,
    /// Wheel pixels to pan pixels.
    pub scroll_factor: f64,
    /// Wheel delta to zoom delta.
    ///
    /// Trackpads emit small fractional deltas while mouse wheels emit large
    /// steps, so the zoom response is deliberately much finer than panning.
    pub zoom_factor: f64,
    /// Padding added around the page area on each side.
    pub page_area_padding: Vec2,
    /// Pixel length of the horizontal (width) and vertical (height) scrollbar tracks.
    pub scrollbar_track: Size,
}

impl ViewportOptions {
    /// Default world background: a neutral gray.
    pub const DEFAULT_BACKGROUND: Color = Color::from_rgb8(0x80, 0x80, 0x80);

    /// Options for a `screen`-sized viewport over a `world`-sized world.
    #[must_use]
    pub fn new(screen: Size, world: Size) -> Self {
        Self {
            screen,
            world,
            world_background: Self::DEFAULT_BACKGROUND,
            scrollbars: true,
            min_zoom: 0.25,
            max_zoom: 3.0,
            panning_enabled_while_holding_space: false,
            dynamic_min_max_zoom: None,
            scroll_factor: 0.5,
            zoom_factor: 0.001,
            page_area_padding: Vec2::ZERO,
            scrollbar_track: screen,
        }
    }

    /// Sets the world background fill.
    #[must_use]
    pub fn with_world_background(mut self, color: Color) -> Self {
        self.world_background = color;
        self
    }

    /// Enables or disables virtual scrollbars.
    #[must_use]
    pub fn with_scrollbars(mut self, enabled: bool) -> Self {
        self.scrollbars = enabled;
        self
    }

    /// Sets static zoom limits.
    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Enables drag-to-pan while Space is held.
    #[must_use]
    pub fn with_panning_while_holding_space(mut self, enabled: bool) -> Self {
        self.panning_enabled_while_holding_space = enabled;
        self
    }

    /// Derives zoom limits from the fit scale whenever the page area changes.
    #[must_use]
    pub fn with_dynamic_min_max_zoom(mut self, min_scaler: f64, max_scaler: f64) -> Self {
        self.dynamic_min_max_zoom = Some((min_scaler, max_scaler));
        self
    }

    /// Sets the page-area padding.
    #[must_use]
    pub fn with_page_area_padding(mut self, padding: Vec2) -> Self {
        self.page_area_padding = padding;
        self
    }

    /// Sets the scrollbar track lengths.
    #[must_use]
    pub fn with_scrollbar_track(mut self, track: Size) -> Self {
        self.scrollbar_track = track;
        self
    }

    /// Checks that sizes are positive and zoom limits are usable.
    pub fn validate(&self) -> Result<()> {
        fn positive(size: Size) -> bool {
            size.width.is_finite()
                && size.height.is_finite()
                && size.width > 0.0
                && size.height > 0.0
        }
        if !positive(self.screen) {
            return Err(ViewportError::InvalidOptions(format!(
                "screen size must be positive, got {:?}",
                self.screen
            )));
        }
        if !positive(self.world) {
            return Err(ViewportError::InvalidOptions(format!(
                "world size must be positive, got {:?}",
                self.world
            )));
        }
        if !(self.min_zoom > 0.0 && self.max_zoom.is_finite()) {
            return Err(ViewportError::InvalidOptions(format!(
                "zoom limits must be positive and finite, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ViewportError::InvalidOptions(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if let Some((min, max)) = self.dynamic_min_max_zoom
            && !(min > 0.0 && min <= max && max.is_finite())
        {
            return Err(ViewportError::InvalidOptions(format!(
                "dynamic zoom scalers must satisfy 0 < min <= max, got ({min}, {max})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ViewportOptions::new(Size::new(800.0, 600.0), Size::new(2000.0, 2000.0));
        assert!(opts.scrollbars);
        assert_eq!(opts.min_zoom, 0.25);
        assert_eq!(opts.max_zoom, 3.0);
        assert_eq!(opts.scrollbar_track, Size::new(800.0, 600.0));
        assert!(opts.dynamic_min_max_zoom.is_none());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_bad_sizes_and_limits() {
        let base = ViewportOptions::new(Size::new(800.0, 600.0), Size::new(2000.0, 2000.0));
        assert!(matches!(
            ViewportOptions::new(Size::new(0.0, 600.0), Size::new(1.0, 1.0)).validate(),
            Err(ViewportError::InvalidOptions(_))
        ));
        assert!(base.with_zoom_limits(2.0, 1.0).validate().is_err());
        assert!(base.with_zoom_limits(0.0, 1.0).validate().is_err());
        assert!(base.with_dynamic_min_max_zoom(2.0, 1.0).validate().is_err());
        assert!(base.with_dynamic_min_max_zoom(0.5, 4.0).validate().is_ok());
    }
}
