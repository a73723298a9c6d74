/*!
Geometry probe: where the ray fan starts and how densely it is spaced.

Rays are cast from the corners of the body's bounds after shrinking them by
the skin width. Each face carries `count` evenly spaced rays, the first and
last sitting on the corners.
*/

use crate::{ConfigError, MIN_RAY_COUNT};

use super::types::{Bounds, Vec2};

/// Corner points of the skin-shrunk bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayOrigins {
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub top_left: Vec2,
    pub top_right: Vec2,
}

impl RayOrigins {
    /// Compute the corners of `bounds` shrunk inward by `skin`.
    pub fn from_bounds(bounds: &Bounds, skin: f32) -> Self {
        let inner = bounds.shrunk(skin);
        let min = inner.min();
        let max = inner.max();
        Self {
            bottom_left: Vec2::new(min.x, min.y),
            bottom_right: Vec2::new(max.x, min.y),
            top_left: Vec2::new(min.x, max.y),
            top_right: Vec2::new(max.x, max.y),
        }
    }

    /// Bottom corner on the side of `direction_x` (`-1` left, otherwise right).
    #[inline]
    pub fn bottom(&self, direction_x: f32) -> Vec2 {
        if direction_x < 0.0 {
            self.bottom_left
        } else {
            self.bottom_right
        }
    }

    /// Left corner of the face on the side of `direction_y` (`-1` bottom, otherwise top).
    #[inline]
    pub fn left(&self, direction_y: f32) -> Vec2 {
        if direction_y < 0.0 {
            self.bottom_left
        } else {
            self.top_left
        }
    }
}

/// Ray counts per face and the distance between neighbouring rays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySpacing {
    /// Rays fanned up the left/right faces.
    pub horizontal_count: usize,
    /// Rays fanned across the top/bottom faces.
    pub vertical_count: usize,
    /// Vertical distance between horizontal rays.
    pub horizontal_spacing: f32,
    /// Horizontal distance between vertical rays.
    pub vertical_spacing: f32,
}

impl RaySpacing {
    /// Even spacing over the skin-shrunk `bounds`.
    ///
    /// Counts below two leave the spacing undefined and are rejected.
    pub fn new(
        bounds: &Bounds,
        skin: f32,
        horizontal_count: usize,
        vertical_count: usize,
    ) -> Result<Self, ConfigError> {
        if horizontal_count < MIN_RAY_COUNT {
            return Err(ConfigError::RayCount {
                axis: "horizontal",
                count: horizontal_count,
                min: MIN_RAY_COUNT,
            });
        }
        if vertical_count < MIN_RAY_COUNT {
            return Err(ConfigError::RayCount {
                axis: "vertical",
                count: vertical_count,
                min: MIN_RAY_COUNT,
            });
        }

        let size = bounds.shrunk(skin).size();
        Ok(Self {
            horizontal_count,
            vertical_count,
            horizontal_spacing: size.y / (horizontal_count - 1) as f32,
            vertical_spacing: size.x / (vertical_count - 1) as f32,
        })
    }
}

/// Per-body probe state: memoized spacing plus the origins for the current step.
///
/// Spacing depends only on the body size and is recomputed by [`resize`](Self::resize).
/// Origins depend on the position and are refreshed by [`update_origins`](Self::update_origins)
/// before every cast.
#[derive(Clone, Debug)]
pub struct RaycastProbe {
    half_extents: Vec2,
    skin: f32,
    spacing: RaySpacing,
    origins: RayOrigins,
}

impl RaycastProbe {
    pub fn new(
        half_extents: Vec2,
        skin: f32,
        horizontal_count: usize,
        vertical_count: usize,
    ) -> Result<Self, ConfigError> {
        if !skin.is_finite() || skin <= 0.0 {
            return Err(ConfigError::SkinWidth(skin));
        }
        validate_half_extents(half_extents, skin)?;

        let bounds = Bounds::new(Vec2::zeros(), half_extents);
        let spacing = RaySpacing::new(&bounds, skin, horizontal_count, vertical_count)?;
        Ok(Self {
            half_extents,
            skin,
            spacing,
            origins: RayOrigins::from_bounds(&bounds, skin),
        })
    }

    /// Change the body size, recomputing the ray spacing.
    ///
    /// On error the probe keeps its previous size.
    pub fn resize(&mut self, half_extents: Vec2) -> Result<(), ConfigError> {
        validate_half_extents(half_extents, self.skin)?;
        let bounds = Bounds::new(Vec2::zeros(), half_extents);
        self.spacing = RaySpacing::new(
            &bounds,
            self.skin,
            self.spacing.horizontal_count,
            self.spacing.vertical_count,
        )?;
        self.half_extents = half_extents;
        Ok(())
    }

    /// Recompute the corner origins for a body centered at `position`.
    #[inline]
    pub fn update_origins(&mut self, position: Vec2) -> &RayOrigins {
        self.origins = RayOrigins::from_bounds(&self.bounds(position), self.skin);
        &self.origins
    }

    #[inline]
    pub fn origins(&self) -> &RayOrigins {
        &self.origins
    }

    #[inline]
    pub fn spacing(&self) -> &RaySpacing {
        &self.spacing
    }

    #[inline]
    pub fn skin(&self) -> f32 {
        self.skin
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Unshrunk bounds of a body centered at `position`.
    #[inline]
    pub fn bounds(&self, position: Vec2) -> Bounds {
        Bounds::new(position, self.half_extents)
    }
}

fn validate_half_extents(half_extents: Vec2, skin: f32) -> Result<(), ConfigError> {
    let (x, y) = (half_extents.x, half_extents.y);
    if !x.is_finite() || !y.is_finite() || x <= 0.0 || y <= 0.0 {
        return Err(ConfigError::BodySize { x, y });
    }
    // The shrunk box must keep a positive size or every ray would start on one line.
    if x <= skin || y <= skin {
        return Err(ConfigError::BodyThinnerThanSkin { x, y, skin });
    }
    Ok(())
}
