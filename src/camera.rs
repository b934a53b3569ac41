/// Camera state sampled by the per-frame scale computation.
///
/// Only the fields that feed the screen-size math are carried here; view and
/// projection matrices stay with the host renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Camera {
    Perspective {
        /// Vertical field of view, radians.
        fov_y_radians: f32,
        /// Camera world position.
        position: [f32; 3],
    },
    Orthographic {
        top: f32,
        bottom: f32,
        left: f32,
        right: f32,
        zoom: f32,
    },
}

impl Camera {
    pub fn perspective(fov_y_radians: f32, position: [f32; 3]) -> Self {
        Self::Perspective {
            fov_y_radians,
            position,
        }
    }

    pub fn orthographic(top: f32, bottom: f32, left: f32, right: f32, zoom: f32) -> Self {
        Self::Orthographic {
            top,
            bottom,
            left,
            right,
            zoom,
        }
    }

    /// World-space height visible at `distance` along the view axis.
    ///
    /// Perspective extent grows with distance; orthographic extent is fixed
    /// by the frustum and zoom and ignores `distance`.
    pub fn visible_world_height(&self, distance: f32) -> f32 {
        match *self {
            Camera::Perspective { fov_y_radians, .. } => {
                2.0 * distance * (0.5 * fov_y_radians).tan()
            }
            Camera::Orthographic {
                top, bottom, zoom, ..
            } => (top - bottom) / zoom,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::Perspective {
            fov_y_radians: 60.0_f32.to_radians(),
            position: [0.0; 3],
        }
    }
}

/// Renderable-area dimensions in both pixel and world units.
///
/// The world-unit extents describe how much of the scene the viewport spans
/// at the focal plane; the host recomputes them on resize/zoom and passes the
/// result in each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pixel_width: f32,
    pub pixel_height: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl Viewport {
    pub fn new(pixel_width: f32, pixel_height: f32, world_width: f32, world_height: f32) -> Self {
        Self {
            pixel_width,
            pixel_height,
            world_width,
            world_height,
        }
    }

    /// World-unit width over world-unit height.
    pub fn aspect(&self) -> f32 {
        self.world_width / self.world_height
    }
}
