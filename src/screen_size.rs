use crate::camera::{Camera, Viewport};
use crate::scene::{NodeId, Scene};

/// Scalar that maps one world unit at `world_pos` to `scale` pixels.
///
/// Perspective: the world height visible at the object's distance is
/// `2 * d * tan(fov / 2)`, so a node scaled by
/// `scale * visible_height / pixel_height` covers `scale` pixels at that
/// distance. Orthographic: the visible height is `(top - bottom) / zoom`
/// no matter the distance.
///
/// Pure and unmemoized. Camera, zoom, and viewport may all change between
/// any two frames, so the result is recomputed on every call.
pub fn calculate_scale_factor(
    world_pos: [f32; 3],
    scale: f32,
    camera: &Camera,
    viewport: &Viewport,
) -> f32 {
    let distance = match *camera {
        Camera::Perspective { position, .. } => {
            let dx = world_pos[0] - position[0];
            let dy = world_pos[1] - position[1];
            let dz = world_pos[2] - position[2];
            (dx * dx + dy * dy + dz * dz).sqrt()
        }
        // Unused by the orthographic extent.
        Camera::Orthographic { .. } => 0.0,
    };
    scale * camera.visible_world_height(distance) / viewport.pixel_height
}

/// Per-frame driver that keeps a scene node a constant on-screen pixel size.
///
/// Contract:
/// - `tick` is called by the host render loop once per rendered frame with
///   the live camera and viewport state.
/// - `scale` is the target pixel size; the default of 1 renders a unit-sized
///   node at roughly 1x1 pixel.
/// - If the node has been removed from the scene, `tick` is a no-op; the
///   previously written scale stays as it was.
///
/// The world-position scratch buffer is reused across ticks, which is safe
/// because the render loop invokes `tick` strictly sequentially on one
/// thread.
pub struct ScreenSizer {
    node: NodeId,
    scale: f32,
    world_pos: [f32; 3],
}

impl ScreenSizer {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            scale: 1.0,
            world_pos: [0.0; 3],
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Recompute and apply the node's uniform scale for this frame.
    pub fn tick(&mut self, scene: &mut Scene, camera: &Camera, viewport: &Viewport) {
        if !scene.world_position_into(self.node, &mut self.world_pos) {
            return;
        }
        let s = calculate_scale_factor(self.world_pos, self.scale, camera, viewport);
        scene.set_scale_uniform(self.node, s);
    }
}
