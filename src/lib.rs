//! Screen-space constant sizing and sprite atlas ingestion for 3D scenes.
//!
//! Two halves: [`ScreenSizer`] recomputes a scene node's scale every rendered
//! frame so it stays a fixed pixel size regardless of camera distance, zoom,
//! or viewport resize; [`SpriteLoader`] fetches a texture plus an optional
//! JSON frame descriptor and normalizes them into an indexed,
//! aspect-corrected sprite. Frame playback is left to the caller.

pub mod camera;
pub mod scene;
pub mod screen_size;
pub mod sprite;

pub use camera::{Camera, Viewport};
pub use scene::{NodeId, Scene, SceneError, Transform};
pub use screen_size::{ScreenSizer, calculate_scale_factor};
pub use sprite::{
    FrameIndex, LoadError, LoadedSprite, LoaderState, SpriteLoader, Texture, TextureHandle,
    TextureUploader,
};

mod scene_tests;
