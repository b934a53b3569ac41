pub mod aspect;
pub mod descriptor;
pub mod frame_index;
pub mod loader;
pub mod texture;

pub use aspect::calculate_aspect_ratio;
pub use descriptor::{FrameRect, FrameSet, SheetDescriptor, SheetMeta, SourceSize, SpriteFrame};
pub use frame_index::{FrameIndex, build_frame_index, synthesize_uniform_grid};
pub use loader::{LoadError, LoadedSprite, LoaderState, SpriteLoader, SpriteSheet, clear, preload};
pub use texture::{Texture, TextureHandle, TextureUploader};

mod loader_tests;
