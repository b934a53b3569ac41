//! Asynchronous sprite atlas loading.
//!
//! A load acquires up to two independent resources, the texture image and an
//! optional JSON frame descriptor, concurrently. Both must resolve before
//! the sprite is assembled; there is no partial-success path. Decoded
//! textures are cached process-wide by URL and shared across loader
//! instances.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::camera::Viewport;
use crate::sprite::aspect::calculate_aspect_ratio;
use crate::sprite::descriptor::{SheetDescriptor, SheetMeta};
use crate::sprite::frame_index::{FrameIndex, build_frame_index, synthesize_uniform_grid};
use crate::sprite::texture::Texture;

/// Display-scale factor applied when fitting a frame to the viewport.
const ASPECT_FACTOR: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed for '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("read failed for '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("texture decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("descriptor parse failed: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// Frame metadata of a loaded sprite: the descriptor's meta block (or a
/// synthesized one) plus the built frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub meta: SheetMeta,
    pub frames: FrameIndex,
}

/// Composite result of a completed load. Owned by the caller; the loader
/// keeps nothing but its URL-keyed cache bookkeeping.
#[derive(Debug, Clone)]
pub struct LoadedSprite {
    pub texture: Arc<Texture>,
    pub sheet: SpriteSheet,
    /// Aspect-correct display scale, components in (0, 1].
    pub aspect: [f32; 3],
}

impl LoadedSprite {
    pub fn total_frames(&self) -> usize {
        self.sheet.frames.total_frames()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    Ready,
}

/// Completion callback, invoked once per successful load/reload.
pub type OnLoad = Box<dyn FnMut(&LoadedSprite) + Send>;

/// Sprite atlas loader.
///
/// Contract:
/// - `Idle -> Loading -> Ready`; `reload` re-enters `Loading` with new URLs
///   while keeping the bound animation-name/frame-count configuration.
/// - With a descriptor URL, texture and descriptor are fetched concurrently
///   and joined; a failure on either side fails the whole load.
/// - Without one, `number_of_frames` synthesizes a uniform grid from the
///   texture alone.
/// - On failure the callback is not invoked and the state stays `Loading`;
///   the error is returned to the caller, which owns any retry policy.
///
/// URLs starting with `http://`/`https://` are fetched over the network;
/// anything else is a filesystem path, optionally `file://`-prefixed.
pub struct SpriteLoader {
    texture_url: String,
    descriptor_url: Option<String>,
    animation_names: Option<Vec<String>>,
    number_of_frames: Option<u32>,
    on_load: Option<OnLoad>,
    state: LoaderState,
    sprite: Option<LoadedSprite>,
}

impl fmt::Debug for SpriteLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteLoader")
            .field("texture_url", &self.texture_url)
            .field("descriptor_url", &self.descriptor_url)
            .field("animation_names", &self.animation_names)
            .field("number_of_frames", &self.number_of_frames)
            .field("state", &self.state)
            .finish()
    }
}

impl SpriteLoader {
    pub fn new(texture_url: impl Into<String>) -> Self {
        Self {
            texture_url: texture_url.into(),
            descriptor_url: None,
            animation_names: None,
            number_of_frames: None,
            on_load: None,
            state: LoaderState::Idle,
            sprite: None,
        }
    }

    pub fn with_descriptor_url(mut self, url: impl Into<String>) -> Self {
        self.descriptor_url = Some(url.into());
        self
    }

    /// Bind ordered animation-name filters for grouped indexing.
    pub fn with_animation_names(mut self, names: Vec<String>) -> Self {
        self.animation_names = Some(names);
        self
    }

    /// Declare the column count for descriptor-less sprites.
    pub fn with_number_of_frames(mut self, count: u32) -> Self {
        self.number_of_frames = Some(count);
        self
    }

    pub fn with_on_load(mut self, on_load: impl FnMut(&LoadedSprite) + Send + 'static) -> Self {
        self.on_load = Some(Box::new(on_load));
        self
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Most recently delivered sprite, if any.
    pub fn sprite(&self) -> Option<&LoadedSprite> {
        self.sprite.as_ref()
    }

    pub fn texture_url(&self) -> &str {
        &self.texture_url
    }

    /// Acquire the configured resources and assemble the sprite.
    ///
    /// Exactly one of the descriptor / frame-count paths runs, keyed on
    /// whether a descriptor URL is bound.
    pub async fn load(&mut self, viewport: &Viewport) -> Result<&LoadedSprite, LoadError> {
        self.state = LoaderState::Loading;

        let assembled = match self.descriptor_url.clone() {
            Some(descriptor_url) => {
                let joined = tokio::try_join!(
                    fetch_descriptor(&descriptor_url),
                    load_texture_cached(&self.texture_url),
                );
                joined.map(|(descriptor, texture)| {
                    assemble_indexed(
                        descriptor,
                        texture,
                        self.animation_names.as_deref(),
                        viewport,
                    )
                })
            }
            None => load_texture_cached(&self.texture_url)
                .await
                .map(|texture| assemble_standalone(texture, self.number_of_frames, viewport)),
        };

        let assembled = match assembled {
            Ok(sprite) => sprite,
            Err(e) => {
                log::warn!("sprite load failed for '{}': {e}", self.texture_url);
                return Err(e);
            }
        };

        self.state = LoaderState::Ready;
        let sprite = self.sprite.insert(assembled);
        if let Some(on_load) = self.on_load.as_mut() {
            on_load(sprite);
        }
        Ok(sprite)
    }

    /// Re-enter `Loading` with new URLs, reusing the bound configuration.
    pub async fn reload(
        &mut self,
        texture_url: impl Into<String>,
        descriptor_url: Option<String>,
        viewport: &Viewport,
    ) -> Result<&LoadedSprite, LoadError> {
        self.texture_url = texture_url.into();
        self.descriptor_url = descriptor_url;
        self.load(viewport).await
    }

    /// Release the shared cache entry for the current texture URL.
    ///
    /// An in-flight fetch of the same URL is not cancelled; other holders
    /// keep the entry alive through their own references, and a late
    /// completion will still run its callback unless the caller guards.
    pub fn dispose(&self) {
        clear(&self.texture_url);
    }
}

fn assemble_indexed(
    descriptor: SheetDescriptor,
    texture: Arc<Texture>,
    animation_names: Option<&[String]>,
    viewport: &Viewport,
) -> LoadedSprite {
    let aspect = match descriptor.frames.first() {
        Some(frame) => calculate_aspect_ratio(
            frame.source_size.w,
            frame.source_size.h,
            ASPECT_FACTOR,
            viewport,
        ),
        None => [1.0, 1.0, 1.0],
    };
    let frames = build_frame_index(&descriptor.frames, animation_names);
    LoadedSprite {
        texture,
        sheet: SpriteSheet {
            meta: descriptor.meta,
            frames,
        },
        aspect,
    }
}

fn assemble_standalone(
    texture: Arc<Texture>,
    number_of_frames: Option<u32>,
    viewport: &Viewport,
) -> LoadedSprite {
    let meta = SheetMeta::synthesized(texture.width() as f32, texture.height() as f32);
    let (frames, aspect) = match number_of_frames {
        Some(count) if count > 0 => {
            let frames = synthesize_uniform_grid(texture.width(), texture.height(), count);
            // The display aspect reflects the declared grid even when the
            // division is not exact and synthesis produced nothing.
            let frame_width = texture.width() as f32 / count as f32;
            let aspect = calculate_aspect_ratio(
                frame_width,
                texture.height() as f32,
                ASPECT_FACTOR,
                viewport,
            );
            (frames, aspect)
        }
        _ => (Vec::new(), [1.0, 1.0, 1.0]),
    };
    LoadedSprite {
        texture,
        sheet: SpriteSheet {
            meta,
            frames: FrameIndex::Flat(frames),
        },
        aspect,
    }
}

type TextureCell = Arc<OnceCell<Arc<Texture>>>;

static TEXTURE_CACHE: OnceLock<Mutex<HashMap<String, TextureCell>>> = OnceLock::new();

fn texture_cache() -> &'static Mutex<HashMap<String, TextureCell>> {
    TEXTURE_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Fetch-and-decode through the process-wide cache.
///
/// One cell per URL deduplicates completed and in-flight loads alike;
/// concurrent callers for the same URL await a single fetch. The lock guards
/// map bookkeeping only and is never held across an await.
async fn load_texture_cached(url: &str) -> Result<Arc<Texture>, LoadError> {
    let cell = {
        let mut cache = texture_cache().lock().unwrap_or_else(|e| e.into_inner());
        cache.entry(url.to_string()).or_default().clone()
    };

    let texture = cell
        .get_or_try_init(|| async {
            let bytes = fetch_bytes(url).await?;
            let texture = Texture::decode(&bytes)?;
            log::debug!(
                "decoded texture '{url}': {}x{}",
                texture.width(),
                texture.height()
            );
            Ok::<_, LoadError>(Arc::new(texture))
        })
        .await?;
    Ok(texture.clone())
}

/// Eagerly warm the shared texture cache for `url`.
pub async fn preload(url: &str) -> Result<(), LoadError> {
    load_texture_cached(url).await.map(drop)
}

/// Evict `url` from the shared texture cache. In-flight loads of the same
/// URL are unaffected; the next load after eviction fetches fresh.
pub fn clear(url: &str) {
    let mut cache = texture_cache().lock().unwrap_or_else(|e| e.into_inner());
    cache.remove(url);
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    if is_remote(url) {
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| LoadError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let bytes = response.bytes().await.map_err(|source| LoadError::Fetch {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_string(),
            source,
        })
    }
}

async fn fetch_descriptor(url: &str) -> Result<SheetDescriptor, LoadError> {
    if is_remote(url) {
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| LoadError::Fetch {
                url: url.to_string(),
                source,
            })?;
        response
            .json::<SheetDescriptor>()
            .await
            .map_err(|source| LoadError::Fetch {
                url: url.to_string(),
                source,
            })
    } else {
        let bytes = fetch_bytes(url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
