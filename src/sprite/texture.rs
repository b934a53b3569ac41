use std::fmt;

/// Renderer-owned GPU texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Seam to the host renderer's upload path.
///
/// The loader itself never talks to the GPU; a host that wants its textures
/// resident before first use (instead of at first draw) calls
/// [`Texture::upload`] with its own uploader once the sprite is delivered.
pub trait TextureUploader {
    fn upload_texture_rgba8(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, String>;
}

/// CPU-side decoded texture, tightly packed RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    srgb: bool,
}

impl Texture {
    /// Decode an encoded image (PNG, JPEG) into RGBA8.
    ///
    /// Sprite art is authored in sRGB, so decoded textures are tagged sRGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let dyn_img = image::load_from_memory(bytes)?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
            srgb: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_srgb(&self) -> bool {
        self.srgb
    }

    pub fn upload(&self, uploader: &mut dyn TextureUploader) -> Result<TextureHandle, String> {
        uploader.upload_texture_rgba8(&self.pixels, self.width, self.height)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("srgb", &self.srgb)
            .finish()
    }
}
