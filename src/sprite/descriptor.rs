//! Sprite sheet descriptor wire format.
//!
//! Accepts the TexturePacker-style JSON layout: a `frames` field that is
//! either an ordered array of frame objects or a mapping from frame name to
//! the same object shape, plus a `meta` block. Both `frames` shapes are
//! resolved once, at parse time, into a single ordered [`FrameSet`] so the
//! rest of the pipeline never branches on the wire shape again.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Pixel-space rectangle locating a frame within the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Original untrimmed pixel dimensions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SourceSize {
    pub w: f32,
    pub h: f32,
}

/// One frame of a sprite sheet.
///
/// `rotated`, `trimmed`, and `sprite_source_size` are carried through for the
/// caller; nothing here interprets them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpriteFrame {
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    #[serde(rename = "spriteSourceSize", default)]
    pub sprite_source_size: Option<FrameRect>,
    #[serde(rename = "sourceSize")]
    pub source_size: SourceSize,
    /// Present on array-form descriptors, where entries name themselves.
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFrames {
    List(Vec<SpriteFrame>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

/// Canonical ordered frame collection: name -> frame, in source order.
///
/// Array-form entries are named by their `filename` field, falling back to
/// the decimal index. Keyed-form entries keep the mapping's own insertion
/// order. Frame names are unique within one descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFrames")]
pub struct FrameSet {
    entries: Vec<(String, SpriteFrame)>,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, frame)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpriteFrame)> {
        self.entries.iter().map(|(name, frame)| (name.as_str(), frame))
    }

    /// First frame in source order, if any.
    pub fn first(&self) -> Option<&SpriteFrame> {
        self.entries.first().map(|(_, frame)| frame)
    }
}

impl TryFrom<RawFrames> for FrameSet {
    type Error = String;

    fn try_from(raw: RawFrames) -> Result<Self, String> {
        let entries: Vec<(String, SpriteFrame)> = match raw {
            RawFrames::List(frames) => frames
                .into_iter()
                .enumerate()
                .map(|(i, frame)| {
                    let name = frame.filename.clone().unwrap_or_else(|| i.to_string());
                    (name, frame)
                })
                .collect(),
            RawFrames::Keyed(map) => {
                let mut out = Vec::with_capacity(map.len());
                for (name, value) in map {
                    let frame: SpriteFrame = serde_json::from_value(value)
                        .map_err(|e| format!("frame '{name}': {e}"))?;
                    out.push((name, frame));
                }
                out
            }
        };

        let mut seen = HashSet::new();
        for (name, _) in &entries {
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate frame name '{name}'"));
            }
        }

        Ok(Self { entries })
    }
}

/// Descriptor `meta` block. Unknown fields (app, image, format, ...) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetMeta {
    #[serde(default)]
    pub version: Option<String>,
    /// Overall atlas pixel size.
    #[serde(default)]
    pub size: Option<SourceSize>,
    /// Declared export scale. TexturePacker writes this as a string ("1");
    /// some exporters use a bare number. Both are accepted.
    #[serde(default = "default_scale", deserialize_with = "scale_from_any")]
    pub scale: f32,
}

impl Default for SheetMeta {
    fn default() -> Self {
        Self {
            version: None,
            size: None,
            scale: 1.0,
        }
    }
}

impl SheetMeta {
    /// Meta for a descriptor-less sprite synthesized from the texture alone.
    pub fn synthesized(width: f32, height: f32) -> Self {
        Self {
            version: Some("1.0".to_string()),
            size: Some(SourceSize {
                w: width,
                h: height,
            }),
            scale: 1.0,
        }
    }
}

/// Parsed sprite sheet descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetDescriptor {
    pub frames: FrameSet,
    #[serde(default)]
    pub meta: SheetMeta,
}

fn default_scale() -> f32 {
    1.0
}

fn scale_from_any<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScaleVisitor;

    impl<'de> de::Visitor<'de> for ScaleVisitor {
        type Value = f32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f32, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(ScaleVisitor)
}
