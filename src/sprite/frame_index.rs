//! Frame index construction.

use std::collections::HashMap;

use crate::sprite::descriptor::{FrameRect, FrameSet, SourceSize, SpriteFrame};

/// The indexed frames of a loaded sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameIndex {
    /// Every frame, in descriptor source order.
    Flat(Vec<SpriteFrame>),
    /// Animation name -> frames whose name contains it, in source order.
    Groups(HashMap<String, Vec<SpriteFrame>>),
}

impl FrameIndex {
    /// Number of indexed frame references (group totals count fan-out).
    pub fn total_frames(&self) -> usize {
        match self {
            FrameIndex::Flat(frames) => frames.len(),
            FrameIndex::Groups(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    /// Frames of one animation group, if grouping was requested.
    pub fn group(&self, name: &str) -> Option<&[SpriteFrame]> {
        match self {
            FrameIndex::Flat(_) => None,
            FrameIndex::Groups(groups) => groups.get(name).map(Vec::as_slice),
        }
    }
}

/// Build the frame index for a descriptor.
///
/// With `animation_names`, each name selects every frame whose key contains
/// it case-insensitively, preserving source order. Membership is not
/// exclusive: one frame may land in several groups, and a name that matches
/// nothing still gets an (empty) entry. Without names, the frames flatten to
/// a single list in source order; callers rely on that exact ordering.
pub fn build_frame_index(frames: &FrameSet, animation_names: Option<&[String]>) -> FrameIndex {
    match animation_names {
        Some(names) => {
            let mut groups = HashMap::with_capacity(names.len());
            for name in names {
                let needle = name.to_lowercase();
                let members: Vec<SpriteFrame> = frames
                    .iter()
                    .filter(|(key, _)| key.to_lowercase().contains(&needle))
                    .map(|(_, frame)| frame.clone())
                    .collect();
                groups.insert(name.clone(), members);
            }
            FrameIndex::Groups(groups)
        }
        None => FrameIndex::Flat(frames.iter().map(|(_, frame)| frame.clone()).collect()),
    }
}

/// Synthesize frames for a bare texture holding `number_of_frames` equal
/// columns.
///
/// If the texture width does not divide evenly, no frames are synthesized
/// and the empty list is returned; a misdeclared count degrades to "no
/// frames", it does not fail the load.
pub fn synthesize_uniform_grid(
    texture_width: u32,
    texture_height: u32,
    number_of_frames: u32,
) -> Vec<SpriteFrame> {
    if number_of_frames == 0 || texture_width % number_of_frames != 0 {
        return Vec::new();
    }

    let frame_width = texture_width / number_of_frames;
    (0..number_of_frames)
        .map(|i| {
            let rect = FrameRect {
                x: (i * frame_width) as f32,
                y: 0.0,
                w: frame_width as f32,
                h: texture_height as f32,
            };
            SpriteFrame {
                frame: rect,
                rotated: false,
                trimmed: false,
                sprite_source_size: Some(FrameRect {
                    x: 0.0,
                    y: 0.0,
                    w: frame_width as f32,
                    h: texture_height as f32,
                }),
                source_size: SourceSize {
                    w: frame_width as f32,
                    h: texture_height as f32,
                },
                filename: None,
            }
        })
        .collect()
}
