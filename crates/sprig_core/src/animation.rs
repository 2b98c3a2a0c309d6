//! Tick-based sprite-sheet animation.
//!
//! A sheet is a horizontal strip of equally sized frames. Animations advance
//! by whole logic ticks (no wall-clock time), so playback is deterministic
//! under the fixed-tick loop.
//!
//! Clip definitions can be authored in JSON and loaded with
//! [`load_animation_file`].

use glam::UVec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Pixel rectangle of one frame inside the sheet texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub texture: String,
    pub frame_size: UVec2,
    pub frame_count: u32,
}

impl SpriteSheet {
    /// Split a strip texture into frames. Without an explicit frame size the
    /// frames are square, with the side equal to the texture height.
    pub fn from_strip(texture: &str, texture_size: UVec2, frame_size: Option<UVec2>) -> Self {
        let frame_size = frame_size.unwrap_or(UVec2::splat(texture_size.y));
        assert!(frame_size.x > 0, "sprite sheet frame width must be > 0");
        Self {
            texture: texture.to_string(),
            frame_size,
            frame_count: (texture_size.x / frame_size.x).max(1),
        }
    }

    pub fn frame_rect(&self, index: u32) -> FrameRect {
        FrameRect {
            x: index * self.frame_size.x,
            y: 0,
            w: self.frame_size.x,
            h: self.frame_size.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A looping animation wrapped back to frame 0.
    Looped,
    /// A non-looping animation reached its last frame.
    Finished,
}

#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    sheet: SpriteSheet,
    ticks_per_frame: u32,
    looping: bool,
    frame_index: u32,
    ticks_counter: u32,
    finished: bool,
}

impl SpriteAnimation {
    pub fn new(sheet: SpriteSheet, ticks_per_frame: u32, looping: bool) -> Self {
        Self {
            sheet,
            ticks_per_frame: ticks_per_frame.max(1),
            looping,
            frame_index: 0,
            ticks_counter: 0,
            finished: false,
        }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn ticks_counter(&self) -> u32 {
        self.ticks_counter
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn frame_rect(&self) -> FrameRect {
        self.sheet.frame_rect(self.frame_index)
    }

    /// Rewind to the first frame.
    pub fn start(&mut self) {
        self.frame_index = 0;
        self.ticks_counter = 0;
        self.finished = false;
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> Option<AnimationEvent> {
        if self.finished {
            return None;
        }

        self.ticks_counter += 1;
        if self.ticks_counter < self.ticks_per_frame {
            return None;
        }
        self.ticks_counter = 0;

        let next = self.frame_index + 1;
        if next < self.sheet.frame_count {
            self.frame_index = next;
            None
        } else if self.looping {
            self.frame_index = 0;
            Some(AnimationEvent::Looped)
        } else {
            self.finished = true;
            Some(AnimationEvent::Finished)
        }
    }
}

/// A named clip as loaded from disk, not yet bound to playback state.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub sheet: SpriteSheet,
    pub ticks_per_frame: u32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn instantiate(&self) -> SpriteAnimation {
        SpriteAnimation::new(self.sheet.clone(), self.ticks_per_frame, self.looping)
    }

    pub fn total_ticks(&self) -> u32 {
        self.sheet.frame_count * self.ticks_per_frame
    }
}

#[derive(Debug, Clone)]
pub struct AnimationFile {
    pub version: String,
    pub animation_id: String,
    pub clips: HashMap<String, AnimationClip>,
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct AnimationFileJson {
    version: String,
    animation_id: String,
    clips: HashMap<String, AnimationClipJson>,
}

#[derive(Debug, Deserialize)]
struct AnimationClipJson {
    texture: String,
    frame_width: u32,
    frame_height: u32,
    frame_count: u32,
    #[serde(default = "default_ticks_per_frame")]
    ticks_per_frame: u32,
    #[serde(default = "default_looping")]
    looping: bool,
}

pub fn load_animation_file(path: &Path) -> Result<AnimationFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animation file {}: {e}", path.display()))?;
    parse_animation_file(&raw)
        .map_err(|e| format!("Animation file {}: {e}", path.display()))
}

pub fn parse_animation_file(raw: &str) -> Result<AnimationFile, String> {
    let json: AnimationFileJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse animation JSON: {e}"))?;
    validate_animation_json(&json)?;

    let clips = json
        .clips
        .into_iter()
        .map(|(name, clip)| {
            let sheet = SpriteSheet {
                texture: clip.texture,
                frame_size: UVec2::new(clip.frame_width, clip.frame_height),
                frame_count: clip.frame_count,
            };
            (
                name,
                AnimationClip {
                    sheet,
                    ticks_per_frame: clip.ticks_per_frame,
                    looping: clip.looping,
                },
            )
        })
        .collect();

    Ok(AnimationFile {
        version: json.version,
        animation_id: json.animation_id,
        clips,
    })
}

fn validate_animation_json(json: &AnimationFileJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Animation validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.animation_id.is_empty() {
        return Err("Animation validation failed: animation_id is empty".to_string());
    }
    for (name, clip) in &json.clips {
        if clip.texture.is_empty() {
            return Err(format!(
                "Animation validation failed: clip '{}' has empty texture",
                name
            ));
        }
        if clip.frame_width == 0 || clip.frame_height == 0 {
            return Err(format!(
                "Animation validation failed: clip '{}' has zero frame size",
                name
            ));
        }
        if clip.frame_count == 0 {
            return Err(format!(
                "Animation validation failed: clip '{}' has no frames",
                name
            ));
        }
        if clip.ticks_per_frame == 0 {
            return Err(format!(
                "Animation validation failed: clip '{}' has zero ticks_per_frame",
                name
            ));
        }
    }
    Ok(())
}

const fn default_ticks_per_frame() -> u32 {
    4
}

const fn default_looping() -> bool {
    true
}
