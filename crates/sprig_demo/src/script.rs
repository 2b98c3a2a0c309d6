//! Scripted input: a list of frames, each holding a set of keys for a number
//! of consecutive frames.

use serde::Deserialize;
use sprig_core::Key;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScriptFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl InputScript {
    /// One entry per rendered frame.
    pub fn expanded_frames(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.held.clone());
            }
        }
        out
    }

    pub fn frame_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }
}

pub fn load_script_from_path(path: &Path) -> Result<InputScript, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read input script {}: {e}", path.display()))?;
    let script: InputScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse input script JSON {}: {e}", path.display()))?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &InputScript) -> Result<(), String> {
    if script.frames.is_empty() {
        return Err("Input script validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
