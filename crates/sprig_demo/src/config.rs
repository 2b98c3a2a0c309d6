use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DemoConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub ticks_per_second: u32,
    /// Simulated wall-clock time per frame. Omitted means one tick per frame.
    pub frame_ms: Option<u64>,
    pub max_frames: u32,
    pub debug_colliders: bool,
    pub asset_root: String,
    /// Relative to `asset_root`.
    pub animations: String,
    /// Relative to `asset_root`.
    pub input_script: String,
    pub level: LevelConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LevelConfig {
    pub width: f32,
    pub ground_y: f32,
    pub player_start: [f32; 2],
    pub pickups: Vec<PickupConfig>,
    pub hazards: Vec<HazardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PickupConfig {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_pickup_radius")]
    pub radius: f32,
    #[serde(default = "default_pickup_value")]
    pub value: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HazardConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            ticks_per_second: 60,
            frame_ms: None,
            max_frames: 600,
            debug_colliders: false,
            asset_root: "assets".to_string(),
            animations: "animations/sprites.json".to_string(),
            input_script: "scripts/walk_and_jump.json".to_string(),
            level: LevelConfig::default(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 2560.0,
            ground_y: 600.0,
            player_start: [96.0, 600.0],
            pickups: Vec::new(),
            hazards: Vec::new(),
        }
    }
}

impl DemoConfig {
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    pub fn frame_duration(&self) -> Duration {
        match self.frame_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_secs(1) / self.ticks_per_second.max(1),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<DemoConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: DemoConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// A missing file means defaults; a present but broken file is an error.
pub fn load_config_or_default(path: &Path) -> Result<DemoConfig, String> {
    if !path.exists() {
        log::info!(
            "No config at {}, using built-in defaults",
            path.display()
        );
        return Ok(DemoConfig::default());
    }
    load_config_from_path(path)
}

fn validate_config(config: &DemoConfig) -> Result<(), String> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} is empty",
            config.window_width, config.window_height
        ));
    }
    if config.ticks_per_second == 0 {
        return Err("Config validation failed: ticks_per_second must be > 0".to_string());
    }
    if config.frame_ms == Some(0) {
        return Err("Config validation failed: frame_ms must be > 0 when set".to_string());
    }
    if config.animations.is_empty() || config.input_script.is_empty() {
        return Err("Config validation failed: asset paths must not be empty".to_string());
    }

    let level = &config.level;
    if level.width <= 0.0 {
        return Err("Config validation failed: level width must be > 0".to_string());
    }
    let [start_x, _] = level.player_start;
    if !(0.0..=level.width).contains(&start_x) {
        return Err(format!(
            "Config validation failed: player_start x {} lies outside the level",
            start_x
        ));
    }
    for (i, pickup) in level.pickups.iter().enumerate() {
        if pickup.radius <= 0.0 {
            return Err(format!(
                "Config validation failed: pickup {} has non-positive radius",
                i
            ));
        }
    }
    for (i, hazard) in level.hazards.iter().enumerate() {
        if hazard.width <= 0.0 || hazard.height <= 0.0 {
            return Err(format!(
                "Config validation failed: hazard {} has an empty size",
                i
            ));
        }
    }
    Ok(())
}

const fn default_pickup_radius() -> f32 {
    12.0
}

const fn default_pickup_value() -> u32 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sprig_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{
              "ticks_per_second": 30,
              "level": { "pickups": [ { "x": 200.0, "y": 580.0 } ] }
            }"#,
        )
        .expect("write config file");

        let config = load_config_from_path(&path).expect("config should load");
        assert_eq!(config.ticks_per_second, 30);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.level.width, 2560.0);
        assert_eq!(config.level.pickups.len(), 1);
        assert_eq!(config.level.pickups[0].value, 500);
        assert_eq!(config.frame_duration(), Duration::from_secs(1) / 30);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = temp_file_path("missing");
        let config = load_config_or_default(&path).expect("defaults");
        assert_eq!(config.ticks_per_second, 60);
        assert_eq!(config.window_size(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "ticks_per_second": 0 }"#).expect("write config file");
        let err = load_config_from_path(&path).expect_err("zero tps must fail");
        assert!(err.contains("ticks_per_second"), "{err}");

        fs::write(
            &path,
            r#"{ "level": { "hazards": [ { "x": 1.0, "y": 1.0, "width": 0.0, "height": 4.0 } ] } }"#,
        )
        .expect("write config file");
        let err = load_config_from_path(&path).expect_err("empty hazard must fail");
        assert!(err.contains("hazard 0"), "{err}");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_json_reports_path() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("write config file");
        let err = load_config_or_default(&path).expect_err("broken file must fail");
        assert!(err.contains("Failed to parse config JSON"), "{err}");
        let _ = fs::remove_file(path);
    }
}
