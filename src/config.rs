use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use vrinteract_ui3d::Color;

pub const DEFAULT_CONFIG_PATH: &str = "config/interface.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// Centre of the instruction panel in world space.
    pub position: [f32; 3],
    /// Starting position of the controller node.
    pub controller_position: [f32; 3],
    /// Ticks per simulated second.
    pub tick_rate: f32,
    /// Hard stop for headless sessions.
    pub max_ticks: u64,
    /// Countdown run before the first page unlocks; 0 skips it.
    pub countdown_seconds: u32,
    /// Start with the pointer locked to the selection plane.
    pub explicit_on_start: bool,
    /// Half extents of the box collider carried by the controller.
    pub collider_half_extents: [f32; 3],
    pub selection_plane: SelectionPlaneConfig,
    /// Instruction pages shown one after another.
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionPlaneConfig {
    pub enabled: bool,
    /// Metres down -Z from the world origin.
    pub distance: f32,
    pub width: f32,
    pub height: f32,
    /// `#rrggbb`, `0xrrggbb` or a colour name.
    pub color: String,
    pub opacity: f32,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.2, -1.8],
            controller_position: [0.0, 1.2, 0.0],
            tick_rate: 30.0,
            max_ticks: 1800,
            countdown_seconds: 0,
            explicit_on_start: false,
            collider_half_extents: [0.05, 0.05, 0.05],
            selection_plane: SelectionPlaneConfig::default(),
            pages: vec![
                "Welcome. Point at a button and pull the trigger to press it.".to_string(),
                "Use Back and Next to move between pages.".to_string(),
            ],
        }
    }
}

impl Default for SelectionPlaneConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: 1.0,
            width: 1.0,
            height: 1.0,
            color: "#ffffff".to_string(),
            opacity: 0.2,
        }
    }
}

impl InterfaceConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<InterfaceConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    InterfaceConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Interface config not found at {}. Using defaults",
                        path.display()
                    );
                }
                InterfaceConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn controller_position(&self) -> Vec3 {
        Vec3::from_array(self.controller_position)
    }

    pub fn collider_size(&self) -> Vec3 {
        Vec3::from_array(self.collider_half_extents) * 2.0
    }

    /// Seconds per tick; non-positive rates fall back to 30 Hz.
    pub fn tick_dt(&self) -> f32 {
        if self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            warn!(tick_rate = self.tick_rate, "invalid tick rate; using 30 Hz");
            1.0 / 30.0
        }
    }
}

impl SelectionPlaneConfig {
    /// Parsed plane colour; unparseable values fall back to white.
    pub fn color(&self) -> Color {
        self.color.parse().unwrap_or_else(|err| {
            warn!(color = %self.color, %err, "invalid selection plane colour; using white");
            Color::WHITE
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("vrinteract-{name}-{nanos}.toml"))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = InterfaceConfig::load_from_path(&temp_path("missing"));
        assert_eq!(cfg, InterfaceConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_path("partial");
        fs::write(
            &path,
            "countdown_seconds = 5\n[selection_plane]\nenabled = true\ncolor = \"red\"\n",
        )
        .unwrap();
        let cfg = InterfaceConfig::load_from_path(&path);
        assert_eq!(cfg.countdown_seconds, 5);
        assert!(cfg.selection_plane.enabled);
        assert_eq!(cfg.selection_plane.color(), Color::RED);
        assert_eq!(cfg.selection_plane.distance, 1.0);
        assert_eq!(cfg.position(), Vec3::new(0.0, 1.2, -1.8));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "tick_rate = \"fast\"").unwrap();
        assert_eq!(
            InterfaceConfig::load_from_path(&path),
            InterfaceConfig::default()
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = temp_path("saved");
        let mut cfg = InterfaceConfig::default();
        cfg.pages = vec!["only page".to_string()];
        cfg.explicit_on_start = true;
        cfg.save_to_path(&path).unwrap();
        assert_eq!(InterfaceConfig::load_from_path(&path), cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn bad_colour_and_tick_rate_fall_back() {
        let mut cfg = InterfaceConfig::default();
        cfg.selection_plane.color = "not-a-colour".to_string();
        cfg.tick_rate = 0.0;
        assert_eq!(cfg.selection_plane.color(), Color::WHITE);
        assert!((cfg.tick_dt() - 1.0 / 30.0).abs() < 1e-6);
    }
}
