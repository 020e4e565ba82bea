use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::exercise::Exercise;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub pushup: PushupConfig,
    #[serde(default)]
    pub squat: SquatConfig,
    #[serde(default)]
    pub plank: PlankConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 起動時の種目 ("pushup" / "squat" / "plank")
    #[serde(default = "default_exercise")]
    pub exercise: Exercise,
    /// RUST_LOG が無いときのログフィルタ
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_exercise() -> Exercise { Exercise::Pushup }
fn default_log_level() -> String { "info".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exercise: default_exercise(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PushupConfig {
    /// 腕が伸びたと判定する左肘角度（これを超える）
    #[serde(default = "default_pushup_ready_angle")]
    pub ready_angle: u16,
    /// 下がりきったと判定する左肘角度（これ未満）
    #[serde(default = "default_pushup_down_angle")]
    pub down_angle: u16,
    /// 開始判定に必要な連続フレーム数
    #[serde(default = "default_ready_frames")]
    pub ready_frames: u32,
    /// 両肘がこれを超えていると「もっと下げて」
    #[serde(default = "default_shallow_angle")]
    pub shallow_angle: u16,
    /// 肩-腰-足首の折れ許容（度）
    #[serde(default = "default_alignment_tolerance")]
    pub alignment_tolerance: f32,
}

fn default_pushup_ready_angle() -> u16 { 150 }
fn default_pushup_down_angle() -> u16 { 90 }
fn default_ready_frames() -> u32 { 5 }
fn default_shallow_angle() -> u16 { 100 }
fn default_alignment_tolerance() -> f32 { 10.0 }

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            ready_angle: default_pushup_ready_angle(),
            down_angle: default_pushup_down_angle(),
            ready_frames: default_ready_frames(),
            shallow_angle: default_shallow_angle(),
            alignment_tolerance: default_alignment_tolerance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SquatConfig {
    /// 立位と判定する左膝角度（これを超える）
    #[serde(default = "default_squat_ready_angle")]
    pub ready_angle: u16,
    /// しゃがみきったと判定する左膝角度（これ未満）
    #[serde(default = "default_squat_down_angle")]
    pub down_angle: u16,
    #[serde(default = "default_ready_frames")]
    pub ready_frames: u32,
    /// 目標膝角度の下限
    #[serde(default = "default_depth_min")]
    pub depth_min: u16,
    /// 目標膝角度の上限
    #[serde(default = "default_depth_max")]
    pub depth_max: u16,
    /// 膝と足首のX差の許容（正規化座標）
    #[serde(default = "default_knee_toe_tolerance")]
    pub knee_toe_tolerance: f32,
    /// 上体角度（肩-腰-足首）の許容範囲
    #[serde(default = "default_torso_min")]
    pub torso_min: u16,
    #[serde(default = "default_torso_max")]
    pub torso_max: u16,
}

fn default_squat_ready_angle() -> u16 { 160 }
fn default_squat_down_angle() -> u16 { 110 }
fn default_depth_min() -> u16 { 110 }
fn default_depth_max() -> u16 { 130 }
fn default_knee_toe_tolerance() -> f32 { 0.1 }
fn default_torso_min() -> u16 { 40 }
fn default_torso_max() -> u16 { 55 }

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            ready_angle: default_squat_ready_angle(),
            down_angle: default_squat_down_angle(),
            ready_frames: default_ready_frames(),
            depth_min: default_depth_min(),
            depth_max: default_depth_max(),
            knee_toe_tolerance: default_knee_toe_tolerance(),
            torso_min: default_torso_min(),
            torso_max: default_torso_max(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlankConfig {
    #[serde(default = "default_alignment_tolerance")]
    pub alignment_tolerance: f32,
    /// 肩と腰のY差の許容（正規化座標）
    #[serde(default = "default_hip_tolerance")]
    pub hip_tolerance: f32,
}

fn default_hip_tolerance() -> f32 { 0.05 }

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            alignment_tolerance: default_alignment_tolerance(),
            hip_tolerance: default_hip_tolerance(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config")?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    ///
    /// ログ初期化より前に呼ばれるので警告は標準エラーに直接出す。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("Warning: config {} not found. Using default config.", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using default config.", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.app.exercise, Exercise::Pushup);
        assert_eq!(config.app.log_level, "info");
        assert_eq!(config.pushup.ready_angle, 150);
        assert_eq!(config.pushup.down_angle, 90);
        assert_eq!(config.pushup.ready_frames, 5);
        assert_eq!(config.squat.ready_angle, 160);
        assert_eq!(config.squat.down_angle, 110);
        assert_eq!(config.squat.torso_min, 40);
        assert_eq!(config.squat.torso_max, 55);
        assert!((config.plank.hip_tolerance - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_partial_section() {
        let config = Config::parse(
            r#"
            [app]
            exercise = "squat"

            [squat]
            ready_frames = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.app.exercise, Exercise::Squat);
        assert_eq!(config.squat.ready_frames, 3);
        assert_eq!(config.squat.depth_max, 130);
        assert_eq!(config.pushup.ready_frames, 5);
    }

    #[test]
    fn test_unknown_exercise_rejected() {
        assert!(Config::parse("[app]\nexercise = \"burpee\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.app.exercise, Exercise::Pushup);
        assert!(Config::load("does/not/exist.toml").is_err());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let path = std::env::temp_dir()
            .join(format!("rep_coach_invalid_config_{}.toml", std::process::id()));
        fs::write(&path, "[app\nexercise =").unwrap();

        assert!(Config::load(&path).is_err());
        let config = Config::load_or_default(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config.app.exercise, Exercise::Pushup);
        assert_eq!(config.pushup.ready_angle, 150);
        assert_eq!(config.squat.depth_min, 110);
    }
}
