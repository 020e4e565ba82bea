//! 記録済みランドマーク列の読み込み
//!
//! 1行1フレームの JSON Lines。各行は `null`（人物なし）か
//! `{"x", "y", "visibility"}` の配列。空行は無視する。

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::pose::{Landmark, Pose};

/// None は「姿勢が検出されなかった」フレーム
pub type Frame = Option<Pose>;

pub fn parse_frame(line: &str) -> Result<Frame> {
    let landmarks: Option<Vec<Landmark>> = serde_json::from_str(line)?;
    Ok(landmarks.map(Pose::new))
}

pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", i + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame = parse_frame(line).with_context(|| format!("Invalid frame at line {}", i + 1))?;
        frames.push(frame);
    }
    Ok(frames)
}

pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open recording {}", path.display()))?;
    let frames = read_frames(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), frames = frames.len(), "recording loaded");
    Ok(frames)
}
