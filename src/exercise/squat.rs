use crate::angles::{AngleMap, JointAngle};
use crate::config::SquatConfig;
use crate::geometry::angle_at;
use crate::pose::{LandmarkIndex, Pose};

use super::rep::{RepCounter, RepThresholds};
use super::{Exercise, Feedback, FormCue};

/// スクワットのフォーム判定とレップ計数
pub struct SquatEvaluator {
    thresholds: RepThresholds,
    depth_min: u16,
    depth_max: u16,
    knee_toe_tolerance: f32,
    torso_min: u16,
    torso_max: u16,
}

impl SquatEvaluator {
    pub fn from_config(config: &SquatConfig) -> Self {
        Self {
            thresholds: RepThresholds {
                ready_angle: config.ready_angle,
                down_angle: config.down_angle,
                ready_frames: config.ready_frames,
            },
            depth_min: config.depth_min,
            depth_max: config.depth_max,
            knee_toe_tolerance: config.knee_toe_tolerance,
            torso_min: config.torso_min,
            torso_max: config.torso_max,
        }
    }

    /// 膝が足首の真上から外れているか
    fn knee_drifts(&self, pose: &Pose, knee: LandmarkIndex, ankle: LandmarkIndex) -> bool {
        match (pose.get(knee), pose.get(ankle)) {
            (Some(knee), Some(ankle)) => (knee.x - ankle.x).abs() > self.knee_toe_tolerance,
            _ => false,
        }
    }

    pub fn evaluate(&self, pose: &Pose, angles: &AngleMap, counter: &mut RepCounter) -> Feedback {
        let mut cues = Vec::new();

        // 左右それぞれで指摘する
        for (knee, ankle) in [
            (LandmarkIndex::LeftKnee, LandmarkIndex::LeftAnkle),
            (LandmarkIndex::RightKnee, LandmarkIndex::RightAnkle),
        ] {
            if self.knee_drifts(pose, knee, ankle) {
                cues.push(FormCue::KneesOverToes);
            }
        }

        let left = angles.get(JointAngle::LeftKnee);
        let right = angles.get(JointAngle::RightKnee);
        let knees = [left, right];

        // 浅すぎ・深すぎは同時に出ることがある
        if knees.iter().flatten().any(|&k| k < self.depth_min) {
            cues.push(FormCue::GoDeeper);
        }
        if knees.iter().flatten().any(|&k| k > self.depth_max) {
            cues.push(FormCue::KneeAngleTooOpen);
        }

        if let Some([shoulder, hip, ankle]) = pose.body_line() {
            let torso = angle_at(shoulder, hip, ankle);
            if torso < self.torso_min || torso > self.torso_max {
                cues.push(FormCue::ChestUp);
            }
        }

        // 計数は左膝のみ
        if counter.update(left, &self.thresholds) {
            tracing::info!(reps = counter.reps(), "squat rep");
        }

        Feedback::new(Exercise::Squat, cues)
    }
}

impl Default for SquatEvaluator {
    fn default() -> Self {
        Self::from_config(&SquatConfig::default())
    }
}
