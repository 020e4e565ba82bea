use crate::angles::{AngleMap, JointAngle};
use crate::config::PushupConfig;
use crate::geometry::alignment_deviation;
use crate::pose::Pose;

use super::rep::{RepCounter, RepThresholds};
use super::{Exercise, Feedback, FormCue};

/// 腕立て伏せのフォーム判定とレップ計数
pub struct PushupEvaluator {
    thresholds: RepThresholds,
    shallow_angle: u16,
    alignment_tolerance: f32,
}

impl PushupEvaluator {
    pub fn from_config(config: &PushupConfig) -> Self {
        Self {
            thresholds: RepThresholds {
                ready_angle: config.ready_angle,
                down_angle: config.down_angle,
                ready_frames: config.ready_frames,
            },
            shallow_angle: config.shallow_angle,
            alignment_tolerance: config.alignment_tolerance,
        }
    }

    pub fn evaluate(&self, pose: &Pose, angles: &AngleMap, counter: &mut RepCounter) -> Feedback {
        let mut cues = Vec::new();

        if let Some([shoulder, hip, ankle]) = pose.body_line() {
            if alignment_deviation(shoulder, hip, ankle) > self.alignment_tolerance {
                cues.push(FormCue::BodyNotStraight);
            }
        }

        // 両肘とも分かっているときだけ判定
        let left = angles.get(JointAngle::LeftElbow);
        let right = angles.get(JointAngle::RightElbow);
        if let (Some(left), Some(right)) = (left, right) {
            if left > self.shallow_angle && right > self.shallow_angle {
                cues.push(FormCue::GoLower);
            }
        }

        // 計数は左肘のみ
        if counter.update(left, &self.thresholds) {
            tracing::info!(reps = counter.reps(), "push-up rep");
        }

        Feedback::new(Exercise::Pushup, cues)
    }
}

impl Default for PushupEvaluator {
    fn default() -> Self {
        Self::from_config(&PushupConfig::default())
    }
}
