use crate::config::PlankConfig;
use crate::geometry::alignment_deviation;
use crate::pose::Pose;

use super::{Exercise, Feedback, FormCue};

/// プランクのフォーム判定（保持種目なので計数なし）
pub struct PlankEvaluator {
    alignment_tolerance: f32,
    hip_tolerance: f32,
}

impl PlankEvaluator {
    pub fn from_config(config: &PlankConfig) -> Self {
        Self {
            alignment_tolerance: config.alignment_tolerance,
            hip_tolerance: config.hip_tolerance,
        }
    }

    pub fn evaluate(&self, pose: &Pose) -> Feedback {
        let mut cues = Vec::new();

        if let Some([shoulder, hip, ankle]) = pose.body_line() {
            if alignment_deviation(shoulder, hip, ankle) > self.alignment_tolerance {
                cues.push(FormCue::BodyNotInLine);
            }
            if (shoulder.y - hip.y).abs() > self.hip_tolerance {
                cues.push(FormCue::HipsSagOrPike);
            }
        }

        Feedback::new(Exercise::Plank, cues)
    }
}

impl Default for PlankEvaluator {
    fn default() -> Self {
        Self::from_config(&PlankConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkIndex};

    fn plank(shoulder_y: f32, hip_y: f32, ankle_y: f32) -> Pose {
        use LandmarkIndex::*;
        let mut pose = Pose::new(vec![Landmark::default(); LandmarkIndex::COUNT]);
        for (index, x, y) in [
            (LeftShoulder, 0.2, shoulder_y),
            (RightShoulder, 0.2, shoulder_y),
            (LeftHip, 0.5, hip_y),
            (RightHip, 0.5, hip_y),
            (LeftAnkle, 0.8, ankle_y),
            (RightAnkle, 0.8, ankle_y),
        ] {
            pose.landmarks[index as usize] = Landmark::new(x, y, 0.9);
        }
        pose
    }

    #[test]
    fn test_great_plank() {
        let fb = PlankEvaluator::default().evaluate(&plank(0.5, 0.52, 0.54));
        assert_eq!(fb.message(), "Great plank!");
        assert!(fb.is_good());
    }

    #[test]
    fn test_hips_sag() {
        // 肩と腰のY差 0.1、ただし一直線
        let fb = PlankEvaluator::default().evaluate(&plank(0.4, 0.5, 0.6));
        assert_eq!(fb.cues(), &[FormCue::HipsSagOrPike]);
        assert!(fb.message().contains("sag or pike"));
    }

    #[test]
    fn test_bent_body() {
        let fb = PlankEvaluator::default().evaluate(&plank(0.5, 0.54, 0.5));
        assert_eq!(fb.cues(), &[FormCue::BodyNotInLine]);
    }

    #[test]
    fn test_missing_landmarks_no_cues() {
        let pose = Pose::new(vec![Landmark::new(0.5, 0.5, 0.9); 12]);
        assert!(PlankEvaluator::default().evaluate(&pose).is_good());
    }
}
