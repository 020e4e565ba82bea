//! 種目ごとのフォーム判定とレップ計数
//!
//! 評価器は閾値だけを持ち、状態は `SessionState` 側に置く。

pub mod plank;
pub mod pushup;
pub mod rep;
pub mod squat;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::angles::AngleMap;
use crate::config::Config;
use crate::pose::Pose;
use crate::session::SessionState;

pub use plank::PlankEvaluator;
pub use pushup::PushupEvaluator;
pub use rep::{RepCounter, RepPhase, RepThresholds};
pub use squat::SquatEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Pushup,
    Squat,
    Plank,
}

impl Exercise {
    /// CLI で選べる種目
    pub const ALL: [Exercise; 3] = [Exercise::Pushup, Exercise::Squat, Exercise::Plank];

    pub fn name(&self) -> &'static str {
        match self {
            Exercise::Pushup => "pushup",
            Exercise::Squat => "squat",
            Exercise::Plank => "plank",
        }
    }

    /// レップを数える種目か
    pub fn counts_reps(&self) -> bool {
        !matches!(self, Exercise::Plank)
    }

    /// 指摘がないときのメッセージ
    pub fn praise(&self) -> &'static str {
        match self {
            Exercise::Pushup => "Great push-up!",
            Exercise::Squat => "Good squat!",
            Exercise::Plank => "Great plank!",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pushup" | "push-up" => Ok(Exercise::Pushup),
            "squat" => Ok(Exercise::Squat),
            "plank" => Ok(Exercise::Plank),
            other => bail!(
                "Unknown exercise: {} (expected one of: {})",
                other,
                Exercise::ALL.map(|e| e.name()).join(", ")
            ),
        }
    }
}

/// フォームの指摘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCue {
    BodyNotStraight,
    GoLower,
    KneesOverToes,
    GoDeeper,
    KneeAngleTooOpen,
    ChestUp,
    BodyNotInLine,
    HipsSagOrPike,
}

impl FormCue {
    pub fn message(&self) -> &'static str {
        match self {
            FormCue::BodyNotStraight => "Keep body straight (no sag/sagging).",
            FormCue::GoLower => "Go lower (elbows <90° at bottom).",
            FormCue::KneesOverToes => "Keep knees over toes.",
            FormCue::GoDeeper => "Go deeper (hips below knees).",
            FormCue::KneeAngleTooOpen => "Squat deeper (knee angle too open).",
            FormCue::ChestUp => "Keep chest up, neutral spine.",
            FormCue::BodyNotInLine => "Keep your body in a straight line.",
            FormCue::HipsSagOrPike => "Don't let hips sag or pike.",
        }
    }
}

/// 表示色の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Good,
    NeedsCorrection,
}

/// 1フレーム分の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    exercise: Exercise,
    cues: Vec<FormCue>,
}

impl Feedback {
    pub fn new(exercise: Exercise, cues: Vec<FormCue>) -> Self {
        Self { exercise, cues }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn cues(&self) -> &[FormCue] {
        &self.cues
    }

    pub fn is_good(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn status(&self) -> FormStatus {
        if self.is_good() {
            FormStatus::Good
        } else {
            FormStatus::NeedsCorrection
        }
    }

    /// 指摘を空白区切りで連結。指摘がなければ種目ごとの褒め言葉
    pub fn message(&self) -> String {
        if self.is_good() {
            return self.exercise.praise().to_string();
        }
        self.cues
            .iter()
            .map(FormCue::message)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// 3種目の評価器をまとめたもの
#[derive(Default)]
pub struct Evaluator {
    pushup: PushupEvaluator,
    squat: SquatEvaluator,
    plank: PlankEvaluator,
}

impl Evaluator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pushup: PushupEvaluator::from_config(&config.pushup),
            squat: SquatEvaluator::from_config(&config.squat),
            plank: PlankEvaluator::from_config(&config.plank),
        }
    }

    /// 選択中の種目だけを評価し、その種目の状態だけを更新する
    pub fn evaluate(
        &self,
        exercise: Exercise,
        pose: &Pose,
        angles: &AngleMap,
        session: &mut SessionState,
    ) -> Feedback {
        match exercise {
            Exercise::Pushup => self.pushup.evaluate(pose, angles, &mut session.pushup),
            Exercise::Squat => self.squat.evaluate(pose, angles, &mut session.squat),
            Exercise::Plank => self.plank.evaluate(pose),
        }
    }
}

/// 組み込みのデフォルト閾値で評価する
///
/// config.toml は読まない。設定済みの閾値を使うなら `Evaluator::from_config` を使う。
pub fn evaluate(
    exercise: Exercise,
    pose: &Pose,
    angles: &AngleMap,
    session: &mut SessionState,
) -> Feedback {
    Evaluator::default().evaluate(exercise, pose, angles, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::JointAngle;
    use crate::pose::{Landmark, LandmarkIndex};

    #[test]
    fn test_exercise_from_str() {
        assert_eq!("pushup".parse::<Exercise>().unwrap(), Exercise::Pushup);
        assert_eq!("Push-Up".parse::<Exercise>().unwrap(), Exercise::Pushup);
        assert_eq!(" squat ".parse::<Exercise>().unwrap(), Exercise::Squat);
        assert_eq!("plank".parse::<Exercise>().unwrap(), Exercise::Plank);
        assert!("lunge".parse::<Exercise>().is_err());
    }

    #[test]
    fn test_unknown_exercise_lists_choices() {
        let err = "lunge".parse::<Exercise>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown exercise: lunge (expected one of: pushup, squat, plank)"
        );
    }

    #[test]
    fn test_feedback_status() {
        let good = Feedback::new(Exercise::Plank, vec![]);
        assert_eq!(good.status(), FormStatus::Good);
        assert_eq!(good.to_string(), "Great plank!");

        let bad = Feedback::new(Exercise::Squat, vec![FormCue::ChestUp]);
        assert_eq!(bad.status(), FormStatus::NeedsCorrection);
        assert_eq!(bad.message(), "Keep chest up, neutral spine.");
    }

    #[test]
    fn test_evaluate_touches_only_selected_exercise() {
        let pose = Pose::new(vec![Landmark::new(0.5, 0.5, 0.9); LandmarkIndex::COUNT]);
        let mut angles = AngleMap::new();
        angles.set(JointAngle::LeftElbow, 160);
        angles.set(JointAngle::LeftKnee, 170);

        let mut session = SessionState::new();
        for _ in 0..5 {
            evaluate(Exercise::Pushup, &pose, &angles, &mut session);
        }
        assert_eq!(session.pushup.phase(), RepPhase::Up);
        assert_eq!(session.squat, RepCounter::new());

        evaluate(Exercise::Plank, &pose, &angles, &mut session);
        assert_eq!(session.pushup.phase(), RepPhase::Up);
        assert_eq!(session.squat, RepCounter::new());
    }
}
