use serde::Serialize;

use crate::angles::{measure_angles, AngleMap};
use crate::config::Config;
use crate::exercise::{Evaluator, Exercise, Feedback, FormStatus, RepCounter, RepPhase};
use crate::pose::Pose;

/// フレームをまたいで保持する状態
///
/// 種目を切り替えても他種目の状態には触れない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub angles: AngleMap,
    pub pushup: RepCounter,
    pub squat: RepCounter,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 種目のレップカウンタ（プランクは None）
    pub fn counter(&self, exercise: Exercise) -> Option<&RepCounter> {
        match exercise {
            Exercise::Pushup => Some(&self.pushup),
            Exercise::Squat => Some(&self.squat),
            Exercise::Plank => None,
        }
    }

    pub fn rep_count(&self, exercise: Exercise) -> u32 {
        self.counter(exercise).map_or(0, RepCounter::reps)
    }

    pub fn phase(&self, exercise: Exercise) -> Option<RepPhase> {
        self.counter(exercise).map(RepCounter::phase)
    }

    /// 指定種目のレップ数とステートマシンだけを初期化
    pub fn reset(&mut self, exercise: Exercise) {
        match exercise {
            Exercise::Pushup => self.pushup.reset(),
            Exercise::Squat => self.squat.reset(),
            Exercise::Plank => {}
        }
        tracing::info!(exercise = exercise.name(), "session reset");
    }
}

/// 1フレームの処理結果
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub exercise: Exercise,
    pub message: String,
    pub status: FormStatus,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<RepPhase>,
    pub angles: AngleMap,
}

/// 角度抽出 → 評価 → 状態更新 をまとめて行う
pub struct Coach {
    evaluator: Evaluator,
    session: SessionState,
    last_feedback: Option<Feedback>,
}

impl Coach {
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::default(),
            session: SessionState::new(),
            last_feedback: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            evaluator: Evaluator::from_config(config),
            session: SessionState::new(),
            last_feedback: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// 直近に出したフィードバック（スキップしたフレームでは更新しない）
    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    pub fn reset(&mut self, exercise: Exercise) {
        self.session.reset(exercise);
        if self.last_feedback.as_ref().map(Feedback::exercise) == Some(exercise) {
            self.last_feedback = None;
        }
    }

    /// 1フレーム処理する
    ///
    /// 姿勢なし、または角度が1つも計算できないフレームは None（状態は変えない）。
    pub fn process_frame(&mut self, exercise: Exercise, pose: Option<&Pose>) -> Option<FrameReport> {
        let Some(pose) = pose else {
            tracing::trace!("no pose in frame");
            return None;
        };

        let measured = measure_angles(pose);
        if measured.is_empty() {
            tracing::debug!("no computable angles, frame skipped");
            return None;
        }
        self.session.angles.merge(&measured);

        let angles = self.session.angles;
        let feedback = self
            .evaluator
            .evaluate(exercise, pose, &angles, &mut self.session);

        let report = FrameReport {
            exercise,
            message: feedback.message(),
            status: feedback.status(),
            reps: self.session.rep_count(exercise),
            phase: self.session.phase(exercise),
            angles,
        };
        self.last_feedback = Some(feedback);
        Some(report)
    }
}

impl Default for Coach {
    fn default() -> Self {
        Self::new()
    }
}
