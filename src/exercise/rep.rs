use serde::Serialize;

/// レップ計数ステートマシンの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// 開始姿勢をまだ確認していない
    #[default]
    NotReady,
    Up,
    Down,
}

impl RepPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RepPhase::NotReady => "not_ready",
            RepPhase::Up => "up",
            RepPhase::Down => "down",
        }
    }
}

/// 1種目分の判定角度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepThresholds {
    /// 伸展と判定する角度（これを超える）
    pub ready_angle: u16,
    /// 屈曲と判定する角度（これ未満）
    pub down_angle: u16,
    /// NotReady → Up に必要な連続フレーム数
    pub ready_frames: u32,
}

/// 1関節角度で駆動するレップカウンタ
///
/// NotReady → Up → Down → Up → ... と遷移し、Down → Up で1回数える。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepCounter {
    phase: RepPhase,
    reps: u32,
    /// NotReady 中の連続伸展フレーム数
    ready_streak: u32,
}

impl RepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn ready_streak(&self) -> u32 {
        self.ready_streak
    }

    /// 1フレーム分の角度で状態を進める。レップが完了したら true
    ///
    /// 角度が無いフレームでは何もしない（連続カウントも維持）。
    pub fn update(&mut self, angle: Option<u16>, thresholds: &RepThresholds) -> bool {
        let Some(angle) = angle else {
            return false;
        };

        match self.phase {
            RepPhase::NotReady => {
                if angle > thresholds.ready_angle {
                    self.ready_streak += 1;
                    if self.ready_streak >= thresholds.ready_frames {
                        self.ready_streak = 0;
                        self.transition(RepPhase::Up, angle);
                    }
                } else {
                    self.ready_streak = 0;
                }
            }
            RepPhase::Up => {
                if angle < thresholds.down_angle {
                    self.transition(RepPhase::Down, angle);
                }
            }
            RepPhase::Down => {
                if angle > thresholds.ready_angle {
                    self.transition(RepPhase::Up, angle);
                    self.reps += 1;
                    return true;
                }
            }
        }
        false
    }

    fn transition(&mut self, next: RepPhase, angle: u16) {
        tracing::debug!(from = self.phase.name(), to = next.name(), angle, "rep phase");
        self.phase = next;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
