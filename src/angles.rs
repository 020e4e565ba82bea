use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::geometry::angle_at;
use crate::pose::{LandmarkIndex, Pose};

/// 計測する関節角度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointAngle {
    LeftElbow = 0,
    RightElbow = 1,
    LeftKnee = 2,
    RightKnee = 3,
    LeftShoulder = 4,
    RightShoulder = 5,
}

impl JointAngle {
    pub const COUNT: usize = 6;

    pub const ALL: [JointAngle; Self::COUNT] = [
        JointAngle::LeftElbow,
        JointAngle::RightElbow,
        JointAngle::LeftKnee,
        JointAngle::RightKnee,
        JointAngle::LeftShoulder,
        JointAngle::RightShoulder,
    ];

    /// (端点A, 頂点B, 端点C)
    pub fn triple(&self) -> [LandmarkIndex; 3] {
        use LandmarkIndex::*;
        match self {
            JointAngle::LeftElbow => [LeftShoulder, LeftElbow, LeftWrist],
            JointAngle::RightElbow => [RightShoulder, RightElbow, RightWrist],
            JointAngle::LeftKnee => [LeftHip, LeftKnee, LeftAnkle],
            JointAngle::RightKnee => [RightHip, RightKnee, RightAnkle],
            JointAngle::LeftShoulder => [LeftElbow, LeftShoulder, LeftHip],
            JointAngle::RightShoulder => [RightElbow, RightShoulder, RightHip],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JointAngle::LeftElbow => "leftElbow",
            JointAngle::RightElbow => "rightElbow",
            JointAngle::LeftKnee => "leftKnee",
            JointAngle::RightKnee => "rightKnee",
            JointAngle::LeftShoulder => "leftShoulder",
            JointAngle::RightShoulder => "rightShoulder",
        }
    }

    /// このフレームで計算できれば角度を返す
    pub fn measure(&self, pose: &Pose) -> Option<u16> {
        let triple = self.triple();
        if !pose.all_valid(&triple) {
            return None;
        }
        let [a, b, c] = triple.map(|index| pose.landmarks[index as usize].point());
        Some(angle_at(a, b, c))
    }
}

/// 直近で分かっている関節角度（度）
///
/// 一時的に隠れた関節は前回値を保持し続ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AngleMap {
    values: [Option<u16>; JointAngle::COUNT],
}

impl AngleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: JointAngle) -> Option<u16> {
        self.values[joint as usize]
    }

    pub fn set(&mut self, joint: JointAngle, degrees: u16) {
        self.values[joint as usize] = Some(degrees.min(180));
    }

    /// `other` にある値だけ上書きする
    pub fn merge(&mut self, other: &AngleMap) {
        for (slot, value) in self.values.iter_mut().zip(other.values.iter()) {
            if value.is_some() {
                *slot = *value;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointAngle, u16)> + '_ {
        JointAngle::ALL
            .iter()
            .filter_map(move |&joint| self.get(joint).map(|deg| (joint, deg)))
    }
}

impl Serialize for AngleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (joint, degrees) in self.iter() {
            map.serialize_entry(joint.name(), &degrees)?;
        }
        map.end()
    }
}

/// このフレームで計算できた角度だけを返す
pub fn measure_angles(pose: &Pose) -> AngleMap {
    let mut measured = AngleMap::new();
    for joint in JointAngle::ALL {
        if let Some(degrees) = joint.measure(pose) {
            measured.set(joint, degrees);
        }
    }
    measured
}

/// 前回までの角度にこのフレームの計測値をマージして返す
///
/// pose が無い、または1つも計算できなければ前回値をそのまま返す。
pub fn extract_angles(pose: Option<&Pose>, previous: &AngleMap) -> AngleMap {
    let mut merged = *previous;
    if let Some(pose) = pose {
        merged.merge(&measure_angles(pose));
    }
    merged
}
