use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// 可視性の閾値。描画・角度計算・フォーム判定すべてで共通
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// MediaPipe Pose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 位置が正しい確信度 (0.0〜1.0)
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// 可視性が閾値を超えているか
    pub fn is_visible(&self) -> bool {
        self.visibility > VISIBILITY_THRESHOLD
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// 1フレーム分のランドマーク列
///
/// モデルが返した順序のまま保持する。33個未満のこともあり得るので
/// 取得は常に `Option` を返す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.landmarks.get(index as usize)
    }

    /// 存在し、かつ可視性が閾値を超えている場合のみ返す
    pub fn visible(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.get(index).filter(|lm| lm.is_visible())
    }

    /// 指定したランドマークがすべて存在し可視か
    pub fn all_valid(&self, indices: &[LandmarkIndex]) -> bool {
        indices.iter().all(|&i| self.visible(i).is_some())
    }

    /// 2点の中点（どちらかが欠けていれば None）
    pub fn midpoint(&self, a: LandmarkIndex, b: LandmarkIndex) -> Option<Point2D> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        Some(crate::geometry::midpoint(a.point(), b.point()))
    }

    /// 肩・腰・足首それぞれの左右中点
    pub fn body_line(&self) -> Option<[Point2D; 3]> {
        use LandmarkIndex::*;
        Some([
            self.midpoint(LeftShoulder, RightShoulder)?,
            self.midpoint(LeftHip, RightHip)?,
            self.midpoint(LeftAnkle, RightAnkle)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_pose(visibility: f32) -> Pose {
        Pose::new(vec![Landmark::new(0.5, 0.5, visibility); LandmarkIndex::COUNT])
    }

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
        assert_eq!(LandmarkIndex::RightFootIndex as usize, 32);
    }

    #[test]
    fn test_visibility_is_strictly_greater() {
        assert!(Landmark::new(0.0, 0.0, 0.51).is_visible());
        assert!(!Landmark::new(0.0, 0.0, 0.5).is_visible());
    }

    #[test]
    fn test_all_valid() {
        let mut pose = full_pose(0.9);
        let indices = [LandmarkIndex::LeftShoulder, LandmarkIndex::LeftElbow];
        assert!(pose.all_valid(&indices));

        pose.landmarks[LandmarkIndex::LeftElbow as usize].visibility = 0.2;
        assert!(!pose.all_valid(&indices));
    }

    #[test]
    fn test_all_valid_missing_index() {
        // 足首より先が切れたランドマーク列
        let pose = Pose::new(vec![Landmark::new(0.5, 0.5, 1.0); 20]);
        assert!(pose.all_valid(&[LandmarkIndex::LeftWrist]));
        assert!(!pose.all_valid(&[LandmarkIndex::LeftHip]));
        assert!(pose.get(LandmarkIndex::LeftKnee).is_none());
    }

    #[test]
    fn test_body_line() {
        let mut pose = full_pose(1.0);
        pose.landmarks[LandmarkIndex::LeftShoulder as usize] = Landmark::new(0.2, 0.4, 1.0);
        pose.landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(0.4, 0.2, 1.0);
        let [shoulder, _, _] = pose.body_line().unwrap();
        assert!((shoulder.x - 0.3).abs() < 1e-6);
        assert!((shoulder.y - 0.3).abs() < 1e-6);

        assert!(Pose::new(vec![]).body_line().is_none());
    }

    #[test]
    fn test_deserialize_without_visibility() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.75, 0.0));
    }
}
