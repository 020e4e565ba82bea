//! 2D幾何ユーティリティ
//!
//! すべて正規化画像座標 (0〜1, Y下向き) 上の純粋関数。

use serde::{Deserialize, Serialize};

/// これ未満の線分長は方向なしとみなす
const MIN_SEGMENT: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 頂点 b における角度 (度, 0〜180, 整数丸め)
///
/// b→a と b→c の方向差。a == b または c == b のときは方向が定まらないので 0。
pub fn angle_at(a: Point2D, b: Point2D, c: Point2D) -> u16 {
    if distance(a, b) < MIN_SEGMENT || distance(c, b) < MIN_SEGMENT {
        return 0;
    }
    let radians = f32::atan2(c.y - b.y, c.x - b.x) - f32::atan2(a.y - b.y, a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle.round().clamp(0.0, 180.0) as u16
}

pub fn midpoint(a: Point2D, b: Point2D) -> Point2D {
    Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

pub fn distance(a: Point2D, b: Point2D) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// 3点の連なり p1→p2→p3 の折れ角 (度, 0〜180)
///
/// 各線分の向きを atan2 で求めて差を取る。一直線なら 0。
/// 長さ 0 の線分を含む場合は折れを測れないので 0。
pub fn alignment_deviation(p1: Point2D, p2: Point2D, p3: Point2D) -> f32 {
    if distance(p1, p2) < MIN_SEGMENT || distance(p2, p3) < MIN_SEGMENT {
        return 0.0;
    }
    let first = f32::atan2(p2.y - p1.y, p2.x - p1.x);
    let second = f32::atan2(p3.y - p2.y, p3.x - p2.x);
    let mut deviation = (second - first).to_degrees().abs() % 360.0;
    if deviation > 180.0 {
        deviation = 360.0 - deviation;
    }
    deviation
}
