pub mod angles;
pub mod config;
pub mod exercise;
pub mod geometry;
pub mod pose;
pub mod replay;
pub mod session;

pub use angles::{extract_angles, AngleMap, JointAngle};
pub use exercise::{evaluate, Exercise, Feedback, FormStatus, RepPhase};
pub use pose::{Landmark, LandmarkIndex, Pose};
pub use session::{Coach, FrameReport, SessionState};
