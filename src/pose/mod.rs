pub mod landmark;

pub use landmark::{Landmark, LandmarkIndex, Pose, VISIBILITY_THRESHOLD};
