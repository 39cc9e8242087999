use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};

/// The 24 SMPL body joints, in model output order.
pub const SMPL_JOINT_NAMES: [&str; 24] = [
    "pelvis",
    "left_hip",
    "right_hip",
    "spine1",
    "left_knee",
    "right_knee",
    "spine2",
    "left_ankle",
    "right_ankle",
    "spine3",
    "left_foot",
    "right_foot",
    "neck",
    "left_collar",
    "right_collar",
    "head",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hand",
    "right_hand",
];

/// Default bones, by joint name.
pub const SMPL_BONES: [(&str, &str); 23] = [
    ("pelvis", "spine1"),
    ("spine1", "spine2"),
    ("spine2", "spine3"),
    ("spine3", "neck"),
    ("neck", "head"),
    ("spine3", "left_collar"),
    ("left_collar", "left_shoulder"),
    ("left_shoulder", "left_elbow"),
    ("left_elbow", "left_wrist"),
    ("left_wrist", "left_hand"),
    ("spine3", "right_collar"),
    ("right_collar", "right_shoulder"),
    ("right_shoulder", "right_elbow"),
    ("right_elbow", "right_wrist"),
    ("right_wrist", "right_hand"),
    ("pelvis", "left_hip"),
    ("left_hip", "left_knee"),
    ("left_knee", "left_ankle"),
    ("left_ankle", "left_foot"),
    ("pelvis", "right_hip"),
    ("right_hip", "right_knee"),
    ("right_knee", "right_ankle"),
    ("right_ankle", "right_foot"),
];

/// A 2D joint in image pixel space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Joint name (e.g. `left_knee`).
    pub name: String,
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Detection confidence; missing values read as `1.0`.
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl Joint {
    /// Build a joint.
    pub fn new(name: impl Into<String>, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }
}

/// Joints plus the index pairs connecting them.
///
/// Independent of the mesh: a skeleton may arrive for a frame whose mesh is absent or invalid.
/// When deserialized without `connections`, the SMPL bones are resolved by joint name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SkeletonDef")]
pub struct SkeletonFrame {
    /// Joints, in producer order.
    pub joints: Vec<Joint>,
    /// Segments as `(joint_a, joint_b)` indices into `joints`.
    pub connections: Vec<(usize, usize)>,
}

#[derive(Deserialize)]
struct SkeletonDef {
    #[serde(alias = "keypoints")]
    joints: Vec<Joint>,
    #[serde(default)]
    connections: Option<Vec<(usize, usize)>>,
}

impl From<SkeletonDef> for SkeletonFrame {
    fn from(def: SkeletonDef) -> Self {
        match def.connections {
            Some(connections) => Self {
                joints: def.joints,
                connections,
            },
            None => Self::with_default_connections(def.joints),
        }
    }
}

impl SkeletonFrame {
    /// Build a skeleton with explicit connections.
    pub fn new(joints: Vec<Joint>, connections: Vec<(usize, usize)>) -> Self {
        Self {
            joints,
            connections,
        }
    }

    /// Build a skeleton whose connections are the [`SMPL_BONES`] present among `joints`.
    ///
    /// Bones naming a joint that is not present are left out.
    pub fn with_default_connections(joints: Vec<Joint>) -> Self {
        let index_of = |name: &str| joints.iter().position(|j| j.name == name);
        let connections = SMPL_BONES
            .iter()
            .filter_map(|(a, b)| Some((index_of(a)?, index_of(b)?)))
            .collect();
        Self {
            joints,
            connections,
        }
    }

    /// Parse a skeleton from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OverlayError::serde(format!("parse skeleton JSON: {e}")))
    }

    /// Parse a skeleton from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OverlayError::serde(format!("open skeleton JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/skeleton.rs"]
mod tests;
