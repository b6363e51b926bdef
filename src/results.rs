//! Typed view of the `json` results entry.
//!
//! The camera only publishes this when "Send JSON over NT" is enabled. Every
//! field is optional on the wire and falls back to zero, empty or a
//! six-element zero pose.

use crate::estimate::Alliance;
use crate::protocol;
use crate::types::{Pose2d, Pose3d};
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

fn zero_pose() -> Vec<f64> {
    vec![0.0; protocol::POSE_LEN]
}

fn zero_corners() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0]; 4]
}

/// Accepts `true`/`false` as well as the numeric `1`/`0` the camera sends.
/// `null` reads as false.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
        Null,
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0.0,
        Flag::Null => false,
    })
}

/// The five 6DOF pose arrays attached to retroreflective and fiducial targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetPoses {
    #[serde(rename = "t6c_ts")]
    pub camera_pose_target_space: Vec<f64>,
    #[serde(rename = "t6r_fs")]
    pub robot_pose_field_space: Vec<f64>,
    #[serde(rename = "t6r_ts")]
    pub robot_pose_target_space: Vec<f64>,
    #[serde(rename = "t6t_cs")]
    pub target_pose_camera_space: Vec<f64>,
    #[serde(rename = "t6t_rs")]
    pub target_pose_robot_space: Vec<f64>,
}

impl Default for TargetPoses {
    fn default() -> Self {
        Self {
            camera_pose_target_space: zero_pose(),
            robot_pose_field_space: zero_pose(),
            robot_pose_target_space: zero_pose(),
            target_pose_camera_space: zero_pose(),
            target_pose_robot_space: zero_pose(),
        }
    }
}

impl TargetPoses {
    pub fn camera_pose_target_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.camera_pose_target_space)
    }

    pub fn robot_pose_field_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.robot_pose_field_space)
    }

    pub fn robot_pose_target_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.robot_pose_target_space)
    }

    pub fn target_pose_camera_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.target_pose_camera_space)
    }

    pub fn target_pose_robot_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.target_pose_robot_space)
    }

    pub fn camera_pose_target_space_2d(&self) -> Option<Pose2d> {
        protocol::decode_pose2d(&self.camera_pose_target_space)
    }

    pub fn robot_pose_field_space_2d(&self) -> Option<Pose2d> {
        protocol::decode_pose2d(&self.robot_pose_field_space)
    }

    pub fn robot_pose_target_space_2d(&self) -> Option<Pose2d> {
        protocol::decode_pose2d(&self.robot_pose_target_space)
    }

    pub fn target_pose_camera_space_2d(&self) -> Option<Pose2d> {
        protocol::decode_pose2d(&self.target_pose_camera_space)
    }

    pub fn target_pose_robot_space_2d(&self) -> Option<Pose2d> {
        protocol::decode_pose2d(&self.target_pose_robot_space)
    }
}

/// Color/retroreflective target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetroreflectiveTape {
    pub ta: f64,
    pub tx: f64,
    pub ty: f64,
    #[serde(rename = "txp")]
    pub tx_pixels: f64,
    #[serde(rename = "typ")]
    pub ty_pixels: f64,
    #[serde(rename = "tx_nocross")]
    pub tx_nocrosshair: f64,
    #[serde(rename = "ty_nocross")]
    pub ty_nocrosshair: f64,
    pub ts: f64,
    #[serde(flatten)]
    pub poses: TargetPoses,
}

/// AprilTag target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AprilTagFiducial {
    #[serde(rename = "fID")]
    pub fiducial_id: f64,
    #[serde(rename = "fam")]
    pub fiducial_family: String,
    pub ta: f64,
    pub tx: f64,
    pub ty: f64,
    #[serde(rename = "txp")]
    pub tx_pixels: f64,
    #[serde(rename = "typ")]
    pub ty_pixels: f64,
    #[serde(rename = "tx_nocross")]
    pub tx_nocrosshair: f64,
    #[serde(rename = "ty_nocross")]
    pub ty_nocrosshair: f64,
    pub ts: f64,
    #[serde(flatten)]
    pub poses: TargetPoses,
}

/// Neural classifier result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralClassifier {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "classID")]
    pub class_id: f64,
    #[serde(rename = "conf")]
    pub confidence: f64,
    pub zone: f64,
    pub tx: f64,
    #[serde(rename = "txp")]
    pub tx_pixels: f64,
    pub ty: f64,
    #[serde(rename = "typ")]
    pub ty_pixels: f64,
}

/// Neural detector result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralDetector {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "classID")]
    pub class_id: f64,
    #[serde(rename = "conf")]
    pub confidence: f64,
    pub ta: f64,
    pub tx: f64,
    pub ty: f64,
    #[serde(rename = "txp")]
    pub tx_pixels: f64,
    #[serde(rename = "typ")]
    pub ty_pixels: f64,
    #[serde(rename = "tx_nocross")]
    pub tx_nocrosshair: f64,
    #[serde(rename = "ty_nocross")]
    pub ty_nocrosshair: f64,
}

/// Decoded barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Barcode {
    #[serde(rename = "fam")]
    pub family: String,
    pub data: String,
    #[serde(rename = "txp")]
    pub tx_pixels: f64,
    #[serde(rename = "typ")]
    pub ty_pixels: f64,
    pub tx: f64,
    pub ty: f64,
    #[serde(rename = "tx_nocross")]
    pub tx_nocrosshair: f64,
    #[serde(rename = "ty_nocross")]
    pub ty_nocrosshair: f64,
    pub ta: f64,
    #[serde(rename = "pts")]
    pub corners: Vec<[f64; 2]>,
}

impl Default for Barcode {
    fn default() -> Self {
        Self {
            family: String::new(),
            data: String::new(),
            tx_pixels: 0.0,
            ty_pixels: 0.0,
            tx: 0.0,
            ty: 0.0,
            tx_nocrosshair: 0.0,
            ty_nocrosshair: 0.0,
            ta: 0.0,
            corners: zero_corners(),
        }
    }
}

/// Full pipeline output parsed from the `json` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimelightResults {
    pub error: Option<String>,
    #[serde(rename = "pID")]
    pub pipeline_id: f64,
    /// Pipeline latency, ms.
    #[serde(rename = "tl")]
    pub latency_pipeline: f64,
    /// Capture latency, ms.
    #[serde(rename = "cl")]
    pub latency_capture: f64,
    #[serde(rename = "latency_jsonParse")]
    pub latency_json_parse: f64,
    #[serde(rename = "ts")]
    pub timestamp_limelight_publish: f64,
    #[serde(rename = "ts_rio")]
    pub timestamp_rio_fpga_capture: f64,
    #[serde(rename = "v", deserialize_with = "flag")]
    pub valid: bool,
    pub botpose: Vec<f64>,
    pub botpose_wpired: Vec<f64>,
    pub botpose_wpiblue: Vec<f64>,
    pub botpose_tagcount: f64,
    pub botpose_span: f64,
    pub botpose_avgdist: f64,
    pub botpose_avgarea: f64,
    #[serde(rename = "t6c_rs")]
    pub camerapose_robotspace: Vec<f64>,
    #[serde(rename = "Retro")]
    pub targets_retro: Vec<RetroreflectiveTape>,
    #[serde(rename = "Fiducial")]
    pub targets_fiducials: Vec<AprilTagFiducial>,
    #[serde(rename = "Classifier")]
    pub targets_classifier: Vec<NeuralClassifier>,
    #[serde(rename = "Detector")]
    pub targets_detector: Vec<NeuralDetector>,
    #[serde(rename = "Barcode")]
    pub targets_barcode: Vec<Barcode>,
}

impl Default for LimelightResults {
    fn default() -> Self {
        Self {
            error: None,
            pipeline_id: 0.0,
            latency_pipeline: 0.0,
            latency_capture: 0.0,
            latency_json_parse: 0.0,
            timestamp_limelight_publish: 0.0,
            timestamp_rio_fpga_capture: 0.0,
            valid: false,
            botpose: zero_pose(),
            botpose_wpired: zero_pose(),
            botpose_wpiblue: zero_pose(),
            botpose_tagcount: 0.0,
            botpose_span: 0.0,
            botpose_avgdist: 0.0,
            botpose_avgarea: 0.0,
            camerapose_robotspace: zero_pose(),
            targets_retro: Vec::new(),
            targets_fiducials: Vec::new(),
            targets_classifier: Vec::new(),
            targets_detector: Vec::new(),
            targets_barcode: Vec::new(),
        }
    }
}

impl LimelightResults {
    fn botpose_for(&self, alliance: Option<Alliance>) -> &[f64] {
        match alliance {
            Some(Alliance::Red) => &self.botpose_wpired,
            Some(Alliance::Blue) => &self.botpose_wpiblue,
            None => &self.botpose,
        }
    }

    /// Robot pose in the alliance's origin, or field-center origin for `None`.
    pub fn bot_pose_3d(&self, alliance: Option<Alliance>) -> Option<Pose3d> {
        protocol::decode_pose6(self.botpose_for(alliance))
    }

    pub fn bot_pose_2d(&self, alliance: Option<Alliance>) -> Option<Pose2d> {
        protocol::decode_pose2d(self.botpose_for(alliance))
    }

    pub fn camera_pose_robot_space(&self) -> Option<Pose3d> {
        protocol::decode_pose6(&self.camerapose_robotspace)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for LimelightResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Partial JSON LimelightResults")?;
        writeln!(f, "error {}", self.error.as_deref().unwrap_or("none"))?;
        writeln!(f, "latency_jsonParse {}", self.latency_json_parse)?;
        writeln!(f, "pID {}", self.pipeline_id)?;
        writeln!(f, "tl {}", self.latency_pipeline)?;
        writeln!(f, "cl {}", self.latency_capture)?;
        writeln!(f, "ts {}", self.timestamp_limelight_publish)?;
        writeln!(f, "ts_rio {}", self.timestamp_rio_fpga_capture)?;
        writeln!(f, "v {}", self.valid)?;
        writeln!(f, "botpose {:?}", self.botpose)?;
        writeln!(f, "botpose_wpired {:?}", self.botpose_wpired)?;
        writeln!(f, "botpose_wpiblue {:?}", self.botpose_wpiblue)?;
        writeln!(f, "botpose_tagcount {}", self.botpose_tagcount)?;
        writeln!(f, "botpose_span {}", self.botpose_span)?;
        writeln!(f, "botpose_avgdist {}", self.botpose_avgdist)?;
        writeln!(f, "botpose_avgarea {}", self.botpose_avgarea)?;
        writeln!(f, "t6c_rs {:?}", self.camerapose_robotspace)?;
        writeln!(f, "Retro {} target(s)", self.targets_retro.len())?;
        writeln!(f, "Fiducial {} target(s)", self.targets_fiducials.len())?;
        writeln!(f, "Classifier {} target(s)", self.targets_classifier.len())?;
        writeln!(f, "Detector {} target(s)", self.targets_detector.len())?;
        write!(f, "Barcode {} target(s)", self.targets_barcode.len())
    }
}

/// Parse the `json` entry. An empty string means no results were published.
pub fn parse_results(json: &str) -> Result<Option<LimelightResults>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(json)?))
}
