use crate::protocol::{self, entry};
use crate::table::NetworkTable;
use crate::types::{Pose3d, RawFiducial};
use std::fmt;
use std::sync::Arc;

/// A robot pose estimate decoded from one MegaTag botpose entry.
///
/// Values are a snapshot of the entry at the time it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    pub pose: Pose3d,
    /// Capture time in seconds (publish time minus pipeline latency).
    pub timestamp_seconds: f64,
    /// Pipeline latency in milliseconds.
    pub latency: f64,
    pub tag_count: i32,
    pub tag_span: f64,
    pub avg_tag_dist: f64,
    pub avg_tag_area: f64,
    /// Per-tag details. May be empty even when `tag_count > 0`.
    pub raw_fiducials: Vec<RawFiducial>,
    pub is_megatag2: bool,
    /// True when at least one fiducial was decoded.
    pub has_data: bool,
}

impl PoseEstimate {
    /// Lowest per-tag ambiguity, or 1.0 when there are no fiducials.
    pub fn min_tag_ambiguity(&self) -> f64 {
        self.ambiguities().reduce(f64::min).unwrap_or(1.0)
    }

    /// Highest per-tag ambiguity, or 1.0 when there are no fiducials.
    pub fn max_tag_ambiguity(&self) -> f64 {
        self.ambiguities().reduce(f64::max).unwrap_or(1.0)
    }

    /// Mean per-tag ambiguity, or 1.0 when there are no fiducials.
    pub fn avg_tag_ambiguity(&self) -> f64 {
        if self.raw_fiducials.is_empty() {
            return 1.0;
        }
        self.ambiguities().sum::<f64>() / self.raw_fiducials.len() as f64
    }

    fn ambiguities(&self) -> impl Iterator<Item = f64> + '_ {
        self.raw_fiducials.iter().map(|f| f.ambiguity)
    }
}

impl fmt::Display for PoseEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_data {
            return write!(f, "No PoseEstimate available.");
        }

        writeln!(f, "Pose Estimate Information:")?;
        writeln!(f, "Timestamp (Seconds): {:.3}", self.timestamp_seconds)?;
        writeln!(f, "Latency: {:.3} ms", self.latency)?;
        writeln!(f, "Tag Count: {}", self.tag_count)?;
        writeln!(f, "Tag Span: {:.2} meters", self.tag_span)?;
        writeln!(f, "Average Tag Distance: {:.2} meters", self.avg_tag_dist)?;
        writeln!(f, "Average Tag Area: {:.2}% of image", self.avg_tag_area)?;
        writeln!(f, "Is MegaTag2: {}", self.is_megatag2)?;
        writeln!(f)?;
        writeln!(f, "Raw Fiducials Details:")?;
        for (i, fiducial) in self.raw_fiducials.iter().enumerate() {
            writeln!(f, "Fiducial: {}", i + 1)?;
            writeln!(f, "{}", fiducial)?;
        }
        Ok(())
    }
}

/// Alliance whose field origin a pose is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alliance {
    Red,
    Blue,
}

/// Localization algorithm to read estimates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimationMode {
    #[default]
    MegaTag1,
    /// Uses the robot orientation fed back via `robot_orientation_set`.
    MegaTag2,
}

/// Botpose entries a [`PoseEstimate`] can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotPose {
    /// Red alliance origin, MegaTag1. Not recommended.
    Red,
    /// Red alliance origin, MegaTag2. Not recommended.
    RedMegaTag2,
    /// Blue alliance origin, MegaTag1.
    Blue,
    /// Blue alliance origin, MegaTag2.
    BlueMegaTag2,
}

impl BotPose {
    pub fn select(alliance: Alliance, mode: EstimationMode) -> BotPose {
        match (alliance, mode) {
            (Alliance::Red, EstimationMode::MegaTag1) => BotPose::Red,
            (Alliance::Red, EstimationMode::MegaTag2) => BotPose::RedMegaTag2,
            (Alliance::Blue, EstimationMode::MegaTag1) => BotPose::Blue,
            (Alliance::Blue, EstimationMode::MegaTag2) => BotPose::BlueMegaTag2,
        }
    }

    pub fn entry_name(self) -> &'static str {
        match self {
            BotPose::Red => entry::BOT_POSE_RED,
            BotPose::RedMegaTag2 => entry::BOT_POSE_RED_MEGATAG2,
            BotPose::Blue => entry::BOT_POSE_BLUE,
            BotPose::BlueMegaTag2 => entry::BOT_POSE_BLUE_MEGATAG2,
        }
    }

    pub fn is_megatag2(self) -> bool {
        matches!(self, BotPose::RedMegaTag2 | BotPose::BlueMegaTag2)
    }

    /// Read and decode the current value of this entry.
    pub fn read(self, table: &dyn NetworkTable) -> Option<PoseEstimate> {
        let sample = table.get_f64_array_atomic(self.entry_name())?;
        let mut estimate = protocol::decode_pose_estimate(&sample.value, sample.timestamp_us)?;
        estimate.is_megatag2 = self.is_megatag2();
        Some(estimate)
    }
}

/// Reads pose estimates for one camera in a fixed [`EstimationMode`].
#[derive(Clone)]
pub struct PoseEstimator {
    table: Arc<dyn NetworkTable>,
    mode: EstimationMode,
}

impl PoseEstimator {
    pub fn new(table: Arc<dyn NetworkTable>, mode: EstimationMode) -> Self {
        Self { table, mode }
    }

    pub fn mode(&self) -> EstimationMode {
        self.mode
    }

    /// Estimate in the blue-alliance origin, the recommended convention.
    pub fn pose_estimate(&self) -> Option<PoseEstimate> {
        BotPose::select(Alliance::Blue, self.mode).read(self.table.as_ref())
    }

    /// Estimate in the given alliance's origin. `None` when the alliance is
    /// not yet known.
    pub fn alliance_pose_estimate(&self, alliance: Option<Alliance>) -> Option<PoseEstimate> {
        BotPose::select(alliance?, self.mode).read(self.table.as_ref())
    }

    /// Field-center origin pose from the legacy `botpose` entry.
    pub fn bot_pose(&self) -> Option<Pose3d> {
        let data = self.table.get_f64_array(entry::BOT_POSE)?;
        protocol::decode_pose6(&data)
    }
}
