use crate::config::{self, ClientConfig};
use crate::error::LimelightError;
use crate::estimate::{EstimationMode, PoseEstimator};
use crate::protocol::{self, entry};
use crate::results::{self, LimelightResults};
use crate::settings::LimelightSettings;
use crate::snapshot;
use crate::table::NetworkTable;
use crate::types::{Pose3d, RawDetection, RawFiducial, TargetMetrics};
use crate::Result;
use std::sync::Arc;

/// Client for one Limelight camera.
///
/// Every getter reads the table fresh. Missing entries read as `0.0`, an
/// empty string or an empty list; missing poses read as `None`.
#[derive(Clone)]
pub struct Limelight {
    name: String,
    table: Arc<dyn NetworkTable>,
    config: ClientConfig,
}

impl std::fmt::Debug for Limelight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Limelight")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Limelight {
    /// Create a client without checking that the camera is publishing.
    pub fn new(name: impl Into<String>, table: Arc<dyn NetworkTable>, config: ClientConfig) -> Self {
        let name = name.into();
        let name = config::sanitize_name(&name).to_string();
        Self {
            name,
            table,
            config,
        }
    }

    /// Create a client and wait for the camera to show up on the bus.
    ///
    /// Polls for `getpipe` up to `config.availability_attempts` times,
    /// sleeping `config.availability_delay` between attempts.
    pub fn connect(
        name: impl Into<String>,
        table: Arc<dyn NetworkTable>,
        config: ClientConfig,
    ) -> Result<Self> {
        let camera = Self::new(name, table, config);
        let attempts = camera.config.availability_attempts.max(1);

        for attempt in 1..=attempts {
            if camera.is_available() {
                log::info!("Limelight {} available after {} attempt(s)", camera.name, attempt);
                return Ok(camera);
            }
            log::debug!("Waiting for Limelight {} ({}/{})", camera.name, attempt, attempts);
            if attempt < attempts {
                std::thread::sleep(camera.config.availability_delay);
            }
        }

        log::error!(
            "Limelight {} not found after {} attempt(s)",
            camera.name,
            attempts
        );
        if camera.config.require_available {
            return Err(LimelightError::NotAvailable(camera.name));
        }
        log::warn!("Continuing without Limelight {}", camera.name);
        Ok(camera)
    }

    /// Single non-blocking availability probe.
    pub fn is_available(&self) -> bool {
        self.table.contains_key(entry::PIPELINE_INDEX)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Arc<dyn NetworkTable> {
        &self.table
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn f64_entry(&self, key: &str) -> f64 {
        self.table.get_f64(key).unwrap_or(0.0)
    }

    fn array_entry(&self, key: &str) -> Vec<f64> {
        self.table.get_f64_array(key).unwrap_or_default()
    }

    fn string_entry(&self, key: &str) -> String {
        self.table.get_string(key).unwrap_or_default()
    }

    fn pose_entry(&self, key: &str) -> Option<Pose3d> {
        protocol::decode_pose6(&self.array_entry(key))
    }

    // -- Target data --

    pub fn target_valid(&self) -> bool {
        self.f64_entry(entry::TARGET_VALID) == 1.0
    }

    /// Horizontal offset from the crosshair to the target, degrees.
    pub fn horizontal_offset(&self) -> f64 {
        self.f64_entry(entry::TX)
    }

    /// Vertical offset from the crosshair to the target, degrees.
    pub fn vertical_offset(&self) -> f64 {
        self.f64_entry(entry::TY)
    }

    /// Horizontal offset from the principal pixel to the target, degrees.
    pub fn horizontal_offset_from_principal(&self) -> f64 {
        self.f64_entry(entry::TXNC)
    }

    pub fn vertical_offset_from_principal(&self) -> f64 {
        self.f64_entry(entry::TYNC)
    }

    /// Target area, 0 to 100 percent of the image.
    pub fn target_area(&self) -> f64 {
        self.f64_entry(entry::TA)
    }

    /// ID of the primary AprilTag in view.
    pub fn april_tag_id(&self) -> i32 {
        self.f64_entry(entry::TAG_ID) as i32
    }

    /// Class name of the primary neural network result.
    pub fn neural_class_id(&self) -> String {
        self.string_entry(entry::NEURAL_CLASS)
    }

    /// Average color under the crosshair region as published.
    pub fn target_color(&self) -> Vec<f64> {
        self.array_entry(entry::TARGET_COLOR)
    }

    pub fn target_metrics(&self) -> TargetMetrics {
        protocol::decode_target_metrics(&self.array_entry(entry::TARGET_METRICS))
    }

    pub fn target_count(&self) -> i32 {
        self.target_metrics().count()
    }

    pub fn classifier_class_index(&self) -> i32 {
        self.target_metrics().classifier_class_index()
    }

    pub fn detector_class_index(&self) -> i32 {
        self.target_metrics().detector_class_index()
    }

    /// Robot pose in the coordinate system of the primary target.
    pub fn robot_to_target(&self) -> Option<Pose3d> {
        self.pose_entry(entry::BOT_POSE_TARGET_SPACE)
    }

    /// Camera pose in the coordinate system of the primary target.
    pub fn camera_to_target(&self) -> Option<Pose3d> {
        self.pose_entry(entry::CAMERA_POSE_TARGET_SPACE)
    }

    /// Target pose in the camera's coordinate system.
    pub fn target_to_camera(&self) -> Option<Pose3d> {
        self.pose_entry(entry::TARGET_POSE_CAMERA_SPACE)
    }

    /// Target pose in the robot's coordinate system.
    pub fn target_to_robot(&self) -> Option<Pose3d> {
        self.pose_entry(entry::TARGET_POSE_ROBOT_SPACE)
    }

    // -- Pipeline data --

    /// Pipeline processing latency, ms.
    pub fn processing_latency(&self) -> f64 {
        self.f64_entry(entry::PROCESSING_LATENCY)
    }

    /// Capture latency, ms.
    pub fn capture_latency(&self) -> f64 {
        self.f64_entry(entry::CAPTURE_LATENCY)
    }

    pub fn pipeline_index(&self) -> i32 {
        self.f64_entry(entry::PIPELINE_INDEX) as i32
    }

    pub fn pipeline_type(&self) -> String {
        self.string_entry(entry::PIPELINE_TYPE)
    }

    // -- Misc data --

    /// Values published by a Python SnapScript.
    pub fn python_output(&self) -> Vec<f64> {
        self.array_entry(entry::PYTHON_OUTPUT)
    }

    /// Values sent to a Python SnapScript.
    pub fn set_python_input(&self, values: &[f64]) {
        self.table.set_f64_array(entry::PYTHON_INPUT, values);
        self.table.flush();
    }

    pub fn barcodes(&self) -> Vec<String> {
        self.table
            .get_string_array(entry::RAW_BARCODES)
            .unwrap_or_default()
    }

    /// Camera pose in the robot's coordinate system.
    pub fn camera_to_robot(&self) -> Option<Pose3d> {
        self.pose_entry(entry::CAMERA_POSE_ROBOT_SPACE)
    }

    pub fn classifier_class(&self) -> String {
        self.string_entry(entry::CLASSIFIER_CLASS)
    }

    pub fn detector_class(&self) -> String {
        self.string_entry(entry::DETECTOR_CLASS)
    }

    pub fn raw_fiducials(&self) -> Vec<RawFiducial> {
        protocol::decode_raw_fiducials(&self.array_entry(entry::RAW_FIDUCIALS))
    }

    pub fn raw_detections(&self) -> Vec<RawDetection> {
        protocol::decode_raw_detections(&self.array_entry(entry::RAW_DETECTIONS))
    }

    /// Parse the `json` entry. Parse failures are logged and read as `None`.
    pub fn latest_results(&self) -> Option<LimelightResults> {
        match results::parse_results(&self.string_entry(entry::JSON)) {
            Ok(results) => results,
            Err(e) => {
                log::warn!("Discarding JSON results from {}: {}", self.name, e);
                None
            }
        }
    }

    // -- Actions --

    pub fn pose_estimator(&self, mode: EstimationMode) -> PoseEstimator {
        PoseEstimator::new(self.table.clone(), mode)
    }

    /// Push settings to the camera in one batch. Returns the number of
    /// entries written.
    pub fn apply(&self, settings: &LimelightSettings) -> usize {
        let written = settings.apply(self.table.as_ref());
        log::debug!("Applied {} setting(s) to {}", written, self.name);
        written
    }

    /// Ask the camera to save a snapshot. Best effort: the request runs in
    /// the background and its outcome is only logged.
    pub fn snapshot(&self, snapname: &str) {
        if let Err(e) = self.spawn_snapshot(snapname) {
            log::error!("{}", e);
        }
    }

    pub(crate) fn spawn_snapshot(&self, snapname: &str) -> Result<std::thread::JoinHandle<bool>> {
        let url = snapshot::snapshot_url(&self.config, &self.name);
        snapshot::spawn(url, snapname.to_string(), self.config.http_timeout)
    }

    pub fn flush(&self) {
        self.table.flush();
    }
}
