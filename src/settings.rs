use crate::protocol::{self, entry};
use crate::table::NetworkTable;
use crate::types::{Orientation3d, Pose3d, Translation3d};

/// LED mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    PipelineControl = 0,
    ForceOff = 1,
    ForceBlink = 2,
    ForceOn = 3,
}

/// IMU source for MegaTag2 localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImuMode {
    /// Use the yaw sent via robot orientation; internal IMU ignored.
    ExternalImu = 0,
    /// Use the external yaw and keep the internal IMU synced to it.
    SyncInternalImu = 1,
    /// Use the internal IMU; external orientation updates are ignored.
    InternalImu = 2,
}

/// Stream layout when a secondary camera is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Standard = 0,
    PictureInPictureMain = 1,
    PictureInPictureSecondary = 2,
}

/// AprilTag detection downscaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownscalingOverride {
    Pipeline,
    NoDownscale,
    HalfDownscale,
    DoubleDownscale,
    TripleDownscale,
    QuadrupleDownscale,
}

impl DownscalingOverride {
    pub fn wire_value(self) -> f64 {
        match self {
            DownscalingOverride::Pipeline => 0.0,
            DownscalingOverride::NoDownscale => 1.0,
            DownscalingOverride::HalfDownscale => 1.5,
            DownscalingOverride::DoubleDownscale => 2.0,
            DownscalingOverride::TripleDownscale => 3.0,
            DownscalingOverride::QuadrupleDownscale => 4.0,
        }
    }
}

/// Normalized crop rectangle, each bound in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Settings to push to the camera.
///
/// Only fields that are `Some` are written. Build with the `with_*` methods
/// and send in one batch with [`LimelightSettings::apply`] or
/// `Limelight::apply`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LimelightSettings {
    pub led_mode: Option<LedMode>,
    pub pipeline_index: Option<u32>,
    pub priority_tag_id: Option<i32>,
    pub stream_mode: Option<StreamMode>,
    pub crop_window: Option<CropWindow>,
    pub imu_mode: Option<ImuMode>,
    pub robot_orientation: Option<Orientation3d>,
    pub fiducial_downscaling: Option<DownscalingOverride>,
    /// Point of interest offset from the tracked AprilTag.
    pub april_tag_offset: Option<Translation3d>,
    pub april_tag_id_filter: Option<Vec<i32>>,
    pub camera_to_robot: Option<Pose3d>,
}

impl LimelightSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_led_mode(mut self, mode: LedMode) -> Self {
        self.led_mode = Some(mode);
        self
    }

    pub fn with_pipeline_index(mut self, index: u32) -> Self {
        self.pipeline_index = Some(index);
        self
    }

    pub fn with_priority_tag_id(mut self, id: i32) -> Self {
        self.priority_tag_id = Some(id);
        self
    }

    pub fn with_stream_mode(mut self, mode: StreamMode) -> Self {
        self.stream_mode = Some(mode);
        self
    }

    pub fn with_crop_window(mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        self.crop_window = Some(CropWindow {
            min_x,
            max_x,
            min_y,
            max_y,
        });
        self
    }

    pub fn with_imu_mode(mut self, mode: ImuMode) -> Self {
        self.imu_mode = Some(mode);
        self
    }

    pub fn with_robot_orientation(mut self, orientation: Orientation3d) -> Self {
        self.robot_orientation = Some(orientation);
        self
    }

    pub fn with_fiducial_downscaling(mut self, downscaling: DownscalingOverride) -> Self {
        self.fiducial_downscaling = Some(downscaling);
        self
    }

    pub fn with_april_tag_offset(mut self, offset: Translation3d) -> Self {
        self.april_tag_offset = Some(offset);
        self
    }

    pub fn with_april_tag_id_filter(mut self, ids: impl Into<Vec<i32>>) -> Self {
        self.april_tag_id_filter = Some(ids.into());
        self
    }

    pub fn with_camera_to_robot(mut self, pose: Pose3d) -> Self {
        self.camera_to_robot = Some(pose);
        self
    }

    /// Write every set field to `table` and flush. Returns the number of
    /// entries written.
    pub fn apply(&self, table: &dyn NetworkTable) -> usize {
        let mut written = 0;
        let mut set = |key: &str, value: f64| {
            log::debug!("set {} = {}", key, value);
            table.set_f64(key, value);
            written += 1;
        };

        if let Some(mode) = self.led_mode {
            set(entry::LED_MODE, mode as i32 as f64);
        }
        if let Some(index) = self.pipeline_index {
            set(entry::PIPELINE, index as f64);
        }
        if let Some(id) = self.priority_tag_id {
            set(entry::PRIORITY_ID, id as f64);
        }
        if let Some(mode) = self.stream_mode {
            set(entry::STREAM, mode as i32 as f64);
        }
        if let Some(mode) = self.imu_mode {
            set(entry::IMU_MODE, mode as i32 as f64);
        }
        if let Some(downscaling) = self.fiducial_downscaling {
            set(entry::FIDUCIAL_DOWNSCALE, downscaling.wire_value());
        }

        let mut set_array = |key: &str, value: &[f64]| {
            log::debug!("set {} = {:?}", key, value);
            table.set_f64_array(key, value);
            written += 1;
        };

        if let Some(crop) = self.crop_window {
            set_array(
                entry::CROP,
                &protocol::encode_crop_window(crop.min_x, crop.max_x, crop.min_y, crop.max_y),
            );
        }
        if let Some(orientation) = &self.robot_orientation {
            set_array(
                entry::ROBOT_ORIENTATION,
                &protocol::encode_orientation6(orientation),
            );
        }
        if let Some(offset) = &self.april_tag_offset {
            set_array(entry::FIDUCIAL_OFFSET, &protocol::encode_translation3(offset));
        }
        if let Some(ids) = &self.april_tag_id_filter {
            let ids: Vec<f64> = ids.iter().map(|&id| id as f64).collect();
            set_array(entry::FIDUCIAL_ID_FILTERS, &ids);
        }
        if let Some(pose) = &self.camera_to_robot {
            set_array(
                entry::CAMERA_POSE_ROBOT_SPACE_SET,
                &protocol::encode_pose6(pose),
            );
        }

        table.flush();
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MemoryTable;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_settings_write_nothing() {
        let table = MemoryTable::new();
        assert_eq!(LimelightSettings::new().apply(&table), 0);
        assert!(table.keys().is_empty());
    }

    #[test]
    fn test_scalar_settings() {
        let table = MemoryTable::new();
        let written = LimelightSettings::new()
            .with_led_mode(LedMode::ForceBlink)
            .with_pipeline_index(3)
            .with_priority_tag_id(12)
            .with_stream_mode(StreamMode::PictureInPictureSecondary)
            .with_imu_mode(ImuMode::SyncInternalImu)
            .with_fiducial_downscaling(DownscalingOverride::HalfDownscale)
            .apply(&table);

        assert_eq!(written, 6);
        assert_eq!(table.get_f64("ledMode"), Some(2.0));
        assert_eq!(table.get_f64("pipeline"), Some(3.0));
        assert_eq!(table.get_f64("priorityid"), Some(12.0));
        assert_eq!(table.get_f64("stream"), Some(2.0));
        assert_eq!(table.get_f64("imumode_set"), Some(1.0));
        assert_eq!(table.get_f64("fiducial_downscale_set"), Some(1.5));
    }

    #[test]
    fn test_array_settings() {
        let table = MemoryTable::new();
        LimelightSettings::new()
            .with_crop_window(-0.5, 0.5, -1.0, 1.0)
            .with_robot_orientation(Orientation3d::from_yaw_degrees(90.0, 15.0))
            .with_april_tag_offset(Translation3d::new(0.0, 0.1, 0.2))
            .with_april_tag_id_filter(vec![3, 4, 7])
            .with_camera_to_robot(Pose3d::new(Translation3d::new(0.3, 0.0, 0.5), 0.0, 0.0, 0.0))
            .apply(&table);

        assert_eq!(table.get_f64_array("crop"), Some(vec![-0.5, 0.5, -1.0, 1.0]));
        assert_eq!(
            table.get_f64_array("fiducial_offset_set"),
            Some(vec![0.0, 0.1, 0.2])
        );
        assert_eq!(
            table.get_f64_array("fiducial_id_filters_set"),
            Some(vec![3.0, 4.0, 7.0])
        );

        let orientation = table.get_f64_array("robot_orientation_set").unwrap();
        assert_eq!(orientation.len(), 6);
        assert_abs_diff_eq!(orientation[0], 90.0, epsilon = 1e-9);
        assert_eq!(orientation[1], 15.0);

        let camera = table.get_f64_array("camerapose_robotspace_set").unwrap();
        assert_eq!(&camera[..3], &[0.3, 0.0, 0.5]);
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(LedMode::PipelineControl as i32, 0);
        assert_eq!(LedMode::ForceOn as i32, 3);
        assert_eq!(ImuMode::InternalImu as i32, 2);
        assert_eq!(DownscalingOverride::Pipeline.wire_value(), 0.0);
        assert_eq!(DownscalingOverride::QuadrupleDownscale.wire_value(), 4.0);
    }
}
