//! Fixed-layout array codec for Limelight NetworkTables entries.
//!
//! Every array the camera publishes is a flat, row-major sequence of `f64`
//! with a fixed stride. Angles are degrees on the wire and radians in the
//! decoded rotation types; distances are meters.
//!
//! Decoding is total: short or misaligned arrays yield `None`, an empty
//! list or zeroed metrics, and never panic.

use crate::estimate::PoseEstimate;
use crate::types::{
    AngularVelocity3d, Orientation3d, Pose2d, Pose3d, RawDetection, RawFiducial, TargetMetrics,
    Translation3d,
};
use nalgebra::Rotation3;

/// NetworkTables entry names published or consumed by the camera.
pub mod entry {
    // -- Targeting --
    pub const TARGET_VALID: &str = "tv";
    pub const TX: &str = "tx";
    pub const TY: &str = "ty";
    pub const TXNC: &str = "txnc";
    pub const TYNC: &str = "tync";
    pub const TA: &str = "ta";
    pub const TAG_ID: &str = "tid";
    pub const NEURAL_CLASS: &str = "tclass";
    pub const TARGET_COLOR: &str = "tc";
    pub const TARGET_METRICS: &str = "t2d";

    // -- Pipeline --
    pub const PIPELINE_INDEX: &str = "getpipe";
    pub const PIPELINE_TYPE: &str = "getpipetype";
    pub const PROCESSING_LATENCY: &str = "tl";
    pub const CAPTURE_LATENCY: &str = "cl";

    // -- Raw results --
    pub const JSON: &str = "json";
    pub const RAW_FIDUCIALS: &str = "rawfiducials";
    pub const RAW_DETECTIONS: &str = "rawdetections";
    pub const RAW_BARCODES: &str = "rawbarcodes";
    pub const CLASSIFIER_CLASS: &str = "tcclass";
    pub const DETECTOR_CLASS: &str = "tdclass";
    pub const PYTHON_OUTPUT: &str = "llpython";

    // -- 6DOF poses --
    pub const CAMERA_POSE_ROBOT_SPACE: &str = "camerapose_robotspace";
    pub const TARGET_POSE_ROBOT_SPACE: &str = "targetpose_robotspace";
    pub const TARGET_POSE_CAMERA_SPACE: &str = "targetpose_cameraspace";
    pub const CAMERA_POSE_TARGET_SPACE: &str = "camerapose_targetspace";
    pub const BOT_POSE_TARGET_SPACE: &str = "botpose_targetspace";
    pub const BOT_POSE: &str = "botpose";
    pub const BOT_POSE_BLUE: &str = "botpose_wpiblue";
    pub const BOT_POSE_RED: &str = "botpose_wpired";
    pub const BOT_POSE_BLUE_MEGATAG2: &str = "botpose_orb_wpiblue";
    pub const BOT_POSE_RED_MEGATAG2: &str = "botpose_orb_wpired";

    // -- Settings (robot to camera) --
    pub const LED_MODE: &str = "ledMode";
    pub const PIPELINE: &str = "pipeline";
    pub const PRIORITY_ID: &str = "priorityid";
    pub const STREAM: &str = "stream";
    pub const CROP: &str = "crop";
    pub const IMU_MODE: &str = "imumode_set";
    pub const ROBOT_ORIENTATION: &str = "robot_orientation_set";
    pub const FIDUCIAL_DOWNSCALE: &str = "fiducial_downscale_set";
    pub const FIDUCIAL_OFFSET: &str = "fiducial_offset_set";
    pub const CAMERA_POSE_ROBOT_SPACE_SET: &str = "camerapose_robotspace_set";
    pub const FIDUCIAL_ID_FILTERS: &str = "fiducial_id_filters_set";
    pub const PYTHON_INPUT: &str = "llrobot";
}

// -- Array geometry --
pub const POSE_LEN: usize = 6;
pub const TRANSLATION_LEN: usize = 3;
pub const ORIENTATION_LEN: usize = 6;
pub const FIDUCIAL_STRIDE: usize = 7;
pub const DETECTION_STRIDE: usize = 12;
pub const TARGET_METRICS_LEN: usize = 17;

/// Pose estimate header: pose(6) + latency + tag count + span + avg dist + avg area.
pub const POSE_ESTIMATE_HEADER_LEN: usize = 11;

// -- Pose estimate header offsets --
const IDX_LATENCY: usize = 6;
const IDX_TAG_COUNT: usize = 7;
const IDX_TAG_SPAN: usize = 8;
const IDX_AVG_DIST: usize = 9;
const IDX_AVG_AREA: usize = 10;

/// Read `data[position]`, or 0.0 if the array is too short.
pub fn extract_array_entry(data: &[f64], position: usize) -> f64 {
    data.get(position).copied().unwrap_or(0.0)
}

/// Decode `[x, y, z, roll, pitch, yaw]` (degrees) into a pose.
///
/// Arrays shorter than six elements mean "no pose", not a zero pose.
pub fn decode_pose6(data: &[f64]) -> Option<Pose3d> {
    if data.len() < POSE_LEN {
        return None;
    }
    Some(Pose3d::new(
        Translation3d::new(data[0], data[1], data[2]),
        data[3].to_radians(),
        data[4].to_radians(),
        data[5].to_radians(),
    ))
}

/// Decode the floor-plane projection of a six-element pose array.
pub fn decode_pose2d(data: &[f64]) -> Option<Pose2d> {
    if data.len() < POSE_LEN {
        return None;
    }
    Some(Pose2d {
        x: data[0],
        y: data[1],
        yaw: data[5].to_radians(),
    })
}

pub fn decode_translation3(data: &[f64]) -> Option<Translation3d> {
    if data.len() < TRANSLATION_LEN {
        return None;
    }
    Some(Translation3d::new(data[0], data[1], data[2]))
}

/// Decode `[yaw, yaw_rate, pitch, pitch_rate, roll, roll_rate]`.
///
/// Note the yaw-first order, unlike the roll-first pose layout.
pub fn decode_orientation6(data: &[f64]) -> Option<Orientation3d> {
    if data.len() < ORIENTATION_LEN {
        return None;
    }
    Some(Orientation3d {
        rotation: Rotation3::from_euler_angles(
            data[4].to_radians(),
            data[2].to_radians(),
            data[0].to_radians(),
        ),
        angular_velocity: AngularVelocity3d {
            roll: data[5],
            pitch: data[3],
            yaw: data[1],
        },
    })
}

/// Decode a MegaTag pose estimate array captured at `timestamp_us`.
///
/// Layout: pose(6), latency ms, tag count, tag span, avg tag distance,
/// avg tag area, then `tag_count` fiducials of stride 7. Fiducials are only
/// decoded when the total length is exactly `11 + 7 * tag_count`; otherwise
/// the list is left empty while the header fields are still reported.
pub fn decode_pose_estimate(data: &[f64], timestamp_us: i64) -> Option<PoseEstimate> {
    if data.is_empty() {
        return None;
    }

    let pose = decode_pose6(data)?;
    let latency = extract_array_entry(data, IDX_LATENCY);
    let tag_count = extract_array_entry(data, IDX_TAG_COUNT) as i32;
    let tag_span = extract_array_entry(data, IDX_TAG_SPAN);
    let avg_tag_dist = extract_array_entry(data, IDX_AVG_DIST);
    let avg_tag_area = extract_array_entry(data, IDX_AVG_AREA);

    let timestamp_seconds = adjusted_timestamp_seconds(timestamp_us, latency);

    let tags = usize::try_from(tag_count).unwrap_or(0);
    let expected_len = tags
        .checked_mul(FIDUCIAL_STRIDE)
        .and_then(|len| len.checked_add(POSE_ESTIMATE_HEADER_LEN));

    let raw_fiducials = if tag_count >= 0 && expected_len == Some(data.len()) {
        decode_fiducial_records(&data[POSE_ESTIMATE_HEADER_LEN..], tags)
    } else {
        if tag_count > 0 {
            log::trace!(
                "pose estimate length {} does not match {} tags, skipping fiducials",
                data.len(),
                tag_count
            );
        }
        Vec::new()
    };

    let has_data = !raw_fiducials.is_empty();

    Some(PoseEstimate {
        pose,
        timestamp_seconds,
        latency,
        tag_count,
        tag_span,
        avg_tag_dist,
        avg_tag_area,
        raw_fiducials,
        is_megatag2: false,
        has_data,
    })
}

/// Capture time in seconds: publish time minus pipeline latency.
pub fn adjusted_timestamp_seconds(timestamp_us: i64, latency_ms: f64) -> f64 {
    (timestamp_us as f64 / 1_000_000.0) - (latency_ms / 1_000.0)
}

/// Decode the `rawfiducials` entry. Misaligned arrays are rejected whole.
pub fn decode_raw_fiducials(data: &[f64]) -> Vec<RawFiducial> {
    if data.len() % FIDUCIAL_STRIDE != 0 {
        log::trace!("rawfiducials length {} not a multiple of {}", data.len(), FIDUCIAL_STRIDE);
        return Vec::new();
    }
    decode_fiducial_records(data, data.len() / FIDUCIAL_STRIDE)
}

fn decode_fiducial_records(data: &[f64], count: usize) -> Vec<RawFiducial> {
    data.chunks_exact(FIDUCIAL_STRIDE)
        .take(count)
        .map(|r| RawFiducial {
            id: r[0] as i32,
            txnc: r[1],
            tync: r[2],
            ta: r[3],
            dist_to_camera: r[4],
            dist_to_robot: r[5],
            ambiguity: r[6],
        })
        .collect()
}

/// Decode the `rawdetections` entry. Misaligned arrays are rejected whole.
pub fn decode_raw_detections(data: &[f64]) -> Vec<RawDetection> {
    if data.len() % DETECTION_STRIDE != 0 {
        log::trace!("rawdetections length {} not a multiple of {}", data.len(), DETECTION_STRIDE);
        return Vec::new();
    }
    data.chunks_exact(DETECTION_STRIDE)
        .map(|r| RawDetection {
            class_id: r[0] as i32,
            txnc: r[1],
            tync: r[2],
            ta: r[3],
            corners: [[r[4], r[5]], [r[6], r[7]], [r[8], r[9]], [r[10], r[11]]],
        })
        .collect()
}

/// Decode the `t2d` entry. Only a 17-element array is accepted.
pub fn decode_target_metrics(data: &[f64]) -> TargetMetrics {
    TargetMetrics::from_values(<[f64; TARGET_METRICS_LEN]>::try_from(data).ok())
}

/// Encode a pose as `[x, y, z, roll, pitch, yaw]` with angles in degrees.
pub fn encode_pose6(pose: &Pose3d) -> [f64; POSE_LEN] {
    let (roll, pitch, yaw) = pose.euler_angles();
    [
        pose.translation.x,
        pose.translation.y,
        pose.translation.z,
        roll.to_degrees(),
        pitch.to_degrees(),
        yaw.to_degrees(),
    ]
}

/// Encode a floor-plane pose as `[x, y, 0, 0, 0, yaw]` (degrees).
pub fn encode_pose2d(pose: &Pose2d) -> [f64; POSE_LEN] {
    [pose.x, pose.y, 0.0, 0.0, 0.0, pose.yaw.to_degrees()]
}

/// Encode as `[yaw, yaw_rate, pitch, pitch_rate, roll, roll_rate]`.
///
/// Yaw-first is what the camera expects on `robot_orientation_set`.
pub fn encode_orientation6(orientation: &Orientation3d) -> [f64; ORIENTATION_LEN] {
    let (roll, pitch, yaw) = orientation.rotation.euler_angles();
    let rates = &orientation.angular_velocity;
    [
        yaw.to_degrees(),
        rates.yaw,
        pitch.to_degrees(),
        rates.pitch,
        roll.to_degrees(),
        rates.roll,
    ]
}

pub fn encode_translation3(translation: &Translation3d) -> [f64; TRANSLATION_LEN] {
    [translation.x, translation.y, translation.z]
}

/// Encode a crop window. Values are normalized to [-1, 1].
pub fn encode_crop_window(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> [f64; 4] {
    [min_x, max_x, min_y, max_y]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn fiducial(id: f64, ambiguity: f64) -> [f64; 7] {
        [id, 1.5, -2.5, 0.4, 3.0, 3.2, ambiguity]
    }

    #[test]
    fn test_decode_pose6_short_is_absent() {
        assert!(decode_pose6(&[]).is_none());
        assert!(decode_pose6(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(decode_pose6(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn test_decode_pose6_zero_rotation() {
        let pose = decode_pose6(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(pose.translation, Translation3d::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation, Rotation3::identity());
    }

    #[test]
    fn test_decode_pose6_degrees_to_radians() {
        let pose = decode_pose6(&[0.0, 0.0, 0.0, 10.0, 20.0, 90.0]).unwrap();
        let (roll, pitch, yaw) = pose.euler_angles();
        assert_abs_diff_eq!(roll, 10f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(pitch, 20f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(yaw, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_decode_pose6_ignores_trailing_values() {
        let pose = decode_pose6(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 42.0, 2.0]).unwrap();
        assert_eq!(pose.translation.z, 3.0);
    }

    #[test]
    fn test_decode_pose2d() {
        assert!(decode_pose2d(&[1.0, 2.0]).is_none());
        let pose = decode_pose2d(&[1.0, 2.0, 9.0, 45.0, 45.0, 180.0]).unwrap();
        assert_eq!(pose.x, 1.0);
        assert_eq!(pose.y, 2.0);
        assert_abs_diff_eq!(pose.yaw, std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_extract_array_entry_out_of_range() {
        assert_eq!(extract_array_entry(&[1.0, 2.0], 1), 2.0);
        assert_eq!(extract_array_entry(&[1.0, 2.0], 2), 0.0);
        assert_eq!(extract_array_entry(&[], 0), 0.0);
    }

    #[test]
    fn test_pose_estimate_empty_is_absent() {
        assert!(decode_pose_estimate(&[], 1_000_000).is_none());
    }

    #[test]
    fn test_pose_estimate_short_pose_is_absent() {
        assert!(decode_pose_estimate(&[1.0, 2.0, 3.0], 1_000_000).is_none());
    }

    #[test]
    fn test_pose_estimate_with_fiducials() {
        let mut data = vec![1.0, 2.0, 0.0, 0.0, 0.0, 90.0, 50.0, 2.0, 0.6, 3.1, 0.7];
        data.extend_from_slice(&fiducial(4.0, 0.1));
        data.extend_from_slice(&fiducial(7.9, 0.3));

        let est = decode_pose_estimate(&data, 2_000_000).unwrap();
        assert_eq!(est.tag_count, 2);
        assert_eq!(est.raw_fiducials.len(), 2);
        assert_eq!(est.raw_fiducials[0].id, 4);
        // ids truncate
        assert_eq!(est.raw_fiducials[1].id, 7);
        assert_eq!(est.raw_fiducials[1].ambiguity, 0.3);
        assert!(est.has_data);
        assert_abs_diff_eq!(est.timestamp_seconds, 1.95, epsilon = 1e-12);
        assert_eq!(est.latency, 50.0);
        assert_eq!(est.tag_span, 0.6);
        assert_eq!(est.avg_tag_dist, 3.1);
        assert_eq!(est.avg_tag_area, 0.7);
    }

    #[test]
    fn test_pose_estimate_length_mismatch_degrades() {
        // tag count 2 but only one fiducial present (18 != 25)
        let mut data = vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 20.0, 2.0, 0.5, 2.0, 0.3];
        data.extend_from_slice(&fiducial(3.0, 0.2));

        let est = decode_pose_estimate(&data, 5_000_000).unwrap();
        assert_eq!(est.tag_count, 2);
        assert!(est.raw_fiducials.is_empty());
        assert!(!est.has_data);
        assert_eq!(est.latency, 20.0);
        assert_eq!(est.tag_span, 0.5);
        assert_eq!(est.pose.translation, Translation3d::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_pose_estimate_header_fields_default_to_zero() {
        let est = decode_pose_estimate(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 12.0], 1_000_000).unwrap();
        assert_eq!(est.latency, 12.0);
        assert_eq!(est.tag_count, 0);
        assert_eq!(est.avg_tag_area, 0.0);
        assert!(est.raw_fiducials.is_empty());
    }

    #[test]
    fn test_pose_estimate_negative_tag_count() {
        let data = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0];
        let est = decode_pose_estimate(&data, 0).unwrap();
        assert_eq!(est.tag_count, -1);
        assert!(est.raw_fiducials.is_empty());
    }

    #[test]
    fn test_pose_estimate_huge_tag_count() {
        let data = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e300, 0.0, 0.0, 0.0];
        let est = decode_pose_estimate(&data, 0).unwrap();
        assert_eq!(est.tag_count, i32::MAX);
        assert!(est.raw_fiducials.is_empty());
    }

    #[test]
    fn test_adjusted_timestamp() {
        assert_abs_diff_eq!(adjusted_timestamp_seconds(2_000_000, 50.0), 1.95, epsilon = 1e-12);
        assert_abs_diff_eq!(adjusted_timestamp_seconds(0, 0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_raw_fiducials_misaligned_rejected() {
        let mut data = fiducial(1.0, 0.5).to_vec();
        data.push(9.0);
        assert!(decode_raw_fiducials(&data).is_empty());
        assert!(decode_raw_fiducials(&[1.0, 2.0, 3.0]).is_empty());
    }

    #[test]
    fn test_raw_fiducials_decoded() {
        let mut data = fiducial(11.0, 0.05).to_vec();
        data.extend_from_slice(&fiducial(12.0, 0.9));
        let fids = decode_raw_fiducials(&data);
        assert_eq!(fids.len(), 2);
        assert_eq!(fids[0].id, 11);
        assert_eq!(fids[0].txnc, 1.5);
        assert_eq!(fids[0].tync, -2.5);
        assert_eq!(fids[0].dist_to_robot, 3.2);
        assert_eq!(fids[1].id, 12);
        assert!(decode_raw_fiducials(&[]).is_empty());
    }

    #[test]
    fn test_raw_detections() {
        let data: Vec<f64> = (0..12).map(|i| i as f64 + 0.5).collect();
        let dets = decode_raw_detections(&data);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 0);
        assert_eq!(dets[0].txnc, 1.5);
        assert_eq!(dets[0].ta, 3.5);
        assert_eq!(dets[0].corners[0], [4.5, 5.5]);
        assert_eq!(dets[0].corners[3], [10.5, 11.5]);

        assert!(decode_raw_detections(&data[..11]).is_empty());
    }

    #[test]
    fn test_target_metrics() {
        let mut data = [0.0; 17];
        data[1] = 3.0;
        data[10] = 5.0;
        data[11] = 8.7;
        let metrics = decode_target_metrics(&data);
        assert!(metrics.is_present());
        assert_eq!(metrics.count(), 3);
        assert_eq!(metrics.classifier_class_index(), 5);
        assert_eq!(metrics.detector_class_index(), 8);

        let short = decode_target_metrics(&data[..16]);
        assert_eq!(short.count(), 0);
        assert_eq!(short.classifier_class_index(), 0);
        assert_eq!(short.detector_class_index(), 0);

        let mut long = data.to_vec();
        long.push(1.0);
        assert_eq!(decode_target_metrics(&long).count(), 0);
    }

    fn assert_rotation_eq(a: (f64, f64, f64), b: (f64, f64, f64)) {
        assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-12);
        assert_abs_diff_eq!(a.2, b.2, epsilon = 1e-12);
    }

    #[test]
    fn test_pose6_roundtrip() {
        let pose = Pose3d::new(Translation3d::new(-1.25, 7.5, 0.3), 0.2, -0.4, 2.9);
        let back = decode_pose6(&encode_pose6(&pose)).unwrap();
        assert_eq!(back.translation, pose.translation);
        assert_rotation_eq(back.euler_angles(), pose.euler_angles());
    }

    #[test]
    fn test_encode_pose6_layout() {
        let pose = Pose3d::new(Translation3d::new(1.0, 2.0, 3.0), 0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let wire = encode_pose6(&pose);
        assert_eq!(&wire[..3], &[1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(wire[3], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wire[4], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wire[5], 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_encode_pose2d_layout() {
        let wire = encode_pose2d(&Pose2d { x: 3.0, y: 4.0, yaw: std::f64::consts::PI });
        assert_eq!(&wire[..5], &[3.0, 4.0, 0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(wire[5], 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_encode_orientation6_is_yaw_first() {
        let orientation = Orientation3d::new(
            Rotation3::from_euler_angles(10f64.to_radians(), 20f64.to_radians(), 30f64.to_radians()),
            AngularVelocity3d { roll: 1.0, pitch: 2.0, yaw: 3.0 },
        );
        let wire = encode_orientation6(&orientation);
        assert_abs_diff_eq!(wire[0], 30.0, epsilon = 1e-9);
        assert_eq!(wire[1], 3.0);
        assert_abs_diff_eq!(wire[2], 20.0, epsilon = 1e-9);
        assert_eq!(wire[3], 2.0);
        assert_abs_diff_eq!(wire[4], 10.0, epsilon = 1e-9);
        assert_eq!(wire[5], 1.0);

        let back = decode_orientation6(&wire).unwrap();
        assert_rotation_eq(back.rotation.euler_angles(), orientation.rotation.euler_angles());
        assert_eq!(back.angular_velocity, orientation.angular_velocity);
    }

    #[test]
    fn test_translation3() {
        let t = Translation3d::new(0.1, -0.2, 0.3);
        assert_eq!(encode_translation3(&t), [0.1, -0.2, 0.3]);
        assert_eq!(decode_translation3(&[0.1, -0.2, 0.3]), Some(t));
        assert!(decode_translation3(&[0.1, -0.2]).is_none());
    }

    #[test]
    fn test_decode_orientation_short_is_absent() {
        assert!(decode_orientation6(&[0.0; 5]).is_none());
    }

    #[test]
    fn test_encode_crop_window() {
        assert_eq!(encode_crop_window(-1.0, 1.0, -0.5, 0.5), [-1.0, 1.0, -0.5, 0.5]);
    }
}
