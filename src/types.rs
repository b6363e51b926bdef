use nalgebra::Rotation3;

/// Translation in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Position plus orientation in 3D.
///
/// The rotation is applied roll (x), then pitch (y), then yaw (z), all about
/// the fixed axes, matching the camera's `[x, y, z, roll, pitch, yaw]` layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose3d {
    /// Translation in meters.
    pub translation: Translation3d,
    pub rotation: Rotation3<f64>,
}

impl Default for Pose3d {
    fn default() -> Self {
        Self {
            translation: Translation3d::default(),
            rotation: Rotation3::identity(),
        }
    }
}

impl Pose3d {
    /// Build a pose from a translation and roll/pitch/yaw in radians.
    pub fn new(translation: Translation3d, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            translation,
            rotation: Rotation3::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Roll, pitch and yaw in radians.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        self.rotation.euler_angles()
    }

    /// Project onto the floor plane, keeping x, y and yaw.
    pub fn to_pose2d(&self) -> Pose2d {
        let (_, _, yaw) = self.euler_angles();
        Pose2d {
            x: self.translation.x,
            y: self.translation.y,
            yaw,
        }
    }
}

/// Floor-plane pose. `yaw` is in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

/// Angular rates in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularVelocity3d {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Robot orientation and angular rates, as fed to MegaTag2 localization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation3d {
    pub rotation: Rotation3<f64>,
    pub angular_velocity: AngularVelocity3d,
}

impl Orientation3d {
    pub fn new(rotation: Rotation3<f64>, angular_velocity: AngularVelocity3d) -> Self {
        Self {
            rotation,
            angular_velocity,
        }
    }

    /// Orientation from a gyro yaw (degrees) and yaw rate (degrees/s), with
    /// the robot assumed flat on the field.
    pub fn from_yaw_degrees(yaw: f64, yaw_rate: f64) -> Self {
        Self {
            rotation: Rotation3::from_euler_angles(0.0, 0.0, yaw.to_radians()),
            angular_velocity: AngularVelocity3d {
                yaw: yaw_rate,
                ..AngularVelocity3d::default()
            },
        }
    }
}

/// One AprilTag as reported by the `rawfiducials` entry or a pose estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawFiducial {
    pub id: i32,
    /// Horizontal offset from the principal pixel, degrees.
    pub txnc: f64,
    /// Vertical offset from the principal pixel, degrees.
    pub tync: f64,
    /// Tag area as a percentage of the image.
    pub ta: f64,
    pub dist_to_camera: f64,
    pub dist_to_robot: f64,
    /// Single-tag pose ambiguity in [0, 1].
    pub ambiguity: f64,
}

impl std::fmt::Display for RawFiducial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tag ID {}", self.id)?;
        writeln!(f, " Coordinate in image ({:.2}, {:.2})", self.txnc, self.tync)?;
        writeln!(f, " Tag Area {:.2}", self.ta)?;
        writeln!(f, " Distance to Camera {:.2}", self.dist_to_camera)?;
        writeln!(f, " Distance to Robot {:.2}", self.dist_to_robot)?;
        write!(f, " Ambiguity {:.2}", self.ambiguity)
    }
}

/// One neural detector result from the `rawdetections` entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawDetection {
    pub class_id: i32,
    pub txnc: f64,
    pub tync: f64,
    pub ta: f64,
    /// Bounding box corners `[x, y]` in pixels.
    pub corners: [[f64; 2]; 4],
}

/// Decoded `t2d` target metrics.
///
/// Only a 17-element array is trusted; anything else reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetMetrics {
    values: Option<[f64; 17]>,
}

impl TargetMetrics {
    pub(crate) fn from_values(values: Option<[f64; 17]>) -> Self {
        Self { values }
    }

    /// The raw 17-element array, if the camera published a well-formed one.
    pub fn raw(&self) -> Option<&[f64; 17]> {
        self.values.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.values.is_some()
    }

    pub fn count(&self) -> i32 {
        self.index(1)
    }

    pub fn classifier_class_index(&self) -> i32 {
        self.index(10)
    }

    pub fn detector_class_index(&self) -> i32 {
        self.index(11)
    }

    fn index(&self, i: usize) -> i32 {
        self.values.map(|v| v[i] as i32).unwrap_or(0)
    }
}
