//! # limelight - Rust client for Limelight smart cameras
//!
//! Reads vision results a Limelight publishes to its NetworkTables table
//! and writes configuration back. Provides:
//! - Fixed-layout array decoding for poses, pose estimates, fiducials and detections
//! - MegaTag1 / MegaTag2 pose estimates with ambiguity aggregates
//! - Typed JSON results
//! - Batched settings and background snapshot capture
//!
//! The bus itself is not implemented here: hand the client any
//! [`NetworkTable`] bound to the camera's table. [`MemoryTable`] is an
//! in-process implementation.
//!
//! ## Quick Start
//! ```no_run
//! use limelight::{ClientConfig, EstimationMode, Limelight, MemoryTable};
//! use std::sync::Arc;
//!
//! let table = Arc::new(MemoryTable::new());
//! let camera = Limelight::connect("limelight", table, ClientConfig::from_env()).unwrap();
//!
//! let estimator = camera.pose_estimator(EstimationMode::MegaTag2);
//! if let Some(estimate) = estimator.pose_estimate() {
//!     println!("{} tags, ambiguity {:.2}", estimate.tag_count, estimate.avg_tag_ambiguity());
//! }
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod estimate;
pub mod protocol;
pub mod results;
pub mod settings;
pub mod snapshot;
pub mod table;
pub mod types;

pub use camera::Limelight;
pub use config::ClientConfig;
pub use error::LimelightError;
pub use estimate::{Alliance, BotPose, EstimationMode, PoseEstimate, PoseEstimator};
pub use results::{parse_results, LimelightResults};
pub use settings::LimelightSettings;
pub use table::{MemoryTable, NetworkTable, TimestampedArray};
pub use types::*;

/// Result type alias for limelight operations.
pub type Result<T> = std::result::Result<T, LimelightError>;
