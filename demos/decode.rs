//! Decode a MegaTag2 pose estimate from an in-memory table.
//!
//! Seeds a `MemoryTable` with a two-tag `botpose_orb_wpiblue` payload and
//! prints what the client reads back.
//!
//! Usage: cargo run --example decode

use limelight::protocol::entry;
use limelight::{ClientConfig, EstimationMode, Limelight, MemoryTable, NetworkTable};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let table = Arc::new(MemoryTable::new());
    table.set_time_us(12_500_000);
    table.set_f64(entry::PIPELINE_INDEX, 0.0);
    table.set_f64_array(
        entry::BOT_POSE_BLUE_MEGATAG2,
        &[
            // x, y, z, roll, pitch, yaw
            3.2, 4.1, 0.0, 0.0, 0.0, 178.0,
            // latency, tag count, span, avg dist, avg area
            32.0, 2.0, 0.45, 2.7, 0.6,
            // id, txnc, tync, ta, dist to camera, dist to robot, ambiguity
            7.0, -3.1, 1.2, 0.7, 2.5, 2.6, 0.08,
            8.0, 4.4, 1.0, 0.5, 2.9, 3.0, 0.15,
        ],
    );

    let config = ClientConfig {
        availability_attempts: 1,
        ..ClientConfig::from_env()
    };
    let camera = match Limelight::connect("limelight", table, config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match camera.pose_estimator(EstimationMode::MegaTag2).pose_estimate() {
        Some(estimate) => {
            println!("{}", estimate);
            println!("Min ambiguity: {:.2}", estimate.min_tag_ambiguity());
            println!("Max ambiguity: {:.2}", estimate.max_tag_ambiguity());
            println!("Avg ambiguity: {:.2}", estimate.avg_tag_ambiguity());
        }
        None => {
            eprintln!("No pose estimate published");
            std::process::exit(1);
        }
    }
}
