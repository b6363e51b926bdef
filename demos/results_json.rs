//! Parse a Limelight JSON results dump and print a summary.
//!
//! Usage: cargo run --example results_json -- results.json

use limelight::{parse_results, Alliance};

fn main() {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("Usage: results_json <results.json>");
            std::process::exit(1);
        }
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let results = match parse_results(&text) {
        Ok(Some(r)) => r,
        Ok(None) => {
            eprintln!("{} is empty", path);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to parse {}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("Pipeline:   {}", results.pipeline_id);
    println!("Valid:      {}", results.valid);
    println!(
        "Latency:    {:.1} ms pipeline, {:.1} ms capture",
        results.latency_pipeline, results.latency_capture
    );
    if let Some(pose) = results.bot_pose_2d(Some(Alliance::Blue)) {
        println!(
            "Bot pose:   x={:.3} y={:.3} yaw={:.1}°",
            pose.x,
            pose.y,
            pose.yaw.to_degrees()
        );
    }
    for fiducial in &results.targets_fiducials {
        println!(
            "Tag {:>3}    tx={:.2} ty={:.2} ta={:.3}",
            fiducial.fiducial_id, fiducial.tx, fiducial.ty, fiducial.ta
        );
    }
    for detection in &results.targets_detector {
        println!(
            "Detection  {} ({:.0}%)",
            detection.class_name,
            detection.confidence * 100.0
        );
    }
    for barcode in &results.targets_barcode {
        println!("Barcode    {} {}", barcode.family, barcode.data);
    }
}
