//! Snapshot capture over the camera's REST API.
//!
//! Requests run on a short-lived background thread so control loops never
//! wait on the network. The outcome is only logged.

use crate::config::ClientConfig;
use crate::error::LimelightError;
use crate::Result;
use std::thread::JoinHandle;
use std::time::Duration;

const SNAPSHOT_PATH: &str = "capturesnapshot";
const SNAPNAME_HEADER: &str = "snapname";

/// URL of the snapshot endpoint for the named camera.
pub fn snapshot_url(config: &ClientConfig, camera_name: &str) -> String {
    format!(
        "http://{}:{}/{}",
        config.host_for(camera_name),
        config.http_port,
        SNAPSHOT_PATH
    )
}

/// Blocking snapshot request. An empty `snapname` sends no header and the
/// camera picks a name.
pub fn capture(url: &str, snapname: &str, timeout: Duration) -> Result<()> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let mut request = agent.get(url);
    if !snapname.is_empty() {
        request = request.set(SNAPNAME_HEADER, snapname);
    }

    match request.call() {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(code, _)) => Err(LimelightError::HttpStatus(code)),
        Err(e) => Err(LimelightError::Http(e.to_string())),
    }
}

/// Run [`capture`] on a named thread. The handle yields whether it succeeded.
pub(crate) fn spawn(url: String, snapname: String, timeout: Duration) -> Result<JoinHandle<bool>> {
    std::thread::Builder::new()
        .name("limelight-snapshot".into())
        .spawn(move || match capture(&url, &snapname, timeout) {
            Ok(()) => {
                log::info!("Snapshot {:?} captured via {}", snapname, url);
                true
            }
            Err(e) => {
                log::error!("Snapshot request to {} failed: {}", url, e);
                false
            }
        })
        .map_err(|e| LimelightError::Thread(format!("Failed to spawn snapshot thread: {}", e)))
}
