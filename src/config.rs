use std::time::Duration;

/// Client configuration.
///
/// Defaults match the camera's factory setup. Every field can be overridden
/// through a `LIMELIGHT_*` environment variable, see [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// How many times to look for the `getpipe` key before giving up.
    pub availability_attempts: usize,
    pub availability_delay: Duration,
    /// Port of the camera's REST API.
    pub http_port: u16,
    /// Host of the REST API. `None` means `<camera name>.local`.
    pub http_host: Option<String>,
    pub http_timeout: Duration,
    /// Fail `Limelight::connect` when the camera never shows up.
    pub require_available: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            availability_attempts: 15,
            availability_delay: Duration::from_secs(1),
            http_port: 5807,
            http_host: None,
            http_timeout: Duration::from_secs(2),
            require_available: true,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by environment variables:
    ///
    /// - `LIMELIGHT_AVAILABILITY_ATTEMPTS`
    /// - `LIMELIGHT_AVAILABILITY_DELAY_MS`
    /// - `LIMELIGHT_HTTP_PORT`
    /// - `LIMELIGHT_HTTP_HOST`
    /// - `LIMELIGHT_HTTP_TIMEOUT_MS`
    /// - `LIMELIGHT_REQUIRE_AVAILABLE`
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            read_u64(&lookup, name)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            availability_attempts: read_u64(&lookup, "LIMELIGHT_AVAILABILITY_ATTEMPTS")
                .map(|v| v as usize)
                .unwrap_or(defaults.availability_attempts),
            availability_delay: millis("LIMELIGHT_AVAILABILITY_DELAY_MS", defaults.availability_delay),
            http_port: lookup("LIMELIGHT_HTTP_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(defaults.http_port),
            http_host: read_string(&lookup, "LIMELIGHT_HTTP_HOST").or(defaults.http_host),
            http_timeout: millis("LIMELIGHT_HTTP_TIMEOUT_MS", defaults.http_timeout),
            require_available: read_bool(&lookup, "LIMELIGHT_REQUIRE_AVAILABLE")
                .unwrap_or(defaults.require_available),
        }
    }

    /// Host name used for REST requests to the named camera.
    pub fn host_for(&self, camera_name: &str) -> String {
        match &self.http_host {
            Some(host) => host.clone(),
            None => format!("{}.local", sanitize_name(camera_name)),
        }
    }
}

/// Camera names default to `limelight` when empty.
pub fn sanitize_name(name: &str) -> &str {
    if name.is_empty() {
        "limelight"
    } else {
        name
    }
}

fn read_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    lookup(name).and_then(|v| {
        let v = v.trim().to_ascii_lowercase();
        match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

fn read_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    lookup(name).and_then(|v| v.trim().parse::<u64>().ok())
}

fn read_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
