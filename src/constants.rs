//! Application constants for Rover Photos
//!
//! This module centralizes all constants used throughout the library,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable holding the upstream access credential
    pub const API_KEY: &str = "NASA_API_KEY";
}

/// Upstream API endpoints and credentials
pub mod api {
    /// Base URL of the rover photo API
    pub const BASE_URL: &str = "https://api.nasa.gov/mars-photos/api/v1";

    /// Well-known public placeholder credential, used when no key is configured
    pub const DEMO_API_KEY: &str = "DEMO_KEY";

    /// Query parameter carrying the credential on every request
    pub const API_KEY_PARAM: &str = "api_key";

    /// Photos for a source, queried by `sol` or `earth_date`
    pub fn photos_path(source: &str) -> String {
        format!("/rovers/{}/photos", source)
    }

    /// Most recent photos for a source
    pub fn latest_photos_path(source: &str) -> String {
        format!("/rovers/{}/latest_photos", source)
    }

    /// Source (rover) metadata
    pub fn rover_path(source: &str) -> String {
        format!("/rovers/{}", source)
    }

    /// Per-sol photo manifest for a source
    pub fn manifest_path(source: &str) -> String {
        format!("/manifests/{}", source)
    }
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Rover-Photos/0.1.0 (Archive Browser)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// Rate limiting configuration
pub mod limits {
    /// Default request rate against the upstream API (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;
}

/// In-memory cache constants
pub mod cache {
    use super::Duration;

    /// Time-to-live applied uniformly to every cache entry
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
}

/// Aggregation service constants
pub mod service {
    use super::Duration;

    /// Sources queried by the all-sources aggregation, in declaration order
    pub const DEFAULT_SOURCES: [&str; 3] = ["curiosity", "opportunity", "spirit"];

    /// Known-good fallback date for curiosity
    pub const CURIOSITY_FALLBACK_DATE: &str = "2024-01-01";

    /// Known-good fallback date for every other source
    pub const DEFAULT_FALLBACK_DATE: &str = "2018-06-01";

    /// Number of sols probed backwards from `max_sol`
    pub const SOL_SCAN_PROBES: u32 = 10;

    /// Bound applied to every upstream call made by the service
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

    /// Cache key of the all-sources aggregate
    pub const ALL_SOURCES_KEY: &str = "all-sources";
}

/// Presentation defaults shared by the view controllers
pub mod views {
    /// Photos per page for in-memory pagination
    pub const DEFAULT_PAGE_SIZE: usize = 25;
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// Crate target used in the env-filter directive
    pub const CRATE_TARGET: &str = "rover_photos";
}

// Re-export commonly used constants for convenience
pub use api::{BASE_URL as API_BASE_URL, DEMO_API_KEY};
pub use env::API_KEY as ENV_API_KEY;
pub use http::USER_AGENT;
pub use limits::DEFAULT_RATE_LIMIT_RPS;
pub use service::DEFAULT_SOURCES;
