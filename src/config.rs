//! Cloud configuration loaded from a `clouds.yaml` file
//!
//! One file names any number of clouds. Each cloud carries an already
//! issued token, its per-service endpoints and HTTP settings:
//!
//! ```yaml
//! clouds:
//!   devstack:
//!     region_name: RegionOne
//!     auth:
//!       type: token
//!       token: gAAAAAB...
//!     endpoints:
//!       load-balancer: https://lb.example.com/v2.0
//!       identity: https://keystone.example.com/v3
//!       clustering: https://senlin.example.com/v1
//!     timeout_seconds: 60
//!     rate_limit:
//!       requests_per_second: 5
//! ```
//!
//! `OS_CLOUD` picks the cloud when none is named, and `OS_AUTH_TOKEN`
//! replaces the token from the file.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{RateLimiterConfig, ServiceClient, ServiceClientConfig};
use crate::types::OkCodes;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable naming the cloud to use
pub const ENV_CLOUD: &str = "OS_CLOUD";

/// Environment variable overriding the configured token
pub const ENV_AUTH_TOKEN: &str = "OS_AUTH_TOKEN";

/// Environment variable pointing at a clouds file
pub const ENV_CONFIG_FILE: &str = "OS_CLIENT_CONFIG_FILE";

// ============================================================================
// Clouds File
// ============================================================================

/// Parsed `clouds.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudsFile {
    /// Clouds by name
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudConfig>,
}

impl CloudsFile {
    /// Load a clouds file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read clouds file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        debug!(path = %path.display(), "Loaded clouds file");
        Self::from_yaml(&content)
    }

    /// Parse a clouds file from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: CloudsFile = serde_yaml::from_str(yaml)?;
        for (name, cloud) in &file.clouds {
            cloud.validate(name)?;
        }
        Ok(file)
    }

    /// Names of every configured cloud
    pub fn names(&self) -> Vec<&str> {
        self.clouds.keys().map(String::as_str).collect()
    }

    /// Pick a cloud and apply environment overrides.
    ///
    /// Without a name, `OS_CLOUD` is consulted; a file holding exactly one
    /// cloud needs no name at all.
    pub fn cloud(&self, name: Option<&str>) -> Result<CloudConfig> {
        self.cloud_with_env(name, |key| std::env::var(key).ok())
    }

    pub(crate) fn cloud_with_env<F>(&self, name: Option<&str>, env: F) -> Result<CloudConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = env(ENV_CLOUD).filter(|s| !s.is_empty());
        let name = match name.map(str::to_string).or(from_env) {
            Some(name) => name,
            None if self.clouds.len() == 1 => self.clouds.keys().next().cloned().unwrap_or_default(),
            None => {
                return Err(Error::config(format!(
                    "No cloud selected; pass --cloud or set {ENV_CLOUD} (available: {})",
                    self.names().join(", ")
                )))
            }
        };

        let mut cloud = self.clouds.get(&name).cloned().ok_or_else(|| {
            Error::config(format!(
                "Cloud '{name}' not found (available: {})",
                self.names().join(", ")
            ))
        })?;

        if let Some(token) = env(ENV_AUTH_TOKEN).filter(|s| !s.is_empty()) {
            debug!(cloud = %name, "Using token from {}", ENV_AUTH_TOKEN);
            cloud.auth = cloud.auth.with_token(token);
        }
        Ok(cloud)
    }
}

/// Where to look for a clouds file when none is given.
///
/// `OS_CLIENT_CONFIG_FILE`, then `./clouds.yaml`, then
/// `~/.config/openstack/clouds.yaml`.
pub fn default_clouds_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from("clouds.yaml");
    if local.exists() {
        return Some(local);
    }
    let home = std::env::var("HOME").ok()?;
    let user = PathBuf::from(home).join(".config/openstack/clouds.yaml");
    user.exists().then_some(user)
}

// ============================================================================
// Cloud Config
// ============================================================================

/// One cloud's settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Token placement
    #[serde(default)]
    pub auth: AuthConfig,

    /// Region the endpoints belong to
    #[serde(default)]
    pub region_name: Option<String>,

    /// Service endpoints by service type (e.g. `load-balancer`)
    #[serde(default)]
    pub endpoints: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Accepted status codes per method
    #[serde(default)]
    pub ok_codes: Option<OkCodes>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> u64 {
    30
}

impl CloudConfig {
    fn validate(&self, name: &str) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::config(format!(
                "Cloud '{name}' timeout_seconds must be positive"
            )));
        }
        for (service, endpoint) in &self.endpoints {
            if endpoint.is_empty() {
                return Err(Error::config(format!(
                    "Cloud '{name}' has an empty endpoint for '{service}'"
                )));
            }
        }
        Ok(())
    }

    /// Endpoint for a service type
    pub fn endpoint(&self, service: &str) -> Result<&str> {
        self.endpoints
            .get(service)
            .map(String::as_str)
            .ok_or_else(|| Error::missing_field(format!("endpoints.{service}")))
    }

    /// Client settings for a service type
    pub fn client_config(&self, service: &str) -> Result<ServiceClientConfig> {
        let mut builder = ServiceClientConfig::builder(self.endpoint(service)?)
            .timeout(Duration::from_secs(self.timeout_seconds));

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        if let Some(codes) = &self.ok_codes {
            builder = builder.ok_codes(codes.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        Ok(builder.build())
    }

    /// Build an authenticated client for a service type
    pub fn service_client(&self, service: &str) -> Result<ServiceClient> {
        let config = self.client_config(service)?;
        debug!(
            service,
            endpoint = %config.endpoint,
            region = self.region_name.as_deref().unwrap_or("-"),
            "Creating service client"
        );
        ServiceClient::with_auth(config, self.auth.clone())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CLOUDS: &str = r#"
clouds:
  devstack:
    region_name: RegionOne
    auth:
      type: token
      token: file-token
    endpoints:
      load-balancer: http://127.0.0.1:9876/v2.0
      identity: http://127.0.0.1:5000/v3
    timeout_seconds: 10
    rate_limit:
      requests_per_second: 5
  public:
    auth:
      type: bearer
      token: other
    endpoints:
      clustering: https://senlin.example.com/v1
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CLOUDS.as_bytes()).unwrap();

        let clouds = CloudsFile::load(file.path()).unwrap();
        assert_eq!(clouds.names(), vec!["devstack", "public"]);

        let devstack = &clouds.clouds["devstack"];
        assert_eq!(devstack.region_name.as_deref(), Some("RegionOne"));
        assert_eq!(devstack.timeout_seconds, 10);
        assert_eq!(devstack.rate_limit, Some(RateLimiterConfig::new(5, 1)));
        assert_eq!(clouds.clouds["public"].timeout_seconds, 30);
    }

    #[test]
    fn test_missing_file() {
        let err = CloudsFile::load("/nonexistent/clouds.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = CloudsFile::from_yaml("clouds: [not, a, map]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let yaml = "clouds:\n  x:\n    timeout_seconds: 0\n";
        assert!(matches!(
            CloudsFile::from_yaml(yaml),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_select_cloud() {
        let clouds = CloudsFile::from_yaml(CLOUDS).unwrap();

        let cloud = clouds.cloud_with_env(Some("public"), no_env).unwrap();
        assert_eq!(cloud.auth, AuthConfig::bearer("other"));

        let cloud = clouds
            .cloud_with_env(None, |k| (k == ENV_CLOUD).then(|| "devstack".to_string()))
            .unwrap();
        assert_eq!(cloud.auth, AuthConfig::token("file-token"));

        assert!(clouds.cloud_with_env(None, no_env).is_err());
        assert!(clouds.cloud_with_env(Some("missing"), no_env).is_err());
    }

    #[test]
    fn test_single_cloud_needs_no_name() {
        let yaml = "clouds:\n  only:\n    endpoints:\n      identity: http://ks/v3\n";
        let clouds = CloudsFile::from_yaml(yaml).unwrap();
        let cloud = clouds.cloud_with_env(None, no_env).unwrap();
        assert_eq!(cloud.endpoint("identity").unwrap(), "http://ks/v3");
    }

    #[test]
    fn test_token_override() {
        let clouds = CloudsFile::from_yaml(CLOUDS).unwrap();
        let env = |k: &str| match k {
            ENV_AUTH_TOKEN => Some("env-token".to_string()),
            _ => None,
        };

        let cloud = clouds.cloud_with_env(Some("devstack"), env).unwrap();
        assert_eq!(cloud.auth, AuthConfig::token("env-token"));

        let cloud = clouds.cloud_with_env(Some("public"), env).unwrap();
        assert_eq!(cloud.auth, AuthConfig::bearer("env-token"));
    }

    #[test]
    fn test_service_client() {
        let clouds = CloudsFile::from_yaml(CLOUDS).unwrap();
        let cloud = clouds.cloud_with_env(Some("devstack"), no_env).unwrap();

        let config = cloud.client_config("load-balancer").unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9876/v2.0");
        assert_eq!(config.timeout, Duration::from_secs(10));

        let client = cloud.service_client("load-balancer").unwrap();
        assert!(client.has_rate_limiter());
        assert_eq!(
            client.service_url(&["lbaas/healthmonitors"]),
            "http://127.0.0.1:9876/v2.0/lbaas/healthmonitors"
        );

        assert!(matches!(
            cloud.service_client("clustering"),
            Err(Error::MissingConfigField { .. })
        ));
    }
}
