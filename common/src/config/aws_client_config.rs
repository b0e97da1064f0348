use rusoto_core::region::Region;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Deserialize, Clone, Debug)]
pub struct AwsClientConfig {
    /// Current AWS region.
    pub aws_region: String,

    /// Only used for development. LocalStack endpoint
    #[serde(default = "default_localstack_test_mode_endpoint")]
    pub localstack_test_mode_endpoint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("unable to parse AWS region \"{region}\": {reason}")]
pub struct InvalidRegionError {
    pub region: String,
    pub reason: String,
}

impl AwsClientConfig {
    pub fn region(&self) -> Result<Region, InvalidRegionError> {
        if let Some(endpoint) = self.localstack_test_mode_endpoint.clone() {
            return Ok(Region::Custom {
                name: self.aws_region.clone(),
                endpoint,
            });
        }

        Region::from_str(&self.aws_region).map_err(|e| InvalidRegionError {
            region: self.aws_region.clone(),
            reason: e.to_string(),
        })
    }
}

fn default_localstack_test_mode_endpoint() -> Option<String> {
    None
}
