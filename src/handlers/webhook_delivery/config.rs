use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct Config {
    /// Base URL of the receiving system. Records are posted to `{webhook_url}/webhook`
    #[validate(url)]
    pub webhook_url: String,
}
