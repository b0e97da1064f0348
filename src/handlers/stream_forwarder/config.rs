use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct Config {
    /// Queue's URL where threshold crossings are published
    #[validate(url)]
    pub queue_url: String,
}
