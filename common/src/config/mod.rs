pub mod aws_client_config;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum::{Display, EnumIter};

#[derive(Default, Serialize, Deserialize, Clone, Eq, PartialEq, EnumIter, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

#[derive(Debug, thiserror::Error)]
#[error("could not load configuration: {0}")]
pub struct ConfigError(#[from] envy::Error);

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the default configuration for the project. This is the
    /// configuration used by the deployed lambdas.
    ///
    /// This will load the following files, in order:
    /// - OS environment variables
    /// - `.env.development.local` then `.env.development`
    /// - `.env.test.local` then `.env.test`
    /// - `.env.production.local` then `.env.production`
    /// - `.env.local`
    /// - `.env`
    ///
    /// Variables are not overriden, the first file to contain
    /// a definition for a variable is the one that will be set.
    ///
    /// If a variable is set in the OS environment, it will not be
    /// overriden by any file.
    pub fn load_default<TConfig>() -> Result<TConfig, ConfigError>
    where
        TConfig: DeserializeOwned,
    {
        for environment in Environment::iter() {
            dotenv::from_filename(format!(".env.{}.local", environment)).ok();
            dotenv::from_filename(format!(".env.{}", environment)).ok();
        }

        ConfigLoader::load::<TConfig>()
    }

    fn load<TConfig>() -> Result<TConfig, ConfigError>
    where
        TConfig: DeserializeOwned,
    {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env").ok();

        Ok(envy::from_env::<TConfig>()?)
    }
}
