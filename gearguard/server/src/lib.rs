pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_log_level")]
        pub log_level: String,
        #[serde(default = "default_top_equipment_limit")]
        pub top_equipment_limit: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_source(config::Environment::default())
        }

        fn from_source<S>(source: S) -> anyhow::Result<Self>
        where
            S: config::Source + Send + Sync + 'static,
        {
            let settings = config::Config::builder().add_source(source).build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_log_level() -> String {
        "info".to_string()
    }

    fn default_top_equipment_limit() -> u64 {
        crate::report::DEFAULT_TOP_EQUIPMENT_LIMIT
    }

}
pub mod entities;
pub mod equipment;
pub mod report;
pub mod request;
pub mod web;
