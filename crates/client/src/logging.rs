//! Logger initialization

use crate::config::LoggingConfig;

/// Initializes `env_logger`, reading RUST_LOG with the configured level as fallback.
///
/// Returns false if a logger was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.parse_env(env_logger::Env::default().default_filter_or(config.level.to_lowercase()));
    builder.format_timestamp_millis().try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
