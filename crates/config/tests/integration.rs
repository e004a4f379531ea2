//! Integration tests for config

#[cfg(test)]
mod tests {
    use ghfetch_config::*;
    use ghfetch_types::ColorChoice;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "GHFETCH_COLOR",
            "GHFETCH_GITHUB_URL",
            "GHFETCH_GITHUB_API_URL",
            "GHFETCH_TOKEN_ENV",
            "GHFETCH_TIMEOUT",
            "GHFETCH_RETRIES",
        ] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
color = "never"

[github]
web_url = "https://github.example.com"
api_url = "https://github.example.com/api/v3"
token_env = "GHE_TOKEN"

[network]
timeout = 60
retries = 2
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.github.token_env, "GHE_TOKEN");
        assert_eq!(
            config.github.api_url().unwrap().as_str(),
            "https://github.example.com/api/v3"
        );
        assert_eq!(config.network.timeout, 60);
        assert_eq!(config.network.retries, 2);
        // Unspecified fields fall back to defaults
        assert_eq!(config.network.connect_timeout, 30);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.web_url, "https://github.com");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.token_env, "HOMEBREW_GITHUB_API_TOKEN");
        assert_eq!(config.network.retries, 0);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("nope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ghfetch_errors::Error::Config(ghfetch_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = Config::default();
        config.github.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.github.api_url = "ftp://api.github.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("GHFETCH_COLOR", "always");
        std::env::set_var("GHFETCH_TOKEN_ENV", "MY_TOKEN");
        std::env::set_var("GHFETCH_RETRIES", "3");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.github.token_env, "MY_TOKEN");
        assert_eq!(config.network.retries, 3);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("GHFETCH_TIMEOUT", "soon");

        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
        std::env::set_var("GHFETCH_GITHUB_API_URL", "nowhere");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }
}
