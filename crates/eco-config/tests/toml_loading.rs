//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use eco_config::{EcoConfig, LOCAL_CONFIG_FILE};
use figment::Jail;

#[test]
fn loads_project_file_from_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[database]
url = "libsql://ecosphere-dev.turso.io"
auth_token = "db-token"
run_migrations = false

[server]
port = 8080

[site]
title = "Valley Creative Economy"
region = "Hudson Valley"
default_limit = 25
"#,
        )?;

        let config = EcoConfig::load().map_err(|e| e.to_string())?;
        assert!(config.database.is_remote());
        assert!(!config.database.run_migrations);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.site.title, "Valley Creative Economy");
        assert_eq!(config.site.region, "Hudson Valley");
        assert_eq!(config.site.default_limit, 25);
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[clerk]
secret_key = "sk_test_toml"
"#,
        )?;

        let config = EcoConfig::load().map_err(|e| e.to_string())?;
        assert!(config.clerk.is_configured());
        assert_eq!(config.database.local_path, "ecosphere.db");
        assert_eq!(config.site.currency, "USD");
        Ok(())
    });
}

#[test]
fn invalid_value_in_file_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[site]
currency = "US"
"#,
        )?;

        let err = EcoConfig::load().unwrap_err();
        assert!(err.to_string().contains("site.currency"), "{err}");
        Ok(())
    });
}
