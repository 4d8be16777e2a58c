use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};

// Import database configs from the database library
use database::RetryConfig;
use database::postgres::PostgresConfig;
use domain_users::UsersConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the library crates
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
    pub users: UsersConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL or DB_USER + DB_NAME required
        let retry = RetryConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let users = UsersConfig::from_env()?;
        let run_migrations = env_parse("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            retry,
            server,
            users,
            environment,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::EmailReusePolicy;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://app@localhost:5432/accounts")),
                ("RUN_MIGRATIONS", None),
                ("PORT", None),
                ("USER_EMAIL_REUSE", None),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.app.name, "accounts_api");
                assert_eq!(config.database.url, "postgres://app@localhost:5432/accounts");
                assert_eq!(config.server.port, 8080);
                assert!(config.run_migrations);
                assert_eq!(config.users.email_reuse, EmailReusePolicy::Retain);
                assert!(config.environment.is_development());
            },
        );
    }

    #[test]
    fn test_config_overrides() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://app@db:5432/accounts")),
                ("RUN_MIGRATIONS", Some("false")),
                ("PORT", Some("9090")),
                ("USER_EMAIL_REUSE", Some("release")),
                ("DB_CONNECT_MAX_RETRIES", Some("2")),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert!(!config.run_migrations);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.users.email_reuse, EmailReusePolicy::Release);
                assert_eq!(config.retry.max_retries, 2);
            },
        );
    }

    #[test]
    fn test_config_requires_database() {
        temp_env::with_vars_unset(["DATABASE_URL", "DB_USER", "DB_NAME"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_config_rejects_bad_flag() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://app@localhost/accounts")),
                ("RUN_MIGRATIONS", Some("sometimes")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("RUN_MIGRATIONS"));
            },
        );
    }
}
