use argon2::Params;
use core_config::{ConfigError, FromEnv, env_parse};
use strum::{Display, EnumString};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordHashConfig {
    /// Validate the parameters and build `argon2::Params`.
    pub fn params(&self) -> Result<Params, argon2::Error> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
    }
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Environment variables:
/// - `PASSWORD_HASH_MEMORY_KIB` (default: 19456)
/// - `PASSWORD_HASH_ITERATIONS` (default: 2)
/// - `PASSWORD_HASH_PARALLELISM` (default: 1)
impl FromEnv for PasswordHashConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: env_parse(
                "PASSWORD_HASH_MEMORY_KIB",
                &defaults.memory_kib.to_string(),
            )?,
            iterations: env_parse(
                "PASSWORD_HASH_ITERATIONS",
                &defaults.iterations.to_string(),
            )?,
            parallelism: env_parse(
                "PASSWORD_HASH_PARALLELISM",
                &defaults.parallelism.to_string(),
            )?,
        })
    }
}

/// Whether a soft-deleted user's email may be registered again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmailReusePolicy {
    /// The address stays taken after deletion
    #[default]
    Retain,
    /// A new account may take the address once the old one is deleted
    Release,
}

/// Settings for the users domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsersConfig {
    pub password_hash: PasswordHashConfig,
    pub email_reuse: EmailReusePolicy,
}

/// Reads the `PASSWORD_HASH_*` variables plus `USER_EMAIL_REUSE`
/// (`retain` | `release`, default `retain`).
impl FromEnv for UsersConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            password_hash: PasswordHashConfig::from_env()?,
            email_reuse: env_parse("USER_EMAIL_REUSE", "retain")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_argon2() {
        let config = PasswordHashConfig::default();
        assert_eq!(config.memory_kib, 19_456);
        assert_eq!(config.iterations, 2);
        assert_eq!(config.parallelism, 1);
        assert!(config.params().is_ok());
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let config = PasswordHashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(config.params().is_err());
    }

    #[test]
    fn test_users_config_from_env() {
        temp_env::with_vars(
            [
                ("PASSWORD_HASH_MEMORY_KIB", Some("65536")),
                ("PASSWORD_HASH_ITERATIONS", Some("3")),
                ("PASSWORD_HASH_PARALLELISM", None),
                ("USER_EMAIL_REUSE", Some("Release")),
            ],
            || {
                let config = UsersConfig::from_env().unwrap();
                assert_eq!(config.password_hash.memory_kib, 65_536);
                assert_eq!(config.password_hash.iterations, 3);
                assert_eq!(config.password_hash.parallelism, 1);
                assert_eq!(config.email_reuse, EmailReusePolicy::Release);
            },
        );
    }

    #[test]
    fn test_unknown_email_reuse_policy_fails() {
        temp_env::with_var("USER_EMAIL_REUSE", Some("sometimes"), || {
            let err = UsersConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("USER_EMAIL_REUSE"));
        });
    }

    #[test]
    fn test_email_reuse_defaults_to_retain() {
        temp_env::with_var_unset("USER_EMAIL_REUSE", || {
            let config = UsersConfig::from_env().unwrap();
            assert_eq!(config.email_reuse, EmailReusePolicy::Retain);
        });
    }
}
