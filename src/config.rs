use std::path::PathBuf;

use crate::auth::{StaticCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub admin_user: String,
    pub admin_password: String,
    pub roster_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            admin_user: non_empty("SEGAK_ADMIN_USER").unwrap_or_else(|| DEFAULT_ADMIN_USER.to_string()),
            admin_password: non_empty("SEGAK_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            roster_csv: non_empty("SEGAK_ROSTER_CSV").map(PathBuf::from),
        }
    }

    pub fn authenticator(&self) -> StaticCredentials {
        StaticCredentials::new(&self.admin_user, &self.admin_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.admin_user, "admin");
        assert_eq!(config.admin_password, "password123");
        assert!(config.roster_csv.is_none());
    }

    #[test]
    fn env_values_override_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SEGAK_ADMIN_USER", "guru"),
            ("SEGAK_ADMIN_PASSWORD", "rahsia"),
            ("SEGAK_ROSTER_CSV", "data/tahun4.csv"),
            ("UNRELATED", "x"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.admin_user, "guru");
        assert_eq!(config.admin_password, "rahsia");
        assert_eq!(config.roster_csv, Some(PathBuf::from("data/tahun4.csv")));
    }

    #[test]
    fn blank_values_fall_back() {
        let config = AppConfig::from_lookup(|key| (key == "SEGAK_ADMIN_USER").then(|| "  ".to_string()));
        assert_eq!(config.admin_user, "admin");
    }
}
