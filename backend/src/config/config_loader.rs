use std::{fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, bail};
use vhr_core::{
    domain::value_objects::{
        enums::trial_modes::TrialMode,
        plan_catalog::PlanCatalog,
        trial_policy::{
            DAY_MS, DEFAULT_TRIAL_DAYS, DEFAULT_WARNING_DAYS_BEFORE, ExpirationActions,
            MAX_TRIAL_DAYS, TrialPolicy,
        },
    },
    infra::user_access_store::DatabaseSettings,
};

use super::config_model::{BackendServer, DotEnvyConfig, StaticSite, Trial};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

pub fn get_jwt_secret() -> Result<String> {
    std::env::var("JWT_SECRET")
        .ok()
        .filter(|v| !v.is_empty())
        .context("JWT_SECRET is invalid")
}

pub(crate) fn load_from<F>(env: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if value(&env, "JWT_SECRET").is_none() {
        bail!("JWT_SECRET is invalid");
    }

    let backend_server = BackendServer {
        port: parse_or(&env, "SERVER_PORT_BACKEND", 8080)?,
        body_limit: parse_or(&env, "SERVER_BODY_LIMIT", 10)?,
        timeout: parse_or(&env, "SERVER_TIMEOUT", 30)?,
    };

    let mode = match value(&env, "TRIAL_MODE") {
        Some(raw) => TrialMode::try_from(raw.as_str()).context("TRIAL_MODE is invalid")?,
        None => TrialMode::default(),
    };

    let database = match value(&env, "DATABASE_URL") {
        Some(url) => Some(DatabaseSettings {
            url,
            pool_size: parse_or(&env, "DATABASE_POOL_SIZE", 10)?,
        }),
        None => None,
    };

    if mode == TrialMode::Database && database.is_none() {
        bail!("DATABASE_URL is required when TRIAL_MODE=database");
    }

    let trial = Trial {
        mode,
        policy: trial_policy(&env)?,
    };

    let plan_catalog = match value(&env, "PLAN_CATALOG_PATH") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("PLAN_CATALOG_PATH {path} cannot be read"))?;
            PlanCatalog::from_json(&raw)
                .with_context(|| format!("PLAN_CATALOG_PATH {path} is invalid"))?
        }
        None => PlanCatalog::default(),
    };

    let static_site = value(&env, "STATIC_ROOT").map(|root| StaticSite {
        root: PathBuf::from(root),
    });

    Ok(DotEnvyConfig {
        backend_server,
        database,
        trial,
        plan_catalog,
        static_site,
    })
}

fn trial_policy<F>(env: &F) -> Result<TrialPolicy>
where
    F: Fn(&str) -> Option<String>,
{
    // An explicit duration in milliseconds wins over the day count.
    let trial_duration_ms = match value(env, "TRIAL_DURATION_MS") {
        Some(_) => parse_or(env, "TRIAL_DURATION_MS", 0i64)?,
        None => {
            let days = parse_or(env, "TRIAL_DAYS", DEFAULT_TRIAL_DAYS)?;
            days.checked_mul(DAY_MS).context("TRIAL_DAYS is invalid")?
        }
    };
    if trial_duration_ms < 0 {
        bail!("trial duration must not be negative");
    }
    if trial_duration_ms > MAX_TRIAL_DAYS * DAY_MS {
        bail!("trial duration must not exceed {MAX_TRIAL_DAYS} days");
    }

    let warning_threshold_days =
        parse_or(env, "TRIAL_WARNING_DAYS_BEFORE", DEFAULT_WARNING_DAYS_BEFORE)?;
    if warning_threshold_days < 0 {
        bail!("TRIAL_WARNING_DAYS_BEFORE must not be negative");
    }

    let defaults = ExpirationActions::default();
    let on_expiration = ExpirationActions {
        block_access: bool_or(env, "TRIAL_BLOCK_ACCESS", defaults.block_access)?,
        show_upgrade_prompt: bool_or(env, "TRIAL_SHOW_UPGRADE_PROMPT", defaults.show_upgrade_prompt)?,
        redirect_to_upgrade: bool_or(env, "TRIAL_REDIRECT_TO_UPGRADE", defaults.redirect_to_upgrade)?,
        send_notification_email: bool_or(
            env,
            "TRIAL_SEND_NOTIFICATION_EMAIL",
            defaults.send_notification_email,
        )?,
    };

    Ok(TrialPolicy {
        trial_duration_ms,
        warning_threshold_days,
        on_expiration,
    })
}

fn value<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(env: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match value(env, key) {
        Some(raw) => raw
            .parse()
            .map_err(|err| anyhow::anyhow!("{key} is invalid: {err}")),
        None => Ok(default),
    }
}

fn bool_or<F>(env: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match value(env, key) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
            "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
            _ => bail!("{key} is invalid: expected a boolean, got `{raw}`"),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<DotEnvyConfig> {
        let mut env: HashMap<String, String> = HashMap::from([(
            "JWT_SECRET".to_string(),
            "supersecretjwtsecretforunittesting123".to_string(),
        )]);
        for (key, value) in vars {
            env.insert(key.to_string(), value.to_string());
        }
        load_from(|key| env.get(key).cloned())
    }

    #[test]
    fn memory_mode_uses_documented_defaults() {
        let config = load_with(&[("TRIAL_MODE", "memory")]).unwrap();

        assert_eq!(config.backend_server.port, 8080);
        assert_eq!(config.trial.mode, TrialMode::Memory);
        assert_eq!(config.trial.policy, TrialPolicy::default());
        assert_eq!(config.plan_catalog, PlanCatalog::default());
        assert!(config.database.is_none());
        assert!(config.static_site.is_none());
    }

    #[test]
    fn database_mode_requires_database_url() {
        assert!(load_with(&[]).is_err());

        let config = load_with(&[
            ("DATABASE_URL", "postgres://localhost:5432/vhr"),
            ("DATABASE_POOL_SIZE", "4"),
        ])
        .unwrap();
        assert_eq!(config.trial.mode, TrialMode::Database);
        assert_eq!(config.database.unwrap().pool_size, 4);
    }

    #[test]
    fn jwt_secret_is_required() {
        let result = load_from(|key| match key {
            "TRIAL_MODE" => Some("none".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn trial_policy_reads_overrides() {
        let config = load_with(&[
            ("TRIAL_MODE", "none"),
            ("TRIAL_DAYS", "14"),
            ("TRIAL_WARNING_DAYS_BEFORE", "3"),
            ("TRIAL_BLOCK_ACCESS", "false"),
            ("TRIAL_REDIRECT_TO_UPGRADE", "yes"),
        ])
        .unwrap();

        let policy = config.trial.policy;
        assert_eq!(policy.trial_duration_ms, 14 * DAY_MS);
        assert_eq!(policy.warning_threshold_days, 3);
        assert!(!policy.on_expiration.block_access);
        assert!(policy.on_expiration.redirect_to_upgrade);
        assert!(policy.on_expiration.show_upgrade_prompt);
    }

    #[test]
    fn duration_in_milliseconds_wins_over_days() {
        let config = load_with(&[
            ("TRIAL_MODE", "memory"),
            ("TRIAL_DAYS", "14"),
            ("TRIAL_DURATION_MS", "3600000"),
        ])
        .unwrap();
        assert_eq!(config.trial.policy.trial_duration_ms, 3_600_000);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(load_with(&[("TRIAL_MODE", "cookie")]).is_err());
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_DAYS", "seven")]).is_err());
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_DAYS", "-1")]).is_err());
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_BLOCK_ACCESS", "maybe")]).is_err());
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("SERVER_PORT_BACKEND", "99999")]).is_err());
    }

    #[test]
    fn rejects_trial_durations_beyond_the_maximum() {
        let max_ms = (MAX_TRIAL_DAYS * DAY_MS).to_string();
        let config = load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_DURATION_MS", &max_ms)]).unwrap();
        assert_eq!(config.trial.policy.trial_duration_days(), MAX_TRIAL_DAYS);

        assert!(
            load_with(&[
                ("TRIAL_MODE", "memory"),
                ("TRIAL_DURATION_MS", "9223372036854775807"),
            ])
            .is_err()
        );
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_DAYS", "100000000000")]).is_err());
        assert!(load_with(&[("TRIAL_MODE", "memory"), ("TRIAL_DAYS", "3651")]).is_err());
    }

    #[test]
    fn missing_plan_catalog_file_is_an_error() {
        let result = load_with(&[
            ("TRIAL_MODE", "memory"),
            ("PLAN_CATALOG_PATH", "/nonexistent/vhr/plans.json"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn loads_plan_catalog_and_static_root() {
        let dir = std::env::temp_dir().join(format!("vhr-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let catalog_path = dir.join("plans.json");
        std::fs::write(
            &catalog_path,
            r#"[{"id": "plan_pro", "name": "Pro", "price_minor": 2999, "currency": "EUR"}]"#,
        )
        .unwrap();

        let config = load_with(&[
            ("TRIAL_MODE", "memory"),
            ("PLAN_CATALOG_PATH", catalog_path.to_str().unwrap()),
            ("STATIC_ROOT", "/srv/vhr-demo"),
        ])
        .unwrap();

        assert!(config.plan_catalog.resolve("plan_pro").is_some());
        assert_eq!(
            config.static_site.unwrap().root,
            PathBuf::from("/srv/vhr-demo")
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
