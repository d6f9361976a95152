//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::KaryaConfig;
use super::secret::secret_from;
use crate::domain::errors::KaryaError;
use crate::domain::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`KaryaConfig`]
/// 4. Applies environment variable overrides (`KARYA_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use karya::config::load_config;
///
/// let config = load_config("karya.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<KaryaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(KaryaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        KaryaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: KaryaConfig = toml::from_str(&contents)
        .map_err(|e| KaryaError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| KaryaError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched, so a commented-out `token = "${...}"`
/// line never fails the load.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(KaryaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `KARYA_*` prefix
///
/// Variables follow the pattern `KARYA_<SECTION>_<KEY>`, for example
/// `KARYA_API_BASE_URL` or `KARYA_EXPORT_OUTPUT_DIR`.
fn apply_env_overrides(config: &mut KaryaConfig) {
    if let Ok(value) = std::env::var("KARYA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = value;
    }
    if let Ok(value) = std::env::var("KARYA_APPLICATION_DRY_RUN") {
        config.application.dry_run = value.eq_ignore_ascii_case("true") || value == "1";
    }
    if let Ok(value) = std::env::var("KARYA_API_BASE_URL") {
        config.api.base_url = value;
    }
    if let Ok(value) = std::env::var("KARYA_API_TOKEN") {
        config.api.token = Some(secret_from(value));
    }
    if let Ok(value) = std::env::var("KARYA_API_TIMEOUT_SECONDS") {
        if let Ok(parsed) = value.parse() {
            config.api.timeout_seconds = parsed;
        } else {
            tracing::warn!(value = %value, "Ignoring non-numeric KARYA_API_TIMEOUT_SECONDS");
        }
    }
    if let Ok(value) = std::env::var("KARYA_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = value;
    }
    if let Ok(value) = std::env::var("KARYA_EXPORT_BRANDING_URL") {
        config.export.branding_url = Some(value);
    }
    if let Ok(value) = std::env::var("KARYA_EXPORT_PROFILE_URL_TEMPLATE") {
        config.export.profile_url_template = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_env_vars_replaces_known() {
        std::env::set_var("KARYA_TEST_SUBST_VALUE", "hello");
        let out = substitute_env_vars("key = \"${KARYA_TEST_SUBST_VALUE}\"").unwrap();
        assert_eq!(out.trim(), "key = \"hello\"");
        std::env::remove_var("KARYA_TEST_SUBST_VALUE");
    }

    #[test]
    fn test_substitute_env_vars_missing_is_error() {
        let err = substitute_env_vars("key = \"${KARYA_TEST_DEFINITELY_MISSING}\"").unwrap_err();
        assert!(err
            .to_string()
            .contains("KARYA_TEST_DEFINITELY_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let out = substitute_env_vars("# token = \"${KARYA_TEST_COMMENTED}\"").unwrap();
        assert!(out.contains("${KARYA_TEST_COMMENTED}"));
    }
}
