mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/driver-rank/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("driver-rank"))
}

/// Get the default config file path (~/.config/driver-rank/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/driver-rank/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(
                    path = %default_path.display(),
                    "no config file, using built-in defaults"
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

/// Write `config` as YAML to `path` atomically, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let temp_path = env::temp_dir().join("driver_rank_test_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);
        let err = load_config(Some(temp_path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_partial_config() {
        let temp_path = env::temp_dir().join("driver_rank_test_partial_config.yaml");
        fs::write(
            &temp_path,
            "scoring:\n  cancellation: 3.0\nleaderboard_size: 5\n",
        )
        .unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.cancellation_weight(), 3.0);
        assert_eq!(scoring.work_rate_weight(), 1.5);
        assert_eq!(config.leaderboard_size, Some(5));
        assert!(config.work_day_window.is_none());

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_path = env::temp_dir().join("driver_rank_test_invalid_config.yaml");
        fs::write(&temp_path, "scoring: [not, a, map\n").unwrap();
        let err = load_config(Some(temp_path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_write_and_load_roundtrip() {
        let dir = env::temp_dir().join("driver_rank_test_write_config");
        let temp_path = dir.join("config.yaml");
        let _ = fs::remove_file(&temp_path);

        let config = Config::with_defaults();
        write_config(&temp_path, &config, false).unwrap();
        let loaded = load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(loaded, config);

        // Second write without force is refused
        assert!(write_config(&temp_path, &config, false).is_err());
        assert!(write_config(&temp_path, &config, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }
}
