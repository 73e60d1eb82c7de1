//! Settings loading from `.threadline/config.toml`

use std::path::Path;

use threadline_core::prelude::*;

use super::types::Settings;

pub const THREADLINE_DIR: &str = ".threadline";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Load settings, falling back to defaults when the file is missing or broken
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(THREADLINE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create `.threadline/config.toml` with commented defaults if missing
pub fn init_threadline_directory(project_path: &Path) -> Result<()> {
    let dir = project_path.join(THREADLINE_DIR);

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::config(format!("Failed to create .threadline dir: {}", e)))?;
        info!("Created .threadline directory");
    }

    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config.toml");
    }

    Ok(())
}

fn generate_default_config() -> &'static str {
    r#"# threadline configuration

[remote]
# Relative endpoints in the thread seed are resolved against this
base_url = "http://localhost:8000"
# Per-request timeout
timeout_ms = 10000
# Header carrying the anti-forgery token (value comes from THREADLINE_CSRF_TOKEN)
anti_forgery_header = "X-CSRFToken"

[thread]
# Comments the page was rendered with, relative to this directory
# seed = "thread.json"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(THREADLINE_DIR)).unwrap();
        std::fs::write(
            dir.path().join(THREADLINE_DIR).join(CONFIG_FILENAME),
            "[remote\nbase_url = ",
        )
        .unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(THREADLINE_DIR)).unwrap();
        std::fs::write(
            dir.path().join(THREADLINE_DIR).join(CONFIG_FILENAME),
            "[remote]\ntimeout_ms = 2500\n",
        )
        .unwrap();
        let settings = load_settings(dir.path());
        assert_eq!(settings.remote.timeout_ms, 2500);
    }

    #[test]
    fn test_init_writes_parseable_defaults() {
        let dir = tempdir().unwrap();
        init_threadline_directory(dir.path()).unwrap();
        assert!(dir.path().join(THREADLINE_DIR).join(CONFIG_FILENAME).exists());
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(THREADLINE_DIR)).unwrap();
        let path = dir.path().join(THREADLINE_DIR).join(CONFIG_FILENAME);
        std::fs::write(&path, "[remote]\ntimeout_ms = 1\n").unwrap();

        init_threadline_directory(dir.path()).unwrap();
        assert_eq!(load_settings(dir.path()).remote.timeout_ms, 1);
    }
}
