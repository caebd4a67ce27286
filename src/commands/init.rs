//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Initialize configuration at the given base directory (or the default)
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let base = base_dir.unwrap_or_else(Config::default_base_dir);
    let config_path = base.join("config.toml");

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Already initialized at {}",
            config_path.display()
        )));
    }

    let mut config = Config::default();
    config.config_path = config_path;
    config.validate()?;
    config.save()?;

    info!("Initialized config at {:?}", config.config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_config() {
        let tmp = TempDir::new().unwrap();
        let config = cmd_init(Some(tmp.path().to_path_buf()), false).await.unwrap();
        assert!(config.config_path.exists());

        // Second init without force fails
        let result = cmd_init(Some(tmp.path().to_path_buf()), false).await;
        assert!(result.is_err());

        // Force overwrites
        let result = cmd_init(Some(tmp.path().to_path_buf()), true).await;
        assert!(result.is_ok());
    }
}
