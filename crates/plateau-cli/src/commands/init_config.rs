//! Init-config command implementation.

use crate::cli::InitConfigArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use plateau_extractor::EngineConfig;
use std::path::{Path, PathBuf};

/// Write default configuration files, returning the paths written.
pub fn init_config(path: &Path, force: bool, engine_config: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save(path)?;
    written.push(path.to_path_buf());

    if let Some(engine_path) = engine_config {
        if engine_path.exists() && !force {
            return Err(CliError::InvalidInput(format!(
                "{} already exists (use --force to overwrite)",
                engine_path.display()
            )));
        }
        EngineConfig::default().write(engine_path)?;
        written.push(engine_path.to_path_buf());
    }
    Ok(written)
}

/// Execute the init-config command.
pub fn execute_init_config(args: InitConfigArgs, formatter: &Formatter) -> Result<()> {
    let path = match args.path {
        Some(p) => p,
        None => Config::path()?,
    };
    for written in init_config(&path, args.force, args.engine_config.as_deref())? {
        println!("{}", formatter.success(&format!("Wrote {}", written.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let engine = dir.path().join("engine.json");

        let written = init_config(&path, false, Some(&engine)).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
        assert!(EngineConfig::load(&engine).is_ok());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(init_config(&path, false, None), Err(CliError::InvalidInput(_))));
        assert!(init_config(&path, true, None).is_ok());
    }
}
