use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::store_io;

pub fn cmd_init(data_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;

    let wrote_config = config_io::write_default_config(data_dir, args.force)?;

    // An existing store is left alone; only a missing one is created
    let store_file = store_io::store_path(data_dir);
    let created_store = !store_file.exists();
    if created_store {
        let planner = store_io::load_planner(data_dir)?;
        store_io::save_planner(&planner)?;
    }

    println!("Initialized daily-todo in {}", data_dir.display());
    if wrote_config {
        println!("  wrote {}", config_io::config_path(data_dir).display());
    } else {
        println!("  kept existing config.toml (use --force to overwrite)");
    }
    if created_store {
        println!("  created {}", store_file.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_config_and_store() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        cmd_init(&dir, InitArgs { force: false }).unwrap();
        assert!(config_io::config_path(&dir).exists());
        assert_eq!(
            std::fs::read_to_string(store_io::store_path(&dir)).unwrap().trim(),
            "{}"
        );
    }

    #[test]
    fn init_keeps_existing_store() {
        let tmp = TempDir::new().unwrap();
        let store = store_io::store_path(tmp.path());
        std::fs::write(&store, r#"{"2024-01-01":[]}"#).unwrap();
        cmd_init(tmp.path(), InitArgs { force: false }).unwrap();
        assert_eq!(
            std::fs::read_to_string(&store).unwrap(),
            r#"{"2024-01-01":[]}"#
        );
    }
}
