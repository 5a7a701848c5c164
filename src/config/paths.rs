//! Config file location

use std::path::PathBuf;

use directories::ProjectDirs;

/// Overrides the directory holding `config.yaml`
pub const CONFIG_DIR_ENV: &str = "KUBE_LINEAGE_CONFIG_DIR";

const APP_NAME: &str = "kube-lineage";
const CONFIG_FILE: &str = "config.yaml";

/// Path of the config file for the current process environment
pub fn config_file() -> Option<PathBuf> {
    config_file_from(|key| std::env::var(key).ok())
}

/// `$KUBE_LINEAGE_CONFIG_DIR/config.yaml`, else
/// `$XDG_CONFIG_HOME/kube-lineage/config.yaml`, else the platform config dir.
///
/// `None` when no home directory can be determined.
pub fn config_file_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let dir = set(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| set("XDG_CONFIG_HOME").map(|base| PathBuf::from(base).join(APP_NAME)))
        .or_else(|| {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
        })?;

    Some(dir.join(CONFIG_FILE))
}
