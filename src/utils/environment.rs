use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the alias file location.
pub const ALIASES_ENV_VAR: &str = "MESSENGER_ARCHIVE_ALIASES";

const APP_DIR: &str = "messenger-archive-loader";
const ALIASES_FILE: &str = "aliases.txt";

/// Alias file to use when none is given on the command line.
///
/// `MESSENGER_ARCHIVE_ALIASES` if set, else `<config dir>/messenger-archive-loader/aliases.txt`
/// if that file exists.
pub fn default_alias_file() -> Option<PathBuf> {
    if let Some(path) = env::var_os(ALIASES_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().and_then(|dir| existing_alias_file(&dir))
}

fn existing_alias_file(config_dir: &Path) -> Option<PathBuf> {
    let path = config_dir.join(APP_DIR).join(ALIASES_FILE);
    path.is_file().then_some(path)
}
