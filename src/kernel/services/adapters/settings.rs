use crate::kernel::services::ports::settings::Settings;
use std::io;
use std::path::Path;

/// Reads settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> io::Result<Settings> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Settings::default());
        }
        Err(err) => return Err(err),
    };

    serde_json::from_str(&data).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), err),
        )
    })
}

pub fn write_default_settings(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(&Settings::default())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    std::fs::write(path, content)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/settings.rs"]
mod tests;
