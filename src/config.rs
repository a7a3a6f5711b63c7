//! CLI configuration loaded from `.rangelink.toml`.

use std::path::Path;

use crate::delimiters::DelimiterConfig;
use crate::error::Error;

/// Raw TOML structure for `.rangelink.toml`.
#[derive(serde::Deserialize)]
struct RangelinkTomlConfig {
    #[serde(default)]
    delimiters: RawDelimiters,
}

/// The optional `[delimiters]` table. Unset fields fall back to the
/// defaults.
#[derive(Default, serde::Deserialize)]
struct RawDelimiters {
    hash: Option<String>,
    line: Option<String>,
    position: Option<String>,
    range: Option<String>,
}

/// Load delimiters from `.rangelink.toml` in the given directory.
///
/// Returns the default configuration if the file doesn't exist. Returns
/// an error if the file exists but is malformed or configures invalid
/// tokens — never silently falls back to defaults when the user wrote a
/// config file.
///
/// # Errors
///
/// Returns `Error::Io` if reading fails (other than not-found),
/// `Error::TomlDe` if the TOML is malformed, or any delimiter-validation
/// error for bad tokens.
pub fn load(root: &Path) -> Result<DelimiterConfig, Error> {
    let path = root.join(".rangelink.toml");
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(DelimiterConfig::default());
        },
        Err(e) => return Err(Error::Io(e)),
    };

    let raw: RangelinkTomlConfig = toml::from_str(&content)?;
    let defaults = DelimiterConfig::default();

    return DelimiterConfig::new(
        raw.delimiters.line.as_deref().unwrap_or(defaults.line()),
        raw.delimiters
            .position
            .as_deref()
            .unwrap_or(defaults.position()),
        raw.delimiters.hash.as_deref().unwrap_or(defaults.hash()),
        raw.delimiters.range.as_deref().unwrap_or(defaults.range()),
    );
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config, DelimiterConfig::default());
    }

    #[test]
    fn partial_table_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".rangelink.toml"),
            "[delimiters]\nhash = \"%\"\n",
        )
        .unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config.hash(), "%");
        assert_eq!(config.line(), "L");
    }

    #[test]
    fn malformed_toml_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".rangelink.toml"), "delimiters = [").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn invalid_tokens_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".rangelink.toml"),
            "[delimiters]\nline = \"L1\"\n",
        )
        .unwrap();
        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.code(), "DELIMITER_DIGITS");
    }
}
