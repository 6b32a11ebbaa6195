use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    TilesetId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Editor settings, read from a JSON file. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tileset: TilesetId,
    /// Brush index into the tileset's brush list; the tileset default when unset
    pub brush: Option<usize>,
    pub clutter: i32,
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
    /// Directory holding the `.cv5`/`.vx4`/`.vr4`/`.wpe` files
    pub graphics_dir: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        return Self {
            tileset: 0,
            brush: None,
            clutter: 0,
            width: 64,
            height: 64,
            seed: None,
            graphics_dir: None,
            log_level: LogLevel::default(),
            log_file: None,
        };
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        return Ok(serde_json::from_str(json)?);
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        return Ok(config);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = EditorConfig::from_json(
            r#"{ "tileset": 4, "clutter": 35, "seed": 9, "log_level": "trace" }"#,
        )
        .unwrap();
        assert_eq!(config.tileset, 4);
        assert_eq!(config.clutter, 35);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.width, 64);
        assert_eq!(config.brush, None);
        assert_eq!(log::LevelFilter::from(config.log_level), log::LevelFilter::Trace);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(EditorConfig::from_json("{ tileset: }"), Err(Error::Json(_))));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "log_level": "loud" }"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        fs::write(&path, r#"{ "width": 128, "height": 96, "graphics_dir": "/tmp/tiles" }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!((config.width, config.height), (128, 96));
        assert_eq!(config.graphics_dir, Some(PathBuf::from("/tmp/tiles")));
        assert!(matches!(
            EditorConfig::load(dir.path().join("missing.json")),
            Err(Error::Io { .. })
        ));
    }
}
