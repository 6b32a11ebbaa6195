use std::path::PathBuf;

use crate::{TileGroupId, TilesetId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tileset id {0} is out of range (expected 0..{1})")]
    TilesetOutOfRange(i64, usize),

    #[error("brush index {index} is out of range for tileset {tileset} ({len} brushes)")]
    BrushOutOfRange {
        tileset: TilesetId,
        index: usize,
        len: usize,
    },

    #[error(
        "tile group {0} is out of range (groups stop at {max})",
        max = crate::selector::MAX_GROUP
    )]
    InvalidGroup(TileGroupId),

    #[error("map dimensions {0}x{1} are invalid")]
    InvalidDimensions(u32, u32),

    #[error("no map is open")]
    NoMap,

    #[error("view {0} is not attached to this map")]
    UnknownView(u32),

    #[error("player slot {0} does not exist")]
    InvalidOwner(u8),

    #[error("unit position ({0}, {1}) is outside the map")]
    UnitOutOfBounds(u32, u32),

    #[error("{what} data is {len} bytes, expected whole {record} byte records")]
    Truncated {
        what: &'static str,
        len: usize,
        record: usize,
    },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
