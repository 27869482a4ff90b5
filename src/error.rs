//! Error types for the board core.
//!
//! None of these are fatal to a session: callers reduce them to a status
//! notice or a diagnostic log line and leave state unchanged.

/// Error returned when the embedded or supplied catalog cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog JSON did not parse.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// A shortcut binding names a sticker that is not in the catalog.
    #[error("shortcut `{key}` refers to unknown sticker `{label}`")]
    UnknownShortcutTarget { key: String, label: String },
    /// A map lists a default floor outside its floor list.
    #[error("map `{map}` default floor {floor} is out of range")]
    BadDefaultFloor { map: String, floor: usize },
    /// A selectable map has no floors.
    #[error("map `{0}` has no floors")]
    NoFloors(String),
}

/// Invalid map or floor selection. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// No map with this id exists.
    #[error("unknown map id `{0}`")]
    UnknownMap(String),
    /// The id exists but is the placeholder entry.
    #[error("map `{0}` is not selectable")]
    NotSelectable(String),
    /// Floor index outside `[0, floors)` for the current map.
    #[error("floor {index} out of range for map `{map}` ({floors} floors)")]
    FloorOutOfRange { map: String, index: usize, floors: usize },
    /// A floor operation was requested before any map was selected.
    #[error("no map selected")]
    NoMapSelected,
}

/// The ink surface could not be allocated at the requested size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface {width}x{height} exceeds the pixel limit")]
    TooLarge { width: u32, height: u32 },
}

/// A user-supplied background file was rejected.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The MIME type is not `image/*`.
    #[error("not an image file: {0}")]
    NotAnImage(String),
    /// The bytes claimed to be an image but did not decode.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}
