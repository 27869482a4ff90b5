//! Scripted board sessions.
//!
//! A script is a JSON array of events in the shape the browser host would
//! produce. Pointer targets are resolved the way the DOM would: a point over
//! a placed sticker hits the sticker, a point inside the surface hits the
//! surface, anything else is outside.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::StickerCategory;
use crate::engine::{Action, BoardCore, DropPayload, DroppedFile};
use crate::geom::Point;
use crate::navigator::FloorStep;
use crate::reset::ResetIntent;
use crate::sticker::DragOrigin;
use crate::tool::{KeyEvent, PointerEvent, PointerSource, Target, Tool};

/// Error returned by [`load_script`] and [`run_script`].
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no sticker named `{0}` in the catalog")]
    UnknownSticker(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Resize {
        width: u32,
        height: u32,
    },
    Tool {
        tool: Tool,
    },
    Color {
        color: String,
    },
    Thickness {
        value: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        touch: bool,
        #[serde(default)]
        time_ms: u64,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        touch: bool,
    },
    PointerUp {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        touch: bool,
        #[serde(default)]
        time_ms: u64,
    },
    PointerLeave {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    PointerCancel,
    DoubleClick {
        x: f64,
        y: f64,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        repeat: bool,
    },
    KeyUp {
        key: String,
    },
    DropSticker {
        label: String,
        #[serde(default)]
        category: Option<StickerCategory>,
        x: f64,
        y: f64,
    },
    DropFile {
        path: PathBuf,
        mime: String,
        x: f64,
        y: f64,
    },
    Upload {
        path: PathBuf,
        mime: String,
    },
    SelectMap {
        id: String,
    },
    StepFloor {
        direction: Direction,
    },
    SelectFloor {
        index: usize,
    },
    Reset {
        intent: ResetIntent,
    },
    Confirm,
    Cancel,
}

/// Read and parse a script file.
///
/// # Errors
///
/// [`ReplayError::Io`] if the file cannot be read, [`ReplayError::Parse`] if
/// it is not a valid event array.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, ReplayError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
    parse_script(&raw)
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// [`ReplayError::Parse`] for malformed JSON or unknown event types.
pub fn parse_script(raw: &str) -> Result<Vec<ScriptEvent>, ReplayError> {
    Ok(serde_json::from_str(raw)?)
}

/// Feed `events` through `core`, returning every action produced.
///
/// Relative file paths resolve against `base_dir`. Invalid map or floor
/// selections are logged and skipped, as in the browser.
///
/// # Errors
///
/// [`ReplayError::Io`] when a referenced file cannot be read and
/// [`ReplayError::UnknownSticker`] when a dropped sticker label does not
/// resolve.
pub fn run_script(core: &mut BoardCore, events: &[ScriptEvent], base_dir: &Path) -> Result<Vec<Action>, ReplayError> {
    let mut actions = Vec::new();
    for event in events {
        actions.extend(apply(core, event, base_dir)?);
    }
    Ok(actions)
}

fn apply(core: &mut BoardCore, event: &ScriptEvent, base_dir: &Path) -> Result<Vec<Action>, ReplayError> {
    let actions = match event {
        ScriptEvent::Resize { width, height } => core.resize(*width, *height),
        ScriptEvent::Tool { tool } => core.select_tool(*tool),
        ScriptEvent::Color { color } => core.set_color(color),
        ScriptEvent::Thickness { value } => {
            core.set_thickness(*value);
            Vec::new()
        }
        ScriptEvent::PointerDown { x, y, touch, time_ms } => {
            let ev = pointer(core, Some(Point::new(*x, *y)), *touch, *time_ms);
            core.on_pointer_down(ev)
        }
        ScriptEvent::PointerMove { x, y, touch } => {
            let ev = pointer(core, Some(Point::new(*x, *y)), *touch, 0);
            core.on_pointer_move(ev)
        }
        ScriptEvent::PointerUp { x, y, touch, time_ms } => {
            let ev = pointer(core, point_of(*x, *y), *touch, *time_ms);
            core.on_pointer_up(ev)
        }
        ScriptEvent::PointerLeave { x, y } => {
            let ev = pointer(core, point_of(*x, *y), false, 0);
            core.on_pointer_leave(ev)
        }
        ScriptEvent::PointerCancel => core.on_pointer_cancel(PointerEvent::without_point()),
        ScriptEvent::DoubleClick { x, y } => {
            let ev = pointer(core, Some(Point::new(*x, *y)), false, 0);
            core.on_double_click(ev)
        }
        ScriptEvent::KeyDown { key, repeat } => {
            let ev = KeyEvent { key: key.clone(), repeat: *repeat };
            core.on_key_down(&ev)
        }
        ScriptEvent::KeyUp { key } => {
            core.on_key_up(&KeyEvent::new(key.clone()));
            Vec::new()
        }
        ScriptEvent::DropSticker { label, category, x, y } => {
            let template = core
                .catalog()
                .find_template(label, *category)
                .ok_or_else(|| ReplayError::UnknownSticker(label.clone()))?;
            core.on_drop(DropPayload::Sticker(DragOrigin::Tray(template)), Point::new(*x, *y))
        }
        ScriptEvent::DropFile { path, mime, x, y } => {
            let bytes = read_file(base_dir, path)?;
            let files = vec![DroppedFile { mime: mime.clone(), bytes }];
            core.on_drop(DropPayload::Files(files), Point::new(*x, *y))
        }
        ScriptEvent::Upload { path, mime } => {
            let bytes = read_file(base_dir, path)?;
            core.load_background_bytes(&bytes, mime)
        }
        ScriptEvent::SelectMap { id } => core.select_map(id).unwrap_or_default(),
        ScriptEvent::StepFloor { direction } => {
            let step = match direction {
                Direction::Prev => FloorStep::Prev,
                Direction::Next => FloorStep::Next,
            };
            core.step_floor(step).unwrap_or_default()
        }
        ScriptEvent::SelectFloor { index } => core.select_floor(*index).unwrap_or_default(),
        ScriptEvent::Reset { intent } => core.request_reset(*intent),
        ScriptEvent::Confirm => core.confirm_reset(),
        ScriptEvent::Cancel => core.cancel_reset(),
    };
    Ok(actions)
}

fn point_of(x: Option<f64>, y: Option<f64>) -> Option<Point> {
    Some(Point::new(x?, y?))
}

/// Build a pointer event with the target the DOM would report.
///
/// A release without coordinates (`touchend`) lands on the element the touch
/// started on, so it targets the sticker being dragged if there is one.
fn pointer(core: &BoardCore, point: Option<Point>, touch: bool, time_ms: u64) -> PointerEvent {
    let target = match point {
        Some(pt) => match core.stickers().hit(pt) {
            Some(id) => Target::Sticker(id),
            None if core.surface().bounds().contains(pt) => Target::Surface,
            None => Target::Outside,
        },
        None => core.stickers().dragging().map_or(Target::Surface, Target::Sticker),
    };
    let source = if touch { PointerSource::Touch } else { PointerSource::Mouse };
    PointerEvent { point, target, source, time_ms }
}

fn read_file(base_dir: &Path, path: &Path) -> Result<Vec<u8>, ReplayError> {
    let full = if path.is_absolute() { path.to_path_buf() } else { base_dir.join(path) };
    std::fs::read(&full).map_err(|source| ReplayError::Io { path: full, source })
}
