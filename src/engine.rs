use std::collections::HashSet;

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::background::{Background, BackgroundSlot, decode_upload, is_image_mime};
use crate::catalog::{Catalog, TemplateId};
use crate::color::{hex_to_rgba, normalize_hex_color};
use crate::config::BoardConfig;
use crate::error::NavError;
use crate::geom::Point;
use crate::navigator::{FloorControls, FloorStep, FloorView, MapNavigator};
use crate::reset::{PendingConfirmation, ResetCoordinator, ResetIntent};
use crate::sticker::{DragOrigin, PlacedSticker, StickerId, StickerSizes, StickerStore};
use crate::surface::{Ink, Surface};
use crate::tool::{KeyEvent, PointerEvent, PointerSource, Stroke, Target, Tool, ToolSettings};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const FALLBACK_INK: Rgba<u8> = Rgba([255, 0, 0, 255]);

const PICK_LOADED: &str = "Image loaded";
const PICK_REJECTED: &str = "Please select an image file.";
const DROP_LOADED: &str = "Image loaded!";
const DROP_REJECTED: &str = "Please drop an image file.";

/// A status line for the host to show briefly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub text: String,
    pub duration_ms: u64,
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Notice(Notice),
    ConfirmOpen { message: String },
    ConfirmClose,
    ToolChanged { tool: Tool },
    StickerPlaced { id: StickerId },
    StickerMoved { id: StickerId },
    StickerRemoved { id: StickerId },
    StickersCleared,
    SurfaceCleared,
    BackgroundChanged,
    FloorControlsChanged(FloorControls),
    RenderNeeded,
}

/// One file from a drag-and-drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// What arrived in a drop on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// A sticker drag, from the tray or from the board itself.
    Sticker(DragOrigin),
    /// Files dragged in from the desktop.
    Files(Vec<DroppedFile>),
    /// Anything the board does not understand.
    Unknown,
}

/// Core board state: everything that does not depend on a browser.
///
/// Owns the ink surface, tool state, stickers, map selection, background,
/// and pending reset. Every handler runs to completion and returns the
/// [`Action`]s the host should render.
pub struct BoardCore {
    config: BoardConfig,
    catalog: Catalog,
    surface: Surface,
    tool: Tool,
    settings: ToolSettings,
    stroke: Stroke,
    stickers: StickerStore,
    navigator: MapNavigator,
    background: BackgroundSlot,
    reset: ResetCoordinator,
    last_pointer: Option<Point>,
    held_keys: HashSet<String>,
}

impl BoardCore {
    /// Create a board with an empty surface showing the catalog placeholder.
    #[must_use]
    pub fn new(config: BoardConfig, catalog: Catalog) -> Self {
        let settings = ToolSettings {
            color: normalize_hex_color(&config.pen_color, crate::consts::DEFAULT_PEN_COLOR),
            thickness: ToolSettings::clamp_thickness(config.pen_thickness),
        };
        let mut background = BackgroundSlot::default();
        if let Some(url) = catalog.placeholder().and_then(|p| p.floors.first()).map(|f| f.image.clone()) {
            background.set(Background::Placeholder { url });
        }
        Self {
            config,
            catalog,
            surface: Surface::default(),
            tool: Tool::default(),
            settings,
            stroke: Stroke::Idle,
            stickers: StickerStore::new(),
            navigator: MapNavigator::new(),
            background,
            reset: ResetCoordinator::new(),
            last_pointer: None,
            held_keys: HashSet::new(),
        }
    }

    // --- Surface ---

    /// Match the surface to the container's new pixel size.
    ///
    /// Ink is discarded; any stroke in progress is dropped. Stickers are
    /// pulled back inside the new bounds. A size over the pixel limit is
    /// refused and the board is left as it was.
    pub fn resize(&mut self, width: u32, height: u32) -> Vec<Action> {
        if let Err(e) = self.surface.resize(width, height) {
            tracing::warn!(error = %e, "resize rejected");
            return Vec::new();
        }
        self.stroke = Stroke::Idle;
        self.stickers.clamp_all(self.surface.bounds());
        vec![Action::SurfaceCleared, Action::RenderNeeded]
    }

    /// Where keyboard placement lands before any pointer has been seen.
    #[must_use]
    pub fn placement_origin(&self) -> Point {
        self.surface.bounds().center()
    }

    // --- Tool ---

    /// Switch tools. Any stroke in flight is abandoned (an arrow preview is
    /// rolled back).
    pub fn select_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.cancel_stroke();
        self.tool = tool;
        tracing::debug!(?tool, "tool selected");
        vec![
            Action::ToolChanged { tool },
            self.notice(tool.selected_message()),
            Action::RenderNeeded,
        ]
    }

    /// Change the ink color. Always lands on the pen.
    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        self.settings.color = normalize_hex_color(color, &self.settings.color);
        self.cancel_stroke();
        self.tool = Tool::Pen;
        vec![Action::ToolChanged { tool: Tool::Pen }, Action::RenderNeeded]
    }

    /// Change the base thickness. Takes effect from the next stroke.
    pub fn set_thickness(&mut self, thickness: f64) {
        self.settings.thickness = ToolSettings::clamp_thickness(thickness);
    }

    /// Stroke width the active tool would draw with.
    #[must_use]
    pub fn effective_width(&self) -> f64 {
        match self.tool {
            Tool::Eraser => self.settings.thickness * self.config.eraser_multiplier,
            Tool::Pen | Tool::Arrow => self.settings.thickness,
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        self.observe_pointer(&event);
        let Some(pt) = event.point else {
            return Vec::new();
        };

        match event.target {
            Target::Outside => Vec::new(),
            Target::Sticker(id) => {
                self.stickers.begin_drag(id, pt);
                Vec::new()
            }
            Target::Surface => {
                if self.stroke.is_active() || !self.surface.bounds().contains(pt) {
                    return Vec::new();
                }
                self.begin_stroke(pt);
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        self.observe_pointer(&event);
        let Some(pt) = event.point else {
            return Vec::new();
        };

        if self.stickers.dragging().is_some() {
            return match self.stickers.drag_to(pt, self.surface.bounds()) {
                Some(id) => vec![Action::StickerMoved { id }, Action::RenderNeeded],
                None => Vec::new(),
            };
        }

        match &mut self.stroke {
            Stroke::Idle => Vec::new(),
            Stroke::Freehand { last, width, ink, .. } => {
                self.surface.stroke_segment(*last, pt, *width, *ink);
                *last = pt;
                vec![Action::RenderNeeded]
            }
            Stroke::Arrow { origin, last, snapshot, width, color } => {
                self.surface.restore(snapshot);
                self.surface.draw_arrow(*origin, pt, self.config.arrow_head_size, *width, *color);
                *last = pt;
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        self.observe_pointer(&event);
        let mut actions = Vec::new();

        if let Some(id) = self.stickers.end_drag() {
            tracing::debug!(%id, "sticker drag finished");
        }
        if event.source == PointerSource::Touch {
            if let Target::Sticker(id) = event.target {
                if self.stickers.register_tap(id, event.time_ms, self.config.double_tap_ms) {
                    actions.extend(self.delete_sticker(&id));
                }
            }
        }

        actions.extend(self.finish_stroke(event.point));
        actions
    }

    /// Pointer left the surface. Commits or discards an arrow depending on
    /// `arrow_commit_on_leave`.
    pub fn on_pointer_leave(&mut self, event: PointerEvent) -> Vec<Action> {
        self.stickers.end_drag();
        if self.config.arrow_commit_on_leave {
            self.finish_stroke(event.point)
        } else if self.cancel_stroke() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Touch cancelled: end everything without committing further ink.
    pub fn on_pointer_cancel(&mut self, _event: PointerEvent) -> Vec<Action> {
        self.stickers.end_drag();
        if self.cancel_stroke() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Mouse double-click. Deletes the sticker under the pointer, if any.
    pub fn on_double_click(&mut self, event: PointerEvent) -> Vec<Action> {
        match event.target {
            Target::Sticker(id) => self.delete_sticker(&id),
            Target::Surface | Target::Outside => Vec::new(),
        }
    }

    fn observe_pointer(&mut self, event: &PointerEvent) {
        if event.target == Target::Outside {
            return;
        }
        if let Some(pt) = event.point {
            self.last_pointer = Some(pt);
        }
    }

    fn begin_stroke(&mut self, origin: Point) {
        let color = hex_to_rgba(&self.settings.color, FALLBACK_INK);
        let width = self.effective_width();
        self.stroke = match self.tool {
            Tool::Pen => Stroke::Freehand { origin, last: origin, width, ink: Ink::Paint(color) },
            Tool::Eraser => Stroke::Freehand { origin, last: origin, width, ink: Ink::Erase },
            Tool::Arrow => Stroke::Arrow { origin, last: origin, snapshot: self.surface.snapshot(), width, color },
        };
        tracing::debug!(tool = ?self.tool, x = origin.x, y = origin.y, width, "stroke started");
    }

    /// End the stroke. An arrow is committed from its origin to `end`, or to
    /// the last preview tip when the release carried no coordinates.
    fn finish_stroke(&mut self, end: Option<Point>) -> Vec<Action> {
        match std::mem::take(&mut self.stroke) {
            Stroke::Idle | Stroke::Freehand { .. } => Vec::new(),
            Stroke::Arrow { origin, last, snapshot, width, color } => {
                let tip = end.unwrap_or(last);
                self.surface.restore(&snapshot);
                self.surface.draw_arrow(origin, tip, self.config.arrow_head_size, width, color);
                tracing::debug!(x = tip.x, y = tip.y, "arrow committed");
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Drop the stroke in progress. Returns `true` when pixels were rolled
    /// back (an arrow preview was removed).
    fn cancel_stroke(&mut self) -> bool {
        match std::mem::take(&mut self.stroke) {
            Stroke::Arrow { snapshot, .. } => self.surface.restore(&snapshot),
            Stroke::Idle | Stroke::Freehand { .. } => false,
        }
    }

    // --- Keyboard ---

    /// Tool shortcuts switch tools; sticker shortcuts place their template at
    /// the last pointer position.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> Vec<Action> {
        let key = event.key.to_ascii_lowercase();

        if let Some(tool) = self.catalog.tool_shortcut(&key) {
            if event.repeat {
                return Vec::new();
            }
            return self.select_tool(tool);
        }

        let Some((binding, template)) = self.catalog.sticker_shortcut(&key) else {
            return Vec::new();
        };
        let held = !self.held_keys.insert(key);
        if !binding.repeat && (event.repeat || held) {
            return Vec::new();
        }
        let at = self.last_pointer.unwrap_or_else(|| self.placement_origin());
        self.place_template(template, at)
    }

    pub fn on_key_up(&mut self, event: &KeyEvent) {
        self.held_keys.remove(&event.key.to_ascii_lowercase());
    }

    // --- Stickers ---

    /// Create a sticker from a tray template centered on `center`.
    pub fn place_template(&mut self, template: TemplateId, center: Point) -> Vec<Action> {
        let Some(tpl) = self.catalog.template(template) else {
            tracing::warn!(template = template.0, "unknown sticker template");
            return Vec::new();
        };
        let sizes = StickerSizes { operator: self.config.operator_size, gadget: self.config.gadget_size };
        let id = self.stickers.instantiate(template, tpl, center, sizes, self.surface.bounds());
        vec![Action::StickerPlaced { id }, Action::RenderNeeded]
    }

    /// Remove a sticker. Deleting one that is already gone does nothing.
    pub fn delete_sticker(&mut self, id: &StickerId) -> Vec<Action> {
        match self.stickers.delete(id) {
            Some(removed) => {
                tracing::debug!(id = %removed.id, label = %removed.label, "sticker deleted");
                vec![Action::StickerRemoved { id: removed.id }, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Move a sticker by a pointer delta, clamped to the container.
    pub fn drag_sticker_by(&mut self, id: &StickerId, delta: Point) -> Vec<Action> {
        if self.stickers.drag_by(id, delta, self.surface.bounds()) {
            vec![Action::StickerMoved { id: *id }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Handle a drop on the board at `point`.
    pub fn on_drop(&mut self, payload: DropPayload, point: Point) -> Vec<Action> {
        match payload {
            DropPayload::Sticker(DragOrigin::Tray(template)) => self.place_template(template, point),
            DropPayload::Sticker(DragOrigin::Board(_)) => Vec::new(),
            DropPayload::Files(files) => match files.into_iter().next() {
                Some(file) if is_image_mime(&file.mime) => {
                    self.load_background(&file.bytes, &file.mime, DROP_LOADED, DROP_REJECTED)
                }
                _ => vec![self.notice(DROP_REJECTED)],
            },
            DropPayload::Unknown => vec![self.notice(DROP_REJECTED)],
        }
    }

    // --- Background ---

    /// Decode a picked file and show it as the background.
    pub fn load_background_bytes(&mut self, bytes: &[u8], mime: &str) -> Vec<Action> {
        self.load_background(bytes, mime, PICK_LOADED, PICK_REJECTED)
    }

    /// Install an image the host decoded itself. The last one applied wins.
    pub fn apply_decoded_background(&mut self, image: RgbaImage) -> Vec<Action> {
        self.install_background(image, PICK_LOADED)
    }

    fn install_background(&mut self, image: RgbaImage, loaded: &str) -> Vec<Action> {
        self.background.set_uploaded(image);
        vec![Action::BackgroundChanged, self.notice(loaded), Action::RenderNeeded]
    }

    fn load_background(&mut self, bytes: &[u8], mime: &str, loaded: &str, rejection: &str) -> Vec<Action> {
        match decode_upload(bytes, mime) {
            Ok(image) => self.install_background(image, loaded),
            Err(e) => {
                tracing::warn!(error = %e, mime, "background upload rejected");
                vec![self.notice(rejection)]
            }
        }
    }

    // --- Map / floor ---

    /// Show a map at its default floor.
    ///
    /// # Errors
    ///
    /// [`NavError`] for an unknown or placeholder id; nothing changes.
    pub fn select_map(&mut self, id: &str) -> Result<Vec<Action>, NavError> {
        let view = self
            .navigator
            .select_map(&self.catalog, id)
            .inspect_err(|e| tracing::warn!(error = %e, "map selection rejected"))?;
        Ok(self.show_floor(view))
    }

    /// Step one floor. Past either end nothing happens.
    ///
    /// # Errors
    ///
    /// [`NavError::NoMapSelected`] before a map is chosen.
    pub fn step_floor(&mut self, step: FloorStep) -> Result<Vec<Action>, NavError> {
        let view = self
            .navigator
            .step_floor(&self.catalog, step)
            .inspect_err(|e| tracing::warn!(error = %e, "floor step rejected"))?;
        Ok(view.map(|v| self.show_floor(v)).unwrap_or_default())
    }

    /// Jump to a floor of the current map.
    ///
    /// # Errors
    ///
    /// [`NavError::FloorOutOfRange`] for a bad index; nothing changes.
    pub fn select_floor(&mut self, index: usize) -> Result<Vec<Action>, NavError> {
        let view = self
            .navigator
            .select_floor(&self.catalog, index)
            .inspect_err(|e| tracing::warn!(error = %e, "floor selection rejected"))?;
        Ok(self.show_floor(view))
    }

    fn show_floor(&mut self, view: FloorView) -> Vec<Action> {
        tracing::info!(map = %view.map_id, floor = view.floor, image = %view.image, "background floor");
        self.background.set(Background::MapFloor { map_id: view.map_id, floor: view.floor, url: view.image });
        vec![Action::BackgroundChanged, Action::FloorControlsChanged(view.controls), Action::RenderNeeded]
    }

    // --- Reset ---

    /// Ask for confirmation before clearing.
    pub fn request_reset(&mut self, intent: ResetIntent) -> Vec<Action> {
        let pending = self.reset.request(intent);
        vec![Action::ConfirmOpen { message: pending.message.to_string() }]
    }

    /// User confirmed: run the pending reset and close the dialog.
    pub fn confirm_reset(&mut self) -> Vec<Action> {
        let Some(intent) = self.reset.confirm() else {
            return vec![Action::ConfirmClose];
        };
        let mut actions = Vec::new();
        if intent.clears_drawing() {
            self.cancel_stroke();
            self.surface.clear();
            actions.push(Action::SurfaceCleared);
        }
        if intent.clears_stickers() {
            let removed = self.stickers.clear();
            tracing::debug!(removed, "stickers cleared");
            actions.push(Action::StickersCleared);
        }
        tracing::info!(?intent, "reset confirmed");
        actions.push(self.notice(intent.done_message()));
        actions.push(Action::ConfirmClose);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// User declined: close the dialog and change nothing.
    pub fn cancel_reset(&mut self) -> Vec<Action> {
        self.reset.cancel();
        vec![Action::ConfirmClose, self.notice("Reset cancelled.")]
    }

    fn notice(&self, text: &str) -> Action {
        Action::Notice(Notice { text: text.to_string(), duration_ms: self.config.notice_ms })
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn stroke_active(&self) -> bool {
        self.stroke.is_active()
    }

    #[must_use]
    pub fn stickers(&self) -> &StickerStore {
        &self.stickers
    }

    #[must_use]
    pub fn sticker(&self, id: &StickerId) -> Option<&PlacedSticker> {
        self.stickers.get(id)
    }

    #[must_use]
    pub fn background(&self) -> &Background {
        self.background.current()
    }

    #[must_use]
    pub fn floor_controls(&self) -> FloorControls {
        self.navigator.controls(&self.catalog)
    }

    #[must_use]
    pub fn current_map(&self) -> Option<(&str, usize)> {
        Some((self.navigator.map_id()?, self.navigator.floor()?))
    }

    #[must_use]
    pub fn pending_reset(&self) -> Option<PendingConfirmation> {
        self.reset.pending()
    }

    #[must_use]
    pub fn last_pointer(&self) -> Option<Point> {
        self.last_pointer
    }
}
