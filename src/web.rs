//! Browser binding.
//!
//! [`Board`] wraps [`BoardCore`] and owns the ink `<canvas>`. The page keeps
//! the background `<img>`, sticker elements, and dialogs in the DOM; every
//! call returns the resulting actions as a JSON array string for the page to
//! apply. All fallible `Canvas2D` calls propagate errors via `JsValue`.

use image::RgbaImage;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::catalog::{Catalog, TemplateId};
use crate::config::BoardConfig;
use crate::engine::{Action, BoardCore, DropPayload, DroppedFile};
use crate::geom::Point;
use crate::navigator::FloorStep;
use crate::render::sticker_views;
use crate::reset::ResetIntent;
use crate::sticker::{DragOrigin, StickerId};
use crate::tool::{KeyEvent, PointerEvent, PointerSource, Target, Tool};

#[wasm_bindgen]
pub struct Board {
    canvas: HtmlCanvasElement,
    core: BoardCore,
}

#[wasm_bindgen]
impl Board {
    /// Bind to the ink canvas using the built-in catalog.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<Board, JsValue> {
        let catalog = Catalog::builtin().map_err(js_err)?;
        let mut core = BoardCore::new(BoardConfig::default(), catalog);
        core.resize(canvas.width(), canvas.height());
        Ok(Self { canvas, core })
    }

    /// Resize the canvas backing store to the container.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        to_json(&self.core.resize(width, height))
    }

    // --- Tools ---

    pub fn select_tool(&mut self, name: &str) -> Result<String, JsValue> {
        let tool = parse_tool(name)?;
        to_json(&self.core.select_tool(tool))
    }

    pub fn set_color(&mut self, color: &str) -> Result<String, JsValue> {
        to_json(&self.core.set_color(color))
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.core.set_thickness(thickness);
    }

    // --- Pointer input ---

    /// `sticker` is the id of the sticker element under the pointer, if any.
    /// `outside` marks events whose target is not within the board.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        sticker: Option<String>,
        outside: bool,
        touch: bool,
    ) -> Result<String, JsValue> {
        let event = pointer(Some(Point::new(x, y)), sticker.as_deref(), outside, touch)?;
        to_json(&self.core.on_pointer_down(event))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, outside: bool, touch: bool) -> Result<String, JsValue> {
        let event = pointer(Some(Point::new(x, y)), None, outside, touch)?;
        to_json(&self.core.on_pointer_move(event))
    }

    /// `x` / `y` are absent for `touchend`, which carries no coordinates.
    pub fn pointer_up(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        sticker: Option<String>,
        touch: bool,
    ) -> Result<String, JsValue> {
        let point = x.zip(y).map(|(x, y)| Point::new(x, y));
        let event = pointer(point, sticker.as_deref(), false, touch)?;
        to_json(&self.core.on_pointer_up(event))
    }

    pub fn pointer_leave(&mut self, x: Option<f64>, y: Option<f64>) -> Result<String, JsValue> {
        let point = x.zip(y).map(|(x, y)| Point::new(x, y));
        let event = pointer(point, None, false, false)?;
        to_json(&self.core.on_pointer_leave(event))
    }

    pub fn pointer_cancel(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_cancel(PointerEvent::without_point()))
    }

    pub fn double_click(&mut self, sticker: &str) -> Result<String, JsValue> {
        let id = parse_id(sticker)?;
        let event = PointerEvent::without_point().with_target(Target::Sticker(id));
        to_json(&self.core.on_double_click(event))
    }

    // --- Keyboard ---

    pub fn key_down(&mut self, key: String, repeat: bool) -> Result<String, JsValue> {
        to_json(&self.core.on_key_down(&KeyEvent { key, repeat }))
    }

    pub fn key_up(&mut self, key: String) {
        self.core.on_key_up(&KeyEvent::new(key));
    }

    // --- Stickers and drops ---

    pub fn drop_template(&mut self, template: usize, x: f64, y: f64) -> Result<String, JsValue> {
        let payload = DropPayload::Sticker(DragOrigin::Tray(TemplateId(template)));
        to_json(&self.core.on_drop(payload, Point::new(x, y)))
    }

    pub fn drop_file(&mut self, bytes: &[u8], mime: String, x: f64, y: f64) -> Result<String, JsValue> {
        let payload = DropPayload::Files(vec![DroppedFile { mime, bytes: bytes.to_vec() }]);
        to_json(&self.core.on_drop(payload, Point::new(x, y)))
    }

    pub fn drop_unknown(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        to_json(&self.core.on_drop(DropPayload::Unknown, Point::new(x, y)))
    }

    pub fn delete_sticker(&mut self, sticker: &str) -> Result<String, JsValue> {
        let id = parse_id(sticker)?;
        to_json(&self.core.delete_sticker(&id))
    }

    /// Sticker overlay as JSON, bottom first.
    pub fn stickers(&self) -> Result<String, JsValue> {
        serde_json::to_string(&sticker_views(self.core.stickers())).map_err(js_err)
    }

    // --- Background ---

    pub fn upload(&mut self, bytes: &[u8], mime: &str) -> Result<String, JsValue> {
        to_json(&self.core.load_background_bytes(bytes, mime))
    }

    /// Install pixels the page decoded itself (`ImageData.data`, RGBA rows).
    pub fn apply_decoded_background(&mut self, width: u32, height: u32, rgba: Vec<u8>) -> Result<String, JsValue> {
        let image = RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| JsValue::from_str("pixel data does not match the image size"))?;
        to_json(&self.core.apply_decoded_background(image))
    }

    /// URL of the current map or placeholder background, if any.
    pub fn background_url(&self) -> Option<String> {
        self.core.background().url().map(str::to_string)
    }

    pub fn select_map(&mut self, id: &str) -> Result<String, JsValue> {
        let actions = self.core.select_map(id).map_err(js_err)?;
        to_json(&actions)
    }

    pub fn step_floor(&mut self, next: bool) -> Result<String, JsValue> {
        let step = if next { FloorStep::Next } else { FloorStep::Prev };
        let actions = self.core.step_floor(step).map_err(js_err)?;
        to_json(&actions)
    }

    pub fn select_floor(&mut self, index: usize) -> Result<String, JsValue> {
        let actions = self.core.select_floor(index).map_err(js_err)?;
        to_json(&actions)
    }

    pub fn floor_controls(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.core.floor_controls()).map_err(js_err)
    }

    // --- Reset ---

    pub fn request_reset(&mut self, intent: &str) -> Result<String, JsValue> {
        let intent = match intent {
            "drawing" => ResetIntent::Drawing,
            "stickers" => ResetIntent::Stickers,
            "all" => ResetIntent::All,
            other => return Err(JsValue::from_str(&format!("unknown reset intent `{other}`"))),
        };
        to_json(&self.core.request_reset(intent))
    }

    pub fn confirm_reset(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.confirm_reset())
    }

    pub fn cancel_reset(&mut self) -> Result<String, JsValue> {
        to_json(&self.core.cancel_reset())
    }

    // --- Render ---

    /// Blit the ink surface to the canvas.
    pub fn render(&self) -> Result<(), JsValue> {
        let surface = self.core.surface();
        if surface.width() == 0 || surface.height() == 0 {
            return Ok(());
        }
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.as_image().as_raw()),
            surface.width(),
            surface.height(),
        )?;
        ctx.put_image_data(&data, 0.0, 0.0)
    }
}

fn pointer(point: Option<Point>, sticker: Option<&str>, outside: bool, touch: bool) -> Result<PointerEvent, JsValue> {
    let target = match sticker {
        Some(raw) => Target::Sticker(parse_id(raw)?),
        None if outside => Target::Outside,
        None => Target::Surface,
    };
    let source = if touch { PointerSource::Touch } else { PointerSource::Mouse };
    Ok(PointerEvent { point, target, source, time_ms: now_ms() })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

fn parse_tool(name: &str) -> Result<Tool, JsValue> {
    match name {
        "pen" => Ok(Tool::Pen),
        "eraser" => Ok(Tool::Eraser),
        "arrow" => Ok(Tool::Arrow),
        other => Err(JsValue::from_str(&format!("unknown tool `{other}`"))),
    }
}

fn parse_id(raw: &str) -> Result<StickerId, JsValue> {
    StickerId::parse_str(raw).map_err(js_err)
}

fn to_json(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(js_err)
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
