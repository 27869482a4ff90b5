//! Annotation and placement core for a tactical-planning whiteboard.
//!
//! The board is a background map, a raster ink layer, and an overlay of
//! operator and gadget stickers. This crate owns all of that state and the
//! rules for changing it: the pen / eraser / arrow stroke machine, sticker
//! placement and dragging, map and floor selection, and confirmation-gated
//! resets. Hosts (the browser binding behind the `web` feature, or the replay
//! CLI) only translate raw input into [`tool::PointerEvent`]s and friends and
//! render the [`engine::Action`]s that come back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::BoardCore`]: event dispatch and owned state |
//! | [`surface`] | Raster ink buffer, snapshot/restore, stroke and arrow rasterization |
//! | [`tool`] | Tools, normalized pointer/key events, the stroke state machine |
//! | [`sticker`] | Placed stickers, drag sessions, double-tap deletion |
//! | [`navigator`] | Map / floor selection and floor controls |
//! | [`background`] | Background resource and upload decoding |
//! | [`reset`] | Confirmation-gated resets |
//! | [`catalog`] | Sticker templates, shortcuts, and the map table |
//! | [`render`] | Pure projections: sticker views and composed frames |
//! | [`replay`] | JSON event scripts for headless runs |
//! | [`config`] | Environment-driven tunables |
//! | [`consts`] | Shared numeric constants |

pub mod background;
pub mod catalog;
pub mod color;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod navigator;
pub mod render;
pub mod replay;
pub mod reset;
pub mod sticker;
pub mod surface;
pub mod tool;
#[cfg(feature = "web")]
pub mod web;
