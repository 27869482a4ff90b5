//! Static lookup tables: sticker templates, keyboard shortcuts, and maps.
//!
//! The catalog is read-only after load. The built-in table ships as
//! `data/catalog.json` and is embedded at compile time; hosts may supply their
//! own JSON through [`Catalog::from_json`].

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::tool::Tool;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Positional identity of a sticker template (its index in catalog order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub usize);

/// Tray grouping for a sticker. Also decides its placed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerCategory {
    Attacker,
    Defender,
    AttackerGadget,
    DefenderGadget,
}

impl StickerCategory {
    /// Operators (attacker / defender) are placed larger than gadgets.
    #[must_use]
    pub fn is_operator(self) -> bool {
        matches!(self, Self::Attacker | Self::Defender)
    }
}

/// How a sticker looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StickerVisual {
    /// A colored tile with a text label.
    Text { text: String, bg_color: String, text_color: String },
    /// An icon image.
    Image { url: String, alt: String },
}

/// A tray sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerTemplate {
    /// Display name. Not unique across categories.
    pub label: String,
    pub category: StickerCategory,
    pub visual: StickerVisual,
}

/// Key that places a sticker at the last pointer position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutBinding {
    pub key: String,
    /// Template label to place.
    pub label: String,
    /// Narrows `label` when the same name exists in several categories.
    #[serde(default)]
    pub category: Option<StickerCategory>,
    /// Whether key auto-repeat may place duplicates while the key is held.
    #[serde(default)]
    pub repeat: bool,
}

/// Key that switches the active tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolShortcut {
    pub key: String,
    pub tool: Tool,
}

/// One background image within a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorEntry {
    pub name: String,
    pub image: String,
}

/// A named map group with its ordered floors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub id: String,
    pub name: String,
    /// `false` for the dropdown placeholder.
    #[serde(default = "default_selectable")]
    pub selectable: bool,
    pub floors: Vec<FloorEntry>,
    /// Floor shown when the map is selected.
    #[serde(default)]
    pub default_floor: usize,
}

fn default_selectable() -> bool {
    true
}

/// All read-only lookup data consumed by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub templates: Vec<StickerTemplate>,
    #[serde(default)]
    pub shortcuts: Vec<ShortcutBinding>,
    #[serde(default)]
    pub tool_shortcuts: Vec<ToolShortcut>,
    pub maps: Vec<MapEntry>,
}

impl Catalog {
    /// The table embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded JSON is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the JSON does not parse, a shortcut names
    /// a sticker that cannot be resolved, or a map's floor table is invalid.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for binding in &self.shortcuts {
            if self.find_template(&binding.label, binding.category).is_none() {
                return Err(CatalogError::UnknownShortcutTarget {
                    key: binding.key.clone(),
                    label: binding.label.clone(),
                });
            }
        }
        for map in self.maps.iter().filter(|m| m.selectable) {
            if map.floors.is_empty() {
                return Err(CatalogError::NoFloors(map.id.clone()));
            }
            if map.default_floor >= map.floors.len() {
                return Err(CatalogError::BadDefaultFloor { map: map.id.clone(), floor: map.default_floor });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn template(&self, id: TemplateId) -> Option<&StickerTemplate> {
        self.templates.get(id.0)
    }

    /// Template ids in one tray category, in catalog order.
    #[must_use]
    pub fn templates_in(&self, category: StickerCategory) -> Vec<TemplateId> {
        self.templates
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category == category)
            .map(|(i, _)| TemplateId(i))
            .collect()
    }

    /// Resolve a template by label.
    ///
    /// With a category, the first template matching both wins. Without one,
    /// the label must be unique; an ambiguous label resolves to `None`.
    #[must_use]
    pub fn find_template(&self, label: &str, category: Option<StickerCategory>) -> Option<TemplateId> {
        let mut matches = self
            .templates
            .iter()
            .enumerate()
            .filter(|(_, t)| t.label.eq_ignore_ascii_case(label))
            .filter(|(_, t)| category.is_none_or(|c| t.category == c));

        let (first, _) = matches.next()?;
        if category.is_none() && matches.next().is_some() {
            return None;
        }
        Some(TemplateId(first))
    }

    /// The sticker binding for `key`, with its resolved template.
    #[must_use]
    pub fn sticker_shortcut(&self, key: &str) -> Option<(&ShortcutBinding, TemplateId)> {
        let binding = self.shortcuts.iter().find(|b| b.key.eq_ignore_ascii_case(key))?;
        let id = self.find_template(&binding.label, binding.category)?;
        Some((binding, id))
    }

    /// The tool bound to `key`.
    #[must_use]
    pub fn tool_shortcut(&self, key: &str) -> Option<Tool> {
        self.tool_shortcuts
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
            .map(|s| s.tool)
    }

    #[must_use]
    pub fn map(&self, id: &str) -> Option<&MapEntry> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// The non-selectable dropdown entry shown before any map is picked.
    #[must_use]
    pub fn placeholder(&self) -> Option<&MapEntry> {
        self.maps.iter().find(|m| !m.selectable)
    }

    /// Maps a user may pick, in dropdown order.
    pub fn selectable_maps(&self) -> impl Iterator<Item = &MapEntry> {
        self.maps.iter().filter(|m| m.selectable)
    }
}
