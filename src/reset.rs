//! Confirmation-gated reset of ink and stickers.
//!
//! A reset trigger only records what to do; nothing is cleared until the user
//! confirms. There is one pending slot: a newer trigger replaces an
//! unresolved older one.

#[cfg(test)]
#[path = "reset_test.rs"]
mod reset_test;

use serde::{Deserialize, Serialize};

/// What a reset clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetIntent {
    /// Ink only.
    Drawing,
    /// Stickers only.
    Stickers,
    /// Ink and stickers.
    All,
}

impl ResetIntent {
    /// Question shown in the confirmation dialog.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Drawing => "Are you sure you want to reset your drawing?",
            Self::Stickers => "Are you sure you want to remove all icons?",
            Self::All => "Are you sure you want to reset everything (drawing and icons)?",
        }
    }

    /// Notice shown after the reset runs.
    #[must_use]
    pub fn done_message(self) -> &'static str {
        match self {
            Self::Drawing => "Drawing cleared!",
            Self::Stickers => "All icons removed!",
            Self::All => "All cleared: drawing and icons removed!",
        }
    }

    #[must_use]
    pub fn clears_drawing(self) -> bool {
        matches!(self, Self::Drawing | Self::All)
    }

    #[must_use]
    pub fn clears_stickers(self) -> bool {
        matches!(self, Self::Stickers | Self::All)
    }
}

/// A reset waiting for the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub intent: ResetIntent,
    pub message: &'static str,
}

#[derive(Debug, Default)]
pub struct ResetCoordinator {
    pending: Option<PendingConfirmation>,
}

impl ResetCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reset and return the dialog to show. Replaces any reset still
    /// waiting for an answer.
    pub fn request(&mut self, intent: ResetIntent) -> PendingConfirmation {
        if let Some(prev) = self.pending {
            tracing::debug!(previous = ?prev.intent, next = ?intent, "pending reset replaced");
        }
        let pending = PendingConfirmation { intent, message: intent.prompt() };
        self.pending = Some(pending);
        pending
    }

    /// The user said yes: hand back the intent to execute.
    pub fn confirm(&mut self) -> Option<ResetIntent> {
        self.pending.take().map(|p| p.intent)
    }

    /// The user said no: drop the pending reset. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingConfirmation> {
        self.pending
    }
}
