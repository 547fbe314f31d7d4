//! Loads installed font files into egui on demand
//!
//! egui only picks up new font definitions at the start of the next pass, so a
//! freshly loaded family is rendered with the proportional font until then.

use anyhow::{Context, Result};
use eframe::egui;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

use crate::fonts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontState {
    Pending,
    Ready,
    Failed,
}

pub struct FontRegistry {
    definitions: egui::FontDefinitions,
    states: HashMap<String, FontState>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self {
            definitions: egui::FontDefinitions::default(),
            states: HashMap::new(),
        }
    }
}

impl FontRegistry {
    /// Promote fonts registered during the previous pass. Call once per frame
    /// before anything is laid out.
    pub fn begin_frame(&mut self) {
        for state in self.states.values_mut() {
            if *state == FontState::Pending {
                *state = FontState::Ready;
            }
        }
    }

    /// Make sure `family` is loaded (or known to be unavailable)
    pub fn request(&mut self, ctx: &egui::Context, family: &str) -> Result<()> {
        if fonts::BUILTIN_FAMILIES.contains(&family) || self.states.contains_key(family) {
            return Ok(());
        }

        match self.load(family) {
            Ok(()) => {
                self.states.insert(family.to_string(), FontState::Pending);
                ctx.set_fonts(self.definitions.clone());
                info!(family, "Registered font family with egui");
                Ok(())
            }
            Err(e) => {
                warn!(family, error = ?e, "Falling back to proportional font");
                self.states.insert(family.to_string(), FontState::Failed);
                Err(e)
            }
        }
    }

    /// Whether text in `family` already renders with its final metrics
    pub fn is_settled(&self, family: &str) -> bool {
        fonts::BUILTIN_FAMILIES.contains(&family)
            || matches!(
                self.states.get(family),
                Some(FontState::Ready | FontState::Failed)
            )
    }

    /// The egui family to render `family` with right now
    pub fn resolve(&self, family: &str) -> egui::FontFamily {
        match family {
            "Monospace" => egui::FontFamily::Monospace,
            "Proportional" => egui::FontFamily::Proportional,
            _ if self.states.get(family) == Some(&FontState::Ready) => {
                egui::FontFamily::Name(family.into())
            }
            _ => egui::FontFamily::Proportional,
        }
    }

    /// Families that could not be loaded, sorted
    pub fn failed(&self) -> Vec<String> {
        let mut failed: Vec<String> = self
            .states
            .iter()
            .filter(|(_, state)| **state == FontState::Failed)
            .map(|(name, _)| name.clone())
            .collect();
        failed.sort();
        failed
    }

    fn load(&mut self, family: &str) -> Result<()> {
        let path = fonts::find_font_path(family)?;
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        self.definitions.font_data.insert(
            family.to_string(),
            Arc::new(egui::FontData::from_owned(bytes)),
        );

        // Keep the default fonts behind the new one for missing glyphs
        let mut chain = vec![family.to_string()];
        chain.extend(
            self.definitions
                .families
                .get(&egui::FontFamily::Proportional)
                .cloned()
                .unwrap_or_default(),
        );
        self.definitions
            .families
            .insert(egui::FontFamily::Name(family.into()), chain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_resolve_without_loading() {
        let registry = FontRegistry::default();
        assert_eq!(registry.resolve("Monospace"), egui::FontFamily::Monospace);
        assert!(registry.is_settled("Proportional"));
    }

    #[test]
    fn test_unknown_family_renders_proportional_until_ready() {
        let mut registry = FontRegistry::default();
        registry
            .states
            .insert("Fancy".to_string(), FontState::Pending);
        assert_eq!(registry.resolve("Fancy"), egui::FontFamily::Proportional);
        assert!(!registry.is_settled("Fancy"));

        registry.begin_frame();
        assert_eq!(registry.resolve("Fancy"), egui::FontFamily::Name("Fancy".into()));
        assert!(registry.is_settled("Fancy"));
    }

    #[test]
    fn test_missing_font_is_marked_failed() {
        let ctx = egui::Context::default();
        let mut registry = FontRegistry::default();
        assert!(registry.request(&ctx, "No Such Font Family 42").is_err());
        assert!(registry.is_settled("No Such Font Family 42"));
        assert_eq!(registry.failed(), vec!["No Such Font Family 42".to_string()]);
        // A second request does not retry
        assert!(registry.request(&ctx, "No Such Font Family 42").is_ok());
    }
}
