//! Installed font discovery
//!
//! Installed families are listed and resolved to font files, which the GUI
//! loads into egui. Linux asks fontconfig, other hosts scan the system font
//! directories with fontdb. egui's built-in families are always offered.

use anyhow::Result;
use std::path::PathBuf;

/// Families egui can always render without loading anything
pub const BUILTIN_FAMILIES: &[&str] = &["Proportional", "Monospace"];

/// Sorted, de-duplicated family names: built-ins first, then installed fonts
pub fn list_families() -> Vec<String> {
    let mut families: Vec<String> = BUILTIN_FAMILIES.iter().map(|f| f.to_string()).collect();
    match system::installed_families() {
        Ok(installed) => {
            tracing::info!(count = installed.len(), "Discovered installed font families");
            families.extend(
                installed
                    .into_iter()
                    .filter(|f| !BUILTIN_FAMILIES.contains(&f.as_str())),
            );
        }
        Err(e) => tracing::warn!(error = ?e, "Failed to list installed fonts"),
    }
    families
}

/// File backing `family`, if it is an installed font
pub fn find_font_path(family: &str) -> Result<PathBuf> {
    system::find_font_path(family)
}

#[cfg(all(unix, not(target_os = "macos")))]
mod system {
    use anyhow::{Context, Result, anyhow};
    use fontconfig::{Fontconfig, Pattern};
    use std::collections::BTreeSet;
    use std::ffi::CString;
    use std::path::PathBuf;
    use tracing::{debug, warn};

    pub fn installed_families() -> Result<Vec<String>> {
        let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
        let pattern = Pattern::new(&fc);
        let font_set = fontconfig::list_fonts(&pattern, None);

        let families: BTreeSet<String> = font_set
            .iter()
            .filter_map(|font| font.get_string(fontconfig::FC_FAMILY).map(str::to_string))
            .collect();
        Ok(families.into_iter().collect())
    }

    pub fn find_font_path(family: &str) -> Result<PathBuf> {
        let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;

        let mut pattern = Pattern::new(&fc);
        let family_cstr =
            CString::new(family).with_context(|| format!("Invalid family name: {family}"))?;
        pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

        let matched = pattern.font_match();

        // fontconfig substitutes a fallback family for unknown names
        if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY)
            && !matched_family.eq_ignore_ascii_case(family)
        {
            warn!(
                requested = family,
                matched = matched_family,
                "Fontconfig returned a different family, font is probably not installed"
            );
            return Err(anyhow!(
                "Font '{family}' not found - fontconfig returned '{matched_family}' instead"
            ));
        }

        let path = PathBuf::from(
            matched
                .filename()
                .with_context(|| format!("No font file found for '{family}'"))?,
        );
        if !path.exists() {
            return Err(anyhow!("Font file path '{}' does not exist", path.display()));
        }

        debug!(family, path = %path.display(), "Resolved font path");
        Ok(path)
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
mod system {
    use anyhow::{Result, anyhow};
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use tracing::debug;

    fn database() -> fontdb::Database {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        db
    }

    pub fn installed_families() -> Result<Vec<String>> {
        let db = database();
        let families: BTreeSet<String> = db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        Ok(families.into_iter().collect())
    }

    pub fn find_font_path(family: &str) -> Result<PathBuf> {
        let db = database();
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| anyhow!("Font '{family}' not found"))?;
        let face = db
            .face(id)
            .ok_or_else(|| anyhow!("Font '{family}' disappeared from the database"))?;

        let path = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => path.clone(),
            fontdb::Source::Binary(_) => {
                return Err(anyhow!("Font '{family}' is not backed by a file"));
            }
        };

        debug!(family, path = %path.display(), "Resolved font path");
        Ok(path)
    }
}
