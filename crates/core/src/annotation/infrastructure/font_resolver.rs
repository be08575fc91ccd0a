use std::path::Path;

use ab_glyph::{FontArc, FontVec, InvalidFont};

/// DejaVu Sans, compiled in so labels render on any host.
const EMBEDDED_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");

/// The font bundled with the crate.
pub fn embedded_font() -> Result<FontArc, InvalidFont> {
    FontArc::try_from_slice(EMBEDDED_FONT)
}

/// Load the label font from `explicit` if given and usable, otherwise fall
/// back to the embedded font.
pub fn resolve_font(explicit: Option<&Path>) -> Result<FontArc, InvalidFont> {
    if let Some(font) = explicit.and_then(load_font) {
        return Ok(font);
    }
    embedded_font()
}

fn load_font(path: &Path) -> Option<FontArc> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Font {} not readable: {e}", path.display());
            return None;
        }
    };
    match FontVec::try_from_vec(bytes) {
        Ok(font) => {
            log::info!("Using label font {}", path.display());
            Some(FontArc::new(font))
        }
        Err(e) => {
            log::warn!("Font {} could not be parsed: {e}", path.display());
            None
        }
    }
}
