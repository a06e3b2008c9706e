//! Chart composition and rendering.
//!
//! - [`build_overlay`]: date-axis trend of a target field, optionally per person over a
//!   population backdrop
//! - [`build_bar`]: mean ± std bars over an ordered list of bins
//! - [`draw_chart`]: paint a finished [`Chart`] onto any Plotters area
//!
//! Builders return plain data; nothing touches a backend until a chart is drawn.

pub mod bar;
pub mod overlay;
pub mod render;
pub mod text;
pub mod types;
pub mod util;

pub use bar::build_bar;
pub use overlay::build_overlay;
pub use render::draw_chart;
pub use types::{Axes, Bar, Chart, Layer, LayerData, LayerStyle, LinePoint, ValueFormat, XAxis};

use crate::error::{Error, Result};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

pub(crate) fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        // From `src/viz/mod.rs` to the project root `assets/DejaVuSans.ttf`.
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("could not register bundled sans-serif font");
        }
    });
}

/// Render a single chart to `path`; `.svg` selects the vector backend, anything else PNG.
pub fn render_chart_file<P: AsRef<Path>>(
    chart: &Chart,
    path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let path = path.as_ref();
    if is_svg(path) {
        let root = SVGBackend::new(path, (width, height)).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present().map_err(Error::render)?;
    } else {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present().map_err(Error::render)?;
    }
    log::debug!("rendered {:?} to {}", chart.title, path.display());
    Ok(())
}

pub(crate) fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}
