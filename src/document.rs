//! Multi-page output: every drained chart becomes one page.

use crate::config::{DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH, ReportConfig};
use crate::error::{Error, Result};
use crate::viz::{Chart, draw_chart, ensure_fonts_registered, is_svg};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::{Path, PathBuf};

/// Consumer of the drained charts of a run.
pub trait DocumentSink {
    /// Write `charts` as pages, in order, and return the files produced.
    fn write_all(&mut self, charts: Vec<Chart>, dest: &Path) -> Result<Vec<PathBuf>>;
}

/// Page-per-chart document. `.svg` destinations use the vector backend, anything else PNG.
///
/// Without `split` the pages are stacked top to bottom in a single file; with `split` page
/// `N` goes to `<stem>-NN.<ext>` next to `dest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedDocument {
    pub page_width: u32,
    pub page_height: u32,
    pub split: bool,
}

impl Default for PagedDocument {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            split: false,
        }
    }
}

impl PagedDocument {
    pub fn from_config(config: &ReportConfig, split: bool) -> Self {
        Self {
            page_width: config.page_width,
            page_height: config.page_height,
            split,
        }
    }

    fn page_path(dest: &Path, page: usize) -> PathBuf {
        let stem = dest
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let name = match dest.extension() {
            Some(ext) => format!("{stem}-{page:02}.{}", ext.to_string_lossy()),
            None => format!("{stem}-{page:02}"),
        };
        dest.with_file_name(name)
    }

    fn render_file(&self, charts: &[Chart], path: &Path) -> Result<()> {
        let size = (
            self.page_width,
            self.page_height.saturating_mul(charts.len() as u32),
        );
        if is_svg(path) {
            draw_pages(SVGBackend::new(path, size).into_drawing_area(), charts)
        } else {
            draw_pages(BitMapBackend::new(path, size).into_drawing_area(), charts)
        }
    }
}

impl DocumentSink for PagedDocument {
    fn write_all(&mut self, charts: Vec<Chart>, dest: &Path) -> Result<Vec<PathBuf>> {
        if charts.is_empty() {
            return Err(Error::EmptyReport);
        }
        ensure_fonts_registered();

        let jobs: Vec<(PathBuf, &[Chart])> = if self.split {
            charts
                .chunks(1)
                .enumerate()
                .map(|(i, page)| (Self::page_path(dest, i + 1), page))
                .collect()
        } else {
            vec![(dest.to_path_buf(), charts.as_slice())]
        };

        let mut written = Vec::with_capacity(jobs.len());
        for (path, pages) in jobs {
            if let Err(e) = self.render_file(pages, &path) {
                // Backends flush on drop, so remove whatever reached the disk.
                for p in written.iter().chain(std::iter::once(&path)) {
                    let _ = std::fs::remove_file(p);
                }
                return Err(e);
            }
            written.push(path);
        }
        log::info!(
            "wrote {} page(s) to {} file(s)",
            charts.len(),
            written.len()
        );
        Ok(written)
    }
}

fn draw_pages<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, charts: &[Chart]) -> Result<()> {
    let pages = root.split_evenly((charts.len(), 1));
    for (area, chart) in pages.iter().zip(charts) {
        draw_chart(area, chart)?;
    }
    root.present().map_err(Error::render)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pages_are_numbered_next_to_dest() {
        let p = PagedDocument::page_path(Path::new("/tmp/out/report.svg"), 3);
        assert_eq!(p, PathBuf::from("/tmp/out/report-03.svg"));
    }

    #[test]
    fn empty_report_is_an_error() {
        let mut doc = PagedDocument::default();
        assert!(matches!(
            doc.write_all(Vec::new(), Path::new("unused.svg")),
            Err(Error::EmptyReport)
        ));
    }
}
