//! Utility functions for rendering: color conversion, tick formatting, label gutters.

use super::text::estimate_text_width_px;
use super::types::ValueFormat;
use crate::style::Rgb8;
use crate::time::format_clock;
use plotters::prelude::*;

#[inline]
pub fn rgb_color(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Tick label for a value on the vertical axis.
pub fn format_value(v: f64, fmt: ValueFormat) -> String {
    match fmt {
        ValueFormat::Clock => format_clock(v),
        ValueFormat::Number => {
            let a = v.abs();
            let prec = if a >= 100.0 {
                0
            } else if a >= 10.0 {
                1
            } else {
                2
            };
            format!("{:.*}", prec, v)
        }
    }
}

/// Compute a tight left label area width for the Y axis (in pixels),
/// based on the formatted tick labels that will appear.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_left_label_area_px(
    ymin: f64,
    ymax: f64,
    ticks: usize,
    font_px: u32,
    fmt: ValueFormat,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let s = format_value(ymin + (ymax - ymin) * t, fmt);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }
    // Room for tick marks plus the rotated axis description.
    max_px.saturating_add(18 + font_px + 8).clamp(56, 150)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_precision_depends_on_magnitude() {
        assert_eq!(format_value(3.456, ValueFormat::Number), "3.46");
        assert_eq!(format_value(34.56, ValueFormat::Number), "34.6");
        assert_eq!(format_value(345.6, ValueFormat::Number), "346");
        assert_eq!(format_value(9.0 * 3600.0, ValueFormat::Clock), "09:00");
    }

    #[test]
    fn gutter_is_clamped() {
        let px = compute_left_label_area_px(0.0, 6.0, 10, 12, ValueFormat::Number);
        assert!((56..=150).contains(&px));
    }
}
