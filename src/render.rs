//! Wheel drawing.
//!
//! [`render`] only talks to a [`WheelSurface`], implemented here for the
//! canvas 2D context. Rotation is not drawn: the canvas element itself is
//! rotated with a CSS transform.

use crate::config::EMPTY_WHEEL_COLOR;
use crate::DisplaySegment;
use log::warn;
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const RIM_MARGIN: f64 = 8.0;
const LABEL_INSET: f64 = 12.0;
const LABEL_BASELINE: f64 = 6.0;
const LABEL_FONT: &str = "bold 14px system-ui, Arial";
const LABEL_COLOR: &str = "#fff";
const HUB_RATIO: f64 = 0.18;

/// Drawing primitives needed by the wheel. Angles are radians, clockwise
/// from 3 o'clock as on a canvas.
pub trait WheelSurface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_sector(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: &str);
    /// Draw `text` right-aligned at `radius` along the ray at `angle`.
    fn fill_label(&mut self, cx: f64, cy: f64, angle: f64, radius: f64, text: &str);
    fn draw_hub(&mut self, cx: f64, cy: f64, radius: f64);
}

/// Start/end angles of each of `count` sectors, beginning at 12 o'clock.
pub fn sector_arcs(count: usize) -> impl Iterator<Item = (f64, f64)> {
    let count = count.max(1);
    let step = 2.0 * PI / count as f64;
    (0..count).map(move |i| {
        let start = -PI / 2.0 + i as f64 * step;
        (start, start + step)
    })
}

pub fn wheel_radius(width: f64, height: f64) -> f64 {
    ((width / 2.0).min(height / 2.0) - RIM_MARGIN).max(0.0)
}

/// Draw the full wheel into a `width × height` area (CSS pixels).
pub fn render<S: WheelSurface + ?Sized>(
    surface: &mut S,
    width: f64,
    height: f64,
    display: &[DisplaySegment],
) {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = wheel_radius(width, height);

    surface.clear(width, height);

    if display.is_empty() {
        let (start, end) = (-PI / 2.0, 1.5 * PI);
        surface.fill_sector(cx, cy, radius, start, end, EMPTY_WHEEL_COLOR);
    } else {
        for (seg, (start, end)) in display.iter().zip(sector_arcs(display.len())) {
            surface.fill_sector(cx, cy, radius, start, end, &seg.color);
            let bisector = start + (end - start) / 2.0;
            surface.fill_label(cx, cy, bisector, radius - LABEL_INSET, &seg.label);
        }
    }

    surface.draw_hub(cx, cy, radius * HUB_RATIO);
}

impl WheelSurface for CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_sector(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: &str) {
        self.begin_path();
        self.move_to(cx, cy);
        let _ = self.arc(cx, cy, radius, start, end);
        self.close_path();
        self.set_fill_style_str(color);
        self.fill();
    }

    fn fill_label(&mut self, cx: f64, cy: f64, angle: f64, radius: f64, text: &str) {
        self.save();
        let _ = self.translate(cx, cy);
        let _ = self.rotate(angle);
        self.set_text_align("right");
        self.set_fill_style_str(LABEL_COLOR);
        self.set_font(LABEL_FONT);
        let _ = self.fill_text(text, radius, LABEL_BASELINE);
        self.restore();
    }

    fn draw_hub(&mut self, cx: f64, cy: f64, radius: f64) {
        self.begin_path();
        let _ = self.arc(cx, cy, radius, 0.0, 2.0 * PI);
        self.set_fill_style_str("#ffffff");
        self.fill();
        self.set_line_width(2.0);
        self.set_stroke_style_str("#eee");
        self.stroke();
    }
}

/// Fetch the 2D context of `canvas`.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Match the canvas backing store to its CSS size times the device pixel
/// ratio, and scale the context so drawing stays in CSS pixels.
///
/// Returns the CSS `(width, height)` to draw into.
pub fn resize_canvas(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
) -> Result<(f64, f64), JsValue> {
    let rect = canvas.get_bounding_client_rect();
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|d| *d > 0.0)
        .unwrap_or(1.0);
    canvas.set_width((rect.width() * dpr).floor() as u32);
    canvas.set_height((rect.height() * dpr).floor() as u32);
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    Ok((
        canvas.client_width() as f64,
        canvas.client_height() as f64,
    ))
}

/// Resize and redraw `canvas`. Failures are logged; the wheel simply stays
/// as it was.
pub fn redraw_canvas(canvas: &HtmlCanvasElement, display: &[DisplaySegment]) {
    let Some(mut ctx) = context_2d(canvas) else {
        warn!("Canvas has no 2d context");
        return;
    };
    match resize_canvas(canvas, &ctx) {
        Ok((w, h)) => render(&mut ctx, w, h, display),
        Err(e) => warn!("Failed to resize wheel canvas: {:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{double_segments, Segment};

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Sector { start: f64, end: f64, color: String },
        Label { angle: f64, radius: f64, text: String },
        Hub { radius: f64 },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl WheelSurface for Recorder {
        fn clear(&mut self, _w: f64, _h: f64) {
            self.ops.push(Op::Clear);
        }
        fn fill_sector(&mut self, _cx: f64, _cy: f64, _r: f64, start: f64, end: f64, color: &str) {
            self.ops.push(Op::Sector {
                start,
                end,
                color: color.to_string(),
            });
        }
        fn fill_label(&mut self, _cx: f64, _cy: f64, angle: f64, radius: f64, text: &str) {
            self.ops.push(Op::Label {
                angle,
                radius,
                text: text.to_string(),
            });
        }
        fn draw_hub(&mut self, _cx: f64, _cy: f64, radius: f64) {
            self.ops.push(Op::Hub { radius });
        }
    }

    #[test]
    fn arcs_start_at_top_and_cover_full_turn() {
        let arcs: Vec<_> = sector_arcs(16).collect();
        assert_eq!(arcs.len(), 16);
        assert_eq!(arcs[0].0, -PI / 2.0);
        assert!((arcs[15].1 - 1.5 * PI).abs() < 1e-9);
        for pair in arcs.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-12);
        }
    }

    #[test]
    fn draws_each_display_sector_then_hub() {
        let segs = vec![Segment::new("A", "#ff0000"), Segment::new("B", "#00ff00")];
        let display = double_segments(&segs);
        let mut rec = Recorder::default();
        render(&mut rec, 200.0, 200.0, &display);

        assert_eq!(rec.ops.first(), Some(&Op::Clear));
        let sectors: Vec<&str> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Sector { color, .. } => Some(color.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sectors, ["#ff0000", "#00ff00", "#ff0000", "#00ff00"]);

        let radius = wheel_radius(200.0, 200.0);
        assert_eq!(radius, 92.0);
        assert!(rec.ops.iter().any(|op| matches!(
            op,
            Op::Label { radius: r, text, .. } if *r == radius - 12.0 && text == "B"
        )));
        assert_eq!(rec.ops.last(), Some(&Op::Hub { radius: radius * 0.18 }));
    }

    #[test]
    fn labels_sit_on_bisectors() {
        let display = double_segments(&[Segment::new("Only", "#123456")]);
        let mut rec = Recorder::default();
        render(&mut rec, 100.0, 100.0, &display);
        let angles: Vec<f64> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Label { angle, .. } => Some(*angle),
                _ => None,
            })
            .collect();
        assert_eq!(angles.len(), 2);
        assert!((angles[0] - 0.0).abs() < 1e-12);
        assert!((angles[1] - PI).abs() < 1e-12);
    }

    #[test]
    fn empty_wheel_draws_one_gray_sector() {
        let mut rec = Recorder::default();
        render(&mut rec, 100.0, 100.0, &[]);
        assert_eq!(
            rec.ops
                .iter()
                .filter(|op| matches!(op, Op::Sector { color, .. } if color == EMPTY_WHEEL_COLOR))
                .count(),
            1
        );
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Label { .. })));
    }
}
