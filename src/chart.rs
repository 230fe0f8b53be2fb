use crate::models::Bar;
use std::fmt::Write;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 72.0;
const BAND_PADDING: f64 = 0.1;
const Y_TICKS: u32 = 5;

// Bottom tick labels start overlapping around this point.
const ROTATE_THRESHOLD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 480.0,
        }
    }
}

impl Viewport {
    /// Clamps requested dimensions to something the chart can lay out in.
    pub fn clamped(width: f64, height: f64) -> Self {
        Self {
            width: width.clamp(320.0, 1600.0),
            height: height.clamp(240.0, 900.0),
        }
    }
}

/// Categorical positional scale: discrete keys to contiguous padded intervals.
#[derive(Debug, Clone, Copy)]
pub struct BandScale {
    start: f64,
    step: f64,
    band: f64,
}

impl BandScale {
    pub fn new(count: usize, range_start: f64, range_end: f64) -> Self {
        let n = count.max(1) as f64;
        let step = (range_end - range_start) / (n + BAND_PADDING);
        Self {
            start: range_start + step * BAND_PADDING,
            step,
            band: step * (1.0 - BAND_PADDING),
        }
    }

    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.band
    }

    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.band / 2.0
    }
}

/// Linear scale from [0, max] down the drawable height, max rounded up to a
/// tick-friendly bound.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    max: f64,
    top: f64,
    bottom: f64,
}

impl LinearScale {
    pub fn new(max_value: u64, top: f64, bottom: f64) -> Self {
        Self {
            max: nice_ceiling(max_value) as f64,
            top,
            bottom,
        }
    }

    pub fn position(&self, value: u64) -> f64 {
        self.bottom - (value as f64 / self.max) * (self.bottom - self.top)
    }

    pub fn max(&self) -> u64 {
        self.max as u64
    }
}

/// Rounds up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ceiling(value: u64) -> u64 {
    if value <= 10 {
        return 10;
    }
    let mut magnitude = 1u64;
    while magnitude * 10 <= value {
        magnitude *= 10;
    }
    for factor in [10, 20, 25, 50, 100] {
        let candidate = magnitude / 10 * factor;
        if candidate >= value {
            return candidate;
        }
    }
    magnitude * 10
}

pub struct ChartSpec<'a> {
    pub x_title: &'a str,
    pub y_title: &'a str,
    pub annotate_max: bool,
}

/// Renders a complete standalone SVG bar chart. Pure and deterministic: the
/// same bars and viewport always produce the same markup.
pub fn render_bar_chart(bars: &[Bar], viewport: Viewport, spec: &ChartSpec<'_>) -> String {
    let width = viewport.width;
    let height = viewport.height;
    let plot_left = MARGIN_LEFT;
    let plot_right = width - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = height - MARGIN_BOTTOM;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width:.0} {height:.0}" role="img">"#
    );

    if bars.is_empty() {
        let _ = write!(
            svg,
            r#"<text class="chart-label" x="{:.1}" y="{:.1}" text-anchor="middle">No data</text></svg>"#,
            width / 2.0,
            height / 2.0
        );
        return svg;
    }

    let x = BandScale::new(bars.len(), plot_left, plot_right);
    let max_value = bars.iter().map(|bar| bar.value).max().unwrap_or(0);
    let y = LinearScale::new(max_value, plot_top, plot_bottom);

    // Horizontal grid lines with value labels.
    for tick in 0..=Y_TICKS {
        let value = y.max() / u64::from(Y_TICKS) * u64::from(tick);
        let pos = y.position(value);
        let _ = write!(
            svg,
            r#"<line class="chart-grid" x1="{plot_left:.1}" y1="{pos:.1}" x2="{plot_right:.1}" y2="{pos:.1}"/>"#
        );
        let _ = write!(
            svg,
            r#"<text class="chart-label" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            plot_left - 8.0,
            pos + 4.0,
            format_compact(value)
        );
    }

    for (index, bar) in bars.iter().enumerate() {
        let bar_x = x.position(index);
        let bar_y = y.position(bar.value);
        let _ = write!(
            svg,
            r#"<rect class="bar" x="{bar_x:.1}" y="{bar_y:.1}" width="{:.1}" height="{:.1}""#,
            x.bandwidth(),
            plot_bottom - bar_y
        );
        if let Some(tip) = &bar.tip {
            let _ = write!(svg, r#" data-tip="{}""#, escape(tip));
        }
        svg.push_str("/>");
    }

    // Bottom axis: baseline plus one tick label per band.
    let _ = write!(
        svg,
        r#"<line class="chart-axis" x1="{plot_left:.1}" y1="{plot_bottom:.1}" x2="{plot_right:.1}" y2="{plot_bottom:.1}"/>"#
    );
    let rotate = bars.len() > ROTATE_THRESHOLD;
    for (index, bar) in bars.iter().enumerate() {
        let cx = x.center(index);
        let ty = plot_bottom + 16.0;
        if rotate {
            let _ = write!(
                svg,
                r#"<text class="chart-label" x="{cx:.1}" y="{ty:.1}" text-anchor="end" transform="rotate(-35 {cx:.1} {ty:.1})">{}</text>"#,
                escape(&bar.label)
            );
        } else {
            let _ = write!(
                svg,
                r#"<text class="chart-label" x="{cx:.1}" y="{ty:.1}" text-anchor="middle">{}</text>"#,
                escape(&bar.label)
            );
        }
    }

    // Axis titles.
    let _ = write!(
        svg,
        r#"<text class="chart-title" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        (plot_left + plot_right) / 2.0,
        height - 8.0,
        escape(spec.x_title)
    );
    let _ = write!(
        svg,
        r#"<text class="chart-title" x="{:.1}" y="{:.1}" text-anchor="middle" transform="rotate(-90 {:.1} {:.1})">{}</text>"#,
        16.0,
        (plot_top + plot_bottom) / 2.0,
        16.0,
        (plot_top + plot_bottom) / 2.0,
        escape(spec.y_title)
    );

    if spec.annotate_max {
        render_annotation(&mut svg, bars, &x, &y);
    }

    svg.push_str("</svg>");
    svg
}

/// Callout pointing at the tallest bar, re-derived from the rows so the text
/// never drifts from the data.
fn render_annotation(svg: &mut String, bars: &[Bar], x: &BandScale, y: &LinearScale) {
    let Some((index, top)) = bars
        .iter()
        .enumerate()
        .max_by_key(|(_, bar)| bar.value)
    else {
        return;
    };
    let anchor_x = x.center(index);
    let anchor_y = y.position(top.value);
    // Flip the callout left when the tallest bar sits near the right edge.
    let dx = if index + 2 >= bars.len() { -60.0 } else { 60.0 };
    let text_x = anchor_x + dx;
    let text_y = anchor_y - 14.0;
    let _ = write!(
        svg,
        r#"<g class="annotation"><line x1="{anchor_x:.1}" y1="{:.1}" x2="{text_x:.1}" y2="{text_y:.1}"/><text x="{text_x:.1}" y="{:.1}" text-anchor="{}">Highest: {} ({})</text></g>"#,
        anchor_y - 2.0,
        text_y - 4.0,
        if dx < 0.0 { "end" } else { "start" },
        escape(&top.label),
        format_compact(top.value)
    );
}

/// 94152573 -> "94.2M", 528250 -> "528.3K", 950 -> "950".
pub fn format_compact(value: u64) -> String {
    if value >= 1_000_000_000 {
        format!("{:.1}B", value as f64 / 1e9)
    } else if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1e6)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1e3)
    } else {
        value.to_string()
    }
}

/// Groups digits with commas for tooltips.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
