use crate::pipeline::{CategoryBucket, TimeBucket};
use maud::{html, Markup};
use std::f64::consts::PI;

const CHART_W: f64 = 620.0;
const CHART_H: f64 = 220.0;
const PAD_X: f64 = 36.0;
const PAD_Y: f64 = 24.0;

/// Time-series line chart rendered as inline SVG. The bucket list is
/// gap-free by construction, so the x axis maps 1:1 onto bucket order.
pub fn line_chart(title: &str, buckets: &[TimeBucket]) -> Markup {
    if buckets.is_empty() {
        return html! { p class="chart-empty" { "No data for this period." } };
    }

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let n = buckets.len();
    let step = if n > 1 {
        (CHART_W - 2.0 * PAD_X) / (n as f64 - 1.0)
    } else {
        0.0
    };

    let point = |i: usize, count: u64| -> (f64, f64) {
        let x = PAD_X + step * i as f64;
        let y = CHART_H - PAD_Y - (count as f64 / max) * (CHART_H - 2.0 * PAD_Y);
        (x, y)
    };

    let points: String = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let (x, y) = point(i, b.count);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    // Label every bucket up to 12; after that every 5th so day charts
    // stay readable.
    let label_every = if n <= 12 { 1 } else { 5 };

    html! {
        figure class="chart" {
            figcaption { (title) }
            svg viewBox=(format!("0 0 {CHART_W} {CHART_H}")) role="img" {
                line class="chart-axis"
                    x1=(PAD_X) y1=(CHART_H - PAD_Y)
                    x2=(CHART_W - PAD_X) y2=(CHART_H - PAD_Y) {}
                polyline class="chart-line" fill="none" points=(points) {}
                @for (i, b) in buckets.iter().enumerate() {
                    @let (x, y) = point(i, b.count);
                    circle class="chart-dot" cx=(format!("{x:.1}")) cy=(format!("{y:.1}")) r="3" {
                        title { (b.label) ": " (b.count) }
                    }
                    @if i % label_every == 0 {
                        text class="chart-label"
                            x=(format!("{x:.1}"))
                            y=(CHART_H - 6.0)
                            text-anchor="middle"
                        { (b.label) }
                    }
                }
            }
        }
    }
}

/// Category pie with legend. Slice colors come from the buckets (assigned
/// round-robin at aggregation time, first-seen order).
pub fn pie_chart(title: &str, buckets: &[CategoryBucket]) -> Markup {
    if buckets.is_empty() {
        return html! { p class="chart-empty" { "No data for this period." } };
    }

    let total: u64 = buckets.iter().map(|b| b.value).sum();
    let (cx, cy, r) = (80.0, 80.0, 70.0);

    let mut slices: Vec<(String, &'static str)> = Vec::new();
    let mut angle = -PI / 2.0;
    for b in buckets {
        let fraction = b.value as f64 / total.max(1) as f64;
        let sweep = fraction * 2.0 * PI;
        let path = if fraction >= 0.999 {
            // A full circle cannot be drawn as a single arc.
            format!(
                "M {cx} {} A {r} {r} 0 1 1 {cx} {} A {r} {r} 0 1 1 {cx} {} Z",
                cy - r,
                cy + r,
                cy - r
            )
        } else {
            let x1 = cx + r * angle.cos();
            let y1 = cy + r * angle.sin();
            let end = angle + sweep;
            let x2 = cx + r * end.cos();
            let y2 = cy + r * end.sin();
            let large = if sweep > PI { 1 } else { 0 };
            format!("M {cx} {cy} L {x1:.2} {y1:.2} A {r} {r} 0 {large} 1 {x2:.2} {y2:.2} Z")
        };
        slices.push((path, b.color));
        angle += sweep;
    }

    html! {
        figure class="chart chart-pie" {
            figcaption { (title) }
            div class="pie-layout" {
                svg viewBox="0 0 160 160" role="img" {
                    @for (path, color) in &slices {
                        path d=(path) fill=(color) stroke="#fff" stroke-width="1" {}
                    }
                }
                ul class="pie-legend" {
                    @for b in buckets {
                        li {
                            span class="legend-swatch" style=(format!("background:{}", b.color)) {}
                            (b.name) " (" (b.value) ")"
                        }
                    }
                }
            }
        }
    }
}
