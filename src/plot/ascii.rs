//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - proportional bars: `#`
//! - weekly points: `*`, joined by `-`

use std::collections::BTreeMap;

use crate::engine::Rollup;

/// Render a rollup as one proportional bar per entry.
///
/// Bars are scaled against the largest entry; the trailing column is each
/// entry's share of the rollup total.
pub fn render_bar_chart(rollup: &Rollup, bar_width: usize) -> String {
    if rollup.is_empty() {
        return "(no data)\n".to_string();
    }

    let bar_width = bar_width.max(1);
    let label_width = rollup.labels().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = rollup.max_value().unwrap_or(0.0);
    let total = rollup.total();

    let mut out = String::new();
    for e in &rollup.entries {
        let len = bar_len(e.value, max, bar_width);
        let bar = "#".repeat(len);
        let share = if total > 0.0 { e.value / total * 100.0 } else { 0.0 };
        out.push_str(
            format!(
                "{:<label_width$} |{:<bar_width$}| {:>12.2} {:>5.1}%",
                e.label, bar, e.value, share
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(max > 0.0) || !(value > 0.0) {
        return 0;
    }
    ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize
}

/// Render weekly sums as a small line chart, oldest week on the left.
pub fn render_trend_chart(weekly: &BTreeMap<String, f64>, width: usize, height: usize) -> String {
    if weekly.is_empty() {
        return "(no data)\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(3);
    let values: Vec<f64> = weekly.values().copied().collect();

    let (y_min, y_max) = y_range(&values).unwrap_or_else(|| (values[0] - 1.0, values[0] + 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let n = values.len();
    let points: Vec<(usize, usize)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
        .collect();

    // Lines first, so the markers overlay them.
    for w in points.windows(2) {
        draw_line(&mut grid, w[0].0, w[0].1, w[1].0, w[1].1, '-');
    }
    for &(x, y) in &points {
        grid[y][x] = '*';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Weekly sales: {n} week(s) | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&axis_labels(weekly, width));
    out.push('\n');
    out
}

fn axis_labels(weekly: &BTreeMap<String, f64>, width: usize) -> String {
    let first = weekly.keys().next().map(String::as_str).unwrap_or("");
    let last = weekly.keys().next_back().map(String::as_str).unwrap_or("");
    if first == last {
        return first.to_string();
    }
    let used = first.chars().count();
    if used + last.chars().count() + 1 > width {
        return format!("{first} .. {last}");
    }
    format!("{first}{last:>pad$}", pad = width - used)
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
