use std::io::Write;

use anyhow::Result;
use geo::{Coord, CoordsIter, LineString, MultiLineString, MultiPolygon, Rect};

use crate::{categorize::Marker, color::Rgb};

/// Projection function: map coordinates -> SVG coords (x, y).
pub(crate) type Projection<'a> = dyn Fn(&Coord<f64>) -> (f64, f64) + 'a;

/// Fit `bounds` into a fixed pixel width, keeping the aspect ratio and
/// putting north up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Viewport {
    bounds: Rect<f64>,
    margin: f64,
    scale: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    pub(crate) fn new(bounds: Rect<f64>, width: f64, margin: f64) -> Self {
        let span = if bounds.width() > 0.0 { bounds.width() } else { 1.0 };
        let scale = (width - 2.0 * margin) / span;
        let height = bounds.height() * scale + 2.0 * margin;
        Self { bounds, margin, scale, width, height }
    }

    #[inline] pub(crate) fn width(&self) -> f64 { self.width }

    #[inline] pub(crate) fn height(&self) -> f64 { self.height }

    /// Pixels per map unit.
    #[inline] pub(crate) fn scale(&self) -> f64 { self.scale }

    #[inline]
    pub(crate) fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.margin + (coord.x - self.bounds.min().x) * self.scale;
        let y = self.margin + (self.bounds.max().y - coord.y) * self.scale;
        (x, y)
    }
}

/// Draw a filled (or hollow, when `fill` is `None`) polygon as one path.
pub(crate) fn draw_polygon(
    writer: &mut impl Write,
    shape: &MultiPolygon<f64>,
    class: &str,
    fill: Option<Rgb>,
    project: &Projection<'_>,
) -> Result<()> {
    let d = multipolygon_to_path(shape, project);
    if d.is_empty() { return Ok(()) }
    match fill {
        Some(color) => writeln!(writer, r#"<path class="{class}" fill="{color}" fill-rule="evenodd" d="{d}"/>"#)?,
        None => writeln!(writer, r#"<path class="{class}" d="{d}"/>"#)?,
    }
    Ok(())
}

pub(crate) fn draw_lines(writer: &mut impl Write, shape: &MultiLineString<f64>, class: &str, project: &Projection<'_>) -> Result<()> {
    let d = shape.0.iter()
        .map(|line| line_to_path(line, project, false))
        .collect::<String>();
    if !d.is_empty() {
        writeln!(writer, r#"<path class="{class}" d="{d}"/>"#)?;
    }
    Ok(())
}

/// Draw a point marker centered at `(x, y)` with radius `size`.
pub(crate) fn draw_marker(
    writer: &mut impl Write,
    (x, y): (f64, f64),
    marker: Marker,
    size: f64,
    fill: Rgb,
    stroke: Rgb,
    opacity: f64,
) -> Result<()> {
    match marker {
        Marker::Circle => writeln!(writer,
            r#"<circle class="school" cx="{x:.3}" cy="{y:.3}" r="{size:.3}" fill="{fill}" stroke="{stroke}" fill-opacity="{opacity}"/>"#,
        )?,
        Marker::Triangle => {
            let (dx, dy) = (size * 0.866, size * 0.5);
            writeln!(writer,
                r#"<polygon class="school" points="{:.3},{:.3} {:.3},{:.3} {:.3},{:.3}" fill="{fill}" stroke="{stroke}" fill-opacity="{opacity}"/>"#,
                x, y - size, x - dx, y + dy, x + dx, y + dy,
            )?
        }
    }
    Ok(())
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

pub(crate) fn draw_text(writer: &mut impl Write, (x, y): (f64, f64), text: &str, anchor: Anchor, class: &str) -> Result<()> {
    writeln!(writer, r#"<text class="{class}" x="{x:.3}" y="{y:.3}" text-anchor="{}">{}</text>"#, anchor.as_str(), escape_xml(text))?;
    Ok(())
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compact SVG path for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection<'_>) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        out.push_str(&line_to_path(polygon.exterior(), project, true));
        for interior in polygon.interiors() {
            out.push_str(&line_to_path(interior, project, true));
        }
    }
    out
}

/// Compact SVG path for one ring or polyline.
fn line_to_path(line: &LineString<f64>, project: &Projection<'_>, close: bool) -> String {
    let mut out = String::new();
    let mut coords = line.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        if close { out.push('Z') }
    }
    out
}
