//! Layered choropleth map written as a single SVG document.
//!
//! Layers are drawn bottom to top in the order they are added. All
//! geometry is expected in one projected coordinate system; the frame is
//! the padded extent of everything drawn unless set explicitly.

use std::path::Path;

use anyhow::{bail, Result};
use geo::{Coord, MultiLineString, MultiPolygon, Rect};

use crate::{
    categorize::Marker,
    color::Rgb,
    geom::{bounds_of, merge_bounds, padded_bounds},
    io::svg::{draw_lines, draw_marker, draw_polygon, draw_text, Anchor, SvgDocument, SvgStringWriter, SvgWriter, Viewport},
};
use super::Legend;

const MARGIN: f64 = 10.0;
const TITLE_HEIGHT: f64 = 28.0;
const LEGEND_WIDTH: f64 = 280.0;
const PADDING: f64 = 0.05;

/// A school (or other point) in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMark {
    pub at: Coord<f64>,
    pub color: Rgb,
    pub marker: Marker,
}

#[derive(Debug, Clone)]
enum Layer {
    Fill { shapes: Vec<MultiPolygon<f64>>, colors: Vec<Option<Rgb>> },
    Outline { shapes: Vec<MultiPolygon<f64>>, class: &'static str },
    Lines { shapes: Vec<MultiLineString<f64>> },
    Points { marks: Vec<PointMark>, size: f64, opacity: f64 },
    Labels { labels: Vec<(Coord<f64>, Coord<f64>, String, bool)> },
}

impl Layer {
    fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            Self::Fill { shapes, .. } | Self::Outline { shapes, .. } => bounds_of(shapes),
            Self::Lines { shapes } => bounds_of(shapes),
            Self::Points { marks, .. } => marks.iter()
                .map(|m| Rect::new(m.at, m.at))
                .reduce(merge_bounds),
            Self::Labels { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChoroplethMap {
    width: f64,
    title: Option<String>,
    frame: Option<Rect<f64>>,
    extent: Option<Rect<f64>>,
    layers: Vec<Layer>,
    legends: Vec<Legend>,
}

impl ChoroplethMap {
    /// A map whose drawing area is `width` pixels wide.
    pub fn new(width: f64) -> Self {
        Self { width, title: None, frame: None, extent: None, layers: Vec::new(), legends: Vec::new() }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Fix the visible extent instead of fitting it to the layers.
    pub fn frame(mut self, frame: Rect<f64>) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Grow the fitted extent to cover `rect` even when nothing is drawn
    /// there. Ignored when a frame is set.
    pub fn include(mut self, rect: Rect<f64>) -> Self {
        self.extent = Some(match self.extent {
            Some(extent) => merge_bounds(extent, rect),
            None => rect,
        });
        self
    }

    /// Polygons filled by class; `None` leaves a polygon undrawn.
    pub fn fill(mut self, shapes: Vec<MultiPolygon<f64>>, colors: Vec<Option<Rgb>>) -> Self {
        assert_eq!(shapes.len(), colors.len(), "[render] {} colors for {} shapes", colors.len(), shapes.len());
        self.layers.push(Layer::Fill { shapes, colors });
        self
    }

    /// Hollow polygons styled by `class` (`"state"` or `"county"`).
    pub fn outline(mut self, shapes: Vec<MultiPolygon<f64>>, class: &'static str) -> Self {
        self.layers.push(Layer::Outline { shapes, class });
        self
    }

    pub fn roads(mut self, shapes: Vec<MultiLineString<f64>>) -> Self {
        self.layers.push(Layer::Lines { shapes });
        self
    }

    pub fn points(mut self, marks: Vec<PointMark>, size: f64, opacity: f64) -> Self {
        self.layers.push(Layer::Points { marks, size, opacity });
        self
    }

    /// Labels as `(anchor point, label position, text, right aligned)`.
    pub fn labels(mut self, labels: Vec<(Coord<f64>, Coord<f64>, String, bool)>) -> Self {
        self.layers.push(Layer::Labels { labels });
        self
    }

    pub fn legend(mut self, legend: Legend) -> Self {
        self.legends.push(legend);
        self
    }

    #[inline] pub fn num_legends(&self) -> usize { self.legends.len() }

    fn viewport(&self) -> Result<Viewport> {
        let bounds = match self.frame {
            Some(frame) => frame,
            None => match self.layers.iter().filter_map(Layer::bounds).chain(self.extent).reduce(merge_bounds) {
                Some(bounds) => padded_bounds(bounds, PADDING),
                None => bail!("[render] nothing to draw"),
            },
        };
        Ok(Viewport::new(bounds, self.width, MARGIN))
    }

    pub(crate) fn write_to<W: SvgDocument>(&self, writer: &mut W) -> Result<()> {
        let viewport = self.viewport()?;
        self.render(&viewport, writer)
    }

    fn render<W: SvgDocument>(&self, viewport: &Viewport, writer: &mut W) -> Result<()> {
        let top = if self.title.is_some() { TITLE_HEIGHT } else { 0.0 };
        let legends_height = self.legends.iter().map(|l| l.height()).sum::<f64>() + MARGIN;
        let width = viewport.width() + if self.legends.is_empty() { 0.0 } else { LEGEND_WIDTH };
        let height = (viewport.height() + top).max(legends_height + top);

        writer.write_header(width, height)?;
        writer.write_styles()?;

        if let Some(title) = &self.title {
            draw_text(writer, (width / 2.0, 20.0), title, Anchor::Middle, "title")?;
        }

        let project = |c: &Coord<f64>| {
            let (x, y) = viewport.project(c);
            (x, y + top)
        };

        writeln!(writer, r#"<g class="map">"#)?;
        for layer in &self.layers {
            match layer {
                Layer::Fill { shapes, colors } => {
                    for (shape, color) in shapes.iter().zip(colors) {
                        if let Some(color) = color {
                            draw_polygon(writer, shape, "underlay", Some(*color), &project)?;
                        }
                    }
                }
                Layer::Outline { shapes, class } => {
                    for shape in shapes {
                        draw_polygon(writer, shape, class, None, &project)?;
                    }
                }
                Layer::Lines { shapes } => {
                    for shape in shapes {
                        draw_lines(writer, shape, "road", &project)?;
                    }
                }
                Layer::Points { marks, size, opacity } => {
                    for mark in marks {
                        let stroke = if mark.color.is_white() { Rgb::BLACK } else { mark.color };
                        draw_marker(writer, project(&mark.at), mark.marker, *size, mark.color, stroke, *opacity)?;
                    }
                }
                Layer::Labels { labels } => {
                    for (at, label, text, right_aligned) in labels {
                        let (x1, y1) = project(at);
                        let (x2, y2) = project(label);
                        writeln!(writer, r#"<line class="leader" x1="{x1:.3}" y1="{y1:.3}" x2="{x2:.3}" y2="{y2:.3}"/>"#)?;
                        writeln!(writer, r##"<circle cx="{x1:.3}" cy="{y1:.3}" r="2" fill="#000000"/>"##)?;
                        let anchor = if *right_aligned { Anchor::End } else { Anchor::Start };
                        draw_text(writer, (x2, y2), text, anchor, "city")?;
                    }
                }
            }
        }
        writeln!(writer, "</g>")?;

        let mut y = top + MARGIN;
        for legend in &self.legends {
            legend.draw(writer, viewport.width() + MARGIN, y)?;
            y += legend.height();
        }

        writer.write_footer()
    }

    /// Write the map to `path`. Nothing is created when the map has no
    /// extent.
    pub fn save(&self, path: &Path) -> Result<()> {
        let viewport = self.viewport()?;
        let mut writer = SvgWriter::new(path)?;
        self.render(&viewport, &mut writer)
    }

    pub fn to_svg_string(&self) -> Result<String> {
        let mut writer = SvgStringWriter::new();
        self.write_to(&mut writer)?;
        writer.into_string()
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::render::Swatch;

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0)]])
    }

    #[test]
    fn unclassified_polygons_are_not_filled() {
        let map = ChoroplethMap::new(400.0)
            .fill(vec![square(0.0, 0.0), square(1.0, 0.0)], vec![Some(Rgb::new(0x25, 0x25, 0x25)), None]);
        let svg = map.to_svg_string().unwrap();
        assert_eq!(svg.matches(r#"class="underlay""#).count(), 1);
    }

    #[test]
    fn white_points_are_outlined_in_black() {
        let marks = vec![
            PointMark { at: Coord { x: 0.5, y: 0.5 }, color: Rgb::WHITE, marker: Marker::Circle },
            PointMark { at: Coord { x: 1.5, y: 0.5 }, color: Rgb::new(0x08, 0x51, 0x9c), marker: Marker::Triangle },
        ];
        let svg = ChoroplethMap::new(400.0)
            .outline(vec![square(0.0, 0.0), square(1.0, 0.0)], "state")
            .points(marks, 4.0, 0.8)
            .to_svg_string()
            .unwrap();
        assert!(svg.contains(r##"fill="#ffffff" stroke="#000000""##));
        assert!(svg.contains(r##"<polygon class="school""##));
        assert!(svg.contains(r#"fill-opacity="0.8""#));
    }

    #[test]
    fn legends_widen_the_canvas() {
        let legend = Legend::new("County Boundaries").entry("County Boundaries", Rgb::GRAY, Swatch::Line, None);
        let svg = ChoroplethMap::new(400.0)
            .title("Black CS Enrollment Disparity")
            .outline(vec![square(0.0, 0.0)], "county")
            .legend(legend)
            .to_svg_string()
            .unwrap();
        assert!(svg.contains(r#"width="680""#));
        assert!(svg.contains(">Black CS Enrollment Disparity</text>"));
        assert!(svg.contains(">County Boundaries</text>"));
    }

    #[test]
    fn empty_maps_are_errors() {
        assert!(ChoroplethMap::new(400.0).to_svg_string().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        assert!(ChoroplethMap::new(400.0).save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn included_extent_frames_an_empty_map() {
        let svg = ChoroplethMap::new(400.0)
            .include(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 5.0 }))
            .points(Vec::new(), 4.0, 0.8)
            .to_svg_string()
            .unwrap();
        assert!(svg.contains(r#"width="400""#));
        assert!(!svg.contains(r#"class="school""#));
    }
}
