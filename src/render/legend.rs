use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::{
    categorize::Marker,
    classify::{BinScheme, ClassTally, ResolvedUnderlay},
    color::Rgb,
    io::svg::{draw_text, escape_xml, Anchor},
};

/// Symbol drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Swatch {
    Patch,
    Point(Marker),
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub swatch: Swatch,
    /// Members of the class; rendered as `"(n schools)"`.
    pub count: Option<usize>,
}

impl LegendEntry {
    pub fn text(&self) -> String {
        match self.count {
            Some(n) => format!("{} ({n} schools)", self.label),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

const ROW_HEIGHT: f64 = 16.0;
const SWATCH: f64 = 10.0;

impl Legend {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), entries: Vec::new() }
    }

    pub fn entry(mut self, label: impl Into<String>, color: Rgb, swatch: Swatch, count: Option<usize>) -> Self {
        self.entries.push(LegendEntry { label: label.into(), color, swatch, count });
        self
    }

    /// One point entry per class, counting the schools in it. Unclassified
    /// schools are not listed.
    pub fn for_scheme(title: impl Into<String>, scheme: &BinScheme, tally: &ClassTally) -> Self {
        let entries = scheme.classes().iter().enumerate()
            .map(|(i, class)| LegendEntry {
                label: class.label.clone(),
                color: class.color,
                swatch: Swatch::Point(Marker::Circle),
                count: Some(tally.count(i)),
            })
            .collect();
        Self { title: title.into(), entries }
    }

    pub fn for_underlay(title: impl Into<String>, underlay: &ResolvedUnderlay<'_>) -> Self {
        let entries = (0..underlay.num_bins())
            .map(|i| LegendEntry {
                label: underlay.label(i),
                color: underlay.color(i),
                swatch: Swatch::Patch,
                count: None,
            })
            .collect();
        Self { title: title.into(), entries }
    }

    /// Rendered height in pixels.
    pub fn height(&self) -> f64 { (self.entries.len() + 1) as f64 * ROW_HEIGHT + 8.0 }

    pub(crate) fn draw(&self, writer: &mut impl Write, x: f64, y: f64) -> Result<()> {
        writeln!(writer, r#"<g class="legend">"#)?;
        writeln!(writer, r#"<text class="heading" x="{:.3}" y="{:.3}">{}</text>"#, x, y + 12.0, escape_xml(&self.title))?;

        for (row, entry) in self.entries.iter().enumerate() {
            let top = y + (row + 1) as f64 * ROW_HEIGHT + 2.0;
            let (cx, cy) = (x + SWATCH / 2.0, top + SWATCH / 2.0);
            let color = entry.color;
            let stroke = if color.is_white() { Rgb::BLACK } else { color };

            match entry.swatch {
                Swatch::Patch => writeln!(writer,
                    r#"<rect x="{x:.3}" y="{top:.3}" width="{SWATCH}" height="{SWATCH}" fill="{color}" fill-opacity="0.6" stroke="{stroke}" stroke-width="0.5"/>"#)?,
                Swatch::Point(Marker::Circle) => writeln!(writer,
                    r#"<circle cx="{cx:.3}" cy="{cy:.3}" r="4" fill="{color}" stroke="{stroke}" stroke-width="0.5"/>"#)?,
                Swatch::Point(Marker::Triangle) => writeln!(writer,
                    r#"<polygon points="{cx:.3},{:.3} {:.3},{:.3} {:.3},{:.3}" fill="{color}" stroke="{stroke}" stroke-width="0.5"/>"#,
                    top, x, top + SWATCH, x + SWATCH, top + SWATCH)?,
                Swatch::Line => writeln!(writer,
                    r#"<line x1="{x:.3}" y1="{cy:.3}" x2="{:.3}" y2="{cy:.3}" stroke="{color}" stroke-width="1.5"/>"#, x + SWATCH)?,
            }
            draw_text(writer, (x + SWATCH + 6.0, top + SWATCH - 1.0), &entry.text(), Anchor::Start, "entry")?;
        }

        writeln!(writer, "</g>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{UnderlayBins, UnderlayScheme};

    #[test]
    fn scheme_legend_counts_schools() {
        let scheme = BinScheme::from_colors(vec![0.0, 1.0, 2.0], &["#ffffff", "#08519c"]).unwrap();
        let tally = scheme.tally([Some(0.5), Some(1.0), Some(1.5), None, Some(7.0)]);
        let legend = Legend::for_scheme("Black CS Enrollment Disparity", &scheme, &tally);
        let texts = legend.entries.iter().map(LegendEntry::text).collect::<Vec<_>>();
        assert_eq!(texts, ["0.000000 – 1.000000 (2 schools)", "1.000000 – 2.000000 (1 schools)"]);
    }

    #[test]
    fn underlay_legend_uses_bin_labels() {
        let scheme = UnderlayScheme::new(UnderlayBins::Quantiles(2), &["#f0f0f0", "#252525"], Some(&["low", "high"])).unwrap();
        let resolved = scheme.resolve([Some(1.0), Some(2.0), Some(3.0)]).unwrap();
        let legend = Legend::for_underlay("Asian Population (Underlay)", &resolved);
        assert_eq!(legend.entries.len(), 2);
        assert_eq!(legend.entries[1].label, "high");
        assert_eq!(legend.entries[1].swatch, Swatch::Patch);
    }

    #[test]
    fn white_swatches_are_outlined() {
        let legend = Legend::new("Parity").entry("Parity", Rgb::WHITE, Swatch::Point(Marker::Circle), None);
        let mut out = Vec::new();
        legend.draw(&mut out, 0.0, 0.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r##"fill="#ffffff" stroke="#000000""##));
    }
}
