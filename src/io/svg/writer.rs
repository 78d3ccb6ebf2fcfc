use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

/// File-backed SVG output.
pub(crate) struct SvgWriter {
    writer: BufWriter<File>,
}

/// In-memory SVG output.
#[derive(Default)]
pub(crate) struct SvgStringWriter {
    buffer: Vec<u8>,
}

impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl Write for SvgStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl SvgWriter {
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[io::svg] Failed to create {}", path.display()))?;
        Ok(Self { writer: BufWriter::new(file) })
    }
}

impl SvgStringWriter {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer).context("[io::svg] SVG output is not valid UTF-8")
    }
}

/// Document structure shared by every SVG output.
pub(crate) trait SvgDocument: Write + Sized {
    /// XML declaration, opening `<svg>` tag and white background.
    fn write_header(&mut self, width: f64, height: f64) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.3} {height:.3}">"##)?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    /// Styles for each map layer.
    fn write_styles(&mut self) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .underlay {{ stroke: none; fill-opacity: 0.6; }}
    .state {{ fill: none; stroke: #000000; stroke-width: 1.2; }}
    .county {{ fill: none; stroke: #808080; stroke-width: 0.3; }}
    .road {{ fill: none; stroke: #ffc0cb; stroke-width: 0.6; }}
    .school {{ stroke-width: 0.5; }}
    .city {{ font: 11px sans-serif; fill: #000000; }}
    .leader {{ stroke: #000000; stroke-width: 0.5; }}
    .title {{ font: bold 16px sans-serif; }}
    .legend text {{ font: 10px sans-serif; }}
    .legend .heading {{ font-weight: bold; }}
</style>
</defs>"##)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        self.flush()?;
        Ok(())
    }
}

impl SvgDocument for SvgWriter {}

impl SvgDocument for SvgStringWriter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_is_well_formed() {
        let mut svg = SvgStringWriter::new();
        svg.write_header(200.0, 100.0).unwrap();
        svg.write_styles().unwrap();
        svg.write_footer().unwrap();
        let text = svg.into_string().unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains(r#"width="200" height="100""#));
        assert!(text.trim_end().ends_with("</svg>"));
    }
}
