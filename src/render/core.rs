use std::io::Write;

use crate::error::Result;
use crate::layout::PlacementMap;
use crate::width::{display_width, truncate_to_width};
use crate::zone::Zone;

/// Character cell size of one grid cell in the preview.
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub cell_width: usize,
    pub cell_height: usize,
    /// Fill for cells no zone covers.
    pub gap_fill: char,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            cell_width: 12,
            cell_height: 3,
            gap_fill: '.',
        }
    }
}

/// Plain-text diagram of a placement, one box per placed zone.
pub struct TextPreview {
    settings: PreviewSettings,
}

impl TextPreview {
    pub fn new(settings: PreviewSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(PreviewSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut PreviewSettings {
        &mut self.settings
    }

    pub fn render(&self, zones: &[Zone], placement: &PlacementMap) -> String {
        let cw = self.settings.cell_width.max(4);
        let ch = self.settings.cell_height.max(2);
        let dims = placement.dims();
        let mut canvas = Canvas::new(dims.cols() * cw + 1, dims.rows() * ch + 1);

        let coverage = placement.coverage();
        for r in 0..dims.rows() {
            for c in 0..dims.cols() {
                if coverage[r * dims.cols() + c] == 0 {
                    canvas.fill(c * cw + 1, r * ch + 1, cw - 1, ch - 1, self.settings.gap_fill);
                }
            }
        }

        for (index, placed) in placement.iter() {
            let area = placed.area;
            let (x0, y0) = (area.col * cw, area.row * ch);
            let (x1, y1) = (area.right() * cw, area.bottom() * ch);
            canvas.frame(x0, y0, x1, y1);

            let inner = x1 - x0 - 1;
            let mut lines = vec![zone_label(index, area.row_span, area.col_span)];
            if let Some(zone) = zones.get(index) {
                if !zone.payload.kind.is_empty() {
                    lines.push(zone.payload.kind.as_str().to_string());
                }
            }
            for (offset, line) in lines.iter().enumerate() {
                let y = y0 + 1 + offset;
                if y >= y1 {
                    break;
                }
                canvas.text(x0 + 1, y, &truncate_to_width(line, inner));
            }
        }

        canvas.finish()
    }

    pub fn write_to(
        &self,
        writer: &mut impl Write,
        zones: &[Zone],
        placement: &PlacementMap,
    ) -> Result<()> {
        writer.write_all(self.render(zones, placement).as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn zone_label(index: usize, row_span: usize, col_span: usize) -> String {
    if row_span > 1 || col_span > 1 {
        format!("Zone {} ({}×{})", index + 1, col_span, row_span)
    } else {
        format!("Zone {}", index + 1)
    }
}

// Wide characters take their slot plus a `None` continuation slot.
struct Canvas {
    width: usize,
    rows: Vec<Vec<Option<char>>>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![Some(' '); width]; height],
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = Some(ch);
        }
    }

    fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, ch: char) {
        for dy in 0..h {
            for dx in 0..w {
                self.put(x + dx, y + dy, ch);
            }
        }
    }

    fn frame(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for x in x0..=x1 {
            self.put(x, y0, '-');
            self.put(x, y1, '-');
        }
        for y in y0..=y1 {
            self.put(x0, y, '|');
            self.put(x1, y, '|');
        }
        for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
            self.put(x, y, '+');
        }
        self.fill(x0 + 1, y0 + 1, x1 - x0 - 1, y1 - y0 - 1, ' ');
    }

    fn text(&mut self, x: usize, y: usize, text: &str) {
        let mut cursor = x;
        for ch in text.chars() {
            let w = display_width(ch.encode_utf8(&mut [0; 4]));
            self.put(cursor, y, ch);
            for extra in 1..w {
                if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(cursor + extra)) {
                    *slot = None;
                }
            }
            cursor += w.max(1);
        }
    }

    fn finish(self) -> String {
        debug_assert!(self.rows.iter().all(|row| row.len() == self.width));
        self.rows
            .into_iter()
            .map(|row| {
                let line: String = row.into_iter().flatten().collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
