// Stacked horizontal bar chart of the answers to the regular questions.

use log::debug;
use png::{BitDepth, ColorType};
use snafu::prelude::*;
use survey_tally::VoteTable;

use crate::survey::font;
use crate::survey::*;

pub type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const GRID: Rgb = [220, 220, 220];
const INK: Rgb = [40, 40, 40];

// From full agreement (green) to full disagreement (red).
const PALETTE: [Rgb; 5] = [
    [26, 150, 65],
    [166, 217, 106],
    [255, 255, 191],
    [253, 174, 97],
    [215, 25, 28],
];

pub const TITLE: &str = "Percentage of Votes per Class (Regular Questions)";
const X_LABEL: &str = "Percentage (%)";
const Y_LABEL: &str = "Question";
const LEGEND_TITLE: &str = "Vote Type";

const TEXT_SCALE: usize = 2;
const LINE_HEIGHT: usize = (font::HEIGHT + 4) * TEXT_SCALE;
const SWATCH: usize = 16;

/// The color of a class, spread over the palette according to the number of classes.
pub fn class_color(idx: usize, num_classes: usize) -> Rgb {
    if num_classes <= 1 {
        return PALETTE[0];
    }
    let t = idx.min(num_classes - 1) as f64 / (num_classes - 1) as f64 * (PALETTE.len() - 1) as f64;
    let lo = t.floor() as usize;
    let hi = (lo + 1).min(PALETTE.len() - 1);
    let frac = t - lo as f64;
    let mix = |k: usize| -> u8 {
        (PALETTE[lo][k] as f64 * (1.0 - frac) + PALETTE[hi][k] as f64 * frac).round() as u8
    };
    [mix(0), mix(1), mix(2)]
}

/// Positions of the elements of the chart, in pixels.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChartLayout {
    pub width: usize,
    pub height: usize,
    pub plot_left: usize,
    pub plot_top: usize,
    pub plot_width: usize,
    pub row_height: usize,
    pub bar_height: usize,
    pub legend_left: usize,
    pub legend_top: usize,
    num_rows: usize,
}

impl ChartLayout {
    pub fn new(num_rows: usize, labels: &[String]) -> ChartLayout {
        let y_labels_width = font::text_width(&format!("Q{}", num_rows.max(1)), TEXT_SCALE)
            .max(font::text_width(Y_LABEL, TEXT_SCALE));
        let plot_left = 20 + y_labels_width + 12;
        let plot_top = 80;
        let plot_width = 800;
        let row_height = 36;
        let plot_height = num_rows.max(1) * row_height;

        let legend_left = plot_left + plot_width + 40;
        let legend_top = plot_top;
        let longest_label = labels
            .iter()
            .map(|l| font::text_width(l, TEXT_SCALE) + SWATCH + 10)
            .chain(std::iter::once(font::text_width(LEGEND_TITLE, TEXT_SCALE)))
            .max()
            .unwrap_or(0);
        let legend_height = 20 + LINE_HEIGHT * (labels.len() + 1);

        let width = (legend_left + longest_label + 40)
            .max(font::text_width(TITLE, TEXT_SCALE) + 40);
        let height = (plot_top + plot_height + 80).max(legend_top + legend_height + 20);
        ChartLayout {
            width,
            height,
            plot_left,
            plot_top,
            plot_width,
            row_height,
            bar_height: 24,
            legend_left,
            legend_top,
            num_rows,
        }
    }

    pub fn plot_bottom(&self) -> usize {
        self.plot_top + self.num_rows.max(1) * self.row_height
    }

    /// The top of the bar of question `idx`, counted in table order.
    ///
    /// Bars are stacked from the bottom in reverse table order, which puts the first question on top.
    pub fn bar_top(&self, idx: usize) -> usize {
        let from_bottom = self.num_rows.max(1) - 1 - idx;
        self.plot_bottom() - (from_bottom + 1) * self.row_height
            + (self.row_height - self.bar_height) / 2
    }

    pub fn x_for(&self, percent: f64) -> usize {
        let p = percent.clamp(0.0, 100.0);
        self.plot_left + (p / 100.0 * self.plot_width as f64).round() as usize
    }
}

struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize, background: Rgb) -> Canvas {
        Canvas {
            width,
            height,
            pixels: background.repeat(width * height),
        }
    }

    fn put(&mut self, x: usize, y: usize, c: Rgb) {
        if x < self.width && y < self.height {
            let offset = (y * self.width + x) * 3;
            self.pixels[offset..offset + 3].copy_from_slice(&c);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, c: Rgb) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.put(xx, yy, c);
            }
        }
    }

    fn hline(&mut self, x0: usize, x1: usize, y: usize, c: Rgb) {
        self.fill_rect(x0, y, x1 + 1 - x0, 1, c);
    }

    fn vline(&mut self, x: usize, y0: usize, y1: usize, c: Rgb) {
        self.fill_rect(x, y0, 1, y1 + 1 - y0, c);
    }

    fn outline(&mut self, x: usize, y: usize, w: usize, h: usize, c: Rgb) {
        self.hline(x, x + w, y, c);
        self.hline(x, x + w, y + h, c);
        self.vline(x, y, y + h, c);
        self.vline(x + w, y, y + h, c);
    }

    fn text(&mut self, x: usize, y: usize, s: &str, c: Rgb) {
        for (px, py) in font::pixels(s) {
            self.fill_rect(x + px * TEXT_SCALE, y + py * TEXT_SCALE, TEXT_SCALE, TEXT_SCALE, c);
        }
    }

    fn text_centered(&mut self, center_x: usize, y: usize, s: &str, c: Rgb) {
        let w = font::text_width(s, TEXT_SCALE);
        self.text(center_x.saturating_sub(w / 2), y, s, c);
    }

    fn encode_png(&self) -> SurveyResult<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width as u32, self.height as u32);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().context(EncodingPngSnafu {})?;
            writer
                .write_image_data(&self.pixels)
                .context(EncodingPngSnafu {})?;
            writer.finish().context(EncodingPngSnafu {})?;
        }
        Ok(out)
    }
}

/// Draws the percentages of every question of the table and encodes the result as PNG.
pub fn render_chart(table: &VoteTable) -> SurveyResult<Vec<u8>> {
    let layout = ChartLayout::new(table.len(), table.labels());
    debug!("render_chart: layout: {:?}", layout);
    let num_classes = table.labels().len();
    let plot_bottom = layout.plot_bottom();
    let mut canvas = Canvas::new(layout.width, layout.height, WHITE);

    canvas.text_centered(layout.width / 2, 24, TITLE, INK);

    // Grid and ticks
    for tick in (0..=100).step_by(20) {
        let x = layout.x_for(tick as f64);
        canvas.vline(x, layout.plot_top, plot_bottom, GRID);
        canvas.vline(x, plot_bottom, plot_bottom + 5, BLACK);
        canvas.text_centered(x, plot_bottom + 10, &tick.to_string(), INK);
    }
    canvas.text_centered(
        layout.plot_left + layout.plot_width / 2,
        plot_bottom + 10 + LINE_HEIGHT + 6,
        X_LABEL,
        INK,
    );
    canvas.text(20, layout.plot_top - LINE_HEIGHT - 6, Y_LABEL, INK);

    for (idx, (_, pcts)) in table.percentage_rows().iter().enumerate() {
        let y = layout.bar_top(idx);
        let mut cumulative = 0.0;
        for (class, p) in pcts.iter().enumerate() {
            let x0 = layout.x_for(cumulative);
            cumulative += p;
            let x1 = layout.x_for(cumulative);
            if x1 > x0 {
                canvas.fill_rect(
                    x0,
                    y,
                    x1 - x0,
                    layout.bar_height,
                    class_color(class, num_classes),
                );
            }
        }
        let label = format!("Q{}", idx + 1);
        let label_x = layout.plot_left - 10 - font::text_width(&label, TEXT_SCALE);
        let label_y = y + (layout.bar_height - font::HEIGHT * TEXT_SCALE) / 2;
        canvas.text(label_x, label_y, &label, INK);
    }

    // Axes
    canvas.vline(layout.plot_left, layout.plot_top, plot_bottom, BLACK);
    canvas.hline(
        layout.plot_left,
        layout.plot_left + layout.plot_width,
        plot_bottom,
        BLACK,
    );

    // Legend
    let legend_x = layout.legend_left + 10;
    let mut y = layout.legend_top + 10;
    canvas.text(legend_x, y, LEGEND_TITLE, INK);
    for (class, label) in table.labels().iter().enumerate() {
        y += LINE_HEIGHT;
        let color = class_color(class, num_classes);
        canvas.fill_rect(legend_x, y, SWATCH, SWATCH - 2, color);
        canvas.outline(legend_x, y, SWATCH, SWATCH - 2, INK);
        canvas.text(legend_x + SWATCH + 10, y, label, INK);
    }
    canvas.outline(
        layout.legend_left,
        layout.legend_top,
        layout.width - layout.legend_left - 20,
        y + LINE_HEIGHT + 4 - layout.legend_top,
        GRID,
    );

    canvas.encode_png()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use survey_tally::AGREEMENT_LABELS;

    fn labels() -> Vec<String> {
        AGREEMENT_LABELS.iter().map(|s| s.to_string()).collect()
    }

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        (info, buf)
    }

    fn pixel(info: &png::OutputInfo, buf: &[u8], x: usize, y: usize) -> Rgb {
        let offset = y * info.line_size + x * 3;
        [buf[offset], buf[offset + 1], buf[offset + 2]]
    }

    #[test]
    fn palette_endpoints() {
        assert_eq!(class_color(0, 5), PALETTE[0]);
        assert_eq!(class_color(2, 5), PALETTE[2]);
        assert_eq!(class_color(4, 5), PALETTE[4]);
        assert_eq!(class_color(10, 11), PALETTE[4]);
        assert_eq!(class_color(0, 1), PALETTE[0]);
    }

    #[test]
    fn first_question_on_top() {
        let layout = ChartLayout::new(3, &labels());
        assert!(layout.bar_top(0) < layout.bar_top(1));
        assert!(layout.bar_top(1) < layout.bar_top(2));
        assert!(layout.bar_top(2) + layout.bar_height <= layout.plot_bottom());
        assert!(layout.bar_top(0) >= layout.plot_top);
    }

    #[test]
    fn chart_pixels() {
        let mut t = VoteTable::new(labels());
        t.push_row("Tout va bien", vec![4, 0, 0, 0, 0]).unwrap();
        t.push_row("Rien ne va", vec![0, 0, 0, 0, 2]).unwrap();
        t.push_row("Personne", vec![0, 0, 0, 0, 0]).unwrap();
        let bytes = render_chart(&t).unwrap();
        let (info, buf) = decode(&bytes);

        let layout = ChartLayout::new(3, &labels());
        assert_eq!(info.width as usize, layout.width);
        assert_eq!(info.height as usize, layout.height);
        assert_eq!(info.color_type, ColorType::Rgb);

        let x = layout.plot_left + layout.plot_width / 3;
        let mid = layout.bar_height / 2;
        assert_eq!(pixel(&info, &buf, x, layout.bar_top(0) + mid), PALETTE[0]);
        assert_eq!(pixel(&info, &buf, x, layout.bar_top(1) + mid), PALETTE[4]);
        // No vote: no bar.
        assert_eq!(pixel(&info, &buf, x, layout.bar_top(2) + mid), WHITE);
    }

    #[test]
    fn segments_follow_the_percentages() {
        let mut t = VoteTable::new(labels());
        t.push_row("Q", vec![1, 1, 0, 0, 2]).unwrap();
        let bytes = render_chart(&t).unwrap();
        let (info, buf) = decode(&bytes);
        let layout = ChartLayout::new(1, &labels());
        let y = layout.bar_top(0) + layout.bar_height / 2;
        assert_eq!(pixel(&info, &buf, layout.x_for(12.5), y), PALETTE[0]);
        assert_eq!(pixel(&info, &buf, layout.x_for(37.5), y), PALETTE[1]);
        assert_eq!(pixel(&info, &buf, layout.x_for(75.0), y), PALETTE[4]);
    }
}
