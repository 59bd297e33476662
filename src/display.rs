use crate::arrival::{ArrivalRecord, ArrivalStore};
use std::io::Write;

#[cfg(feature = "display")]
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_4X6, FONT_6X10},
        MonoFont, MonoTextStyleBuilder,
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
#[cfg(feature = "display")]
use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Green,
    LightGrey,
    Yellow,
    Cyan,
}

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::Green => (0, 255, 0),
            Color::LightGrey => (211, 211, 211),
            Color::Yellow => (255, 255, 0),
            Color::Cyan => (0, 255, 255),
        }
    }
}

/// Draw primitives the poll loop renders through.
pub trait Renderer {
    fn clear(&mut self);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color, size: u8);

    /// Present a finished frame. Called once after every frame.
    fn flush(&mut self) {}
}

/// Screen placement of the arrival blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub row_height: i32,
    /// Rows reserved per arrival; 3 are drawn, the rest is spacing
    pub rows_per_record: i32,
    pub label_x: i32,
    pub value_x: i32,
    /// Top of the splash / disconnected message
    pub message_y: i32,
    pub text_size: u8,
    pub due_label: &'static str,
    pub expected_label: &'static str,
}

impl Layout {
    // 240x320 TFT in portrait
    pub const TFT: Layout = Layout {
        row_height: 20,
        rows_per_record: 4,
        label_x: 5,
        value_x: 70,
        message_y: 30,
        text_size: 2,
        due_label: "Due:",
        expected_label: "Expected:",
    };

    // 64x32 LED matrix with the 4x6 font: one arrival, 16 glyphs per row
    pub const LED_MATRIX: Layout = Layout {
        row_height: 10,
        rows_per_record: 3,
        label_x: 1,
        value_x: 16,
        message_y: 12,
        text_size: 1,
        due_label: "Due",
        expected_label: "Exp",
    };

    pub fn record_origin(&self, index: usize) -> i32 {
        index as i32 * self.row_height * self.rows_per_record
    }

    /// Number of whole arrival blocks on a screen `screen_height` pixels tall
    pub fn records_that_fit(&self, screen_height: i32) -> usize {
        let block = self.row_height * self.rows_per_record;
        if block <= 0 || screen_height <= 0 {
            return 0;
        }
        (screen_height / block) as usize
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::TFT
    }
}

pub const STARTING_TEXT: &str = "Starting...";
pub const DISCONNECTED_TEXT: &str = "WiFi Disconnected";

fn draw_arrival<R: Renderer + ?Sized>(
    renderer: &mut R,
    layout: &Layout,
    record: &ArrivalRecord,
    index: usize,
) {
    let size = layout.text_size;
    let (label_x, value_x) = (layout.label_x, layout.value_x);
    let mut y = layout.record_origin(index);

    // Name row
    let name = record.destination_name();
    renderer.draw_text(name, label_x, y, Color::Green, Color::Black, size);

    // Scheduled time row
    y += layout.row_height;
    renderer.draw_text(layout.due_label, label_x, y, Color::LightGrey, Color::Black, size);
    renderer.draw_text(record.aimed_time(), value_x, y, Color::Yellow, Color::Black, size);

    // Predicted time + delay row
    y += layout.row_height;
    let expected = record.expected_with_delay();
    renderer.draw_text(layout.expected_label, label_x, y, Color::LightGrey, Color::Black, size);
    renderer.draw_text(&expected, value_x, y, Color::Cyan, Color::Black, size);
}

/// Clear the screen and draw every stored arrival in store order.
/// An empty store leaves a blank screen.
pub fn render_arrivals<R: Renderer + ?Sized>(
    renderer: &mut R,
    layout: &Layout,
    store: &ArrivalStore,
) {
    renderer.clear();
    for (index, record) in store.iter().enumerate() {
        draw_arrival(renderer, layout, record, index);
    }
    renderer.flush();
}

pub fn render_message<R: Renderer + ?Sized>(renderer: &mut R, layout: &Layout, text: &str) {
    let (x, y) = (layout.label_x, layout.message_y);
    renderer.clear();
    renderer.draw_text(text, x, y, Color::Green, Color::Black, layout.text_size);
    renderer.flush();
}

pub fn render_disconnected<R: Renderer + ?Sized>(renderer: &mut R, layout: &Layout) {
    render_message(renderer, layout, DISCONNECTED_TEXT);
}

pub fn render_starting<R: Renderer + ?Sized>(renderer: &mut R, layout: &Layout) {
    render_message(renderer, layout, STARTING_TEXT);
}

// Text-mode renderer: buffers a frame and prints it row by row on flush
pub struct ConsoleRenderer<W: Write> {
    out: W,
    frame: Vec<(i32, i32, String)>,
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame_lines(&self) -> Vec<String> {
        let mut cells: Vec<&(i32, i32, String)> = self.frame.iter().collect();
        cells.sort_by_key(|(x, y, _)| (*y, *x));

        let mut lines: Vec<(i32, String)> = Vec::new();
        for (_, y, text) in cells {
            match lines.last_mut() {
                Some((row, line)) if *row == *y => {
                    line.push(' ');
                    line.push_str(text);
                }
                _ => lines.push((*y, text.clone())),
            }
        }
        lines.into_iter().map(|(_, line)| line).collect()
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _fg: Color, _bg: Color, _size: u8) {
        self.frame.push((x, y, text.to_string()));
    }

    fn flush(&mut self) {
        let mut text = format!("\n[{}]\n", chrono::Local::now().format("%H:%M:%S"));
        for line in self.frame_lines() {
            text.push_str("  ");
            text.push_str(&line);
            text.push('\n');
        }
        // Write errors on stdout are ignored
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

#[cfg(feature = "display")]
pub struct LedMatrixRenderer {
    matrix: LedMatrix,
    width: u32,
    height: u32,
    // Offscreen frame being drawn; swapped onto the panel in flush()
    canvas: Option<LedCanvas>,
}

#[cfg(feature = "display")]
impl LedMatrixRenderer {
    /// `hardware_mapping` as understood by the rpi-rgb-led-matrix library
    /// ("regular", "adafruit-hat", ...)
    pub fn new(width: u32, height: u32, hardware_mapping: &str) -> Result<Self, String> {
        let mut options = LedMatrixOptions::new();
        options.set_cols(width);
        options.set_rows(height);
        options.set_hardware_mapping(hardware_mapping);

        let matrix = LedMatrix::new(Some(options), None)
            .map_err(|e| format!("Failed to initialize LED matrix: {}", e))?;
        let canvas = Some(matrix.offscreen_canvas());

        Ok(Self {
            matrix,
            width,
            height,
            canvas,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn font(size: u8) -> &'static MonoFont<'static> {
        if size <= 1 { &FONT_4X6 } else { &FONT_6X10 }
    }
}

#[cfg(feature = "display")]
fn to_rgb888(color: Color) -> Rgb888 {
    let (r, g, b) = color.rgb();
    Rgb888::new(r, g, b)
}

#[cfg(feature = "display")]
impl Renderer for LedMatrixRenderer {
    fn clear(&mut self) {
        let canvas = self.canvas.get_or_insert_with(|| self.matrix.offscreen_canvas());
        canvas.fill(&LedColor { red: 0, green: 0, blue: 0 });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color, size: u8) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        let style = MonoTextStyleBuilder::new()
            .font(Self::font(size))
            .text_color(to_rgb888(fg))
            .background_color(to_rgb888(bg))
            .build();

        // Layout y is the top of the row
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(canvas);
    }

    fn flush(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Renderer for Recorder {
        fn clear(&mut self) {
            self.calls.push("clear".to_string());
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, _fg: Color, _bg: Color, _size: u8) {
            self.calls.push(format!("{}@{},{}", text, x, y));
        }

        fn flush(&mut self) {
            self.calls.push("flush".to_string());
        }
    }

    fn store_with(n: usize) -> ArrivalStore {
        let mut store = ArrivalStore::new(4);
        for i in 0..n {
            store.try_append(ArrivalRecord::new("1", format!("Stop {}", i), "08:00", "08:02", "0"));
        }
        store
    }

    #[test]
    fn test_record_origin() {
        assert_eq!(Layout::TFT.record_origin(0), 0);
        assert_eq!(Layout::TFT.record_origin(1), 80);
        assert_eq!(Layout::TFT.record_origin(3), 240);
    }

    #[test]
    fn test_render_two_records() {
        let mut recorder = Recorder::default();
        render_arrivals(&mut recorder, &Layout::TFT, &store_with(2));
        assert_eq!(
            recorder.calls,
            vec![
                "clear",
                "Stop 0@5,0",
                "Due:@5,20",
                "08:00@70,20",
                "Expected:@5,40",
                "08:02 [0]@70,40",
                "Stop 1@5,80",
                "Due:@5,100",
                "08:00@70,100",
                "Expected:@5,120",
                "08:02 [0]@70,120",
                "flush",
            ]
        );
    }

    #[test]
    fn test_records_that_fit() {
        assert_eq!(Layout::TFT.records_that_fit(320), 4);
        assert_eq!(Layout::LED_MATRIX.records_that_fit(32), 1);
        assert_eq!(Layout::LED_MATRIX.records_that_fit(0), 0);
    }

    #[test]
    fn test_led_layout_fits_panel() {
        // FONT_4X6 glyphs are 4 px wide on a 64x32 panel
        let led = Layout::LED_MATRIX;
        let label_end = led.label_x + led.expected_label.len() as i32 * 4;
        let value_end = led.value_x + "08:02 [PT0S]".len() as i32 * 4;
        assert!(label_end < led.value_x);
        assert!(value_end <= 64);
        assert!(led.record_origin(0) + 2 * led.row_height + 6 <= 32);
    }

    #[test]
    fn test_render_led_labels() {
        let mut recorder = Recorder::default();
        render_arrivals(&mut recorder, &Layout::LED_MATRIX, &store_with(1));
        assert_eq!(
            recorder.calls,
            vec![
                "clear",
                "Stop 0@1,0",
                "Due@1,10",
                "08:00@16,10",
                "Exp@1,20",
                "08:02 [0]@16,20",
                "flush",
            ]
        );
    }

    #[test]
    fn test_render_empty_store_only_clears() {
        let mut recorder = Recorder::default();
        render_arrivals(&mut recorder, &Layout::TFT, &store_with(0));
        assert_eq!(recorder.calls, vec!["clear", "flush"]);
    }

    #[test]
    fn test_render_disconnected() {
        let mut recorder = Recorder::default();
        render_disconnected(&mut recorder, &Layout::TFT);
        assert_eq!(recorder.calls, vec!["clear", "WiFi Disconnected@5,30", "flush"]);
    }

    #[test]
    fn test_console_groups_rows() {
        let mut console = ConsoleRenderer::new(Vec::new());
        render_arrivals(&mut console, &Layout::TFT, &store_with(1));
        let output = String::from_utf8(console.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().skip(2).collect();
        assert_eq!(lines, vec!["  Stop 0", "  Due: 08:00", "  Expected: 08:02 [0]"]);
    }
}
