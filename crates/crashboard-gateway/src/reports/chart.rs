//! Line chart rendering for the trend report.
//!
//! Drawing goes into an in-memory RGB buffer via `plotters`; the buffer is
//! then PNG-encoded. Text needs a TrueType font registered with plotters; a
//! renderer built without one draws the line on a bare canvas.

use std::fs;

use chrono::{DateTime, NaiveDate, NaiveTime};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crashboard_core::error::{CrashboardError, Result};
use crashboard_core::report::trend::format_date;
use crashboard_core::report::TrendPoint;
use crashboard_core::TimeWindow;

use crate::config::ChartSection;

/// 10×5 inches at 96 DPI.
pub const WIDTH: u32 = 960;
pub const HEIGHT: u32 = 480;

pub const TITLE: &str = "Crash Rate Over Time";
const X_DESC: &str = "Date";
const Y_DESC: &str = "Crash Rate (%)";
const FONT_FAMILY: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(e: E) -> CrashboardError {
    CrashboardError::Render(e.to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    labels: bool,
}

impl ChartRenderer {
    /// No title, axis descriptions, or tick labels.
    pub fn plain() -> Self {
        Self { labels: false }
    }

    /// Register the font at `path` with plotters and draw full labels.
    /// Registration is process-wide.
    pub fn with_font_file(path: &str) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| CrashboardError::Config(format!("read font {path}: {e}")))?;
        // plotters keeps registered fonts for the process lifetime.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        register_font(FONT_FAMILY, FontStyle::Normal, bytes)
            .map_err(|_| CrashboardError::Config(format!("font {path} is not a usable TrueType font")))?;
        Ok(Self { labels: true })
    }

    pub fn from_config(cfg: &ChartSection) -> Self {
        let Some(path) = cfg.font_path.as_deref() else {
            return Self::plain();
        };
        match Self::with_font_file(path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "chart font unavailable; rendering without labels");
                Self::plain()
            }
        }
    }

    pub fn has_labels(&self) -> bool {
        self.labels
    }

    /// Render `points` over `window` and return PNG bytes.
    pub fn render_png(&self, window: &TimeWindow, points: &[TrendPoint]) -> Result<Vec<u8>> {
        let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
        self.draw(window, points, &mut rgb)?;
        encode_png(&rgb, WIDTH, HEIGHT)
    }

    fn draw(&self, window: &TimeWindow, points: &[TrendPoint], buf: &mut [u8]) -> Result<()> {
        let root = BitMapBackend::with_buffer(buf, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let x0 = midnight(window.start());
        let x1 = midnight(window.end()).max(x0 + 86_400.0);
        let y_max = points.iter().map(|p| p.value).fold(0.0, f64::max);
        let y_top = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.labels {
            builder
                .caption(TITLE, (FONT_FAMILY, 24).into_font())
                .x_label_area_size(40)
                .y_label_area_size(60);
        }
        let mut chart = builder.build_cartesian_2d(x0..x1, 0.0..y_top).map_err(render_err)?;

        if self.labels {
            chart
                .configure_mesh()
                .x_desc(X_DESC)
                .y_desc(Y_DESC)
                .x_labels(8)
                .x_label_formatter(&|x| tick_label(*x))
                .y_label_formatter(&|y| format!("{y:.2}"))
                .draw()
                .map_err(render_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.timestamp() as f64, p.value)),
                BLUE.stroke_width(2),
            ))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

fn midnight(d: NaiveDate) -> f64 {
    d.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

fn tick_label(x: f64) -> String {
    DateTime::from_timestamp(x as i64, 0)
        .map(|dt| format_date(dt.date_naive()))
        .unwrap_or_default()
}

fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut enc = png::Encoder::new(&mut out, width, height);
        enc.set_color(png::ColorType::Rgb);
        enc.set_depth(png::BitDepth::Eight);
        let mut writer = enc.write_header().map_err(render_err)?;
        writer.write_image_data(rgb).map_err(render_err)?;
        writer.finish().map_err(render_err)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crashboard_core::Granularity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn decode(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn renders_blue_line_on_white_canvas() {
        let window = TimeWindow::new(date(2024, 3, 2), date(2024, 3, 9), Granularity::Daily).unwrap();
        let points = [
            TrendPoint { date: date(2024, 3, 2), value: 1.2 },
            TrendPoint { date: date(2024, 3, 5), value: 2.5 },
            TrendPoint { date: date(2024, 3, 9), value: 0.8 },
        ];
        let png_bytes = ChartRenderer::plain().render_png(&window, &points).unwrap();
        assert_eq!(&png_bytes[..8], b"\x89PNG\r\n\x1a\n");

        let (w, h, rgb) = decode(&png_bytes);
        assert_eq!((w, h), (WIDTH, HEIGHT));
        assert_eq!(&rgb[..3], &[255, 255, 255]);
        assert!(rgb.chunks(3).any(|px| px[2] > 200 && px[0] < 60 && px[1] < 60));
    }

    #[test]
    fn empty_trend_still_renders() {
        let window = TimeWindow::new(date(2024, 3, 2), date(2024, 3, 9), Granularity::Daily).unwrap();
        let png_bytes = ChartRenderer::plain().render_png(&window, &[]).unwrap();
        let (_, _, rgb) = decode(&png_bytes);
        assert!(rgb.iter().all(|&b| b == 255));
    }

    #[test]
    fn labelled_chart_draws_text() {
        let Some(font) = ChartSection::default().font_path.filter(|p| std::path::Path::new(p).exists()) else {
            eprintln!("skipping: default chart font not installed");
            return;
        };
        let renderer = ChartRenderer::with_font_file(&font).unwrap();
        assert!(renderer.has_labels());
        assert!(ChartRenderer::from_config(&ChartSection::default()).has_labels());

        let window = TimeWindow::new(date(2024, 3, 2), date(2024, 3, 9), Granularity::Daily).unwrap();
        let points = [
            TrendPoint { date: date(2024, 3, 3), value: 1.12 },
            TrendPoint { date: date(2024, 3, 8), value: 2.67 },
        ];
        let labelled = renderer.render_png(&window, &points).unwrap();
        let plain = ChartRenderer::plain().render_png(&window, &points).unwrap();

        let (w, h, rgb) = decode(&labelled);
        assert_eq!((w, h), (WIDTH, HEIGHT));
        assert_ne!(rgb, decode(&plain).2);
        // caption sits in the top band, which the plain chart leaves white
        let top_band = &rgb[..(WIDTH * 40 * 3) as usize];
        assert!(top_band.iter().any(|&b| b < 128));
    }

    #[test]
    fn non_font_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, b"definitely not a font").unwrap();
        let err = ChartRenderer::with_font_file(f.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.client_code().as_str(), "CONFIG");
    }

    #[test]
    fn tick_labels_are_day_month_year() {
        assert_eq!(tick_label(midnight(date(2024, 3, 5))), "05/03/2024");
    }

    #[test]
    fn missing_font_file_is_an_error() {
        assert!(ChartRenderer::with_font_file("/nonexistent/font.ttf").is_err());
        let r = ChartRenderer::from_config(&ChartSection {
            snapshot_path: None,
            font_path: Some("/nonexistent/font.ttf".into()),
        });
        assert!(!r.has_labels());
    }
}
