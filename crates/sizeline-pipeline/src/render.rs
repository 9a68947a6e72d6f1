//! Line-chart rasterizer.
//!
//! [`ChartRenderer::render`] turns an ordered series of points into a PNG:
//! timestamp on x (raw unix seconds), total size on y, one straight segment
//! between consecutive points in the order given, and a round marker on
//! every point. The axis ranges are exactly `[min, max]` of the input and
//! are written into the PNG as `tEXt` chunks, so [`ChartMetadata::from_png`]
//! can read back what a chart declares without re-deriving it from pixels.
//!
//! Rendering is deterministic: the same points produce the same bytes.

use std::io::Cursor;
use std::str::FromStr;

use sizeline_types::SeriesPoint;

use crate::config::ChartConfig;

pub const MARGIN_LEFT: u32 = 80;
pub const MARGIN_RIGHT: u32 = 40;
pub const MARGIN_TOP: u32 = 40;
pub const MARGIN_BOTTOM: u32 = 60;
pub const MAX_DIMENSION: u32 = 8192;
pub const MARKER_RADIUS: i64 = 4;
const GRID_DIVISIONS: u32 = 10;
const TICK_LENGTH: i64 = 5;

type Rgb = [u8; 3];

const BACKGROUND: Rgb = [255, 255, 255];
const GRID: Rgb = [225, 225, 225];
const AXIS: Rgb = [0, 0, 0];
/// Colour of the series line and its markers.
pub const SERIES: Rgb = [0, 0, 255];

const KEY_TITLE: &str = "Title";
const KEY_X_LABEL: &str = "x-label";
const KEY_Y_LABEL: &str = "y-label";
const KEY_X_MIN: &str = "x-min";
const KEY_X_MAX: &str = "x-max";
const KEY_Y_MIN: &str = "y-min";
const KEY_Y_MAX: &str = "y-max";
const KEY_POINTS: &str = "points";

/// Errors from chart rendering and chart metadata decoding.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no points to render")]
    Empty,

    #[error("canvas {width}x{height} does not fit a plot area (max {MAX_DIMENSION} per side)")]
    BadCanvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("PNG decoding failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("chart metadata missing or malformed: {0}")]
    Metadata(String),
}

/// Closed `[min, max]` range of one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Ord> AxisRange<T> {
    /// Range spanning every value, or `None` for no values.
    pub fn of(values: impl IntoIterator<Item = T>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

/// Map `value` from `[min, max]` onto `[start, start + len]`. A degenerate
/// range maps everything to the middle.
fn scale(value: f64, min: f64, max: f64, start: f64, len: f64) -> f64 {
    if max > min {
        start + (value - min) / (max - min) * len
    } else {
        start + len / 2.0
    }
}

/// Pixel geometry of one chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub x: AxisRange<i64>,
    pub y: AxisRange<u64>,
}

impl ChartLayout {
    /// Layout fitting `points` onto a `width` x `height` canvas.
    pub fn fit(points: &[SeriesPoint], width: u32, height: u32) -> Result<Self, RenderError> {
        let fits = width <= MAX_DIMENSION
            && height <= MAX_DIMENSION
            && width > MARGIN_LEFT + MARGIN_RIGHT
            && height > MARGIN_TOP + MARGIN_BOTTOM;
        if !fits {
            return Err(RenderError::BadCanvas { width, height });
        }
        let x = AxisRange::of(points.iter().map(|p| p.timestamp)).ok_or(RenderError::Empty)?;
        let y = AxisRange::of(points.iter().map(|p| p.total_size)).ok_or(RenderError::Empty)?;
        Ok(Self { width, height, x, y })
    }

    fn plot_width(&self) -> f64 {
        f64::from(self.width - MARGIN_LEFT - MARGIN_RIGHT - 1)
    }

    fn plot_height(&self) -> f64 {
        f64::from(self.height - MARGIN_TOP - MARGIN_BOTTOM - 1)
    }

    fn left(&self) -> i64 {
        i64::from(MARGIN_LEFT)
    }

    fn right(&self) -> i64 {
        i64::from(self.width - MARGIN_RIGHT - 1)
    }

    fn top(&self) -> i64 {
        i64::from(MARGIN_TOP)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.height - MARGIN_BOTTOM - 1)
    }

    /// Pixel `(column, row)` of a data point. Larger sizes are higher up.
    ///
    /// Values are widened to `f64`; the precision lost above 2^53 is far
    /// below one pixel.
    pub fn project(&self, point: &SeriesPoint) -> (i64, i64) {
        let column = scale(
            point.timestamp as f64,
            self.x.min as f64,
            self.x.max as f64,
            f64::from(MARGIN_LEFT),
            self.plot_width(),
        );
        let rise = scale(
            point.total_size as f64,
            self.y.min as f64,
            self.y.max as f64,
            0.0,
            self.plot_height(),
        );
        (column.round() as i64, self.bottom() - rise.round() as i64)
    }
}

/// RGB pixel buffer with clipped drawing primitives.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, fill: Rgb) -> Self {
        let pixels = fill.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&color);
    }

    /// Bresenham line, two pixels thick.
    fn line(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set(x, y, color);
            self.set(x + 1, y, color);
            self.set(x, y + 1, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn disc(&mut self, (cx, cy): (i64, i64), radius: i64, color: Rgb) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Renders a series as a PNG line chart.
#[derive(Clone, Copy, Debug)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    /// Layout this renderer would use for `points`.
    pub fn layout(&self, points: &[SeriesPoint]) -> Result<ChartLayout, RenderError> {
        ChartLayout::fit(points, self.width, self.height)
    }

    /// Render `points`, in the order given, to PNG bytes.
    ///
    /// Fails with [`RenderError::Empty`] for no points; callers are expected
    /// to screen for an empty series first.
    pub fn render(&self, points: &[SeriesPoint]) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(points)?;
        let canvas = draw(&layout, points);
        encode(&layout, points.len(), &canvas)
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

fn draw(layout: &ChartLayout, points: &[SeriesPoint]) -> Canvas {
    let mut canvas = Canvas::new(layout.width, layout.height, BACKGROUND);
    let (left, right, top, bottom) = (layout.left(), layout.right(), layout.top(), layout.bottom());

    for i in 0..=GRID_DIVISIONS {
        let gx = left + ((right - left) * i64::from(i)) / i64::from(GRID_DIVISIONS);
        let gy = top + ((bottom - top) * i64::from(i)) / i64::from(GRID_DIVISIONS);
        for y in top..=bottom {
            canvas.set(gx, y, GRID);
        }
        for x in left..=right {
            canvas.set(x, gy, GRID);
        }
        for t in 1..=TICK_LENGTH {
            canvas.set(gx, bottom + t, AXIS);
            canvas.set(left - t, gy, AXIS);
        }
    }
    for x in left..=right {
        canvas.set(x, bottom, AXIS);
        canvas.set(x, top, AXIS);
    }
    for y in top..=bottom {
        canvas.set(left, y, AXIS);
        canvas.set(right, y, AXIS);
    }

    let pixels: Vec<(i64, i64)> = points.iter().map(|p| layout.project(p)).collect();
    for pair in pixels.windows(2) {
        canvas.line(pair[0], pair[1], SERIES);
    }
    for pixel in &pixels {
        canvas.disc(*pixel, MARKER_RADIUS, SERIES);
    }
    canvas
}

fn encode(layout: &ChartLayout, count: usize, canvas: &Canvas) -> Result<Vec<u8>, RenderError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, canvas.width, canvas.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let text = [
            (KEY_TITLE, "Total Object Size Over Time".to_string()),
            (KEY_X_LABEL, "Timestamp".to_string()),
            (KEY_Y_LABEL, "Total Object Size".to_string()),
            (KEY_X_MIN, layout.x.min.to_string()),
            (KEY_X_MAX, layout.x.max.to_string()),
            (KEY_Y_MIN, layout.y.min.to_string()),
            (KEY_Y_MAX, layout.y.max.to_string()),
            (KEY_POINTS, count.to_string()),
        ];
        for (keyword, value) in text {
            encoder.add_text_chunk(keyword.to_string(), value)?;
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&canvas.pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

/// What a rendered chart declares about itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartMetadata {
    pub width: u32,
    pub height: u32,
    pub x: AxisRange<i64>,
    pub y: AxisRange<u64>,
    pub points: usize,
}

impl ChartMetadata {
    /// Read the declared axis ranges and size back out of PNG bytes.
    pub fn from_png(bytes: &[u8]) -> Result<Self, RenderError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_ignore_text_chunk(false);
        let reader = decoder.read_info()?;
        let info = reader.info();

        Ok(Self {
            width: info.width,
            height: info.height,
            x: AxisRange {
                min: parse(info, KEY_X_MIN)?,
                max: parse(info, KEY_X_MAX)?,
            },
            y: AxisRange {
                min: parse(info, KEY_Y_MIN)?,
                max: parse(info, KEY_Y_MAX)?,
            },
            points: parse(info, KEY_POINTS)?,
        })
    }
}

fn parse<T: FromStr>(info: &png::Info<'_>, key: &str) -> Result<T, RenderError> {
    let raw = info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == key)
        .map(|chunk| chunk.text.as_str())
        .ok_or_else(|| RenderError::Metadata(format!("missing {key}")))?;
    raw.parse()
        .map_err(|_| RenderError::Metadata(format!("{key} is not a number: {raw:?}")))
}
