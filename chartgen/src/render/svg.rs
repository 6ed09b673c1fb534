//! SVG output via `plotters`.

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{Error, Result};

use super::plan::{ChartPlan, SeriesPlot, Slice};
use super::tooltip::format_value;

/// Text shown in place of a chart with no rows.
pub const EMPTY_PLACEHOLDER: &str = "No data to display.";

/// Colors used when a token from the model does not parse.
const PALETTE: [RGBColor; 8] = [
    RGBColor(79, 70, 229),
    RGBColor(34, 197, 94),
    RGBColor(249, 115, 22),
    RGBColor(236, 72, 153),
    RGBColor(14, 165, 233),
    RGBColor(234, 179, 8),
    RGBColor(139, 92, 246),
    RGBColor(239, 68, 68),
];

const AXIS_TEXT: RGBColor = RGBColor(107, 114, 128);

/// Largest value axis magnitude. Tick computation overflows on wider ranges.
const AXIS_LIMIT: f64 = 1e306;
const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Canvas size and caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Caption drawn above the chart.
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            title: None,
        }
    }
}

impl RenderOptions {
    /// Set the canvas size.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the caption.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Render `plan` to an SVG document.
///
/// # Errors
///
/// Returns [`Error::Render`] when drawing fails, e.g. for a zero-sized canvas.
pub fn render_svg(plan: &ChartPlan, options: &RenderOptions) -> Result<String> {
    if options.width == 0 || options.height == 0 {
        return Err(Error::render("canvas size must be non-zero"));
    }

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let area = match &options.title {
            Some(title) => root
                .titled(title, (FONT, 24).into_font().color(&BLACK))
                .map_err(render_error)?,
            None => root.clone(),
        };

        match plan {
            ChartPlan::Empty => draw_placeholder(&area)?,
            ChartPlan::Slices(slices) => draw_pie(&area, slices)?,
            ChartPlan::Bars(plot) => draw_bars(&area, plot)?,
            ChartPlan::Lines(plot) => draw_lines(&area, plot)?,
        }

        root.present().map_err(render_error)?;
    }
    Ok(buffer)
}

/// Parse a `#rgb` or `#rrggbb` color token.
#[must_use]
pub fn parse_color(token: &str) -> Option<RGBColor> {
    let hex = token.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(RGBColor(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Some(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

fn color_or_palette(token: &str, index: usize) -> RGBColor {
    parse_color(token).unwrap_or(PALETTE[index % PALETTE.len()])
}

fn render_error(err: impl std::fmt::Display) -> Error {
    Error::render(err.to_string())
}

fn center(area: &Area<'_>) -> (i32, i32) {
    let (w, h) = area.dim_in_pixel();
    (
        i32::try_from(w / 2).unwrap_or(i32::MAX),
        i32::try_from(h / 2).unwrap_or(i32::MAX),
    )
}

fn draw_placeholder(area: &Area<'_>) -> Result<()> {
    let style = (FONT, 20)
        .into_font()
        .color(&AXIS_TEXT)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(EMPTY_PLACEHOLDER, center(area), style))
        .map_err(render_error)
}

fn draw_pie(area: &Area<'_>, slices: &[Slice]) -> Result<()> {
    let sizes: Vec<f64> = slices.iter().map(|s| s.percent).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return draw_placeholder(area);
    }

    let colors: Vec<RGBColor> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| color_or_palette(&s.color, i))
        .collect();
    let labels: Vec<String> = slices.iter().map(Slice::label).collect();

    let (w, h) = area.dim_in_pixel();
    let center = center(area);
    let radius = f64::from(w.min(h)) * 0.32;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style((FONT, 14).into_font().color(&BLACK));
    pie.label_offset(radius * 0.1);
    area.draw(&pie).map_err(render_error)
}

/// Value range covering every point plus headroom, always including zero.
///
/// Bounds stay within `AXIS_LIMIT` so the span is always finite.
fn value_range(plot: &SeriesPlot) -> (f64, f64) {
    let (lo, hi) = plot
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .map(clamp_to_axis)
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = if hi > lo { hi - lo } else { 1.0 };
    let pad = span * 0.1;
    let lo = if lo < 0.0 { (lo - pad).max(-AXIS_LIMIT) } else { lo };
    (lo, (hi + pad).min(AXIS_LIMIT))
}

fn clamp_to_axis(value: f64) -> f64 {
    value.clamp(-AXIS_LIMIT, AXIS_LIMIT)
}

/// Category label for an axis position; blank between categories.
fn category_label(categories: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = nearest as usize;
    categories.get(index).cloned().unwrap_or_default()
}

fn series_chart<'a, 'b>(
    area: &'a Area<'b>,
    plot: &SeriesPlot,
) -> Result<ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>> {
    let count = plot.categories.len();
    let (y_lo, y_hi) = value_range(plot);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(count as f64 - 0.5), y_lo..y_hi)
        .map_err(render_error)?;

    let label_style = (FONT, 14).into_font().color(&AXIS_TEXT);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(ShapeStyle::from(&RGBColor(229, 231, 235)).stroke_width(1))
        .x_labels(count)
        .x_label_style(label_style.clone())
        .y_label_style(label_style)
        .x_label_formatter(&|x| category_label(&plot.categories, *x))
        .y_label_formatter(&|y| format_value(*y))
        .draw()
        .map_err(render_error)?;

    Ok(chart)
}

fn draw_legend<'a, 'b: 'a>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&RGBColor(209, 213, 219))
        .label_font((FONT, 14))
        .draw()
        .map_err(render_error)
}

fn draw_bars(area: &Area<'_>, plot: &SeriesPlot) -> Result<()> {
    let mut chart = series_chart(area, plot)?;
    let group_width = 0.8;
    let bar_width = group_width / plot.series.len().max(1) as f64;

    for (index, series) in plot.series.iter().enumerate() {
        let color = color_or_palette(&series.color, index);
        let offset = -group_width / 2.0 + bar_width * index as f64;
        let bars = series.values.iter().enumerate().filter_map(|(row, value)| {
            let left = row as f64 + offset;
            value.map(|v| {
                Rectangle::new(
                    [(left, 0.0), (left + bar_width, clamp_to_axis(v))],
                    color.filled(),
                )
            })
        });

        chart
            .draw_series(bars)
            .map_err(render_error)?
            .label(series.key.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    draw_legend(&mut chart)
}

fn draw_lines(area: &Area<'_>, plot: &SeriesPlot) -> Result<()> {
    let mut chart = series_chart(area, plot)?;

    for (index, series) in plot.series.iter().enumerate() {
        let color = color_or_palette(&series.color, index);
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(row, value)| value.map(|v| (row as f64, clamp_to_axis(v))))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(render_error)?
            .label(series.key.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 4, color.filled())),
            )
            .map_err(render_error)?;
    }

    draw_legend(&mut chart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, DataRow, GenerationResult, SeriesKey};
    use crate::render::plan;

    fn coffee() -> GenerationResult {
        GenerationResult::series(
            vec![
                DataRow::series("Jan", [("sales", 120.0), ("users", 40.0)]),
                DataRow::series("Feb", [("sales", 150.0), ("users", 55.0)]),
                DataRow::series("Mar", [("sales", 90.0), ("users", 61.0)]),
            ],
            vec![
                SeriesKey::new("sales", "#4f46e5"),
                SeriesKey::new("users", "not-a-color"),
            ],
        )
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#4f46e5"), Some(RGBColor(0x4f, 0x46, 0xe5)));
        assert_eq!(parse_color(" #FFF "), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("#0a0"), Some(RGBColor(0, 170, 0)));
        assert_eq!(parse_color("4f46e5"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("#ééé"), None);
    }

    #[test]
    fn unparsable_color_uses_palette() {
        assert_eq!(color_or_palette("teal-ish", 1), PALETTE[1]);
        assert_eq!(color_or_palette("teal-ish", PALETTE.len()), PALETTE[0]);
    }

    #[test]
    fn category_labels_only_on_whole_positions() {
        let categories = vec!["Jan".to_owned(), "Feb".to_owned()];
        assert_eq!(category_label(&categories, 0.0), "Jan");
        assert_eq!(category_label(&categories, 1.0), "Feb");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 2.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn empty_plan_renders_placeholder() {
        let svg = render_svg(&ChartPlan::Empty, &RenderOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn renders_grouped_bars_with_legend() {
        let plan = plan(ChartKind::Bar, &coffee());
        let svg = render_svg(&plan, &RenderOptions::default().with_title("Coffee")).unwrap();
        assert!(svg.contains("<rect"));
        assert!(svg.contains("Coffee"));
        assert!(svg.contains("sales"));
        assert!(svg.contains("users"));
    }

    #[test]
    fn renders_lines() {
        let plan = plan(ChartKind::Line, &coffee());
        let svg = render_svg(&plan, &RenderOptions::default()).unwrap();
        assert!(svg.contains("<polyline") || svg.contains("<path"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn renders_pie_labels() {
        let result = GenerationResult::categorical(vec![
            DataRow::slice("Chrome", 65.0, "#34d399"),
            DataRow::slice("Firefox", 35.0, "#f87171"),
        ]);
        let svg = render_svg(&plan(ChartKind::Pie, &result), &RenderOptions::default()).unwrap();
        assert!(svg.contains("Chrome 65%"));
        assert!(svg.contains("Firefox 35%"));
    }

    #[test]
    fn extreme_values_keep_a_finite_axis() {
        let result = GenerationResult::series(
            vec![
                DataRow::series("Jan", [("sales", 1.7e308)]),
                DataRow::series("Feb", [("sales", -1.7e308)]),
            ],
            vec![SeriesKey::new("sales", "#4f46e5")],
        );

        for kind in [ChartKind::Bar, ChartKind::Line] {
            let plan = plan(kind, &result);
            let (ChartPlan::Bars(plot) | ChartPlan::Lines(plot)) = &plan else {
                unreachable!("series kinds plan bars or lines");
            };
            let (lo, hi) = value_range(plot);
            assert!(lo.is_finite() && hi.is_finite());
            assert!((hi - lo).is_finite());

            let svg = render_svg(&plan, &RenderOptions::default()).unwrap();
            assert!(svg.contains("sales"));
        }
    }

    #[test]
    fn huge_pie_renders() {
        let result = GenerationResult::categorical(vec![
            DataRow::slice("A", 1.7e308, "#34d399"),
            DataRow::slice("B", 1.7e308, "#f87171"),
        ]);
        let svg = render_svg(&plan(ChartKind::Pie, &result), &RenderOptions::default()).unwrap();
        assert!(svg.contains("A 50%"));
    }

    #[test]
    fn value_range_pads_and_includes_zero() {
        let result = GenerationResult::series(
            vec![DataRow::series("Jan", [("sales", 100.0)])],
            vec![SeriesKey::new("sales", "#4f46e5")],
        );
        let ChartPlan::Bars(plot) = plan(ChartKind::Bar, &result) else {
            unreachable!("bar kind plans bars");
        };
        let (lo, hi) = value_range(&plot);
        assert!(lo.abs() < f64::EPSILON);
        assert!((hi - 110.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        let options = RenderOptions::default().with_size(0, 100);
        assert!(matches!(
            render_svg(&ChartPlan::Empty, &options),
            Err(Error::Render(_))
        ));
    }
}
