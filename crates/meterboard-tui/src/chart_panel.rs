//! Chart drawing: turns a chart descriptor into ratatui widgets

use crate::engine::ChartState;
use meterboard_core::{ChartKind, ChartOptions, Rgba};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType},
};

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb(rgba.r, rgba.g, rgba.b)
}

/// Largest value across all series, with a floor of 1 to keep bounds sane
fn max_value(state: &ChartState) -> f64 {
    state
        .descriptor
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(1.0_f64, f64::max)
}

/// Render one chart's current descriptor into the given area
pub fn render_chart(frame: &mut Frame, area: Rect, state: &ChartState, options: &ChartOptions) {
    match state.kind {
        ChartKind::Line => render_line(frame, area, state, options),
        ChartKind::Bar => render_bar(frame, area, state, options),
    }
}

fn render_line(frame: &mut Frame, area: Rect, state: &ChartState, options: &ChartOptions) {
    let descriptor = &state.descriptor;

    // One point per label bucket, aligned by index
    let points: Vec<Vec<(f64, f64)>> = descriptor
        .series
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = descriptor
        .series
        .iter()
        .zip(points.iter())
        .map(|(series, data)| {
            Dataset::default()
                .name(series.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(to_color(series.style.border)))
                .data(data)
        })
        .collect();

    let x_max = (descriptor.labels.len().saturating_sub(1)).max(1) as f64;
    let x_labels = vec![
        Span::raw(descriptor.labels.first().cloned().unwrap_or_default()),
        Span::raw(
            descriptor
                .labels
                .get(descriptor.labels.len() / 2)
                .cloned()
                .unwrap_or_default(),
        ),
        Span::raw(descriptor.labels.last().cloned().unwrap_or_default()),
    ];

    let y_max = max_value(state) * 1.1;
    let y_min = if options.begin_at_zero {
        0.0
    } else {
        descriptor
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0_f64, f64::min)
    };
    let y_labels = vec![
        Span::raw(options.axis_tick(y_min)),
        Span::raw(options.axis_tick((y_min + y_max) / 2.0)),
        Span::raw(options.axis_tick(y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Usage"))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(x_labels)
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .title(options.axis_title.clone())
                .style(Style::default().fg(Color::Gray))
                .labels(y_labels)
                .bounds([y_min, y_max]),
        );

    frame.render_widget(chart, area);
}

fn render_bar(frame: &mut Frame, area: Rect, state: &ChartState, options: &ChartOptions) {
    let descriptor = &state.descriptor;

    // BarChart draws one group; use the first series
    let Some(series) = descriptor.series.first() else {
        return;
    };

    let bar_data: Vec<(&str, u64)> = descriptor
        .labels
        .iter()
        .zip(series.values.iter())
        .map(|(label, value)| (label.as_str(), value.max(0.0).round() as u64))
        .collect();

    // Fit bar width to the area so all buckets stay visible
    let bars = bar_data.len().max(1) as u16;
    let bar_width = ((area.width.saturating_sub(2)) / bars).saturating_sub(1).max(1);

    let barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", series.label, options.axis_title)),
        )
        .data(&bar_data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(to_color(series.style.border)))
        .value_style(Style::default().fg(Color::White));

    frame.render_widget(barchart, area);
}
