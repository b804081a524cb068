use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::format::{format_millions, format_number};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Comparison charts (central panel, above the table)
// ---------------------------------------------------------------------------

fn static_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_x(false)
}

/// Average BUA and plot size side by side for each type.
pub fn size_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Avg. size by type");

    let mut bua_bars = Vec::new();
    let mut plot_bars = Vec::new();
    for (i, agg) in state.aggregates().iter().enumerate() {
        let x = i as f64;
        // Types without any BUA have no displayable average; leave a gap.
        if let Some(bua) = agg.average_bua {
            bua_bars.push(
                Bar::new(x - 0.2, bua)
                    .width(0.4)
                    .name(format!("{}: {}", agg.property_type, format_number(Some(bua)))),
            );
        }
        plot_bars.push(
            Bar::new(x + 0.2, agg.average_plot)
                .width(0.4)
                .name(format!(
                    "{}: {}",
                    agg.property_type,
                    format_number(Some(agg.average_plot))
                )),
        );
    }

    static_plot("size_chart")
        .y_axis_label("sqft")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bua_bars)
                    .name("Avg. BUA")
                    .color(Color32::from_rgb(0x00, 0x88, 0xFE)),
            );
            plot_ui.bar_chart(
                BarChart::new(plot_bars)
                    .name("Avg. plot")
                    .color(Color32::from_rgb(0x00, 0xC4, 0x9F)),
            );
        });
}

/// BUA and plot size of every visible layout as horizontal bars, smallest
/// BUA at the bottom. Follows the active filters.
pub fn size_ranges_chart(ui: &mut Ui, state: &AppState) {
    let ranges = state.size_ranges();
    if ranges.is_empty() {
        ui.weak("No visible layouts with a BUA");
        return;
    }

    let mut bua_bars = Vec::with_capacity(ranges.len());
    let mut plot_bars = Vec::with_capacity(ranges.len());
    for (i, range) in ranges.iter().enumerate() {
        let y = i as f64;
        bua_bars.push(
            Bar::new(y + 0.2, range.bua)
                .width(0.4)
                .name(format!("{}: {}", range.label, format_number(Some(range.bua)))),
        );
        plot_bars.push(
            Bar::new(y - 0.2, range.plot)
                .width(0.4)
                .name(format!("{}: {}", range.label, format_number(Some(range.plot)))),
        );
    }

    let labels: Vec<String> = ranges.into_iter().map(|r| r.label).collect();
    let height = (labels.len() as f32 * 24.0).clamp(CHART_HEIGHT, 3.0 * CHART_HEIGHT);

    static_plot("size_ranges_chart")
        .height(height)
        .show_x(true)
        .show_y(false)
        .x_axis_label("sqft")
        .y_axis_formatter(move |mark: GridMark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bua_bars)
                    .horizontal()
                    .name("Built-up area (sqft)")
                    .color(Color32::from_rgb(0x00, 0x88, 0xFE)),
            );
            plot_ui.bar_chart(
                BarChart::new(plot_bars)
                    .horizontal()
                    .name("Plot size (sqft)")
                    .color(Color32::from_rgb(0x00, 0xC4, 0x9F)),
            );
        });
}

/// Average launch price per type, one coloured series per type.
pub fn price_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Avg. launch price by type");

    static_plot("price_chart")
        .y_axis_label("AED (millions)")
        .show(ui, |plot_ui| {
            for (i, agg) in state.aggregates().iter().enumerate() {
                let Some(price) = agg.average_price_millions else {
                    continue;
                };
                let bar = Bar::new(i as f64, price)
                    .width(0.6)
                    .name(format_millions(Some(price)));
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&agg.property_type)
                        .color(state.colors.color_for(&agg.property_type)),
                );
            }
        });
}

/// BUA against launch price, grouped by type.
pub fn bua_price_scatter(ui: &mut Ui, state: &AppState) {
    ui.strong("BUA vs. launch price");

    let points = state.correlation_points();

    Plot::new("bua_price_scatter")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("BUA (sqft)")
        .y_axis_label("AED (millions)")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for agg in state.aggregates() {
                let series: Vec<[f64; 2]> = points
                    .iter()
                    .filter(|p| p.property_type == agg.property_type)
                    .map(|p| [p.bua, p.price_millions])
                    .collect();
                if series.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(series))
                        .name(&agg.property_type)
                        .color(state.colors.color_for(&agg.property_type))
                        .radius(4.0),
                );
            }
        });
}
