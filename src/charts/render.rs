// src/charts/render.rs
use std::path::Path;
use plotters::prelude::*;
use crate::charts::series::{Accumulation, SeriesPoint};
use crate::met::models::format_sheet_date;
use crate::met::Variable;
use crate::utils::error::ChartError;

const CHART_SIZE: (u32, u32) = (1200, 600);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const BROWN: RGBColor = RGBColor(165, 42, 42);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

pub fn variable_color(variable: Variable) -> RGBColor {
    match variable {
        Variable::Tmax => DARK_GREEN,
        Variable::Tmin => PURPLE,
        Variable::Rainfall | Variable::HydroRainfall => BLUE,
    }
}

fn daily_title(variable: Variable) -> String {
    match variable {
        Variable::Rainfall => "Daily Average Rainfall All Over Sri Lanka, Past 30 Days".to_string(),
        other => format!("Daily Average {} Over the Past 30 Days", other.label()),
    }
}

/// Bar chart of a variable's daily island-wide average.
pub fn render_daily_average(points: &[SeriesPoint], variable: Variable, path: &Path) -> Result<(), ChartError> {
    let color = variable_color(variable);
    let labels: Vec<String> = points.iter().map(|p| format_sheet_date(p.date)).collect();
    let y_max = points.iter().map(|p| p.value).fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(daily_title(variable), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d((0..points.len()).into_segmented(), 0f64..y_top)
        .map_err(render_err)?;

    let label_at = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(points.len().max(1))
        .x_label_formatter(&label_at)
        .x_label_style(("sans-serif", 10))
        .x_desc("Date")
        .y_desc(format!("Average {} ({})", variable.label(), variable.unit()))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(points.iter().enumerate().map(|(i, p)| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), p.value)],
                color.filled(),
            );
            bar.set_margin(0, 0, 3, 3);
            bar
        }))
        .map_err(render_err)?
        .label(format!("Average {}", variable.label()))
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    tracing::debug!("Rendered {} bars to {}", points.len(), path.display());
    Ok(())
}

/// Cumulative rainfall line with the area above normal shaded green and
/// below normal shaded brown.
pub fn render_accumulated(acc: &Accumulation, path: &Path) -> Result<(), ChartError> {
    let labels: Vec<String> = acc.points.iter().map(|p| p.date.format("%d%b").to_string()).collect();
    let last_x = acc.points.len().saturating_sub(1) as f64;
    let y_max = acc.points.iter().map(|p| p.value).fold(acc.normal, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Observed Accumulated Rainfall (mm)", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..last_x + 0.5, 0f64..y_top)
        .map_err(render_err)?;

    let label_at = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 {
            labels.get(idx as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(acc.points.len().max(1))
        .x_label_formatter(&label_at)
        .x_label_style(("sans-serif", 10))
        .x_desc("Date")
        .y_desc("Cumulative Rainfall (mm)")
        .draw()
        .map_err(render_err)?;

    let regions = acc.fill_regions();
    chart
        .draw_series(regions.iter().filter(|(_, above)| *above).map(|(poly, _)| {
            Polygon::new(poly.clone(), DARK_GREEN.mix(0.5).filled())
        }))
        .map_err(render_err)?
        .label("Above Normal")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], DARK_GREEN.mix(0.5).filled()));
    chart
        .draw_series(regions.iter().filter(|(_, above)| !*above).map(|(poly, _)| {
            Polygon::new(poly.clone(), BROWN.mix(0.5).filled())
        }))
        .map_err(render_err)?
        .label("Below Normal")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BROWN.mix(0.5).filled()));

    chart
        .draw_series(LineSeries::new(
            acc.points.iter().enumerate().map(|(i, p)| (i as f64, p.value)),
            BLUE.stroke_width(2),
        ))
        .map_err(render_err)?
        .label("Cumulative Rainfall")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            vec![(0.0, acc.normal), (last_x, acc.normal)],
            BLACK.stroke_width(1),
        ))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    tracing::debug!("Rendered accumulated rainfall over {} days to {}", acc.points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn points() -> Vec<SeriesPoint> {
        (1..=5)
            .map(|d| SeriesPoint {
                date: NaiveDate::from_ymd_opt(2024, 10, d).unwrap(),
                value: d as f64 * 1.5,
            })
            .collect()
    }

    #[test]
    fn writes_daily_average_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.svg");
        render_daily_average(&points(), Variable::Tmin, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Daily Average Tmin Over the Past 30 Days"));
    }

    #[test]
    fn writes_accumulated_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acc.svg");
        let acc = Accumulation::from_daily(&points()).unwrap();
        render_accumulated(&acc, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Observed Accumulated Rainfall (mm)"));
        assert!(svg.contains("<polygon"));
    }
}
