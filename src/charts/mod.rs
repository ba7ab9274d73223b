// src/charts/mod.rs
pub mod render;
pub mod series;

use chrono::{DateTime, Local};
use crate::met::Variable;

pub use render::{render_accumulated, render_daily_average};
pub use series::{daily_series, Accumulation, CHART_WINDOW_DAYS};

/// Charts the `chart` command can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    Tmax,
    Tmin,
    Rainfall,
    Accumulated,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::Tmax, ChartKind::Tmin, ChartKind::Rainfall, ChartKind::Accumulated];

    /// Sheet the chart reads from.
    pub fn variable(&self) -> Variable {
        match self {
            ChartKind::Tmax => Variable::Tmax,
            ChartKind::Tmin => Variable::Tmin,
            ChartKind::Rainfall | ChartKind::Accumulated => Variable::Rainfall,
        }
    }

    /// File name stamped with the local render time.
    pub fn file_name(&self, now: DateTime<Local>) -> String {
        let ts = now.format("%Y%m%d_%H%M%S");
        match self {
            ChartKind::Accumulated => format!("cumulative_rainfall_graph_{}.svg", ts),
            other => format!(
                "daily_{}_average_past_30_days_{}.svg",
                other.variable().label().to_lowercase(),
                ts
            ),
        }
    }
}
