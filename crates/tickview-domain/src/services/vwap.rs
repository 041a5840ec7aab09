use crate::services::alignment::AlignedBarSeries;
use crate::value_objects::plot_time::PlotTime;
use serde::{Deserialize, Serialize};

/// Where the VWAP overlay line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VwapSource {
    None,
    /// The optional `vwap` column of the fine bar series.
    Bars,
    /// The VWAP reported inside each tick record.
    #[default]
    Ticks,
    /// Running volume-weighted typical price over the fine bar series.
    Computed,
}

/// VWAP values carried by the bars themselves; bars without one are skipped.
pub fn reported_bar_vwap(series: &AlignedBarSeries) -> Vec<(PlotTime, f64)> {
    series
        .bars
        .iter()
        .filter_map(|aligned| aligned.bar.vwap.map(|vwap| (aligned.plot_time, vwap)))
        .collect()
}

/// Session VWAP from bars: cumulative `typical_price * volume / volume`.
///
/// No point is emitted while cumulative volume is still zero.
pub fn cumulative_vwap(series: &AlignedBarSeries) -> Vec<(PlotTime, f64)> {
    let mut notional = 0.0;
    let mut volume = 0.0;
    let mut points = Vec::with_capacity(series.len());

    for aligned in &series.bars {
        let bar_volume = aligned.bar.volume as f64;
        notional += aligned.bar.typical_price() * bar_volume;
        volume += bar_volume;
        if volume > 0.0 {
            points.push((aligned.plot_time, notional / volume));
        }
    }

    points
}
