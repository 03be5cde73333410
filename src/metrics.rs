use growth_common::{GrowthMetrics, GrowthSample};

/// Derives growth-curve metrics from a population history.
///
/// `max_rate` is the largest positive single-step increase of the log
/// population over consecutive samples; histories shorter than 2 samples, or
/// with no positive step, yield `{0, 0}`. The doubling time is
/// `ln(2) / max_rate` when growth was observed.
pub fn growth_metrics(history: &[GrowthSample]) -> GrowthMetrics {
    if history.len() < 2 {
        return GrowthMetrics {
            max_rate: 0.0,
            doubling_time: 0.0,
        };
    }

    let mut max_rate = 0.0f64;
    for pair in history.windows(2) {
        let rate = pair[1].log_population - pair[0].log_population;
        if rate > max_rate {
            max_rate = rate;
        }
    }

    let doubling_time = if max_rate > 0.0 {
        std::f64::consts::LN_2 / max_rate
    } else {
        0.0
    };

    GrowthMetrics {
        max_rate,
        doubling_time,
    }
}
