use crate::aggregation::{clamp_total, total_revenue, total_units_sold};
use crate::config::Band;
use crate::error::Result;
use crate::schema::{ComparativeSummary, ListingRecord, MetricDelta};
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Average order value, 0 when there are no orders or the ratio is not finite.
pub fn average_order_value(revenue: f64, orders: f64) -> f64 {
    if orders > 0.0 {
        Some(revenue / orders)
            .filter(|aov| aov.is_finite())
            .unwrap_or(0.0)
    } else {
        0.0
    }
}

fn delta(current: f64, variance: f64) -> MetricDelta {
    MetricDelta {
        current,
        previous: clamp_total(current * variance),
        delta_pct: (1.0 - variance) * 100.0,
    }
}

/// Current-vs-previous revenue, orders and average order value.
///
/// There is no stored history yet, so the previous period is the current one
/// scaled by a single multiplier drawn from `variance`. Callers should rely
/// on the shape of the result and the zero-order guard only.
pub fn build_comparative_summary<R: Rng + ?Sized>(
    listings: &[ListingRecord],
    variance: &Band,
    rng: &mut R,
) -> Result<ComparativeSummary> {
    variance.validate("summary variance")?;

    let revenue = total_revenue(listings);
    let orders = total_units_sold(listings);
    let aov = average_order_value(revenue, orders);

    let factor = Uniform::new_inclusive(variance.min, variance.max).sample(rng);
    debug!(
        "Comparative summary over {} listings with previous-period factor {:.3}",
        listings.len(),
        factor
    );

    Ok(ComparativeSummary {
        revenue: delta(revenue, factor),
        orders: delta(orders, factor),
        average_order_value: delta(aov, factor),
    })
}
