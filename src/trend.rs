//! Daily revenue / reach series for the executive view.
//!
//! The revenue values are demo backfill: total revenue is spread flat over
//! the window and jittered so the chart has texture. Nothing here is a
//! forecast. A deployment with real order history should feed that history
//! into [`PeriodMetric`]s directly and skip this module.

use crate::config::TrendSettings;
use crate::error::Result;
use crate::schema::{ContentRecord, PeriodMetric, ReachOrigin, TrendWindow};
use crate::utils::{days_before, period_label, window_dates};
use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::collections::BTreeMap;

pub struct TrendSynthesizer {
    settings: TrendSettings,
    jitter: Uniform<f64>,
    synthetic_reach: Uniform<u64>,
}

impl TrendSynthesizer {
    pub fn new(settings: TrendSettings) -> Result<Self> {
        settings.validate()?;

        let jitter = Uniform::new_inclusive(settings.jitter.min, settings.jitter.max);
        let synthetic_reach =
            Uniform::new(settings.synthetic_reach_min, settings.synthetic_reach_max);

        Ok(Self {
            settings,
            jitter,
            synthetic_reach,
        })
    }

    pub fn settings(&self) -> &TrendSettings {
        &self.settings
    }

    /// Builds `window.periods()` daily points ending at `end`, oldest first.
    ///
    /// Reach comes from the play counts of content published on that day
    /// when there is any; otherwise it is drawn from the synthetic reach
    /// range. Event days boost both revenue and synthesized reach.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        window: TrendWindow,
        end: NaiveDate,
        total_revenue: f64,
        content: &[ContentRecord],
        rng: &mut R,
    ) -> Vec<PeriodMetric> {
        let periods = window.periods();
        let baseline = if periods > 0 {
            total_revenue / periods as f64
        } else {
            0.0
        };
        let observed = plays_by_date(content);

        let series: Vec<PeriodMetric> = window_dates(end, periods)
            .into_iter()
            .map(|date| {
                let event = usize::try_from(days_before(date, end))
                    .ok()
                    .and_then(|back| self.settings.event_at(back));
                let boost = event.map_or(1.0, |e| e.boost);

                let revenue = (baseline * self.jitter.sample(rng) * boost).floor();

                let (reach, reach_origin) = match observed.get(&date) {
                    Some(&plays) => (plays, ReachOrigin::Observed),
                    None => {
                        let drawn = self.synthetic_reach.sample(rng) as f64 * boost;
                        (drawn.floor() as u64, ReachOrigin::Synthesized)
                    }
                };

                PeriodMetric {
                    date,
                    label: period_label(date),
                    revenue,
                    reach,
                    reach_origin,
                    event: event.map(|e| e.label.clone()),
                }
            })
            .collect();

        debug!(
            "Synthesized {:?} trend ending {}: {} periods, {} with observed reach",
            window,
            end,
            series.len(),
            series
                .iter()
                .filter(|p| p.reach_origin == ReachOrigin::Observed)
                .count()
        );

        series
    }
}

/// Play counts summed per publish date; undated content is skipped.
fn plays_by_date(content: &[ContentRecord]) -> BTreeMap<NaiveDate, u64> {
    let mut plays = BTreeMap::new();
    for record in content {
        if let Some(date) = record.published_date() {
            let total: &mut u64 = plays.entry(date).or_insert(0);
            *total = total.saturating_add(record.plays);
        }
    }
    plays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Band, TrendEvent};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(plays: u64, published: &str) -> ContentRecord {
        ContentRecord {
            id: 1,
            caption_preview: String::new(),
            caption: String::new(),
            tags: vec![],
            likes: 0,
            shares: 0,
            plays,
            comments: 0,
            published: published.to_string(),
        }
    }

    fn synthesizer() -> TrendSynthesizer {
        TrendSynthesizer::new(TrendSettings::default()).unwrap()
    }

    #[test]
    fn test_window_lengths_and_order() {
        let end = date(2025, 7, 20);
        let mut rng = StdRng::seed_from_u64(7);

        for (window, len) in [
            (TrendWindow::Week, 7),
            (TrendWindow::Month, 30),
            (TrendWindow::Quarter, 90),
        ] {
            let series = synthesizer().synthesize(window, end, 1_000_000.0, &[], &mut rng);
            assert_eq!(series.len(), len);
            assert_eq!(series.last().unwrap().date, end);
            assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn test_revenue_within_jitter_bounds() {
        let end = date(2025, 7, 20);
        let total = 3_000_000.0;
        let baseline = total / 30.0;
        let mut rng = StdRng::seed_from_u64(42);
        let series = synthesizer().synthesize(TrendWindow::Month, end, total, &[], &mut rng);

        for point in &series {
            let boost = if point.event.is_some() { 1.8 } else { 1.0 };
            assert!(point.revenue >= (baseline * 0.7).floor() - 1.0);
            assert!(point.revenue <= baseline * 1.3 * boost);
            assert_eq!(point.revenue, point.revenue.floor());
        }
    }

    #[test]
    fn test_events_flagged_at_fixed_offsets() {
        let end = date(2025, 7, 20);
        let series = synthesizer().synthesize(
            TrendWindow::Month,
            end,
            1_000_000.0,
            &[],
            &mut StdRng::seed_from_u64(1),
        );

        let flagged: Vec<(NaiveDate, &str)> = series
            .iter()
            .filter_map(|p| p.event.as_deref().map(|e| (p.date, e)))
            .collect();
        assert_eq!(
            flagged,
            vec![
                (date(2025, 6, 25), "Flash Sale"),
                (date(2025, 7, 8), "Viral UGC"),
                (date(2025, 7, 15), "Payday Sale"),
            ]
        );
    }

    #[test]
    fn test_week_window_only_sees_first_event() {
        let series = synthesizer().synthesize(
            TrendWindow::Week,
            date(2025, 7, 20),
            700.0,
            &[],
            &mut StdRng::seed_from_u64(3),
        );
        let events: Vec<&str> = series.iter().filter_map(|p| p.event.as_deref()).collect();
        assert_eq!(events, vec!["Payday Sale"]);
    }

    #[test]
    fn test_pinned_rng_hits_band_minimum() {
        let end = date(2025, 7, 20);
        let total = 70_000.0;
        let mut rng = StepRng::new(0, 0);
        let series = synthesizer().synthesize(TrendWindow::Week, end, total, &[], &mut rng);

        let plain = &series[6];
        assert!(plain.event.is_none());
        assert!((plain.revenue - 7_000.0).abs() <= 1.0);
        assert_eq!(plain.reach, 10_000);
        assert_eq!(plain.reach_origin, ReachOrigin::Synthesized);

        let payday = &series[1];
        assert_eq!(payday.event.as_deref(), Some("Payday Sale"));
        assert!((payday.revenue - 12_600.0).abs() <= 1.0);
        assert_eq!(payday.reach, 18_000);
    }

    #[test]
    fn test_observed_reach_wins_over_backfill() {
        let end = date(2025, 7, 20);
        let content = vec![
            post(1_200_000, "2025-07-15"),
            post(300, "2025-07-15T09:30:00Z"),
            post(50, "2025-07-19"),
            post(999, "garbage"),
            post(777, "2025-01-01"),
        ];
        let series = synthesizer().synthesize(
            TrendWindow::Week,
            end,
            0.0,
            &content,
            &mut StdRng::seed_from_u64(9),
        );

        let payday = series.iter().find(|p| p.date == date(2025, 7, 15)).unwrap();
        assert_eq!(payday.reach, 1_200_300);
        assert_eq!(payday.reach_origin, ReachOrigin::Observed);

        let quiet = series.iter().find(|p| p.date == date(2025, 7, 19)).unwrap();
        assert_eq!(quiet.reach, 50);

        let observed = series
            .iter()
            .filter(|p| p.reach_origin == ReachOrigin::Observed)
            .count();
        assert_eq!(observed, 2);

        for point in series.iter().filter(|p| p.reach_origin == ReachOrigin::Synthesized) {
            let ceiling = if point.event.is_some() { 60_000.0 * 1.8 } else { 60_000.0 };
            assert!(point.reach >= 10_000);
            assert!((point.reach as f64) < ceiling);
        }
    }

    #[test]
    fn test_zero_revenue_gives_zero_series() {
        let series = synthesizer().synthesize(
            TrendWindow::Month,
            date(2025, 7, 20),
            0.0,
            &[],
            &mut StdRng::seed_from_u64(5),
        );
        assert!(series.iter().all(|p| p.revenue == 0.0));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let end = date(2025, 7, 20);
        let a = synthesizer().synthesize(TrendWindow::Month, end, 5e6, &[], &mut StdRng::seed_from_u64(11));
        let b = synthesizer().synthesize(TrendWindow::Month, end, 5e6, &[], &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_settings() {
        let settings = TrendSettings {
            jitter: Band::new(1.0, 1.0),
            events: vec![TrendEvent::new(0, "Launch", 2.0)],
            synthetic_reach_min: 5,
            synthetic_reach_max: 6,
        };
        let series = TrendSynthesizer::new(settings)
            .unwrap()
            .synthesize(TrendWindow::Week, date(2025, 7, 20), 700.0, &[], &mut StdRng::seed_from_u64(2));

        assert_eq!(series[0].revenue, 100.0);
        assert_eq!(series[0].reach, 5);
        assert_eq!(series[6].revenue, 200.0);
        assert_eq!(series[6].reach, 10);
        assert_eq!(series[6].event.as_deref(), Some("Launch"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = TrendSettings {
            jitter: Band::new(1.3, 0.7),
            ..TrendSettings::default()
        };
        assert!(TrendSynthesizer::new(settings).is_err());
    }
}
