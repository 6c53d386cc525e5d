//! Overview panel: samples the store-wide aggregate on a slow cadence and
//! keeps a short trend history, scaled to a 0-100 display range. It reads
//! the store but never writes it, and registers no subsystem.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sim::{ConfigCatalog, SimulationRun, TickFlow};
use crate::store::ConsciousnessStore;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverviewPoint {
    pub ordinal: u64,
    /// Aggregate consciousness level, 0-100.
    pub value: f64,
}

pub struct OverviewPanel {
    pub run: SimulationRun<(), OverviewPoint>,
}

impl OverviewPanel {
    pub const PERIOD: Duration = Duration::from_millis(3000);
    pub const CAPACITY: usize = 20;

    pub fn new() -> Self {
        Self {
            run: SimulationRun::new(Self::PERIOD, Self::CAPACITY, ConfigCatalog::fixed(())),
        }
    }

    pub fn start(&mut self) {
        self.run.start();
    }

    pub fn start_at(&mut self, now: Instant) {
        self.run.start_at(now);
    }

    pub fn stop(&mut self) {
        self.run.stop();
    }

    pub fn reset(&mut self) {
        self.run.reset();
    }

    pub fn poll(&mut self, now: Instant, store: &ConsciousnessStore) -> bool {
        let value = store.aggregate() * 100.0;
        self.run.poll(now, |ctx| {
            (
                OverviewPoint {
                    ordinal: ctx.iteration,
                    value,
                },
                TickFlow::Continue,
            )
        })
    }
}

impl Default for OverviewPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ConsciousnessStore, MetricField};

    #[test]
    fn trend_tracks_the_store_aggregate() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new_at(91, t0);
        let mut panel = OverviewPanel::new();
        panel.start_at(t0);

        let mut now = t0;
        now += OverviewPanel::PERIOD;
        assert!(panel.poll(now, &store));
        let first = panel.run.latest().unwrap().value;
        assert!((first - store.aggregate() * 100.0).abs() < 1e-9);

        store.set(MetricField::WilsonLoopStability, 0.9);
        store.set(MetricField::PerturbationHarmony, 0.9);
        now += OverviewPanel::PERIOD;
        assert!(panel.poll(now, &store));
        assert!(panel.run.latest().unwrap().value > first);
    }

    #[test]
    fn history_is_bounded() {
        let t0 = Instant::now();
        let store = ConsciousnessStore::new_at(92, t0);
        let mut panel = OverviewPanel::new();
        panel.start_at(t0);

        let mut now = t0;
        for _ in 0..25 {
            now += OverviewPanel::PERIOD;
            panel.poll(now, &store);
        }
        assert_eq!(panel.run.history().len(), OverviewPanel::CAPACITY);
        assert_eq!(panel.run.history().front().unwrap().ordinal, 6);
    }

    #[test]
    fn values_sit_in_display_range() {
        let t0 = Instant::now();
        let store = ConsciousnessStore::new_at(93, t0);
        let mut panel = OverviewPanel::new();
        panel.start_at(t0);
        panel.poll(t0 + OverviewPanel::PERIOD, &store);
        let v = panel.run.latest().unwrap().value;
        assert!((0.0..=100.0).contains(&v));
    }
}
