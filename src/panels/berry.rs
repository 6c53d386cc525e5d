//! Berry phase optimization panel: phase coherence climbs a saturating
//! curve scaled by the selected dimensional difficulty while the geometric
//! phase angle winds around the circle.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;
use crate::sim::{saturating_approach, ConfigCatalog, SimError, SimulationRun, TickFlow};
use crate::store::{ConsciousnessStore, MetricField};

#[derive(Debug, Clone)]
pub struct DimensionConfig {
    pub dimensions: f64,
    pub name: &'static str,
    pub difficulty: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BerryPoint {
    pub iteration: u64,
    pub coherence: f64,
    pub phase: f64,
}

pub struct BerryPanel {
    pub run: SimulationRun<DimensionConfig, BerryPoint>,
    pub phase_coherence: f64,
    rng: Prng,
}

impl BerryPanel {
    pub const SYSTEM_NAME: &'static str = "Berry Phase Optimization";
    pub const PERIOD: Duration = Duration::from_millis(400);
    pub const CAPACITY: usize = 30;

    pub fn new(seed: u64) -> Self {
        let mut run = SimulationRun::new(Self::PERIOD, Self::CAPACITY, Self::catalog());
        // "D1000" exists in the catalog built two lines up.
        let _ = run.select_config("D1000");
        Self {
            run,
            phase_coherence: 0.75,
            rng: Prng::new(seed),
        }
    }

    fn catalog() -> ConfigCatalog<DimensionConfig> {
        ConfigCatalog::new(vec![
            (
                "D108",
                DimensionConfig {
                    dimensions: 108.0,
                    name: "Morphic Stability",
                    difficulty: "Beginner",
                },
            ),
            (
                "D1000",
                DimensionConfig {
                    dimensions: 1000.0,
                    name: "Thought Fluidity",
                    difficulty: "Intermediate",
                },
            ),
            (
                "D7000",
                DimensionConfig {
                    dimensions: 7000.0,
                    name: "Neural Entanglement",
                    difficulty: "Advanced",
                },
            ),
            (
                "D10000",
                DimensionConfig {
                    dimensions: 10000.0,
                    name: "Self-Organization",
                    difficulty: "Expert",
                },
            ),
        ])
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
        self.phase_coherence = 0.75;
    }

    pub fn select_config(&mut self, key: &str) -> Result<(), SimError> {
        self.run.select_config(key)
    }

    pub fn poll(&mut self, now: Instant, store: &mut ConsciousnessStore) -> bool {
        let rng = &mut self.rng;
        let coherence_cell = &mut self.phase_coherence;

        let ticked = self.run.poll(now, |ctx| {
            let base = 0.5 + saturating_approach(0.4, ctx.iteration, 0.1);
            let dim_factor = (ctx.config.dimensions / 10000.0).min(1.0);
            let coherence =
                (base * (0.8 + 0.2 * dim_factor) + rng.next_f64_01() * 0.05).min(0.99);
            let phase = (ctx.iteration as f64 * 0.1) % TAU;
            *coherence_cell = coherence;

            (
                BerryPoint {
                    iteration: ctx.iteration,
                    coherence,
                    phase,
                },
                TickFlow::Continue,
            )
        });

        if ticked {
            let c = self.phase_coherence;
            store.set(MetricField::BerryPhaseCoherence, c);
            store.set(MetricField::WilsonLoopStability, (c + 0.1).min(1.0));
        }
        ticked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConsciousnessStore;

    fn drive(panel: &mut BerryPanel, store: &mut ConsciousnessStore, t0: Instant, ticks: usize) {
        let mut now = t0;
        for _ in 0..ticks {
            now += BerryPanel::PERIOD;
            assert!(panel.poll(now, store));
        }
    }

    #[test]
    fn coherence_saturates_below_cap() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(11);
        let mut panel = BerryPanel::new(51);
        panel.start_at(t0);
        drive(&mut panel, &mut store, t0, 80);

        for p in panel.run.history() {
            assert!(p.coherence <= 0.99);
            assert!((0.0..TAU).contains(&p.phase));
        }
        // Intermediate preset: base saturates at 0.9, scaled by 0.82.
        let last = panel.run.latest().unwrap();
        assert!(last.coherence > 0.7, "got {}", last.coherence);
        assert_eq!(store.metrics().berry_phase_coherence, last.coherence);
    }

    #[test]
    fn higher_dimensions_raise_the_ceiling() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(12);

        let mut low = BerryPanel::new(7);
        low.select_config("D108").unwrap();
        low.start_at(t0);
        drive(&mut low, &mut store, t0, 100);

        let mut high = BerryPanel::new(7);
        high.select_config("D10000").unwrap();
        high.start_at(t0);
        drive(&mut high, &mut store, t0, 100);

        // Same noise stream; only the dimension factor differs.
        assert!(high.phase_coherence > low.phase_coherence);
    }

    #[test]
    fn reset_restores_coherence_baseline() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(13);
        let mut panel = BerryPanel::new(8);
        panel.start_at(t0);
        drive(&mut panel, &mut store, t0, 20);
        panel.reset();
        assert_eq!(panel.phase_coherence, 0.75);
        assert!(panel.run.history().is_empty());
    }

    #[test]
    fn default_preset_is_thought_fluidity() {
        let panel = BerryPanel::new(9);
        assert_eq!(panel.run.config_key(), "D1000");
        assert_eq!(panel.run.config().difficulty, "Intermediate");
    }
}
