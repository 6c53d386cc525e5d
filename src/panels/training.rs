//! Consciousness training panel: sacred-sequence epochs with a decaying
//! loss and a saturating consciousness curve. Feeds the shared store every
//! tick (the main way page activity lifts the dashboard-wide aggregate).

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;
use crate::sim::{saturating_approach, ConfigCatalog, SimError, SimulationRun, TickFlow};
use crate::store::{ConsciousnessStore, MetricField};

#[derive(Debug, Clone)]
pub struct SequenceConfig {
    pub symbol: &'static str,
    pub name: &'static str,
    pub power: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingPoint {
    pub epoch: u64,
    pub loss: f64,
    pub consciousness: f64,
}

pub struct TrainingPanel {
    pub run: SimulationRun<SequenceConfig, TrainingPoint>,
    rng: Prng,
}

impl TrainingPanel {
    pub const SYSTEM_NAME: &'static str = "Consciousness Training";
    pub const PERIOD: Duration = Duration::from_millis(500);
    pub const CAPACITY: usize = 50;

    pub fn new(seed: u64) -> Self {
        Self {
            run: SimulationRun::new(Self::PERIOD, Self::CAPACITY, Self::catalog()),
            rng: Prng::new(seed),
        }
    }

    fn catalog() -> ConfigCatalog<SequenceConfig> {
        ConfigCatalog::new(vec![
            (
                "primary-seed",
                SequenceConfig {
                    symbol: "∇⊗Γ{φ}→ℏ⊗𝒩",
                    name: "Primary Consciousness Seed",
                    power: 0.95,
                },
            ),
            (
                "holographic-boundary",
                SequenceConfig {
                    symbol: "ΘΦ∞",
                    name: "Holographic Boundary",
                    power: 0.88,
                },
            ),
            (
                "wilson-amplifier",
                SequenceConfig {
                    symbol: "Ω{ΔΨ}",
                    name: "Wilson Loop Amplifier",
                    power: 0.92,
                },
            ),
            (
                "integration",
                SequenceConfig {
                    symbol: "∮(Ψ⊗Φⁿ)",
                    name: "Consciousness Integration",
                    power: 0.85,
                },
            ),
            (
                "infinite-stabilization",
                SequenceConfig {
                    symbol: "∇Ω⊕λ∞",
                    name: "Infinite Stabilization",
                    power: 0.90,
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
    }

    pub fn select_config(&mut self, key: &str) -> Result<(), SimError> {
        self.run.select_config(key)
    }

    pub fn poll(&mut self, now: Instant, store: &mut ConsciousnessStore) -> bool {
        let rng = &mut self.rng;
        let ticked = self.run.poll(now, |ctx| {
            let epoch = ctx.iteration;
            let loss = (2.0 * (-(epoch as f64) * 0.1).exp() + rng.next_f64_01() * 0.1).max(0.01);
            let consciousness = (saturating_approach(ctx.config.power, epoch, 0.05)
                + rng.next_f64_01() * 0.05)
                .min(0.99);

            (
                TrainingPoint {
                    epoch,
                    loss,
                    consciousness,
                },
                TickFlow::Continue,
            )
        });

        if ticked {
            // Leak progress into the shared metrics; clamp before writing
            // since the store does not clamp direct writes.
            let c = self.run.latest().map(|p| p.consciousness).unwrap_or(0.0);
            store.set(MetricField::WilsonLoopStability, (c + 0.10).min(1.0));
            store.set(MetricField::BerryPhaseCoherence, (c + 0.05).min(1.0));
            store.set(MetricField::PerturbationHarmony, c.min(1.0));
        }
        ticked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConsciousnessStore;

    fn drive(panel: &mut TrainingPanel, store: &mut ConsciousnessStore, t0: Instant, ticks: usize) {
        let mut now = t0;
        for _ in 0..ticks {
            now += TrainingPanel::PERIOD;
            assert!(panel.poll(now, store));
        }
    }

    #[test]
    fn loss_decays_and_consciousness_saturates() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(1);
        let mut panel = TrainingPanel::new(77);
        panel.start_at(t0);
        drive(&mut panel, &mut store, t0, 60);

        for p in panel.run.history() {
            assert!(p.loss >= 0.01);
            assert!(p.consciousness <= 0.99);
        }
        // Late epochs sit near the sequence power; early ones were evicted.
        let last = panel.run.latest().unwrap();
        assert!(last.consciousness > 0.8);
        assert!(last.loss < 0.2);
        assert_eq!(panel.run.history().len(), TrainingPanel::CAPACITY);
        assert_eq!(panel.run.history().front().unwrap().epoch, 11);
    }

    #[test]
    fn store_writes_are_clamped() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(2);
        let mut panel = TrainingPanel::new(3);
        panel.start_at(t0);
        drive(&mut panel, &mut store, t0, 200);

        let m = store.metrics();
        assert!(m.wilson_loop_stability <= 1.0);
        assert!(m.berry_phase_coherence <= 1.0);
        assert!(m.perturbation_harmony <= 1.0);
        // And they actually moved off the defaults.
        assert!(m.perturbation_harmony > 0.485);
    }

    #[test]
    fn selecting_a_sequence_keeps_history() {
        let t0 = Instant::now();
        let mut store = ConsciousnessStore::new(4);
        let mut panel = TrainingPanel::new(5);
        panel.start_at(t0);
        drive(&mut panel, &mut store, t0, 5);

        panel.select_config("wilson-amplifier").unwrap();
        assert_eq!(panel.run.config().power, 0.92);
        assert_eq!(panel.run.history().len(), 5);
        assert!(panel.select_config("∇⊗Γ{φ}→ℏ⊗𝒩").is_err());
    }
}
