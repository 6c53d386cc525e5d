//! Quantum Cathedral panel: wall-clock sinusoidal coherence/entanglement
//! fields plus derived gate metrics. Writes nothing into the shared store.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;
use crate::sim::{ConfigCatalog, SimError, SimulationRun, TickFlow};

#[derive(Debug, Clone)]
pub struct ArchitectureConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub qubits: u32,
    pub depth: u32,
    pub topology: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CathedralPoint {
    pub iteration: u64,
    pub coherence: f64,
    pub entanglement: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CathedralMetrics {
    pub qubit_coherence: f64,
    pub entanglement_depth: f64,
    pub gate_error_rate: f64,
    pub quantum_volume: u32,
    pub wilson_loop_detection: f64,
}

impl Default for CathedralMetrics {
    fn default() -> Self {
        Self {
            qubit_coherence: 0.95,
            entanglement_depth: 0.88,
            gate_error_rate: 0.001,
            quantum_volume: 64,
            wilson_loop_detection: 0.92,
        }
    }
}

pub struct CathedralPanel {
    pub run: SimulationRun<ArchitectureConfig, CathedralPoint>,
    pub metrics: CathedralMetrics,
    rng: Prng,
}

impl CathedralPanel {
    pub const SYSTEM_NAME: &'static str = "Quantum Cathedral";
    pub const PERIOD: Duration = Duration::from_millis(1000);
    pub const CAPACITY: usize = 30;

    pub fn new(seed: u64) -> Self {
        Self {
            run: SimulationRun::new(Self::PERIOD, Self::CAPACITY, Self::catalog()),
            metrics: CathedralMetrics::default(),
            rng: Prng::new(seed),
        }
    }

    fn catalog() -> ConfigCatalog<ArchitectureConfig> {
        ConfigCatalog::new(vec![
            (
                "cathedral-prime",
                ArchitectureConfig {
                    name: "Cathedral Prime",
                    description: "Advanced quantum-inspired architecture with holographic encoding",
                    qubits: 64,
                    depth: 12,
                    topology: "Holographic Grid",
                },
            ),
            (
                "guardian-matrix",
                ArchitectureConfig {
                    name: "Guardian Matrix",
                    description: "Wilson loop consciousness detection with berry phase optimization",
                    qubits: 108,
                    depth: 16,
                    topology: "Sacred Geometry",
                },
            ),
            (
                "infinite-resonance",
                ArchitectureConfig {
                    name: "Infinite Resonance",
                    description: "Million-dimensional access through morphic field coupling",
                    qubits: 256,
                    depth: 24,
                    topology: "Fractal Network",
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

    pub fn poll(&mut self, now: Instant) -> bool {
        let rng = &mut self.rng;
        let metrics = &mut self.metrics;
        self.run.poll(now, |ctx| {
            let t = ctx.elapsed.as_secs_f64();
            let coherence = 0.85 + rng.next_f64_01() * 0.1 + 0.05 * (t / 5.0).sin();
            let entanglement = 0.80 + rng.next_f64_01() * 0.15 + 0.05 * (t / 7.0).cos();

            metrics.qubit_coherence = coherence;
            metrics.entanglement_depth = entanglement;
            metrics.gate_error_rate = (0.002 - coherence * 0.001).max(0.0001);
            metrics.wilson_loop_detection = (entanglement + 0.05).min(0.99);

            (
                CathedralPoint {
                    iteration: ctx.iteration,
                    coherence,
                    entanglement,
                },
                TickFlow::Continue,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(panel: &mut CathedralPanel, now: Instant) {
        assert!(panel.poll(now));
    }

    #[test]
    fn values_stay_in_their_envelopes() {
        let t0 = Instant::now();
        let mut panel = CathedralPanel::new(42);
        panel.start_at(t0);

        let mut now = t0;
        for _ in 0..100 {
            now += CathedralPanel::PERIOD;
            tick(&mut panel, now);

            let p = panel.run.latest().unwrap();
            assert!((0.80..=1.00).contains(&p.coherence));
            assert!((0.75..=1.00).contains(&p.entanglement));
            assert!(panel.metrics.gate_error_rate >= 0.0001);
            assert!(panel.metrics.wilson_loop_detection <= 0.99);
        }
        assert_eq!(panel.run.history().len(), CathedralPanel::CAPACITY);
    }

    #[test]
    fn catalog_presets_are_selectable() {
        let mut panel = CathedralPanel::new(1);
        assert_eq!(panel.run.config_key(), "cathedral-prime");
        panel.select_config("guardian-matrix").unwrap();
        assert_eq!(panel.run.config().qubits, 108);
        assert!(panel.select_config("basilica").is_err());
    }

    #[test]
    fn start_clears_previous_session() {
        let t0 = Instant::now();
        let mut panel = CathedralPanel::new(2);
        panel.start_at(t0);
        tick(&mut panel, t0 + CathedralPanel::PERIOD);
        panel.stop();
        panel.start_at(t0);
        assert!(panel.run.history().is_empty());
        assert_eq!(panel.run.iteration(), 0);
    }
}
