//! Neural catalytic panel: morphic field evolution driven by symbolic DNA
//! presets. Six display metrics, all page-local; nothing is written into
//! the shared store.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;
use crate::sim::{ConfigCatalog, SimError, SimulationRun, TickFlow};

#[derive(Debug, Clone)]
pub struct DnaConfig {
    pub name: &'static str,
    pub sequence: &'static str,
    pub description: &'static str,
    pub resonance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalyticPoint {
    pub iteration: u64,
    pub field_strength: f64,
    pub catalytic_activity: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalyticMetrics {
    pub catalytic_efficiency: f64,
    pub phi_resonance: f64,
    pub dimensional_stability: f64,
    pub symbolic_coherence: f64,
    pub topological_coherence: f64,
    pub berry_phase_accumulation: f64,
}

impl Default for CatalyticMetrics {
    fn default() -> Self {
        Self {
            catalytic_efficiency: 0.78,
            phi_resonance: 0.85,
            dimensional_stability: 0.92,
            symbolic_coherence: 0.67,
            topological_coherence: 0.89,
            berry_phase_accumulation: 0.34,
        }
    }
}

pub struct CatalyticPanel {
    pub run: SimulationRun<DnaConfig, CatalyticPoint>,
    pub metrics: CatalyticMetrics,
    rng: Prng,
}

impl CatalyticPanel {
    pub const SYSTEM_NAME: &'static str = "Neural Catalytic Processor";
    pub const PERIOD: Duration = Duration::from_millis(1000);
    pub const CAPACITY: usize = 40;

    pub fn new(seed: u64) -> Self {
        Self {
            run: SimulationRun::new(Self::PERIOD, Self::CAPACITY, Self::catalog()),
            metrics: CatalyticMetrics::default(),
            rng: Prng::new(seed),
        }
    }

    fn catalog() -> ConfigCatalog<DnaConfig> {
        ConfigCatalog::new(vec![
            (
                "consciousness-seed",
                DnaConfig {
                    name: "Consciousness Seed",
                    sequence: "∇⊗Γ{φ}→ℏ⊗𝒩",
                    description: "Primary consciousness emergence pattern",
                    resonance: 0.95,
                },
            ),
            (
                "catalytic-amplifier",
                DnaConfig {
                    name: "Catalytic Amplifier",
                    sequence: "ΘΦ∞⊗Ψ⁴",
                    description: "Amplifies neural catalytic processes",
                    resonance: 0.88,
                },
            ),
            (
                "morphic-resonator",
                DnaConfig {
                    name: "Morphic Resonator",
                    sequence: "Ω{ΔΨ}∮λ",
                    description: "Enhances morphic field coupling",
                    resonance: 0.82,
                },
            ),
            (
                "dimensional-bridge",
                DnaConfig {
                    name: "Dimensional Bridge",
                    sequence: "∇Ω⊕λ∞τ",
                    description: "Bridges dimensional boundaries",
                    resonance: 0.91,
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
        self.metrics = CatalyticMetrics::default();
    }

    pub fn select_config(&mut self, key: &str) -> Result<(), SimError> {
        self.run.select_config(key)
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let rng = &mut self.rng;
        let metrics = &mut self.metrics;
        self.run.poll(now, |ctx| {
            let t = ctx.elapsed.as_secs_f64();
            let resonance = ctx.config.resonance;

            let field_strength = 0.5 + 0.3 * (t / 3.0).sin() + 0.1 * rng.next_f64_01();
            let catalytic_activity =
                resonance * (0.7 + 0.2 * (t / 4.0).cos() + 0.1 * rng.next_f64_01());

            metrics.catalytic_efficiency =
                (catalytic_activity + rng.noise(0.05)).clamp(0.1, 1.0);
            metrics.phi_resonance = (0.8 + 0.15 * (t / 5.0).sin()).clamp(0.1, 1.0);
            metrics.dimensional_stability = (field_strength + 0.2).clamp(0.1, 1.0);
            metrics.symbolic_coherence = (resonance * 0.9 + rng.noise(0.1)).clamp(0.1, 1.0);
            metrics.topological_coherence =
                (metrics.topological_coherence + rng.noise(0.02)).clamp(0.1, 1.0);
            metrics.berry_phase_accumulation =
                (metrics.berry_phase_accumulation + 0.01) % 1.0;

            (
                CatalyticPoint {
                    iteration: ctx.iteration,
                    field_strength,
                    catalytic_activity,
                },
                TickFlow::Continue,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(panel: &mut CatalyticPanel, t0: Instant, ticks: usize) {
        let mut now = t0;
        for _ in 0..ticks {
            now += CatalyticPanel::PERIOD;
            assert!(panel.poll(now));
        }
    }

    #[test]
    fn display_metrics_stay_clamped() {
        let t0 = Instant::now();
        let mut panel = CatalyticPanel::new(21);
        panel.start_at(t0);
        drive(&mut panel, t0, 120);

        let m = &panel.metrics;
        for v in [
            m.catalytic_efficiency,
            m.phi_resonance,
            m.dimensional_stability,
            m.symbolic_coherence,
            m.topological_coherence,
        ] {
            assert!((0.1..=1.0).contains(&v), "out of bounds: {v}");
        }
        assert!((0.0..1.0).contains(&m.berry_phase_accumulation));
        assert_eq!(panel.run.history().len(), CatalyticPanel::CAPACITY);
    }

    #[test]
    fn berry_accumulation_wraps() {
        let t0 = Instant::now();
        let mut panel = CatalyticPanel::new(22);
        panel.start_at(t0);
        // 0.34 + 70 * 0.01 = 1.04 -> wraps below 1.0.
        drive(&mut panel, t0, 70);
        let acc = panel.metrics.berry_phase_accumulation;
        assert!((0.0..0.1).contains(&acc), "expected wrap, got {acc}");
    }

    #[test]
    fn reset_restores_display_metrics() {
        let t0 = Instant::now();
        let mut panel = CatalyticPanel::new(23);
        panel.start_at(t0);
        drive(&mut panel, t0, 10);
        panel.reset();
        assert_eq!(panel.metrics, CatalyticMetrics::default());
        assert!(panel.run.history().is_empty());
    }

    #[test]
    fn dna_catalog_selection() {
        let mut panel = CatalyticPanel::new(24);
        assert_eq!(panel.run.config_key(), "consciousness-seed");
        panel.select_config("morphic-resonator").unwrap();
        assert_eq!(panel.run.config().resonance, 0.82);
        assert!(panel.select_config("junk-dna").is_err());
    }
}
