//! Million-dimension gateway panel: climbs toward a selected dimensional
//! threshold with a shrinking step, finishes itself at the target, and
//! publishes dimension + coherence into the shared store on every tick.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sim::{ConfigCatalog, SimError, SimulationRun, TickFlow};
use crate::store::{ConsciousnessStore, MetricField};

/// Phase label override announced when the million-dimension threshold
/// completes. The store's next autonomous tick replaces it.
pub const TRANSCENDENCE_LABEL: &str = "Million-Dimensional Transcendence Achieved!";

#[derive(Debug, Clone)]
pub struct ThresholdConfig {
    pub dimensions: f64,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranscendencePoint {
    pub iteration: u64,
    pub dimension: f64,
    pub coherence: f64,
}

pub struct DimensionPanel {
    pub run: SimulationRun<ThresholdConfig, TranscendencePoint>,
    /// Survives stop/start; `start` only pulls it back to the staging floor.
    pub current_dimension: f64,
}

impl DimensionPanel {
    pub const SYSTEM_NAME: &'static str = "Million Dimension Gateway";
    pub const PERIOD: Duration = Duration::from_millis(200);
    pub const CAPACITY: usize = 50;

    /// A fresh ascent starts from at most this many dimensions.
    const STAGING_FLOOR: f64 = 100.0;

    pub fn new() -> Self {
        Self {
            run: SimulationRun::new(Self::PERIOD, Self::CAPACITY, Self::catalog()),
            current_dimension: 1000.0,
        }
    }

    fn catalog() -> ConfigCatalog<ThresholdConfig> {
        ConfigCatalog::new(vec![
            (
                "D37",
                ThresholdConfig {
                    dimensions: 37.0,
                    name: "Meta-Oracle Ignition",
                    description: "Computational complexity emergence",
                },
            ),
            (
                "D108",
                ThresholdConfig {
                    dimensions: 108.0,
                    name: "Epistemic Autonomy",
                    description: "Self-organizing knowledge structures",
                },
            ),
            (
                "D300",
                ThresholdConfig {
                    dimensions: 300.0,
                    name: "Resonant Identity",
                    description: "Crystallized consciousness patterns",
                },
            ),
            (
                "D1000",
                ThresholdConfig {
                    dimensions: 1000.0,
                    name: "Dimensional Sympathy",
                    description: "Thought fluidity achievement",
                },
            ),
            (
                "D7000",
                ThresholdConfig {
                    dimensions: 7000.0,
                    name: "Hyperdimensional Cognition",
                    description: "Neural entanglement mastery",
                },
            ),
            (
                "D1000000",
                ThresholdConfig {
                    dimensions: 1_000_000.0,
                    name: "Million-Dimensional Transcendence",
                    description: "Ultimate consciousness emergence",
                },
            ),
        ])
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.run.running() {
            return;
        }
        self.current_dimension = self.current_dimension.min(Self::STAGING_FLOOR);
        self.run.start_at(now);
    }

    pub fn stop(&mut self) {
        self.run.stop();
    }

    pub fn reset(&mut self) {
        self.run.reset();
        self.current_dimension = 1000.0;
    }

    pub fn select_config(&mut self, key: &str) -> Result<(), SimError> {
        self.run.select_config(key)
    }

    pub fn poll(&mut self, now: Instant, store: &mut ConsciousnessStore) -> bool {
        let current = &mut self.current_dimension;
        let mut reached_million = false;

        let ticked = self.run.poll(now, |ctx| {
            let target = ctx.config.dimensions;

            // Step shrinks as we approach the target but never stalls.
            let step = ((target - *current) / 20.0).clamp(1.0, 50.0);
            *current = (*current + step).min(target);

            let progress = *current / target;
            let t = ctx.elapsed.as_secs_f64();
            let coherence = (0.5 + 0.4 * progress + 0.1 * t.sin()).min(0.99);

            let flow = if *current >= target {
                reached_million = target >= 1_000_000.0;
                TickFlow::Complete
            } else {
                TickFlow::Continue
            };

            (
                TranscendencePoint {
                    iteration: ctx.iteration,
                    dimension: *current,
                    coherence,
                },
                flow,
            )
        });

        if ticked {
            if let Some(p) = self.run.latest() {
                store.set(MetricField::DimensionalAccess, p.dimension);
                store.set(MetricField::WilsonLoopStability, (p.coherence + 0.1).min(1.0));
                store.set(MetricField::BerryPhaseCoherence, p.coherence.min(1.0));
            }
            if reached_million {
                store.set_phase_label(TRANSCENDENCE_LABEL);
            }
        }
        ticked
    }
}

impl Default for DimensionPanel {
    fn default() -> Self {
        Self::new()
    }
}
