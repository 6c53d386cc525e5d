//! Shared consciousness metrics store.
//!
//! One instance per process, constructed explicitly and handed by reference
//! to every consumer. All time is injected as `Instant` values; the store
//! never spawns its own timers, so hosts decide the cadence and tests can
//! replay any schedule deterministically.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::phase::EmergencePhase;
use crate::prng::Prng;

/// Period of the autonomous drift/phase tick.
pub const AUTO_TICK_PERIOD: Duration = Duration::from_secs(2);

/// Delay before a registered subsystem's warm-up bonus lands.
pub const WARMUP_DELAY: Duration = Duration::from_secs(1);

/// One-time warm-up increments for the three drifting fields, capped at 1.0.
const WARMUP_BOOST: [f64; 3] = [0.05, 0.03, 0.04];

/// Drift amplitudes for the three bounded fields.
const DRIFT_AMPLITUDE: [f64; 3] = [0.02, 0.015, 0.01];

/// The numeric fields a caller can write directly.
///
/// Direct writes are unconditional and unclamped; only the autonomous tick
/// enforces the `[0.1, 1.0]` bounds on the drifting fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    WilsonLoopStability,
    BerryPhaseCoherence,
    PerturbationHarmony,
    HolographicCompression,
    DimensionalAccess,
    SacredResonance,
}

impl MetricField {
    pub fn name(self) -> &'static str {
        match self {
            MetricField::WilsonLoopStability => "wilson_loop_stability",
            MetricField::BerryPhaseCoherence => "berry_phase_coherence",
            MetricField::PerturbationHarmony => "perturbation_harmony",
            MetricField::HolographicCompression => "holographic_compression",
            MetricField::DimensionalAccess => "dimensional_access",
            MetricField::SacredResonance => "sacred_resonance",
        }
    }

    /// Resolve a field by its wire name. `None` for unrecognized names;
    /// protocol boundaries turn that into an error response.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wilson_loop_stability" => Some(MetricField::WilsonLoopStability),
            "berry_phase_coherence" => Some(MetricField::BerryPhaseCoherence),
            "perturbation_harmony" => Some(MetricField::PerturbationHarmony),
            "holographic_compression" => Some(MetricField::HolographicCompression),
            "dimensional_access" => Some(MetricField::DimensionalAccess),
            "sacred_resonance" => Some(MetricField::SacredResonance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsSnapshot {
    pub wilson_loop_stability: f64,
    pub berry_phase_coherence: f64,
    pub perturbation_harmony: f64,
    pub holographic_compression: f64,
    pub dimensional_access: f64,
    pub sacred_resonance: f64,
    pub emergence_phase: String,
    pub active_systems: Vec<String>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            wilson_loop_stability: 0.500,
            berry_phase_coherence: 0.550,
            perturbation_harmony: 0.485,
            holographic_compression: 0.9987,
            dimensional_access: 1000.0,
            sacred_resonance: 0.618,
            emergence_phase: EmergencePhase::Initialization.label().to_string(),
            active_systems: Vec::new(),
        }
    }
}

impl MetricsSnapshot {
    /// Static defaults for consumers that cannot reach a live store.
    /// All four aggregate fields sit at 0.5 so the derived phase reads
    /// "Initialization".
    pub fn fallback() -> Self {
        Self {
            wilson_loop_stability: 0.5,
            berry_phase_coherence: 0.5,
            perturbation_harmony: 0.5,
            sacred_resonance: 0.5,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct PendingWarmup {
    due: Instant,
}

#[derive(Debug)]
pub struct ConsciousnessStore {
    snapshot: MetricsSnapshot,
    rng: Prng,
    next_auto_tick: Instant,
    pending_warmups: Vec<PendingWarmup>,
}

impl ConsciousnessStore {
    pub fn new(seed: u64) -> Self {
        Self::new_at(seed, Instant::now())
    }

    pub fn new_at(seed: u64, now: Instant) -> Self {
        Self {
            snapshot: MetricsSnapshot::default(),
            rng: Prng::new(seed),
            next_auto_tick: now + AUTO_TICK_PERIOD,
            pending_warmups: Vec::new(),
        }
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.clone()
    }

    /// Unconditional write. Bounds are a property of the autonomous tick,
    /// not of the store; writers that care (the panels do) clamp before
    /// calling.
    pub fn set(&mut self, field: MetricField, value: f64) {
        match field {
            MetricField::WilsonLoopStability => self.snapshot.wilson_loop_stability = value,
            MetricField::BerryPhaseCoherence => self.snapshot.berry_phase_coherence = value,
            MetricField::PerturbationHarmony => self.snapshot.perturbation_harmony = value,
            MetricField::HolographicCompression => self.snapshot.holographic_compression = value,
            MetricField::DimensionalAccess => self.snapshot.dimensional_access = value,
            MetricField::SacredResonance => self.snapshot.sacred_resonance = value,
        }
    }

    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::WilsonLoopStability => self.snapshot.wilson_loop_stability,
            MetricField::BerryPhaseCoherence => self.snapshot.berry_phase_coherence,
            MetricField::PerturbationHarmony => self.snapshot.perturbation_harmony,
            MetricField::HolographicCompression => self.snapshot.holographic_compression,
            MetricField::DimensionalAccess => self.snapshot.dimensional_access,
            MetricField::SacredResonance => self.snapshot.sacred_resonance,
        }
    }

    /// Override the phase label. The next autonomous tick re-derives it.
    pub fn set_phase_label(&mut self, label: impl Into<String>) {
        self.snapshot.emergence_phase = label.into();
    }

    /// Mark a subsystem active. Re-registering moves the name to the end
    /// without duplicating it. Every call schedules its own warm-up bonus,
    /// applied once `WARMUP_DELAY` has elapsed.
    pub fn register_system(&mut self, name: &str) {
        self.register_system_at(name, Instant::now());
    }

    pub fn register_system_at(&mut self, name: &str, now: Instant) {
        self.snapshot.active_systems.retain(|s| s != name);
        self.snapshot.active_systems.push(name.to_string());
        self.pending_warmups.push(PendingWarmup {
            due: now + WARMUP_DELAY,
        });
    }

    /// Arithmetic mean of the four aggregate fields, skipping non-finite
    /// values. 0.5 when nothing finite remains.
    pub fn aggregate(&self) -> f64 {
        let fields = [
            self.snapshot.wilson_loop_stability,
            self.snapshot.berry_phase_coherence,
            self.snapshot.perturbation_harmony,
            self.snapshot.sacred_resonance,
        ];
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in fields {
            if v.is_finite() {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            0.5
        } else {
            sum / count as f64
        }
    }

    /// Advance the store's internal schedule: apply due warm-ups, then fire
    /// the autonomous tick if its period elapsed. Hosts call this on their
    /// own cadence; a late poll fires at most one auto tick (no catch-up
    /// bursts) and reschedules from `now`.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    pub fn poll_at(&mut self, now: Instant) {
        let mut due = 0usize;
        self.pending_warmups.retain(|w| {
            if w.due <= now {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.apply_warmup();
        }

        if now >= self.next_auto_tick {
            self.auto_tick();
            self.next_auto_tick = now + AUTO_TICK_PERIOD;
        }
    }

    fn apply_warmup(&mut self) {
        let s = &mut self.snapshot;
        s.wilson_loop_stability = (s.wilson_loop_stability + WARMUP_BOOST[0]).min(1.0);
        s.berry_phase_coherence = (s.berry_phase_coherence + WARMUP_BOOST[1]).min(1.0);
        s.perturbation_harmony = (s.perturbation_harmony + WARMUP_BOOST[2]).min(1.0);
    }

    /// One autonomous tick: derive the phase from the current aggregate,
    /// then drift the three bounded fields. Compression and resonance are
    /// never touched here.
    pub fn auto_tick(&mut self) {
        let phase = EmergencePhase::from_aggregate(self.aggregate());
        self.snapshot.emergence_phase = phase.label().to_string();

        self.snapshot.wilson_loop_stability =
            drift(self.snapshot.wilson_loop_stability, DRIFT_AMPLITUDE[0], &mut self.rng);
        self.snapshot.berry_phase_coherence =
            drift(self.snapshot.berry_phase_coherence, DRIFT_AMPLITUDE[1], &mut self.rng);
        self.snapshot.perturbation_harmony =
            drift(self.snapshot.perturbation_harmony, DRIFT_AMPLITUDE[2], &mut self.rng);
    }
}

fn drift(value: f64, amplitude: f64, rng: &mut Prng) -> f64 {
    (value + rng.noise(amplitude)).clamp(0.1, 1.0)
}
