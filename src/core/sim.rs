//! Generic per-panel simulation engine.
//!
//! Every dashboard panel runs the same machinery: a start/stop/reset state
//! machine, a monotone iteration counter, a bounded rolling history with
//! FIFO eviction, and a keyed catalog of configuration presets. Panels
//! differ only in tick period, capacity, catalog contents, and the
//! derivation closure they hand to `poll`.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Errors a simulation run can produce. There is exactly one: selecting a
/// configuration key the catalog does not contain. Unknown keys surface as
/// errors rather than silently falling back to a default preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    ConfigNotFound { key: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigNotFound { key } => {
                write!(f, "configuration key not in catalog: {key:?}")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Fixed set of selectable presets for one panel.
#[derive(Debug, Clone)]
pub struct ConfigCatalog<C> {
    entries: Vec<(&'static str, C)>,
    selected: usize,
}

impl<C> ConfigCatalog<C> {
    /// Build a catalog from keyed presets. The first entry is selected.
    /// Panics on an empty list; catalogs are compile-time constants.
    pub fn new(entries: Vec<(&'static str, C)>) -> Self {
        assert!(!entries.is_empty(), "config catalog must not be empty");
        Self {
            entries,
            selected: 0,
        }
    }

    /// Catalog with a single fixed preset, for panels with nothing to select.
    pub fn fixed(config: C) -> Self {
        Self::new(vec![("default", config)])
    }

    pub fn select(&mut self, key: &str) -> Result<(), SimError> {
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.selected = idx;
                Ok(())
            }
            None => Err(SimError::ConfigNotFound {
                key: key.to_string(),
            }),
        }
    }

    pub fn selected(&self) -> &C {
        &self.entries[self.selected].1
    }

    pub fn selected_key(&self) -> &'static str {
        self.entries[self.selected].0
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &C)> + '_ {
        self.entries.iter().map(|(k, c)| (*k, c))
    }
}

/// Whether a tick leaves the run going or finishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Complete,
}

/// Inputs to a panel's derivation closure for one tick.
pub struct TickCtx<'a, C> {
    /// Ordinal of this tick; the first tick after `start` carries 1.
    pub iteration: u64,
    /// Wall-clock time since the run started, for sinusoidal fields.
    pub elapsed: Duration,
    pub config: &'a C,
}

/// Saturating exponential approach toward `base`:
/// `base * (1 - e^(-iteration * rate))`.
///
/// The dominant derived-value shape across panels; rates run 0.05-0.1.
pub fn saturating_approach(base: f64, iteration: u64, rate: f64) -> f64 {
    base * (1.0 - (-(iteration as f64) * rate).exp())
}

#[derive(Debug)]
pub struct SimulationRun<C, P> {
    period: Duration,
    capacity: usize,
    catalog: ConfigCatalog<C>,
    running: bool,
    iteration: u64,
    history: VecDeque<P>,
    started_at: Option<Instant>,
    next_due: Option<Instant>,
}

impl<C, P> SimulationRun<C, P> {
    pub fn new(period: Duration, capacity: usize, catalog: ConfigCatalog<C>) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            period,
            capacity,
            catalog,
            running: false,
            iteration: 0,
            history: VecDeque::with_capacity(capacity),
            started_at: None,
            next_due: None,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin a fresh run: iteration back to 0, history cleared, first tick
    /// due one period from `now`. No-op if already running.
    pub fn start_at(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.iteration = 0;
        self.history.clear();
        self.started_at = Some(now);
        self.next_due = Some(now + self.period);
    }

    /// Halt the run. Ticks cannot fire on an idle run, so any later `poll`
    /// is inert; there is no pending callback to leak.
    pub fn stop(&mut self) {
        self.running = false;
        self.next_due = None;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.iteration = 0;
        self.history.clear();
        self.started_at = None;
    }

    /// Switch presets without disturbing the run; the next tick sees the
    /// new parameters.
    pub fn select_config(&mut self, key: &str) -> Result<(), SimError> {
        self.catalog.select(key)
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn config(&self) -> &C {
        self.catalog.selected()
    }

    pub fn config_key(&self) -> &'static str {
        self.catalog.selected_key()
    }

    pub fn catalog(&self) -> &ConfigCatalog<C> {
        &self.catalog
    }

    pub fn history(&self) -> &VecDeque<P> {
        &self.history
    }

    pub fn latest(&self) -> Option<&P> {
        self.history.back()
    }

    /// Fire at most one tick if the run is live and its period has elapsed.
    /// Returns whether a tick fired. The next tick is scheduled one period
    /// from `now`, so a late host poll never produces a burst.
    pub fn poll<F>(&mut self, now: Instant, derive: F) -> bool
    where
        F: FnOnce(&TickCtx<'_, C>) -> (P, TickFlow),
    {
        if !self.running {
            return false;
        }
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_due = Some(now + self.period);
        self.tick_at(now, derive);
        true
    }

    /// Advance exactly one tick, ignoring the schedule. `poll` routes here;
    /// tests drive it directly.
    pub fn tick_at<F>(&mut self, now: Instant, derive: F)
    where
        F: FnOnce(&TickCtx<'_, C>) -> (P, TickFlow),
    {
        if !self.running {
            return;
        }
        self.iteration += 1;
        let elapsed = self
            .started_at
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default();

        let (point, flow) = {
            let ctx = TickCtx {
                iteration: self.iteration,
                elapsed,
                config: self.catalog.selected(),
            };
            derive(&ctx)
        };

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(point);

        if flow == TickFlow::Complete {
            self.stop();
        }
    }
}
