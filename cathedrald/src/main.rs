//! Cathedral Daemon - Background consciousness simulation service
//!
//! Runs the shared metrics store and all dashboard panels on a single
//! wall-clock advance loop and serves newline-delimited JSON requests
//! over TCP for UI clients.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time;
use tracing::{error, info};

use cathedral::panels::akashic::{ArchiveStats, MemoryArchive, MemoryKind, MemoryRecord};
use cathedral::panels::berry::{BerryPanel, BerryPoint};
use cathedral::panels::catalytic::{CatalyticMetrics, CatalyticPanel, CatalyticPoint};
use cathedral::panels::cathedral::{CathedralMetrics, CathedralPanel, CathedralPoint};
use cathedral::panels::dimension::{DimensionPanel, TranscendencePoint};
use cathedral::panels::langlands::{LanglandsPanel, LanglandsPoint};
use cathedral::panels::overview::{OverviewPanel, OverviewPoint};
use cathedral::panels::training::{TrainingPanel, TrainingPoint};
use cathedral::panels::PanelKind;
use cathedral::prng::Prng;
use cathedral::sim::SimulationRun;
use cathedral::store::{ConsciousnessStore, MetricField, MetricsSnapshot};

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Request {
    GetState,
    Start { panel: String },
    Stop { panel: String },
    Reset { panel: String },
    SelectConfig { panel: String, key: String },
    SetMetric { field: String, value: f64 },
    RegisterSystem { name: String },
    StoreMemory { content: String, kind: String, symbols: Vec<String> },
    DeleteMemory { id: u64 },
    SearchMemories { query: String, kind: Option<String> },
    SetPollPeriodMs { ms: u32 },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Response {
    State(Box<StateSnapshot>),
    Memories { memories: Vec<MemoryRecord> },
    Success { message: String },
    Error { message: String },
}

/// Serialized view of one panel's run.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunState<P> {
    running: bool,
    iteration: u64,
    config_key: String,
    config_keys: Vec<String>,
    history: Vec<P>,
}

impl<P: Clone> RunState<P> {
    fn of<C>(run: &SimulationRun<C, P>) -> Self {
        Self {
            running: run.running(),
            iteration: run.iteration(),
            config_key: run.config_key().to_string(),
            config_keys: run.catalog().keys().map(str::to_string).collect(),
            history: run.history().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateSnapshot {
    metrics: MetricsSnapshot,
    aggregate: f64,
    poll_period_ms: u32,
    overview: RunState<OverviewPoint>,
    cathedral: RunState<CathedralPoint>,
    cathedral_metrics: CathedralMetrics,
    training: RunState<TrainingPoint>,
    catalytic: RunState<CatalyticPoint>,
    catalytic_metrics: CatalyticMetrics,
    dimension: RunState<TranscendencePoint>,
    current_dimension: f64,
    berry: RunState<BerryPoint>,
    phase_coherence: f64,
    langlands: RunState<LanglandsPoint>,
    duality_score: f64,
    archive: ArchiveStats,
}

// ═══════════════════════════════════════════════════════════════════════════
// Daemon State
// ═══════════════════════════════════════════════════════════════════════════

struct DaemonState {
    store: ConsciousnessStore,
    overview: OverviewPanel,
    cathedral: CathedralPanel,
    training: TrainingPanel,
    catalytic: CatalyticPanel,
    dimension: DimensionPanel,
    berry: BerryPanel,
    langlands: LanglandsPanel,
    archive: MemoryArchive,
    rng: Prng,
    poll_period_ms: u32,
}

impl DaemonState {
    fn new(seed: u64) -> Self {
        Self {
            store: ConsciousnessStore::new(seed),
            overview: OverviewPanel::new(),
            cathedral: CathedralPanel::new(seed ^ 0x01),
            training: TrainingPanel::new(seed ^ 0x02),
            catalytic: CatalyticPanel::new(seed ^ 0x03),
            dimension: DimensionPanel::new(),
            berry: BerryPanel::new(seed ^ 0x04),
            langlands: LanglandsPanel::new(seed ^ 0x05),
            archive: MemoryArchive::with_samples(),
            rng: Prng::new(seed ^ 0x06),
            poll_period_ms: 50,
        }
    }

    /// One advance pass: store schedule first, then every panel. Panels that
    /// write shared metrics run before the overview sample so the trend sees
    /// this pass's writes; among the writers, later polls win.
    fn advance(&mut self, now: Instant) {
        self.store.poll_at(now);
        self.cathedral.poll(now);
        self.catalytic.poll(now);
        self.langlands.poll(now);
        self.training.poll(now, &mut self.store);
        self.dimension.poll(now, &mut self.store);
        self.berry.poll(now, &mut self.store);
        self.overview.poll(now, &self.store);
    }

    fn start_panel(&mut self, kind: PanelKind) {
        let now = Instant::now();
        match kind {
            PanelKind::Overview => self.overview.start_at(now),
            PanelKind::Cathedral => {
                self.cathedral.start_at(now);
                self.store.register_system_at(CathedralPanel::SYSTEM_NAME, now);
            }
            PanelKind::Training => {
                self.training.start_at(now);
                self.store.register_system_at(TrainingPanel::SYSTEM_NAME, now);
            }
            PanelKind::Catalytic => {
                self.catalytic.start_at(now);
                self.store.register_system_at(CatalyticPanel::SYSTEM_NAME, now);
            }
            PanelKind::Dimension => {
                self.dimension.start_at(now);
                self.store.register_system_at(DimensionPanel::SYSTEM_NAME, now);
            }
            PanelKind::Berry => {
                self.berry.start_at(now);
                self.store.register_system_at(BerryPanel::SYSTEM_NAME, now);
            }
            PanelKind::Langlands => {
                self.langlands.start_at(now);
                self.store.register_system_at(LanglandsPanel::SYSTEM_NAME, now);
            }
        }
    }

    fn stop_panel(&mut self, kind: PanelKind) {
        match kind {
            PanelKind::Overview => self.overview.stop(),
            PanelKind::Cathedral => self.cathedral.stop(),
            PanelKind::Training => self.training.stop(),
            PanelKind::Catalytic => self.catalytic.stop(),
            PanelKind::Dimension => self.dimension.stop(),
            PanelKind::Berry => self.berry.stop(),
            PanelKind::Langlands => self.langlands.stop(),
        }
    }

    fn reset_panel(&mut self, kind: PanelKind) {
        match kind {
            PanelKind::Overview => self.overview.reset(),
            PanelKind::Cathedral => self.cathedral.reset(),
            PanelKind::Training => self.training.reset(),
            PanelKind::Catalytic => self.catalytic.reset(),
            PanelKind::Dimension => self.dimension.reset(),
            PanelKind::Berry => self.berry.reset(),
            PanelKind::Langlands => self.langlands.reset(),
        }
    }

    fn select_config(&mut self, kind: PanelKind, key: &str) -> Result<(), String> {
        let result = match kind {
            PanelKind::Overview => return Err("overview has no selectable presets".to_string()),
            PanelKind::Cathedral => self.cathedral.select_config(key),
            PanelKind::Training => self.training.select_config(key),
            PanelKind::Catalytic => self.catalytic.select_config(key),
            PanelKind::Dimension => self.dimension.select_config(key),
            PanelKind::Berry => self.berry.select_config(key),
            PanelKind::Langlands => self.langlands.select_config(key),
        };
        result.map_err(|e| e.to_string())
    }

    fn get_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            metrics: self.store.snapshot(),
            aggregate: self.store.aggregate(),
            poll_period_ms: self.poll_period_ms,
            overview: RunState::of(&self.overview.run),
            cathedral: RunState::of(&self.cathedral.run),
            cathedral_metrics: self.cathedral.metrics.clone(),
            training: RunState::of(&self.training.run),
            catalytic: RunState::of(&self.catalytic.run),
            catalytic_metrics: self.catalytic.metrics.clone(),
            dimension: RunState::of(&self.dimension.run),
            current_dimension: self.dimension.current_dimension,
            berry: RunState::of(&self.berry.run),
            phase_coherence: self.berry.phase_coherence,
            langlands: RunState::of(&self.langlands.run),
            duality_score: self.langlands.duality_score,
            archive: self.archive.stats(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

fn parse_panel(label: &str) -> Result<PanelKind, Response> {
    PanelKind::from_label(label).ok_or_else(|| Response::Error {
        message: format!("Unknown panel: {label:?}"),
    })
}

fn parse_kind(label: &str) -> Result<MemoryKind, Response> {
    MemoryKind::from_label(label).ok_or_else(|| Response::Error {
        message: format!("Unknown memory kind: {label:?}"),
    })
}

async fn handle_client(
    stream: TcpStream,
    state: Arc<RwLock<DaemonState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let resp = Response::Error {
                    message: format!("Invalid request: {}", e),
                };
                writer
                    .write_all(serde_json::to_string(&resp)?.as_bytes())
                    .await?;
                writer.write_all(b"\n").await?;
                continue;
            }
        };

        let response = match request {
            Request::GetState => {
                let s = state.read().await;
                Response::State(Box::new(s.get_snapshot()))
            }
            Request::Start { panel } => match parse_panel(&panel) {
                Ok(kind) => {
                    let mut s = state.write().await;
                    s.start_panel(kind);
                    Response::Success {
                        message: format!("Started {panel}"),
                    }
                }
                Err(resp) => resp,
            },
            Request::Stop { panel } => match parse_panel(&panel) {
                Ok(kind) => {
                    let mut s = state.write().await;
                    s.stop_panel(kind);
                    Response::Success {
                        message: format!("Stopped {panel}"),
                    }
                }
                Err(resp) => resp,
            },
            Request::Reset { panel } => match parse_panel(&panel) {
                Ok(kind) => {
                    let mut s = state.write().await;
                    s.reset_panel(kind);
                    Response::Success {
                        message: format!("Reset {panel}"),
                    }
                }
                Err(resp) => resp,
            },
            Request::SelectConfig { panel, key } => match parse_panel(&panel) {
                Ok(kind) => {
                    let mut s = state.write().await;
                    match s.select_config(kind, &key) {
                        Ok(()) => Response::Success {
                            message: format!("Selected {key} on {panel}"),
                        },
                        Err(e) => Response::Error { message: e },
                    }
                }
                Err(resp) => resp,
            },
            Request::SetMetric { field, value } => match MetricField::from_name(&field) {
                Some(f) => {
                    let mut s = state.write().await;
                    s.store.set(f, value);
                    Response::Success {
                        message: format!("{field} set to {value}"),
                    }
                }
                None => Response::Error {
                    message: format!("Unknown metric field: {field:?}"),
                },
            },
            Request::RegisterSystem { name } => {
                let mut s = state.write().await;
                s.store.register_system(&name);
                Response::Success {
                    message: format!("Registered {name}"),
                }
            }
            Request::StoreMemory {
                content,
                kind,
                symbols,
            } => match parse_kind(&kind) {
                Ok(k) => {
                    let mut s = state.write().await;
                    let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
                    let DaemonState { archive, rng, .. } = &mut *s;
                    let id = archive.store(&content, k, &symbols, rng);
                    Response::Success {
                        message: format!("Memory {id} stored"),
                    }
                }
                Err(resp) => resp,
            },
            Request::DeleteMemory { id } => {
                let mut s = state.write().await;
                if s.archive.delete(id) {
                    Response::Success {
                        message: format!("Memory {id} deleted"),
                    }
                } else {
                    Response::Error {
                        message: format!("No memory with id {id}"),
                    }
                }
            }
            Request::SearchMemories { query, kind } => {
                let kind = match kind.as_deref() {
                    Some(label) => match parse_kind(label) {
                        Ok(k) => Some(k),
                        Err(resp) => {
                            writer
                                .write_all(serde_json::to_string(&resp)?.as_bytes())
                                .await?;
                            writer.write_all(b"\n").await?;
                            continue;
                        }
                    },
                    None => None,
                };
                let s = state.read().await;
                Response::Memories {
                    memories: s.archive.search(&query, kind).into_iter().cloned().collect(),
                }
            }
            Request::SetPollPeriodMs { ms } => {
                let mut s = state.write().await;
                let clamped = ms.clamp(10, 10_000);
                s.poll_period_ms = clamped;
                info!("Poll period set to {} ms", clamped);
                Response::Success {
                    message: format!("Poll period set to {} ms", clamped),
                }
            }
            Request::Shutdown => {
                info!("Shutdown requested");
                tokio::spawn(async {
                    // Give the response a moment to flush before exiting.
                    time::sleep(Duration::from_millis(50)).await;
                    std::process::exit(0);
                });
                Response::Success {
                    message: "Shutting down".to_string(),
                }
            }
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let seed = std::process::id() as u64 | 0x1;
    let state = Arc::new(RwLock::new(DaemonState::new(seed)));

    let listener = TcpListener::bind("127.0.0.1:9714").await?;
    info!("Cathedral daemon listening on 127.0.0.1:9714");

    // Advance loop task
    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        loop {
            let period_ms = {
                let s = state_clone.read().await;
                s.poll_period_ms
            };
            tokio::time::sleep(tokio::time::Duration::from_millis(period_ms as u64)).await;

            let mut s = state_clone.write().await;
            s.advance(Instant::now());
        }
    });

    // Accept client connections
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Client connected: {}", addr);
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, state_clone).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}
