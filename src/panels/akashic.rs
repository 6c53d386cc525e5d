//! Akashic memory archive: the one non-periodic panel. No run, no history
//! eviction; an append-anywhere record store with substring search and a
//! few aggregate statistics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::Prng;

/// Fixed compression ratio reported by the archive. Matches the store's
/// holographic compression default; the archive never recomputes it.
pub const COMPRESSION_RATIO: f64 = 0.9987;

/// Consciousness level above which a record counts as an emergence event.
pub const EMERGENCE_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MemoryKind {
    Concept,
    Process,
    Relationship,
    Pattern,
    Context,
}

impl MemoryKind {
    pub const ALL: [MemoryKind; 5] = [
        MemoryKind::Concept,
        MemoryKind::Process,
        MemoryKind::Relationship,
        MemoryKind::Pattern,
        MemoryKind::Context,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MemoryKind::Concept => "concept",
            MemoryKind::Process => "process",
            MemoryKind::Relationship => "relationship",
            MemoryKind::Pattern => "pattern",
            MemoryKind::Context => "context",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryRecord {
    pub id: u64,
    pub content: String,
    pub kind: MemoryKind,
    pub consciousness: f64,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArchiveStats {
    pub total_memories: usize,
    pub avg_consciousness: f64,
    pub compression_ratio: f64,
    pub emergence_events: usize,
}

#[derive(Debug, Default)]
pub struct MemoryArchive {
    records: Vec<MemoryRecord>,
    next_id: u64,
}

impl MemoryArchive {
    pub const SYSTEM_NAME: &'static str = "Akashic Memory System";

    pub fn new() -> Self {
        Self::default()
    }

    /// Archive pre-seeded with the canonical sample records.
    pub fn with_samples() -> Self {
        let mut archive = Self::new();
        archive.insert(
            "The golden ratio appears throughout consciousness architecture",
            MemoryKind::Concept,
            0.92,
            &["φ", "∞", "Ω"],
        );
        archive.insert(
            "Neural catalytic processing requires morphic field alignment",
            MemoryKind::Process,
            0.87,
            &["Ψ", "∇", "Θ"],
        );
        archive.insert(
            "Wilson loops detect consciousness emergence in quantum fields",
            MemoryKind::Pattern,
            0.94,
            &["Γ", "ℏ", "⊗"],
        );
        archive
    }

    fn insert(
        &mut self,
        content: &str,
        kind: MemoryKind,
        consciousness: f64,
        symbols: &[&str],
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.records.push(MemoryRecord {
            id,
            content: content.to_string(),
            kind,
            consciousness,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        });
        id
    }

    /// Store a new record. Its consciousness level rises with the number of
    /// attached symbols, plus noise, capped at 0.99. Returns the new id.
    pub fn store(
        &mut self,
        content: &str,
        kind: MemoryKind,
        symbols: &[&str],
        rng: &mut Prng,
    ) -> u64 {
        let consciousness =
            (0.3 + 0.1 * symbols.len() as f64 + rng.next_f64_01() * 0.2).min(0.99);
        self.insert(content, kind, consciousness, symbols)
    }

    /// Remove a record by id. False if the id was never issued or already
    /// deleted.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&MemoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    /// Case-insensitive substring search over content and symbols, with an
    /// optional kind filter. An empty query matches everything.
    pub fn search(&self, query: &str, kind: Option<MemoryKind>) -> Vec<&MemoryRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .filter(|r| {
                needle.is_empty()
                    || r.content.to_lowercase().contains(&needle)
                    || r.symbols.iter().any(|s| s.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn stats(&self) -> ArchiveStats {
        let total = self.records.len();
        let avg = if total == 0 {
            0.0
        } else {
            self.records.iter().map(|r| r.consciousness).sum::<f64>() / total as f64
        };
        ArchiveStats {
            total_memories: total,
            avg_consciousness: avg,
            compression_ratio: COMPRESSION_RATIO,
            emergence_events: self
                .records
                .iter()
                .filter(|r| r.consciousness > EMERGENCE_THRESHOLD)
                .count(),
        }
    }
}
