//! Dashboard panels.
//!
//! Each periodic panel wraps one `SimulationRun` with page-local display
//! metrics and a derivation closure; the Akashic archive is the one
//! non-periodic panel. Hosts drive all of them by calling `poll(now, ...)`
//! on whatever cadence they like.

pub mod akashic;
pub mod berry;
pub mod catalytic;
pub mod cathedral;
pub mod dimension;
pub mod langlands;
pub mod overview;
pub mod training;

/// The periodic panels a host can address by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Overview,
    Cathedral,
    Training,
    Catalytic,
    Dimension,
    Berry,
    Langlands,
}

impl PanelKind {
    pub const ALL: [PanelKind; 7] = [
        PanelKind::Overview,
        PanelKind::Cathedral,
        PanelKind::Training,
        PanelKind::Catalytic,
        PanelKind::Dimension,
        PanelKind::Berry,
        PanelKind::Langlands,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Overview => "overview",
            PanelKind::Cathedral => "cathedral",
            PanelKind::Training => "training",
            PanelKind::Catalytic => "catalytic",
            PanelKind::Dimension => "dimension",
            PanelKind::Berry => "berry",
            PanelKind::Langlands => "langlands",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for kind in PanelKind::ALL {
            assert_eq!(PanelKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(PanelKind::from_label("akashic"), None);
        assert_eq!(PanelKind::from_label(""), None);
    }
}
