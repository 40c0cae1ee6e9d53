//! Technique identifiers and their execution phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Execution phase of a technique. Phases always run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Input conditioning: artifact suppression, melanin compensation.
    Early,
    /// Scoring techniques, in selection order.
    Main,
    /// Final contrast shaping.
    Late,
}

/// One selectable analysis technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    /// Lab-erythema grayscale map, `(Lmax − L) × a*`.
    AStarChannel,
    /// Heat-mapped `log10(R/G)`.
    ErythemaIndex,
    /// Skin-tone adaptive a* boost.
    Ita,
    /// Spectral-ratio pseudo-color.
    RgbRatio,
    /// a* amplification proportional to darkness.
    MelaninFilter,
    /// Linear contrast stretch around mid-gray.
    ContrastBoost,
    /// Hair/occlusion segmentation and inpainting.
    HairReduction,
}

impl Technique {
    /// Every technique, in a stable order.
    pub const ALL: [Technique; 7] = [
        Technique::AStarChannel,
        Technique::ErythemaIndex,
        Technique::Ita,
        Technique::RgbRatio,
        Technique::MelaninFilter,
        Technique::ContrastBoost,
        Technique::HairReduction,
    ];

    /// Stable string identifier.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::AStarChannel => "a-star",
            Self::ErythemaIndex => "erythema-index",
            Self::Ita => "ita",
            Self::RgbRatio => "rgb-ratio",
            Self::MelaninFilter => "melanin-filter",
            Self::ContrastBoost => "contrast-boost",
            Self::HairReduction => "hair-reduction",
        }
    }

    /// The phase table.
    pub const fn phase(&self) -> Phase {
        match self {
            Self::HairReduction | Self::MelaninFilter => Phase::Early,
            Self::AStarChannel | Self::ErythemaIndex | Self::Ita | Self::RgbRatio => Phase::Main,
            Self::ContrastBoost => Phase::Late,
        }
    }

    /// Whether the technique's own output honors the artifact mask.
    ///
    /// The orchestrator hands the mask only to these techniques. The
    /// supplementary fused heatmap always uses it.
    pub const fn uses_mask(&self) -> bool {
        matches!(self, Self::AStarChannel)
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Technique {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownTechnique(s.to_string()))
    }
}

/// Ordered techniques chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueSelection(Vec<Technique>);

impl TechniqueSelection {
    /// Parse identifiers, dropping unknown ones with a warning so that newer
    /// or older identifier sets pass through harmlessly.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let techniques = ids
            .into_iter()
            .filter_map(|id| match id.as_ref().parse::<Technique>() {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!("{e}; skipping");
                    None
                }
            })
            .collect();
        Self(techniques)
    }

    pub fn as_slice(&self) -> &[Technique] {
        &self.0
    }

    pub fn contains(&self, technique: Technique) -> bool {
        self.0.contains(&technique)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected techniques belonging to `phase`, in selection order.
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = Technique> + '_ {
        self.0.iter().copied().filter(move |t| t.phase() == phase)
    }
}

impl From<Vec<Technique>> for TechniqueSelection {
    fn from(techniques: Vec<Technique>) -> Self {
        Self(techniques)
    }
}
