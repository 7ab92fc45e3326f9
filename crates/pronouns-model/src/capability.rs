use std::fmt;

/// Host API generation.
///
/// Tiers are ordered: every tier supports everything the tiers below it support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostTier {
    /// Flattened legacy-escape text only, single main thread.
    Legacy,
    /// Rich component display names, single main thread.
    Component,
    /// Rich component display names, one executor per spatial region.
    Regionized,
}

impl HostTier {
    pub fn as_str(self) -> &'static str {
        match self {
            HostTier::Legacy => "legacy",
            HostTier::Component => "component",
            HostTier::Regionized => "regionized",
        }
    }
}

impl fmt::Display for HostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the running host can do, probed once at startup.
///
/// The profile is backed by a [`HostTier`], so the capability flags are
/// derived rather than stored: regionized scheduling without component
/// display names cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityProfile {
    tier: HostTier,
}

impl CapabilityProfile {
    pub const fn new(tier: HostTier) -> Self {
        Self { tier }
    }

    pub const fn legacy() -> Self {
        Self::new(HostTier::Legacy)
    }

    pub const fn tier(&self) -> HostTier {
        self.tier
    }

    /// Work tied to a player must run on the executor owning the player's region.
    pub const fn regionized_scheduling(&self) -> bool {
        matches!(self.tier, HostTier::Regionized)
    }

    /// Per-player display APIs accept styled text objects.
    pub const fn component_display_names(&self) -> bool {
        matches!(self.tier, HostTier::Component | HostTier::Regionized)
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::legacy()
    }
}

impl From<HostTier> for CapabilityProfile {
    fn from(tier: HostTier) -> Self {
        Self::new(tier)
    }
}
