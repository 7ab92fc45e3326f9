//! Host capability detection.
//!
//! The host is probed once at startup; the resulting [`CapabilityProfile`]
//! is installed as process-wide read-only state and drives every later
//! display and scheduling decision.
use std::sync::OnceLock;

use pronouns_model::{CapabilityProfile, HostTier};
use tracing::{info, warn};

/// Queries the host for optional facilities.
///
/// Implementations answer from whatever the host exposes (symbol lookup,
/// API version, feature flags). A missing facility is an ordinary `false`.
pub trait HostProbe: Send + Sync {
    /// The host runs work on per-region executors.
    fn has_region_scheduler(&self) -> bool;

    /// The host accepts styled text objects for per-player display names.
    fn has_component_display_names(&self) -> bool;
}

static PROFILE: OnceLock<CapabilityProfile> = OnceLock::new();

/// Probe the host, most capable tier first.
///
/// A host with a region scheduler is treated as the top tier without asking
/// about display names, since that tier always has them.
pub fn detect(probe: &dyn HostProbe) -> CapabilityProfile {
    let tier = if probe.has_region_scheduler() {
        HostTier::Regionized
    } else if probe.has_component_display_names() {
        HostTier::Component
    } else {
        HostTier::Legacy
    };
    info!(tier = %tier, "host capability tier detected");
    CapabilityProfile::new(tier)
}

/// Install the process-wide profile.
///
/// Only the first call takes effect; the installed profile is returned.
pub fn install_profile(profile: CapabilityProfile) -> CapabilityProfile {
    let installed = *PROFILE.get_or_init(|| profile);
    if installed != profile {
        warn!(
            installed = %installed.tier(),
            ignored = %profile.tier(),
            "capability profile already installed; keeping the first one"
        );
    }
    installed
}

/// The installed profile, or `None` before startup completes.
pub fn profile() -> Option<CapabilityProfile> {
    PROFILE.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProbe;

    #[test]
    fn detects_each_tier() {
        let cases = [
            (false, false, HostTier::Legacy),
            (false, true, HostTier::Component),
            (true, true, HostTier::Regionized),
        ];
        for (region, component, tier) in cases {
            let p = detect(&FakeProbe { region, component });
            assert_eq!(p.tier(), tier);
        }
    }

    #[test]
    fn region_scheduler_alone_still_yields_full_profile() {
        let p = detect(&FakeProbe {
            region: true,
            component: false,
        });
        assert!(p.regionized_scheduling());
        assert!(p.component_display_names());
    }

    #[test]
    fn never_yields_regionized_without_components() {
        for region in [false, true] {
            for component in [false, true] {
                let p = detect(&FakeProbe { region, component });
                assert!(!(p.regionized_scheduling() && !p.component_display_names()));
            }
        }
    }

    #[test]
    fn first_install_wins() {
        let first = install_profile(CapabilityProfile::new(HostTier::Component));
        let second = install_profile(CapabilityProfile::new(HostTier::Legacy));
        assert_eq!(first, second);
        assert_eq!(profile(), Some(first));
    }
}
