//! Display synchronizer: label record → player name artifacts → host call.
//!
//! The artifacts are computed on the caller's thread from the record it
//! passes in, then handed to the host executor selected by the capability
//! profile.
mod dispatch;
pub use dispatch::{
    ComponentDispatcher, DispatchOutcome, LegacyDispatcher, NameDispatcher, dispatcher_for,
};

mod host;
pub use host::{DispatchError, HostScheduler, PlayerHandle, PlayerRef, Task};

mod presentation;
pub use presentation::{Presentation, label_text};

use std::sync::Arc;

use pronouns_model::{CapabilityProfile, HostTier, LabelRecord};
use tracing::{debug, trace};

/// Where the label is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    pub show_above_head: bool,
    pub show_in_tab_list: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_above_head: true,
            show_in_tab_list: true,
        }
    }
}

/// Pushes name artifacts to players through the tier-appropriate path.
pub struct DisplaySynchronizer {
    profile: CapabilityProfile,
    flags: DisplayFlags,
    enabled: bool,
    scheduler: Arc<dyn HostScheduler>,
    dispatcher: Arc<dyn NameDispatcher>,
}

impl DisplaySynchronizer {
    pub fn new(
        profile: CapabilityProfile,
        flags: DisplayFlags,
        scheduler: Arc<dyn HostScheduler>,
    ) -> Self {
        Self {
            profile,
            flags,
            enabled: true,
            scheduler,
            dispatcher: dispatcher_for(profile),
        }
    }

    /// Turn name updates on or off; when off, [`refresh`](Self::refresh) does nothing.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn profile(&self) -> CapabilityProfile {
        self.profile
    }

    pub fn flags(&self) -> DisplayFlags {
        self.flags
    }

    /// Recompute `player`'s names from `record` and schedule the host update.
    ///
    /// Returns `false` when name updates are disabled.
    pub fn refresh(&self, player: PlayerRef, record: Option<&LabelRecord>) -> bool {
        if !self.enabled {
            trace!(player = %player.id(), "display updates disabled");
            return false;
        }

        let view = Presentation::build(record, &player.name());
        let dispatcher = Arc::clone(&self.dispatcher);
        let flags = self.flags;
        let target = Arc::clone(&player);
        let task: Task = Box::new(move || {
            let outcome = dispatcher.apply(target.as_ref(), &view, flags);
            debug!(
                player = %target.id(),
                dispatcher = dispatcher.name(),
                outcome = ?outcome,
                labeled = view.labeled,
                "player names updated"
            );
        });

        match self.profile.tier() {
            HostTier::Regionized => self.scheduler.run_at(&player.location(), task),
            HostTier::Component => self.scheduler.run_on_main(task),
            HostTier::Legacy if self.scheduler.is_main_thread() => task(),
            HostTier::Legacy => self.scheduler.run_on_main(task),
        }
        true
    }
}

impl std::fmt::Debug for DisplaySynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySynchronizer")
            .field("tier", &self.profile.tier())
            .field("flags", &self.flags)
            .field("enabled", &self.enabled)
            .field("dispatcher", &self.dispatcher.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakePlayer, FakeScheduler, Ran};
    use pronouns_model::{Location, NamedColor};

    fn sync(tier: HostTier, scheduler: &Arc<FakeScheduler>) -> DisplaySynchronizer {
        DisplaySynchronizer::new(
            CapabilityProfile::new(tier),
            DisplayFlags::default(),
            scheduler.clone(),
        )
    }

    #[test]
    fn regionized_host_runs_on_player_region() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Ash");
        let rec = LabelRecord::solid(NamedColor::Gray, "they/them");

        assert!(sync(HostTier::Regionized, &scheduler).refresh(player.clone(), Some(&rec)));
        assert_eq!(scheduler.ran(), vec![Ran::Region(player.location())]);
        assert!(player.calls().contains(&Call::DisplayNameRich("[they/them] Ash".into())));
    }

    #[test]
    fn component_host_runs_on_main() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Ash");

        sync(HostTier::Component, &scheduler).refresh(player.clone(), None);
        assert_eq!(scheduler.ran(), vec![Ran::Main]);
    }

    #[test]
    fn legacy_host_runs_inline_when_on_main() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Ash");

        sync(HostTier::Legacy, &scheduler).refresh(player.clone(), None);
        assert!(scheduler.ran().is_empty());
        assert_eq!(
            player.calls(),
            vec![
                Call::DisplayName("Ash".into()),
                Call::CustomName(None),
                Call::CustomNameVisible(false),
                Call::ListName(Some("Ash".into())),
            ]
        );
    }

    #[test]
    fn legacy_host_off_main_is_scheduled() {
        let scheduler = Arc::new(FakeScheduler::new(false));
        let player = FakePlayer::arc("Ash");

        sync(HostTier::Legacy, &scheduler).refresh(player, None);
        assert_eq!(scheduler.ran(), vec![Ran::Main]);
    }

    #[test]
    fn legacy_host_receives_flattened_text() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Bo");
        let rec = LabelRecord::solid(NamedColor::Aqua, "he/him");

        sync(HostTier::Legacy, &scheduler).refresh(player.clone(), Some(&rec));
        assert_eq!(
            player.calls(),
            vec![
                Call::DisplayName("§b[he/him]§r Bo".into()),
                Call::CustomName(Some("§b[he/him]§r Bo".into())),
                Call::CustomNameVisible(true),
                Call::ListName(Some("Bo §b[he/him]".into())),
            ]
        );
    }

    #[test]
    fn failed_rich_call_falls_back_to_legacy() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Cy");
        player.fail_rich(true);
        let rec = LabelRecord::solid(NamedColor::Red, "any");

        sync(HostTier::Component, &scheduler).refresh(player.clone(), Some(&rec));
        let calls = player.calls();
        assert!(calls.contains(&Call::DisplayName("§c[any]§r Cy".into())));
        assert!(calls.contains(&Call::ListName(Some("Cy §c[any]".into()))));
    }

    #[test]
    fn failed_rich_clear_resets_names() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Cy");
        player.fail_rich(true);

        let view = Presentation::bare("Cy");
        let outcome = ComponentDispatcher.apply(player.as_ref(), &view, DisplayFlags::default());
        assert_eq!(outcome, DispatchOutcome::Fallback);
        assert_eq!(
            player.calls(),
            vec![
                Call::CustomName(None),
                Call::CustomNameVisible(false),
                Call::ListName(None),
            ]
        );
        assert!(scheduler.ran().is_empty());
    }

    #[test]
    fn flags_hide_tag_and_skip_tab_list() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Di");
        let rec = LabelRecord::solid(NamedColor::Gold, "fae/faer");
        let s = DisplaySynchronizer::new(
            CapabilityProfile::new(HostTier::Component),
            DisplayFlags {
                show_above_head: false,
                show_in_tab_list: false,
            },
            scheduler,
        );

        s.refresh(player.clone(), Some(&rec));
        let calls = player.calls();
        assert!(calls.contains(&Call::CustomNameVisible(false)));
        assert!(!calls.iter().any(|c| matches!(c, Call::ListNameRich(_) | Call::ListName(_))));
    }

    #[test]
    fn disabled_synchronizer_does_nothing() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Ed");
        let s = sync(HostTier::Legacy, &scheduler).with_enabled(false);

        assert!(!s.refresh(player.clone(), None));
        assert!(player.calls().is_empty());
    }

    #[test]
    fn region_follows_player_location() {
        let scheduler = Arc::new(FakeScheduler::new(true));
        let player = FakePlayer::arc("Fy");
        player.move_to(Location::new("nether", 100.0, 64.0, -33.0));

        sync(HostTier::Regionized, &scheduler).refresh(player.clone(), None);
        assert_eq!(
            scheduler.ran(),
            vec![Ran::Region(Location::new("nether", 100.0, 64.0, -33.0))]
        );
    }
}
