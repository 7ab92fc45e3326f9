//! Per-tier strategies for pushing name artifacts to a player.
use std::sync::Arc;

use pronouns_model::CapabilityProfile;
use tracing::{debug, warn};

use crate::display::{
    DisplayFlags,
    host::{DispatchError, PlayerHandle},
    presentation::Presentation,
};

/// How an update actually reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Styled text objects were accepted.
    Rich,
    /// Flattened legacy strings, as chosen for this host.
    Legacy,
    /// A rich call failed and the legacy path was used for this update.
    Fallback,
}

/// Strategy for applying a [`Presentation`] to a player.
///
/// Chosen once from the [`CapabilityProfile`] by [`dispatcher_for`].
pub trait NameDispatcher: Send + Sync {
    /// Dispatcher name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        player: &dyn PlayerHandle,
        view: &Presentation,
        flags: DisplayFlags,
    ) -> DispatchOutcome;
}

/// Pick the dispatcher for a host tier.
pub fn dispatcher_for(profile: CapabilityProfile) -> Arc<dyn NameDispatcher> {
    if profile.component_display_names() {
        Arc::new(ComponentDispatcher)
    } else {
        Arc::new(LegacyDispatcher)
    }
}

/// Legacy-escaped strings through the plain setters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyDispatcher;

impl LegacyDispatcher {
    fn push(player: &dyn PlayerHandle, view: &Presentation, flags: DisplayFlags) {
        if view.labeled {
            let tag = view.above_head.to_legacy();
            player.set_display_name(&tag);
            player.set_custom_name(Some(&tag));
            player.set_custom_name_visible(flags.show_above_head);
            if flags.show_in_tab_list {
                player.set_player_list_name(Some(&view.tab_list.to_legacy()));
            }
        } else {
            player.set_display_name(&view.name);
            player.set_custom_name(None);
            player.set_custom_name_visible(false);
            player.set_player_list_name(Some(&view.name));
        }
    }
}

impl NameDispatcher for LegacyDispatcher {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn apply(
        &self,
        player: &dyn PlayerHandle,
        view: &Presentation,
        flags: DisplayFlags,
    ) -> DispatchOutcome {
        Self::push(player, view, flags);
        DispatchOutcome::Legacy
    }
}

/// Styled text through the rich setters, legacy strings where the host has no rich variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentDispatcher;

impl ComponentDispatcher {
    fn push_rich(
        player: &dyn PlayerHandle,
        view: &Presentation,
        flags: DisplayFlags,
    ) -> Result<(), DispatchError> {
        if view.labeled {
            player.set_display_name_rich(&view.above_head)?;
            player.set_custom_name(Some(&view.above_head.to_legacy()));
            player.set_custom_name_visible(flags.show_above_head);
            if flags.show_in_tab_list {
                player.set_player_list_name_rich(&view.tab_list)?;
            }
        } else {
            player.set_display_name_rich(&view.above_head)?;
            player.set_custom_name(None);
            player.set_custom_name_visible(false);
            player.set_player_list_name_rich(&view.tab_list)?;
        }
        Ok(())
    }
}

impl NameDispatcher for ComponentDispatcher {
    fn name(&self) -> &'static str {
        "component"
    }

    fn apply(
        &self,
        player: &dyn PlayerHandle,
        view: &Presentation,
        flags: DisplayFlags,
    ) -> DispatchOutcome {
        match Self::push_rich(player, view, flags) {
            Ok(()) => DispatchOutcome::Rich,
            Err(e) => {
                warn!(player = %player.id(), error = %e, "rich display failed, using legacy names");
                if view.labeled {
                    LegacyDispatcher::push(player, view, flags);
                } else {
                    player.set_custom_name(None);
                    player.set_custom_name_visible(false);
                    player.set_player_list_name(None);
                }
                debug!(player = %player.id(), "legacy fallback applied");
                DispatchOutcome::Fallback
            }
        }
    }
}
