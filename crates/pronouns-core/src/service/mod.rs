//! Orchestrator tying validation, the label store and the display synchronizer together.
//!
//! Every accepted mutation follows the same path: store the record, arm the
//! debounced save, then refresh the player's names if they are online. A
//! rejected request changes nothing.
use std::sync::Arc;

use pronouns_model::{CapabilityProfile, LabelRecord, PlayerId, Rgb, ValidationError};
use tracing::{debug, info, instrument, warn};

use crate::{
    capability::{HostProbe, detect, install_profile},
    color::{parse_color, parse_token, render_gradient},
    config::PronounsConfig,
    display::{DisplaySynchronizer, HostScheduler, PlayerRef, label_text},
    error::CoreError,
    store::{LabelStore, Storage},
};

/// The game-server host as seen by the service.
pub trait Host: Send + Sync {
    /// Online player with this id, if any.
    fn player(&self, id: &PlayerId) -> Option<PlayerRef>;

    fn online_players(&self) -> Vec<PlayerRef>;

    fn scheduler(&self) -> Arc<dyn HostScheduler>;

    fn probe(&self) -> &dyn HostProbe;
}

/// Who is asking for a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// `None` for the server console.
    pub id: Option<PlayerId>,
    /// May change other players' labels and exceed the gradient color limit.
    pub privileged: bool,
}

impl Actor {
    pub fn player(id: PlayerId) -> Self {
        Self {
            id: Some(id),
            privileged: false,
        }
    }

    pub fn operator(id: PlayerId) -> Self {
        Self {
            id: Some(id),
            privileged: true,
        }
    }

    pub fn console() -> Self {
        Self {
            id: None,
            privileged: true,
        }
    }
}

/// Where gradient stops come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradientSource {
    /// Named preset from the configuration.
    Preset(String),
    /// Explicit color tokens, in order.
    Colors(Vec<String>),
}

/// Minimum number of explicit gradient colors.
const MIN_EXPLICIT_STOPS: usize = 2;

pub struct PronounsService {
    config: PronounsConfig,
    host: Arc<dyn Host>,
    store: LabelStore,
    display: DisplaySynchronizer,
}

impl PronounsService {
    /// Detect the host tier, load labels and refresh everyone already online.
    ///
    /// Corrupt stored labels abort startup; missing ones start empty.
    #[instrument(
        level = "debug",
        skip(config, host, storage),
        fields(location = %storage.describe())
    )]
    pub async fn start(
        config: PronounsConfig,
        host: Arc<dyn Host>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, CoreError> {
        if config.general.max_pronoun_length == 0 {
            return Err(CoreError::Config(
                "general.max-pronoun-length must be positive".into(),
            ));
        }

        let profile = detect(host.probe());
        install_profile(profile);

        let store = LabelStore::load(storage, config.store()).await?;
        let display = DisplaySynchronizer::new(profile, config.display_flags(), host.scheduler())
            .with_enabled(config.general.update_display_names);

        let service = Self {
            config,
            host,
            store,
            display,
        };
        let online = service.host.online_players();
        for player in &online {
            service.refresh(player.clone());
        }
        info!(
            tier = %profile.tier(),
            entries = service.store.len(),
            online = online.len(),
            "pronouns service started"
        );
        Ok(service)
    }

    pub fn profile(&self) -> CapabilityProfile {
        self.display.profile()
    }

    pub fn config(&self) -> &PronounsConfig {
        &self.config
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn get(&self, id: &PlayerId) -> Option<LabelRecord> {
        self.store.get(id)
    }

    /// Plain label text (no color) for other host integrations.
    pub fn label_text(&self, id: &PlayerId) -> Option<String> {
        self.store.get(id).map(|r| label_text(&r))
    }

    /// Set a single-color label.
    #[instrument(level = "debug", skip(self, text), fields(player = %id))]
    pub fn set_solid(
        &self,
        id: PlayerId,
        token: &str,
        text: &str,
    ) -> Result<LabelRecord, ValidationError> {
        let color =
            parse_token(token).map_err(|_| ValidationError::UnknownColor(token.to_string()))?;
        self.check_text(text)?;
        Ok(self.commit(id, LabelRecord::solid(color, text)))
    }

    /// Set a gradient label.
    ///
    /// `privileged` lifts the color limit for explicit colors. Presets are
    /// never limited.
    #[instrument(level = "debug", skip(self, text), fields(player = %id))]
    pub fn set_gradient(
        &self,
        id: PlayerId,
        source: GradientSource,
        text: &str,
        privileged: bool,
    ) -> Result<LabelRecord, ValidationError> {
        let stops = self.resolve_stops(&source, privileged)?;
        self.check_text(text)?;
        let rendered = render_gradient(&stops, text);
        Ok(self.commit(id, LabelRecord::Gradient { stops, rendered }))
    }

    /// Remove `target`'s label on behalf of `actor`.
    #[instrument(level = "debug", skip(self, target), fields(target = %target))]
    pub fn remove(&self, actor: &Actor, target: PlayerId) -> Result<(), ValidationError> {
        if actor.id != Some(target) && !actor.privileged {
            return Err(ValidationError::Forbidden);
        }
        if self.store.remove(&target).is_none() {
            return Err(ValidationError::NotSet);
        }
        self.store.schedule_save();
        if let Some(player) = self.host.player(&target) {
            self.display.refresh(player, None);
        }
        info!(player = %target, by = ?actor.id, "pronouns removed");
        Ok(())
    }

    /// Apply the stored label (or the bare name) to a player who just joined.
    pub fn on_player_connect(&self, player: PlayerRef) -> bool {
        debug!(player = %player.id(), "player connected");
        self.refresh(player)
    }

    pub fn on_player_disconnect(&self, id: &PlayerId) {
        debug!(player = %id, "player disconnected");
        self.store.schedule_save();
    }

    /// Cancel the pending save and write the map synchronously.
    #[instrument(level = "debug", skip(self))]
    pub fn shutdown(&self) -> Result<(), CoreError> {
        self.store.close()?;
        info!(entries = self.store.len(), "pronouns service stopped");
        Ok(())
    }

    fn refresh(&self, player: PlayerRef) -> bool {
        let record = self.store.get(&player.id());
        self.display.refresh(player, record.as_ref())
    }

    fn commit(&self, id: PlayerId, record: LabelRecord) -> LabelRecord {
        let replaced = self.store.set(id, record.clone()).is_some();
        self.store.schedule_save();
        if let Some(player) = self.host.player(&id) {
            self.display.refresh(player, Some(&record));
        }
        info!(player = %id, tag = %record.tag(), replaced, "pronouns set");
        record
    }

    fn check_text(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let limit = self.config.general.max_pronoun_length;
        let actual = text.chars().count();
        if actual > limit {
            return Err(ValidationError::TooLong { limit, actual });
        }
        Ok(())
    }

    fn resolve_stops(
        &self,
        source: &GradientSource,
        privileged: bool,
    ) -> Result<Vec<Rgb>, ValidationError> {
        match source {
            GradientSource::Preset(name) => {
                let tokens = self
                    .config
                    .gradient
                    .preset(name)
                    .ok_or_else(|| ValidationError::UnknownPreset(name.clone()))?;
                let stops = parse_all(&tokens)?;
                if stops.is_empty() {
                    warn!(preset = %name, "gradient preset has no colors");
                    return Err(ValidationError::TooFewStops { min: 1, actual: 0 });
                }
                Ok(stops)
            }
            GradientSource::Colors(tokens) => {
                let stops = parse_all(tokens)?;
                if stops.len() < MIN_EXPLICIT_STOPS {
                    return Err(ValidationError::TooFewStops {
                        min: MIN_EXPLICIT_STOPS,
                        actual: stops.len(),
                    });
                }
                let limit = self.config.gradient.color_limit;
                if limit > 0 && stops.len() > limit && !privileged {
                    return Err(ValidationError::TooManyStops {
                        limit,
                        actual: stops.len(),
                    });
                }
                Ok(stops)
            }
        }
    }
}

fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Rgb>, ValidationError> {
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            parse_color(t).map_err(|_| ValidationError::UnknownColor(t.to_string()))
        })
        .collect()
}

impl std::fmt::Debug for PronounsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PronounsService")
            .field("store", &self.store)
            .field("display", &self.display)
            .finish()
    }
}
