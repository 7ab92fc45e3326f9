mod host;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use tracing::{info, warn};

use pronouns_core::{color::translate_ampersand, prelude::*};
use pronouns_model::{HostTier, Location, PlayerId, ValidationError};
use pronouns_observe::{LoggerConfig, init_local_offset, init_logger};

use crate::host::{ConsoleHost, parse_tier};

const ENV_TIER: &str = "PRONOUNS_HOST_TIER";
const ENV_DATA: &str = "PRONOUNS_DATA";

fn main() -> anyhow::Result<()> {
    // before any thread exists
    init_local_offset();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    // 1) logger
    init_logger(&LoggerConfig::default().with_env()?)?;
    info!("logger initialized");

    // 2) settings
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            serde_json::from_str::<PronounsConfig>(&raw).with_context(|| format!("parse {path}"))?
        }
        None => PronounsConfig::default(),
    };
    let tier = match std::env::var(ENV_TIER) {
        Ok(v) => parse_tier(&v)?,
        Err(_) => HostTier::Component,
    };
    let data = std::env::var(ENV_DATA)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/pronouns.json"));

    // 3) host + service
    let host = ConsoleHost::start(tier)?;
    let robin = host.join("Robin", Location::new("world", 12.0, 70.0, -4.0));
    let sam = host.join("Sam", Location::new("world_nether", 300.0, 40.0, 88.0));

    let service = PronounsService::start(
        config,
        host.clone(),
        Arc::new(FileStorage::new(&data)),
    )
    .await?;
    info!(
        tier = %service.profile().tier(),
        data = %data.display(),
        presets = ?service.config().gradient.preset_names(),
        "service ready"
    );

    // 4) a short session
    let set = service.set_solid(robin.id(), "light_purple", "they/them");
    reply(&service, &robin, set);
    let set = service.set_gradient(
        sam.id(),
        GradientSource::Preset("trans".into()),
        "she/her",
        false,
    );
    reply(&service, &sam, set);

    let too_many = GradientSource::Colors(
        ["red", "gold", "yellow", "green", "blue", "dark_purple"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    let set = service.set_gradient(robin.id(), too_many, "they/them", false);
    reply(&service, &robin, set);
    let removed = service.remove(&Actor::player(sam.id()), robin.id());
    reply(&service, &sam, removed);

    info!(
        robin = ?service.label_text(&robin.id()),
        sam = ?service.label_text(&sam.id()),
        "labels"
    );

    let removed = service.remove(&Actor::player(robin.id()), robin.id());
    reply(&service, &robin, removed);
    host.leave(&sam.id());
    service.on_player_disconnect(&sam.id());

    let save_delay = Duration::from_millis(service.config().general.save_delay_ms);
    tokio::time::sleep(save_delay + Duration::from_millis(250)).await;

    // 5) shutdown
    service.shutdown()?;
    drop(service);
    host.stop();
    Ok(())
}

/// Tell `player` how their command went, in the host's legacy color codes.
fn reply<T>(service: &PronounsService, player: &PlayerRef, outcome: Result<T, ValidationError>) {
    let message = match outcome {
        Ok(_) => match service.label_text(&player.id()) {
            Some(label) => translate_ampersand("&aYour pronouns are now &r") + &label,
            None => translate_ampersand("&aYour pronouns were removed"),
        },
        Err(e) => {
            warn!(player = %player.name(), error = %e, "request rejected");
            translate_ampersand("&c") + &e.to_string()
        }
    };
    tell(&player.id(), &player.name(), &message);
}

fn tell(id: &PlayerId, name: &str, message: &str) {
    info!(player = name, id = %id, message, "message");
}
