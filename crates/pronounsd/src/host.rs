//! Console-backed stand-in for a game server.
//!
//! A dedicated "server-main" thread plays the main context and a small pool
//! of region threads plays the per-region executors. Player name changes are
//! logged instead of being sent to clients.
use std::{
    collections::{HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
    sync::Arc,
    thread::{self, JoinHandle, ThreadId},
};

use anyhow::Context;
use parking_lot::Mutex;
use pronouns_core::{
    capability::HostProbe,
    color::StyledText,
    display::{DispatchError, HostScheduler, PlayerHandle, PlayerRef, Task},
    service::Host,
};
use pronouns_model::{HostTier, Location, PlayerId};
use tokio::sync::mpsc;
use tracing::{info, warn};

const REGION_THREADS: usize = 2;

pub fn parse_tier(s: &str) -> anyhow::Result<HostTier> {
    match s.trim().to_ascii_lowercase().as_str() {
        "legacy" => Ok(HostTier::Legacy),
        "component" => Ok(HostTier::Component),
        "regionized" | "region" => Ok(HostTier::Regionized),
        other => {
            anyhow::bail!("unknown host tier {other:?} (expected legacy|component|regionized)")
        }
    }
}

struct Executor {
    name: String,
    tx: mpsc::UnboundedSender<Task>,
    handle: JoinHandle<()>,
}

impl Executor {
    fn spawn(name: String) -> anyhow::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Task>();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Some(task) = rx.blocking_recv() {
                    task();
                }
            })
            .with_context(|| format!("spawn executor {name}"))?;
        Ok(Self { name, tx, handle })
    }

    fn submit(&self, task: Task) {
        if self.tx.send(task).is_err() {
            warn!(executor = %self.name, "executor stopped; task dropped");
        }
    }
}

pub struct ConsoleScheduler {
    main: Executor,
    main_id: ThreadId,
    regions: Vec<Executor>,
}

impl ConsoleScheduler {
    fn start() -> anyhow::Result<Self> {
        let main = Executor::spawn("server-main".into())?;
        let main_id = main.handle.thread().id();
        let regions = (0..REGION_THREADS)
            .map(|i| Executor::spawn(format!("region-{i}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            main,
            main_id,
            regions,
        })
    }

    fn region_for(&self, location: &Location) -> &Executor {
        let mut h = DefaultHasher::new();
        location.world.hash(&mut h);
        location.chunk().hash(&mut h);
        &self.regions[(h.finish() as usize) % self.regions.len()]
    }

    fn stop(self) {
        let Self { main, regions, .. } = self;
        for exec in std::iter::once(main).chain(regions) {
            drop(exec.tx);
            if exec.handle.join().is_err() {
                warn!(executor = %exec.name, "executor panicked");
            }
        }
    }
}

impl HostScheduler for ConsoleScheduler {
    fn run_on_main(&self, task: Task) {
        self.main.submit(task);
    }

    fn run_at(&self, location: &Location, task: Task) {
        self.region_for(location).submit(task);
    }

    fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_id
    }
}

pub struct ConsolePlayer {
    id: PlayerId,
    name: String,
    location: Location,
    rich: bool,
}

impl ConsolePlayer {
    fn thread_name() -> String {
        thread::current().name().unwrap_or("?").to_string()
    }
}

impl PlayerHandle for ConsolePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn set_display_name(&self, legacy: &str) {
        info!(player = %self.name, thread = %Self::thread_name(), value = legacy, "display name");
    }

    fn set_custom_name(&self, legacy: Option<&str>) {
        info!(player = %self.name, value = ?legacy, "custom name");
    }

    fn set_custom_name_visible(&self, visible: bool) {
        info!(player = %self.name, visible, "custom name visibility");
    }

    fn set_player_list_name(&self, legacy: Option<&str>) {
        info!(player = %self.name, value = ?legacy, "player list name");
    }

    fn set_display_name_rich(&self, text: &StyledText) -> Result<(), DispatchError> {
        if !self.rich {
            return Err(DispatchError::Unsupported("setDisplayName(Component)".into()));
        }
        info!(
            player = %self.name,
            thread = %Self::thread_name(),
            value = %text.plain(),
            spans = text.spans().len(),
            "display name (rich)"
        );
        Ok(())
    }

    fn set_player_list_name_rich(&self, text: &StyledText) -> Result<(), DispatchError> {
        if !self.rich {
            return Err(DispatchError::Unsupported("setPlayerListName(Component)".into()));
        }
        info!(player = %self.name, value = %text.plain(), "player list name (rich)");
        Ok(())
    }
}

struct Probe(HostTier);

impl HostProbe for Probe {
    fn has_region_scheduler(&self) -> bool {
        self.0 == HostTier::Regionized
    }

    fn has_component_display_names(&self) -> bool {
        self.0 != HostTier::Legacy
    }
}

pub struct ConsoleHost {
    probe: Probe,
    scheduler: Mutex<Option<Arc<ConsoleScheduler>>>,
    online: Mutex<HashMap<PlayerId, Arc<ConsolePlayer>>>,
}

impl ConsoleHost {
    pub fn start(tier: HostTier) -> anyhow::Result<Arc<Self>> {
        Ok(Arc::new(Self {
            probe: Probe(tier),
            scheduler: Mutex::new(Some(Arc::new(ConsoleScheduler::start()?))),
            online: Mutex::new(HashMap::new()),
        }))
    }

    pub fn join(&self, name: &str, location: Location) -> PlayerRef {
        let player = Arc::new(ConsolePlayer {
            id: PlayerId::new_v4(),
            name: name.to_string(),
            location,
            rich: self.probe.has_component_display_names(),
        });
        self.online.lock().insert(player.id, player.clone());
        info!(player = name, id = %player.id, "player joined");
        player
    }

    pub fn leave(&self, id: &PlayerId) {
        if let Some(p) = self.online.lock().remove(id) {
            info!(player = %p.name, "player left");
        }
    }

    /// Drain the executors and join their threads.
    pub fn stop(&self) {
        let Some(scheduler) = self.scheduler.lock().take() else {
            return;
        };
        match Arc::try_unwrap(scheduler) {
            Ok(scheduler) => scheduler.stop(),
            Err(_) => warn!("scheduler still shared; executors left running"),
        }
    }
}

impl Host for ConsoleHost {
    fn player(&self, id: &PlayerId) -> Option<PlayerRef> {
        self.online.lock().get(id).map(|p| p.clone() as PlayerRef)
    }

    fn online_players(&self) -> Vec<PlayerRef> {
        self.online
            .lock()
            .values()
            .map(|p| p.clone() as PlayerRef)
            .collect()
    }

    fn scheduler(&self) -> Arc<dyn HostScheduler> {
        match self.scheduler.lock().as_ref() {
            Some(s) => s.clone() as Arc<dyn HostScheduler>,
            None => Arc::new(Inline),
        }
    }

    fn probe(&self) -> &dyn HostProbe {
        &self.probe
    }
}

/// Used once the executors are gone.
struct Inline;

impl HostScheduler for Inline {
    fn run_on_main(&self, task: Task) {
        task();
    }

    fn run_at(&self, _location: &Location, task: Task) {
        task();
    }

    fn is_main_thread(&self) -> bool {
        true
    }
}
