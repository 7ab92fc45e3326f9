//! In-memory host fakes shared by unit tests.
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use pronouns_model::{Location, PlayerId};

use crate::{
    capability::HostProbe,
    color::StyledText,
    display::{DispatchError, HostScheduler, PlayerHandle, PlayerRef, Task},
    service::Host,
};

/// One setter invocation observed on a [`FakePlayer`]. Rich calls record plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DisplayName(String),
    CustomName(Option<String>),
    CustomNameVisible(bool),
    ListName(Option<String>),
    DisplayNameRich(String),
    ListNameRich(String),
}

pub struct FakePlayer {
    id: PlayerId,
    name: String,
    location: Mutex<Location>,
    calls: Mutex<Vec<Call>>,
    fail_rich: AtomicBool,
}

impl FakePlayer {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            location: Mutex::new(Location::new("world", 0.5, 64.0, 0.5)),
            calls: Mutex::new(Vec::new()),
            fail_rich: AtomicBool::new(false),
        }
    }

    pub fn arc(name: &str) -> Arc<Self> {
        Arc::new(Self::new(PlayerId::new_v4(), name))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_display_name(&self) -> Option<String> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            Call::DisplayName(s) | Call::DisplayNameRich(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn fail_rich(&self, fail: bool) {
        self.fail_rich.store(fail, Ordering::SeqCst);
    }

    pub fn move_to(&self, location: Location) {
        *self.location.lock() = location;
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn rich(&self, call: Call) -> Result<(), DispatchError> {
        if self.fail_rich.load(Ordering::SeqCst) {
            return Err(DispatchError::Failed("simulated".into()));
        }
        self.record(call);
        Ok(())
    }
}

impl PlayerHandle for FakePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Location {
        self.location.lock().clone()
    }

    fn set_display_name(&self, legacy: &str) {
        self.record(Call::DisplayName(legacy.to_string()));
    }

    fn set_custom_name(&self, legacy: Option<&str>) {
        self.record(Call::CustomName(legacy.map(str::to_string)));
    }

    fn set_custom_name_visible(&self, visible: bool) {
        self.record(Call::CustomNameVisible(visible));
    }

    fn set_player_list_name(&self, legacy: Option<&str>) {
        self.record(Call::ListName(legacy.map(str::to_string)));
    }

    fn set_display_name_rich(&self, text: &StyledText) -> Result<(), DispatchError> {
        self.rich(Call::DisplayNameRich(text.plain()))
    }

    fn set_player_list_name_rich(&self, text: &StyledText) -> Result<(), DispatchError> {
        self.rich(Call::ListNameRich(text.plain()))
    }
}

/// Where a [`FakeScheduler`] was asked to run a task.
#[derive(Debug, Clone, PartialEq)]
pub enum Ran {
    Main,
    Region(Location),
}

/// Runs every task immediately and records the requested context.
pub struct FakeScheduler {
    on_main: bool,
    ran: Mutex<Vec<Ran>>,
}

impl FakeScheduler {
    pub fn new(on_main: bool) -> Self {
        Self {
            on_main,
            ran: Mutex::new(Vec::new()),
        }
    }

    pub fn ran(&self) -> Vec<Ran> {
        self.ran.lock().clone()
    }
}

impl HostScheduler for FakeScheduler {
    fn run_on_main(&self, task: Task) {
        self.ran.lock().push(Ran::Main);
        task();
    }

    fn run_at(&self, location: &Location, task: Task) {
        self.ran.lock().push(Ran::Region(location.clone()));
        task();
    }

    fn is_main_thread(&self) -> bool {
        self.on_main
    }
}

pub struct FakeProbe {
    pub region: bool,
    pub component: bool,
}

impl HostProbe for FakeProbe {
    fn has_region_scheduler(&self) -> bool {
        self.region
    }

    fn has_component_display_names(&self) -> bool {
        self.component
    }
}

/// Host with a fixed probe answer and a mutable set of online players.
pub struct FakeHost {
    probe: FakeProbe,
    scheduler: Arc<FakeScheduler>,
    online: Mutex<HashMap<PlayerId, Arc<FakePlayer>>>,
}

impl FakeHost {
    pub fn new(region: bool, component: bool) -> Arc<Self> {
        Arc::new(Self {
            probe: FakeProbe { region, component },
            scheduler: Arc::new(FakeScheduler::new(true)),
            online: Mutex::new(HashMap::new()),
        })
    }

    pub fn join(&self, name: &str) -> Arc<FakePlayer> {
        let player = FakePlayer::arc(name);
        self.online.lock().insert(player.id(), player.clone());
        player
    }

    pub fn leave(&self, id: &PlayerId) {
        self.online.lock().remove(id);
    }

    pub fn fake_scheduler(&self) -> Arc<FakeScheduler> {
        self.scheduler.clone()
    }
}

impl Host for FakeHost {
    fn player(&self, id: &PlayerId) -> Option<PlayerRef> {
        self.online
            .lock()
            .get(id)
            .map(|p| p.clone() as PlayerRef)
    }

    fn online_players(&self) -> Vec<PlayerRef> {
        self.online
            .lock()
            .values()
            .map(|p| p.clone() as PlayerRef)
            .collect()
    }

    fn scheduler(&self) -> Arc<dyn HostScheduler> {
        self.scheduler.clone()
    }

    fn probe(&self) -> &dyn HostProbe {
        &self.probe
    }
}
