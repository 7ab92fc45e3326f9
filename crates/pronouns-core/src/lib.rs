pub mod capability;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::capability::{HostProbe, detect, install_profile, profile};
    pub use crate::config::PronounsConfig;
    pub use crate::display::{
        DisplayFlags, DisplaySynchronizer, HostScheduler, PlayerHandle, PlayerRef,
    };
    pub use crate::error::CoreError;
    pub use crate::service::{Actor, GradientSource, Host, PronounsService};
    pub use crate::store::{FileStorage, LabelStore, MemoryStorage, Storage, StoreConfig};
}
