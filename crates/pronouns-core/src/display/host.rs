use std::sync::Arc;

use pronouns_model::{Location, PlayerId};
use thiserror::Error;

use crate::color::StyledText;

/// Unit of work handed to the host scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Failure of a rich display call on a host that claimed to support it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("rich display api unavailable: {0}")]
    Unsupported(String),

    #[error("rich display call failed: {0}")]
    Failed(String),
}

/// Online player as exposed by the host.
///
/// The plain setters are present on every host generation and take
/// legacy-escaped strings. The `*_rich` setters are only meaningful on
/// component-capable hosts and may still fail at runtime.
pub trait PlayerHandle: Send + Sync {
    fn id(&self) -> PlayerId;

    fn name(&self) -> String;

    fn location(&self) -> Location;

    fn set_display_name(&self, legacy: &str);

    /// `None` clears the custom name.
    fn set_custom_name(&self, legacy: Option<&str>);

    fn set_custom_name_visible(&self, visible: bool);

    /// `None` restores the host default entry.
    fn set_player_list_name(&self, legacy: Option<&str>);

    fn set_display_name_rich(&self, text: &StyledText) -> Result<(), DispatchError>;

    fn set_player_list_name_rich(&self, text: &StyledText) -> Result<(), DispatchError>;
}

pub type PlayerRef = Arc<dyn PlayerHandle>;

/// Execution contexts offered by the host.
pub trait HostScheduler: Send + Sync {
    /// Run on the single main thread.
    fn run_on_main(&self, task: Task);

    /// Run on the executor owning the region around `location`.
    ///
    /// Only used on hosts with regionized scheduling.
    fn run_at(&self, location: &Location, task: Task);

    /// `true` when the caller is already on the main thread.
    fn is_main_thread(&self) -> bool;
}
