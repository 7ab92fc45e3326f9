mod domain;
pub use domain::{ColorToken, Location, NamedColor, PlayerId, Rgb};
pub use domain::{GRADIENT_TAG, LEGACY_RESET, SECTION_SIGN};

mod capability;
pub use capability::{CapabilityProfile, HostTier};

mod record;
pub use record::LabelRecord;

mod error;
pub use error::{ModelError, ModelResult, ValidationError};
