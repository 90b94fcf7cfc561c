//! vitrine-core - headless lightbox engine
//!
//! Registry, navigation controller, gesture interpreter and open/close
//! lifecycle for the vitrine image lightbox. The page is reached only through
//! the [`Host`] trait, so everything here runs natively in tests.

pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod gesture;
pub mod host;
pub mod l10n;
pub mod layout;
pub mod lightbox;
pub mod load;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod navigation;
pub mod registry;
pub mod trigger;

pub use config::{Icons, Options};
pub use error::{ConfigError, LightboxError};
pub use events::{EventKind, LightboxEvent, ListenerId};
pub use gesture::{PointerInput, PointerKind};
pub use host::{Host, HostSignal};
pub use l10n::Labels;
pub use lightbox::{Key, Lightbox, Phase};
