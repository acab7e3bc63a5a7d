pub mod console;
#[cfg(all(feature = "desktop", unix, not(target_os = "macos")))]
pub mod desktop;
pub mod opentdb;
pub mod settings;

pub use console::ConsoleGateway;
#[cfg(all(feature = "desktop", unix, not(target_os = "macos")))]
pub use desktop::DesktopGateway;
pub use opentdb::OpenTdbAdapter;
pub use settings::{JsonFileSettings, MemorySettings};
