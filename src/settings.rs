//! The INI document the player restores at startup and rewrites at shutdown:
//! window size, output device, playlist column widths and the playlist itself.

mod model;
mod store;

pub use model::{AudioState, ColumnWidths, PersistedSettings, WindowState};
pub use store::SettingsStore;
