pub mod app;
pub mod badges;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streaks;
pub mod ui;

pub use app::router;
pub use errors::StoreError;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, resolve_data_dir};
pub use store::{HabitStore, ToggleOutcome};
pub use streaks::{Streaks, compute_streaks, compute_streaks_at};
