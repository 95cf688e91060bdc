use crate::storage::FileStore;
use crate::store::HabitStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<HabitStore<FileStore>>>,
}

impl AppState {
    pub fn new(store: HabitStore<FileStore>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
