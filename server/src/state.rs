use std::collections::HashMap;
use std::sync::Arc;

use figboard_shared::Figure;
use tokio::sync::RwLock;

use crate::storage::Storage;

pub const MAX_FIGURES: usize = 2000;
pub const MAX_SEGMENTS_PER_FIGURE: usize = 5000;
pub const MAX_ID_LEN: usize = 64;
pub const MAX_COLOR_LEN: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<RwLock<HashMap<String, Arc<RwLock<Board>>>>>,
    pub storage: Arc<dyn Storage>,
    pub surface_width: f64,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, surface_width: f64) -> Self {
        Self {
            boards: Arc::new(RwLock::new(HashMap::new())),
            storage,
            surface_width,
        }
    }
}

#[derive(Default)]
pub struct Board {
    pub figures: Vec<Figure>,
    pub dirty: bool,
}

impl Board {
    pub fn new(figures: Vec<Figure>) -> Self {
        Self {
            figures,
            dirty: false,
        }
    }
}
