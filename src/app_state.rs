use std::sync::Arc;

use crate::pipeline::ContentService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContentService>,
}

impl AppState {
    pub fn new(service: ContentService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
