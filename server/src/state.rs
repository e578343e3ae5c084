use std::sync::Arc;

use dataset::SharedStore;

use super::config::Config;

pub struct State {
    pub config: Config,
    pub store: SharedStore,
}

impl State {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let store = SharedStore::new(&config.dataset_dir);

        Arc::new(Self { config, store })
    }
}
