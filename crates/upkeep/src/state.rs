use std::{ops::Deref, sync::Arc};

use crate::config::Config;

#[derive(Clone)]
pub struct SharedState(Arc<State>);

impl From<Arc<State>> for SharedState {
    fn from(value: Arc<State>) -> Self {
        Self(value)
    }
}

impl Deref for SharedState {
    type Target = Arc<State>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct State {
    pub config: Config,
}

impl State {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
