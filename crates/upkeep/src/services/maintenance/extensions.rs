use crate::SharedState;

use super::MaintenanceClient;

pub trait MaintenanceState {
    fn maintenance(&self) -> MaintenanceClient;
}

impl MaintenanceState for SharedState {
    fn maintenance(&self) -> MaintenanceClient {
        MaintenanceClient::new(&self.config)
    }
}
