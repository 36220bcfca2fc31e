use crate::api::Logger;
use log::{info, warn};

/// Forwards engine messages to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Logger for LogSink {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }
}
