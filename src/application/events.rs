//! Progress sink that streams feedback to a gRPC client.
//!
//! Sink traffic is turned into wire events and pushed through a bounded
//! tokio channel while the solve runs on a blocking worker. A client
//! that goes away closes the channel, which surfaces as cancellation at
//! the next between-phase check.

use tokio::sync::mpsc;
use tonic::Status;

use crate::domain::progress::{ProgressSink, SinkLevel};

use super::mappers::{self, fire_opt::SolveEvent};

pub struct ChannelSink {
    tx: mpsc::Sender<Result<SolveEvent, Status>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Result<SolveEvent, Status>>) -> Self {
        Self { tx }
    }

    fn send_log(&self, level: SinkLevel, message: &str) {
        // A closed receiver just means the client stopped listening.
        let _ = self.tx.blocking_send(Ok(mappers::log_event(level, message)));
    }
}

impl ProgressSink for ChannelSink {
    fn push_info(&self, message: &str) {
        self.send_log(SinkLevel::Info, message);
    }

    fn push_warning(&self, message: &str) {
        self.send_log(SinkLevel::Warning, message);
    }

    fn push_console(&self, line: &str) {
        self.send_log(SinkLevel::Console, line);
    }

    fn report_error(&self, message: &str) {
        self.send_log(SinkLevel::Error, message);
    }

    fn set_progress(&self, percent: u8) {
        let _ = self
            .tx
            .blocking_send(Ok(mappers::progress_event(percent, "")));
    }

    fn is_canceled(&self) -> bool {
        self.tx.is_closed()
    }
}
