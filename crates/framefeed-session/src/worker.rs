use framefeed_frame::PushOutcome;
use framefeed_source::{SourceConnector, StopSignal, StreamConfig};
use tracing::{debug, warn};

use std::sync::Arc;

use crate::session::Shared;
use crate::status::{ConnectionStatus, SessionErrorKind};

/// Body of the session worker thread.
///
/// Connect once, then pull frames until the stop signal is raised or the
/// source gives out. Status moves under the session lock; the blocking
/// calls (`connect`, `next_frame`) run with no lock held.
pub(crate) fn run(
    shared: Arc<Shared>,
    stop: StopSignal,
    connector: Arc<dyn SourceConnector>,
    config: StreamConfig,
) {
    shared.advance_status(ConnectionStatus::Connecting);
    debug!(endpoint = %config.endpoint, stream = %config.stream, "worker connecting");

    let mut source = match connector.connect(&config, &stop) {
        Ok(source) => source,
        Err(err) if err.is_interrupted() => {
            debug!(stream = %config.stream, "connect interrupted by shutdown");
            return;
        }
        Err(err) => {
            warn!(stream = %config.stream, error = %err, "connect failed");
            shared.advance_status(ConnectionStatus::Error(SessionErrorKind::from_source(&err)));
            return;
        }
    };

    shared.advance_status(ConnectionStatus::Connected);
    debug!(stream = %config.stream, "worker connected");

    loop {
        if stop.is_raised() {
            debug!(stream = %config.stream, "worker stopping");
            return;
        }
        match source.next_frame(&stop) {
            Ok(Some(frame)) => {
                if shared.offer_frame(frame) == PushOutcome::DroppedNewest {
                    warn!(stream = %config.stream, "frame queue full, dropping newest frame");
                }
            }
            Ok(None) => {
                debug!(stream = %config.stream, "upstream ended the stream");
                shared.advance_status(ConnectionStatus::Error(SessionErrorKind::StreamEnded));
                return;
            }
            Err(err) if err.is_interrupted() => {
                debug!(stream = %config.stream, "frame wait interrupted by shutdown");
                return;
            }
            Err(err) => {
                warn!(stream = %config.stream, error = %err, "source failed");
                shared.advance_status(ConnectionStatus::Error(SessionErrorKind::from_source(&err)));
                return;
            }
        }
    }
}
