use thiserror::Error;

/// Fatal worker failures. Everything per-job (spawn errors, missing report
/// fields, malformed batch lines) is recovered inline and never reaches this
/// type; only the control and result channels can kill the worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("control channel read failed")]
    ChannelRead {
        #[source]
        source: std::io::Error,
    },

    #[error("result channel write failed")]
    ChannelWrite {
        #[source]
        source: std::io::Error,
    },
}
