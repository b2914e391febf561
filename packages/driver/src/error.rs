use thiserror::Error;
use zwave_core::value_id::ValueId;

/// Error taxonomy for the driver's external interface. Every fallible client
/// operation (spec §7) resolves to one of these; internal recoverable
/// conditions (NAK, retry-exhausted-but-still-advancing) never escape as
/// `Err` since the pipeline is designed to make progress regardless.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] zwave_serial::error::Error),

    #[error("frame error: {0}")]
    Frame(#[from] zwave_core::encoding::EncodingError),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("operation timed out")]
    Timeout,

    #[error("the controller refused the request")]
    Refused,

    #[error("value {value_id:?} is stale and cannot be set")]
    Stale { value_id: ValueId },

    #[error("the driver is not ready")]
    NotReady,

    #[error("the driver has been closed")]
    Closed,

    #[error("unknown node {0}")]
    UnknownNode(zwave_core::definitions::NodeId),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
