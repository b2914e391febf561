#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Serialport(#[from] tokio_serial::Error),
    #[error(transparent)]
    IO(#[from] tokio::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
