use crate::{error::Result, frame::RawSerialFrame};

/// Shared interface of a transport carrying raw serial frames, whether a
/// real serial port or a TCP socket (used by Z-Wave-over-IP sticks).
/// Construction is intentionally not part of the trait: `SerialPort::new`
/// takes a device path, `TcpSocket::new` an address, and there is no useful
/// common signature between them.
pub trait SerialBinding {
    fn write(
        &mut self,
        frame: RawSerialFrame,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn read(&mut self) -> impl std::future::Future<Output = Option<RawSerialFrame>> + Send;
}
