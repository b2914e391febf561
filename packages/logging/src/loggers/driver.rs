use crate::{Direction, ImmutableLogger, LogInfo, LogPayloadText, Loglevel};
use std::borrow::Cow;

/// Top-level driver lifecycle messages (startup, shutdown, reconnects) that
/// don't belong to a particular node or command.
pub struct DriverLogger {
    inner: Box<dyn ImmutableLogger>,
}

impl DriverLogger {
    pub fn new(inner: Box<dyn ImmutableLogger>) -> Self {
        Self { inner }
    }

    pub fn log_level(&self) -> Loglevel {
        self.inner.log_level()
    }

    pub fn set_log_level(&self, level: Loglevel) {
        self.inner.set_log_level(level);
    }

    pub fn message(&self, message: impl Into<Cow<'static, str>>) {
        let info = LogInfo::builder()
            .label("DRIVER")
            .direction(Direction::None)
            .payload(LogPayloadText::new(message))
            .build();
        self.inner.log(info, Loglevel::Info);
    }

    pub fn error(&self, message: impl Into<Cow<'static, str>>) {
        let info = LogInfo::builder()
            .label("DRIVER")
            .payload(LogPayloadText::new(message))
            .build();
        self.inner.log(info, Loglevel::Error);
    }

    pub fn warn(&self, message: impl Into<Cow<'static, str>>) {
        let info = LogInfo::builder()
            .label("DRIVER")
            .payload(LogPayloadText::new(message))
            .build();
        self.inner.log(info, Loglevel::Warn);
    }
}
