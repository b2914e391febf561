use crate::{Direction, ImmutableLogger, LogInfo, LogPayload, LogPayloadText, Loglevel, ToLogPayload};
use std::{borrow::Cow, sync::Arc};
use zwave_core::definitions::NodeId;
use zwave_serial::command::{Command, CommandType};

/// Messages scoped to a single node: interview progress, value changes,
/// commands sent to or received from it.
pub struct NodeLogger {
    node_id: NodeId,
    inner: Arc<dyn ImmutableLogger>,
}

impl NodeLogger {
    pub fn new(inner: Arc<dyn ImmutableLogger>, node_id: NodeId) -> Self {
        Self { inner, node_id }
    }

    fn primary_tags(&self) -> Vec<Cow<'static, str>> {
        vec![format!("Node {:0>3}", self.node_id).into()]
    }

    pub fn message<L: Into<LogPayload>>(&self, message: impl Fn() -> L, level: Loglevel) {
        if self.inner.log_level() < level {
            return;
        }

        let log = LogInfo::builder()
            .label("CNTRLR")
            .primary_tags(self.primary_tags())
            .payload(message().into())
            .build();
        self.inner.log(log, level);
    }

    pub fn command(&self, command: &dyn Command, direction: Direction) {
        let level = Loglevel::Debug;
        if self.inner.log_level() < level {
            return;
        }

        let mut primary_tags = self.primary_tags();

        let type_tag = if command.command_type() == CommandType::Request {
            "REQ"
        } else {
            "RES"
        };
        primary_tags.push(type_tag.into());

        let function_tag = format!("{:?}", command.function_type());
        primary_tags.push(function_tag.into());

        let payload = LogPayloadText::new("").with_nested(command.to_log_payload());

        let log = LogInfo::builder()
            .label("CNTRLR")
            .primary_tags(primary_tags)
            .direction(direction)
            .payload(payload)
            .build();
        self.inner.log(log, level);
    }

    pub fn error<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Error);
    }

    pub fn warn<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Warn);
    }

    pub fn info<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Info);
    }

    pub fn verbose<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Verbose);
    }

    pub fn debug<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Debug);
    }

    pub fn silly<L: Into<LogPayload>>(&self, message: impl Fn() -> L) {
        self.message(message, Loglevel::Silly);
    }

    pub fn level(&self) -> Loglevel {
        self.inner.log_level()
    }
}
