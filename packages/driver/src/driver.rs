use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use zwave_cc::{
    AssociationCCGet, BasicCCReport, BinarySwitchCCReport, CommandClass, CommandClassFrame,
    ManufacturerSpecificCCGet, VersionCCCommandClassGet, WakeUpCCIntervalGet,
    WakeUpCCNoMoreInformation, CC,
};
use zwave_core::definitions::{
    CommandClasses, FunctionType, Genre, HomeId, NodeId, QueryStage, ValueType,
};
use zwave_core::encoding::{Parsable, Serializable};
use zwave_core::value_id::ValueId;
use zwave_core::values::{ValueMetadata, ValueVariant};
use zwave_logging::loggers::DriverLogger;
use zwave_logging::{ImmutableLogger, LogInfo, Loglevel};
use zwave_serial::binding::SerialBinding;
use zwave_serial::command::capability::{
    GetControllerIdRequest, GetControllerIdResponse, GetSerialApiInitDataRequest,
    GetSerialApiInitDataResponse,
};
use zwave_serial::command::network_mgmt::{GetNodeProtocolInfoRequest, GetNodeProtocolInfoResponse};
use zwave_serial::command::transport::{
    ApplicationCommandRequest, SendDataCallback, SendDataRequest, TransmitOptions, TransmitStatus,
};
use zwave_serial::command::{Command, CommandFrame, CommandType};
use zwave_serial::frame::{ControlFlow, RawSerialFrame, SerialData};
use zwave_serial::serialport::{SerialPort, TcpSocket, ZWavePort};

use crate::codec::{application_reply, encode_get, encode_set};
use crate::controller::{Controller, ControllerInfo};
use crate::error::{Error, Result};
use crate::node::{NodeState, NodeTable};
use crate::notification::Notification;
use crate::options::DriverOptions;
use crate::persistence;
use crate::send_queue::{Msg, Priority, SendQueues};
use crate::tasks::{DnsTask, PollingTask, TimerTask};
use crate::transmit::{TransmitEngineEffect, TransmitEngineInput, TransmitSession};
use crate::value_registry::{ReportOutcome, ValueRegistry};

/// Command classes this driver queries a version for during the `Versions`
/// interview stage (spec §4.4), in the order they're requested.
const VERSIONED_COMMAND_CLASSES: [CommandClasses; 7] = [
    CommandClasses::Basic,
    CommandClasses::BinarySwitch,
    CommandClasses::MultilevelSensor,
    CommandClasses::Configuration,
    CommandClasses::ManufacturerSpecific,
    CommandClasses::Association,
    CommandClasses::WakeUp,
];

/// Bridges a mutable [`zwave_logging::Logger`] into the `Send + Sync`,
/// `&self`-only [`ImmutableLogger`] the higher-level loggers require. Every
/// concrete logger in `zwave_logging::loggers` is constructed around an
/// `Arc<dyn ImmutableLogger>`/`Box<dyn ImmutableLogger>` it is handed, not
/// around a sink of its own, so something at the root has to close that
/// loop; a single mutex is enough since log lines are low-frequency
/// compared to wire traffic.
struct SyncLogger<L>(Mutex<L>);

impl<L: zwave_logging::Logger + Send> ImmutableLogger for SyncLogger<L> {
    fn log(&self, log: LogInfo, level: Loglevel) {
        self.0.lock().unwrap().log(log, level);
    }

    fn log_level(&self) -> Loglevel {
        self.0.lock().unwrap().log_level()
    }

    fn set_log_level(&self, level: Loglevel) {
        self.0.lock().unwrap().set_log_level(level);
    }
}

fn open_transport(uri: &str) -> Result<ZWavePort> {
    if let Some(addr) = uri.strip_prefix("tcp://") {
        Ok(ZWavePort::Tcp(TcpSocket::new(addr)?))
    } else {
        Ok(ZWavePort::Serial(SerialPort::new(uri)?))
    }
}

/// Issues one request and blocks until the matching response arrives,
/// forwarding ACKs and acking every data frame in between. Only used during
/// startup, before the send queue and transmit engine exist, since the
/// serial API only ever has one bootstrap command in flight at a time.
async fn request<C>(port: &mut ZWavePort, cmd: &C) -> Result<CommandFrame>
where
    C: Command,
    for<'a> CommandFrame: From<&'a C>,
{
    let frame: CommandFrame = cmd.into();
    port.write(RawSerialFrame::Data(SerialData::new(frame.try_to_vec()?)))
        .await?;

    loop {
        match port.read().await.ok_or(Error::Closed)? {
            RawSerialFrame::ControlFlow(ControlFlow::Ack) => continue,
            RawSerialFrame::ControlFlow(_) => continue,
            RawSerialFrame::Garbage(_) => continue,
            RawSerialFrame::Data(data) => {
                port.write(RawSerialFrame::ControlFlow(ControlFlow::Ack)).await?;
                let response = CommandFrame::try_from_slice(data.as_ref())?;
                if response.function_type == cmd.function_type()
                    && response.command_type == CommandType::Response
                {
                    return Ok(response);
                }
                // Anything else this early (an unsolicited ApplicationCommand,
                // say) is simply dropped; nothing is listening for it yet.
            }
        }
    }
}

/// Learns the controller's own identity and every node it already knows
/// about (spec §4.4's `ProtocolInfo` stage), populating `nodes` directly.
async fn bootstrap(port: &mut ZWavePort, nodes: &NodeTable) -> Result<ControllerInfo> {
    let id_frame = request(port, &GetControllerIdRequest).await?;
    let id = GetControllerIdResponse::try_from(&id_frame)?;

    let init_frame = request(port, &GetSerialApiInitDataRequest).await?;
    let init = GetSerialApiInitDataResponse::try_from(&init_frame)?;

    for node_id in init.node_ids {
        if node_id == id.own_node_id {
            continue;
        }
        let proto_frame = request(port, &GetNodeProtocolInfoRequest { node_id }).await?;
        let proto = GetNodeProtocolInfoResponse::try_from(&proto_frame)?;
        let mut node = NodeState::new(node_id, proto.protocol_info.capabilities, proto.protocol_info.device_class);
        node.advance_stage();
        nodes.insert(node);
    }

    Ok(ControllerInfo {
        home_id: id.home_id,
        own_node_id: id.own_node_id,
        suc_node_id: None,
    })
}

/// The handle a client holds. Cloning is cheap: every field is either an
/// `Arc` or a handle to a task shut down through `shutdown`.
#[derive(Clone)]
pub struct Driver {
    inner: Arc<Shared>,
    shutdown: Arc<Notify>,
}

struct Shared {
    options: DriverOptions,
    controller: Arc<Controller>,
    nodes: Arc<NodeTable>,
    values: Arc<ValueRegistry>,
    queues: Arc<Mutex<SendQueues>>,
    send_notify: Arc<Notify>,
    timer: Arc<TimerTask>,
    dns: Arc<DnsTask>,
    logger: DriverLogger,
}

impl Driver {
    /// Opens the transport, runs the bootstrap handshake, loads any
    /// persisted cache, then spawns the background tasks (spec §6 `open`).
    pub async fn open(options: DriverOptions) -> Result<Self> {
        let mut port = open_transport(&options.transport_uri)?;

        let nodes = Arc::new(NodeTable::new());
        let controller_info = bootstrap(&mut port, &nodes).await?;
        let controller = Arc::new(Controller::new());
        controller.set_info(controller_info);

        let values = Arc::new(ValueRegistry::new(controller_info.home_id));

        if let Some(dir) = options.user_dir_or_config() {
            if let Some(xml) = persistence::read_from_dir(dir)? {
                persistence::load_xml(&xml, controller_info.home_id, &nodes, &values)?;
            }
        }

        for node_id in nodes.all_ids() {
            values.notify(Notification::NodeAdded { node_id });
            if let Some(node) = nodes.get_clone(node_id) {
                values.notify(Notification::NodeProtocolInfo {
                    node_id,
                    device_class: node.device_class,
                });
            }
        }

        let queues = Arc::new(Mutex::new(SendQueues::new()));
        let send_notify = Arc::new(Notify::new());
        let timer = Arc::new(TimerTask::new());
        let dns = Arc::new(DnsTask::new(
            Box::new(crate::tasks::dns::SystemResolver),
            values.clone(),
        ));

        let sink: Box<dyn ImmutableLogger> = Box::new(SyncLogger(Mutex::new(
            zwave_logging::loggers::BaseLogger {
                level: Loglevel::Info,
                writer: Box::new(termcolor::StandardStream::stdout(termcolor::ColorChoice::Auto)),
                formatter: Box::new(zwave_logging::formatters::DefaultFormatter::new()),
            },
        )));
        let logger = DriverLogger::new(sink);
        logger.message("driver ready");
        values.notify(Notification::DriverReady);

        let shutdown = Arc::new(Notify::new());

        let shared = Arc::new(Shared {
            options,
            controller,
            nodes,
            values,
            queues,
            send_notify,
            timer,
            dns,
            logger,
        });

        let main_loop = MainLoop {
            port,
            shared: shared.clone(),
            shutdown: shutdown.clone(),
            callback_id: AtomicU8::new(1),
        };
        tokio::spawn(main_loop.run());

        for node_id in shared.nodes.all_ids() {
            advance_discovery(&shared, node_id);
        }

        let polling = PollingTask::new(
            shared.values.clone(),
            shared.nodes.clone(),
            shared.queues.clone(),
            shared.options.poll_interval,
        );
        tokio::spawn(polling.run(shutdown.clone()));

        if shared.options.enable_dns {
            let dns = shared.dns.clone();
            tokio::spawn(dns.run(shutdown.clone()));
        }

        Ok(Self {
            inner: shared,
            shutdown,
        })
    }

    pub fn register_watcher(&self, watcher: impl Fn(&Notification) + Send + Sync + 'static) {
        self.inner.values.add_watcher(watcher);
    }

    pub fn get_value(&self, value_id: &ValueId) -> Option<ValueVariant> {
        self.inner.values.get(value_id)
    }

    pub fn home_id(&self) -> HomeId {
        self.inner.values.home_id()
    }

    /// Stages `value` as the target of a user-initiated set, then queues the
    /// matching command-class `Set` (spec §4.5/§6). Only the handful of
    /// command classes this crate decodes reports for can be set back.
    pub fn set_value(&self, value_id: ValueId, value: ValueVariant) -> Result<()> {
        self.inner.values.begin_set(&value_id, value.clone())?;
        let payload = encode_set(&value_id, &value)?;
        self.enqueue(value_id.node_id, Priority::Command, payload);
        Ok(())
    }

    /// Queues an explicit `Get` for `value_id` (spec §6 `refreshValue`).
    pub fn refresh_value(&self, value_id: &ValueId) -> Result<()> {
        let payload = encode_get(value_id)?;
        self.enqueue_expecting_reply(value_id.node_id, Priority::Command, payload);
        Ok(())
    }

    /// Drops a node from the table and its values, and tells watchers it's
    /// gone (spec §6). There is no wire-level exclusion handshake in this
    /// crate; this only updates local state for a node already removed from
    /// the network some other way (e.g. via a vendor tool).
    pub fn remove_node(&self, node_id: NodeId) {
        if self.inner.nodes.remove(node_id).is_none() {
            return;
        }
        for value_id in self.inner.values.all_for_node(node_id) {
            self.inner.values.remove(&value_id);
        }
        self.inner.values.notify(Notification::NodeRemoved { node_id });
    }

    pub fn enable_polling(&self, value_id: &ValueId, intensity: u8) -> Result<()> {
        if !self.inner.values.set_polling_intensity(value_id, intensity) {
            return Err(Error::Stale { value_id: *value_id });
        }
        self.inner
            .values
            .notify(Notification::PollingEnabled { value_id: *value_id });
        Ok(())
    }

    /// Serializes the current node/value cache to `user_dir`/`config_dir`
    /// (spec §4.10/§4.13).
    pub fn write_config(&self) -> Result<()> {
        let dir = self
            .inner
            .options
            .user_dir_or_config()
            .ok_or(Error::NotReady)?;
        let xml = persistence::to_xml(&self.inner.nodes, &self.inner.values)?;
        persistence::write_to_dir(dir, &xml)
    }

    pub fn close(&self) {
        self.shutdown.notify_waiters();
    }

    fn enqueue(&self, node_id: NodeId, priority: Priority, payload: Vec<u8>) {
        let msg = Msg {
            payload,
            ..Msg::new(Some(node_id), priority)
        };
        self.inner.queues.lock().unwrap().push(msg);
        self.inner.send_notify.notify_one();
    }

    /// Like [`Self::enqueue`], but marks the message as expecting a
    /// command-class reply, so the transmit engine holds it open until one
    /// arrives instead of finishing at the `SendData` callback (spec §4.2).
    fn enqueue_expecting_reply(&self, node_id: NodeId, priority: Priority, payload: Vec<u8>) {
        let msg = Msg {
            payload,
            expected_reply: application_reply(),
            ..Msg::new(Some(node_id), priority)
        };
        self.inner.queues.lock().unwrap().push(msg);
        self.inner.send_notify.notify_one();
    }
}

/// Queues the wire request for `stage`'s one remaining unanswered `Get`, if
/// it has one. Returns `None` (without touching the queue) for stages whose
/// interview this crate cannot ground in a real request, in which case the
/// caller is expected to have already advanced past it.
fn stage_request(node: &NodeState, stage: QueryStage) -> Option<Vec<u8>> {
    match stage {
        QueryStage::WakeUp if node.can_sleep() => {
            let frame: CommandClassFrame = (&WakeUpCCIntervalGet {}).into();
            Some(frame.try_to_vec().unwrap_or_default())
        }
        QueryStage::ManufacturerSpecific => {
            let frame: CommandClassFrame = (&ManufacturerSpecificCCGet {}).into();
            Some(frame.try_to_vec().unwrap_or_default())
        }
        QueryStage::Versions => {
            let requested_cc = VERSIONED_COMMAND_CLASSES
                .into_iter()
                .find(|cc| !node.command_classes.contains_key(cc))?;
            let frame: CommandClassFrame = (&VersionCCCommandClassGet { requested_cc }).into();
            Some(frame.try_to_vec().unwrap_or_default())
        }
        QueryStage::Associations => {
            let frame: CommandClassFrame = (&AssociationCCGet { group_id: 1 }).into();
            Some(frame.try_to_vec().unwrap_or_default())
        }
        _ => None,
    }
}

/// Queues `stage`'s request for `node_id`, tagged so the report handler that
/// satisfies it knows which stage to advance (spec §4.4).
fn queue_stage_request(shared: &Shared, node_id: NodeId, stage: QueryStage, payload: Vec<u8>) {
    let msg = Msg {
        payload,
        expected_reply: application_reply(),
        stage_hint: Some(stage),
        ..Msg::new(Some(node_id), Priority::NodeQuery)
    };
    shared.queues.lock().unwrap().push(msg);
    shared.send_notify.notify_one();
}

/// Drives `node_id` through every interview stage that needs no wire round
/// trip, stopping once it either reaches a stage with a real request to send
/// (in which case that request is queued) or `Complete` (spec §4.4). Called
/// both at startup and whenever a report satisfies the stage a node is
/// currently waiting on.
fn advance_discovery(shared: &Shared, node_id: NodeId) {
    loop {
        let Some(node) = shared.nodes.get_clone(node_id) else {
            return;
        };
        let stage = node.query_stage;
        if stage.is_complete() {
            shared.values.notify(Notification::NodeReady { node_id });
            shared.values.notify(Notification::NodeQueriesComplete { node_id });
            if shared.nodes.all_queries_complete() {
                shared.values.notify(Notification::AllNodesQueried);
            } else if shared.nodes.awake_queries_complete() {
                shared.values.notify(Notification::AwakeNodesQueried);
            }
            return;
        }

        if stage == QueryStage::Instances {
            shared.nodes.with_mut(node_id, |n| {
                for info in n.command_classes.values_mut() {
                    if info.instance_count == 0 {
                        info.instance_count = 1;
                    }
                }
                n.advance_stage();
            });
            continue;
        }

        if let Some(payload) = stage_request(&node, stage) {
            queue_stage_request(shared, node_id, stage, payload);
            return;
        }

        // No groundable request for this stage (it either doesn't apply to
        // this node, like `WakeUp` on an always-listening node, or would
        // need a decoder this crate doesn't have, like a true NIF parse);
        // advance without a round trip.
        shared.nodes.with_mut(node_id, |n| n.advance_stage());
    }
}

/// Queues a follow-up `Get` for `value_id` when [`ReportOutcome::RequestRefresh`]
/// says the just-applied report left the value in a state that needs
/// confirming (spec §4.5 scenario 4), e.g. a `Set` bounced off a value whose
/// real state is still whatever the last report said.
fn queue_refresh(shared: &Shared, value_id: &ValueId) {
    let Ok(payload) = encode_get(value_id) else {
        return;
    };
    let msg = Msg {
        payload,
        expected_reply: application_reply(),
        ..Msg::new(Some(value_id.node_id), Priority::Command)
    };
    shared.queues.lock().unwrap().push(msg);
    shared.send_notify.notify_one();
}

/// Called when a stage's reply arrives so retries don't pile up silently:
/// if the per-stage attempt budget (spec §4.11 `stage_retries`) is spent,
/// give up on the stage and move on rather than block the rest of the
/// interview forever.
fn retry_or_advance_stage(shared: &Shared, node_id: NodeId, stage: QueryStage) {
    let attempts = shared
        .nodes
        .with_mut(node_id, |n| {
            if n.query_stage == stage {
                n.stage_attempts += 1;
            }
            n.stage_attempts
        })
        .unwrap_or(0);

    if attempts > shared.options.stage_retries {
        shared.logger.warn(format!(
            "node {node_id} giving up on {stage} after {attempts} attempts"
        ));
        shared.nodes.with_mut(node_id, |n| n.advance_stage());
    }
    advance_discovery(shared, node_id);
}

/// Owns the transport and drives both directions of wire traffic. `port` is
/// the only field not shared with [`Driver`], so it never needs its own
/// lock; everything else lives behind an `Arc` the client handle shares.
struct MainLoop {
    port: ZWavePort,
    shared: Arc<Shared>,
    shutdown: Arc<Notify>,
    callback_id: AtomicU8,
}

enum Inbound {
    Ack,
    Nak,
    Can,
    Frame(CommandFrame),
}

impl MainLoop {
    fn next_callback_id(&self) -> u8 {
        // 0 is reserved for "no callback expected" by the serial API.
        let id = self.callback_id.fetch_add(1, Ordering::Relaxed);
        if id == 0 {
            self.callback_id.store(1, Ordering::Relaxed);
            1
        } else {
            id
        }
    }

    async fn next_inbound(&mut self) -> Result<Inbound> {
        loop {
            match self.port.read().await.ok_or(Error::Closed)? {
                RawSerialFrame::ControlFlow(ControlFlow::Ack) => return Ok(Inbound::Ack),
                RawSerialFrame::ControlFlow(ControlFlow::Nak) => return Ok(Inbound::Nak),
                RawSerialFrame::ControlFlow(ControlFlow::Can) => return Ok(Inbound::Can),
                RawSerialFrame::Garbage(_) => continue,
                RawSerialFrame::Data(data) => {
                    self.port.write(RawSerialFrame::ControlFlow(ControlFlow::Ack)).await?;
                    return Ok(Inbound::Frame(CommandFrame::try_from_slice(data.as_ref())?));
                }
            }
        }
    }

    fn try_pop(&self) -> Option<Msg> {
        let nodes = self.shared.nodes.clone();
        self.shared
            .queues
            .lock()
            .unwrap()
            .pop_next(move |node_id| node_id.map(|n| nodes.is_awake(n)).unwrap_or(true))
    }

    /// Drives one [`Msg`] through the transmit engine (spec §4.2): one
    /// `SendData` request, its ack, then its eventual callback. Anything
    /// else that arrives while waiting is forwarded to [`Self::dispatch_frame`]
    /// rather than dropped, so an unrelated node report doesn't get lost
    /// just because the wire happened to be busy at the time.
    async fn send_msg(&mut self, msg: Msg) -> Result<bool> {
        let Some(node_id) = msg.node_id else {
            return Ok(true);
        };

        let session = TransmitSession::new(true, msg.expected_reply.function_type.is_some());
        let mut effects = session.effects();
        session.send(TransmitEngineInput::Transmit).await;

        let mut attempts: u8 = 0;
        let mut transmit_status = None;

        loop {
            match effects.recv().await {
                Ok(TransmitEngineEffect::WriteFrame) => {
                    attempts += 1;
                    let callback_id = self.next_callback_id();
                    let req = SendDataRequest {
                        node_id,
                        payload: msg.payload.clone(),
                        transmit_options: TransmitOptions::default(),
                        callback_id,
                    };
                    let frame: CommandFrame = (&req).into();
                    self.port
                        .write(RawSerialFrame::Data(SerialData::new(frame.try_to_vec()?)))
                        .await?;

                    let acked = loop {
                        match self.next_inbound().await? {
                            Inbound::Ack => break true,
                            Inbound::Nak | Inbound::Can => break false,
                            Inbound::Frame(f) => self.dispatch_frame(f).await,
                        }
                    };

                    if !acked {
                        if attempts >= msg.max_attempts {
                            session.send(TransmitEngineInput::GiveUp).await;
                        } else {
                            session.send(TransmitEngineInput::Retry).await;
                        }
                        continue;
                    }
                    session.send(TransmitEngineInput::Ack).await;

                    loop {
                        match self.next_inbound().await? {
                            Inbound::Frame(f)
                                if f.function_type == FunctionType::SendData
                                    && f.command_type == CommandType::Request =>
                            {
                                match SendDataCallback::try_from(&f) {
                                    Ok(cb) if cb.callback_id == callback_id => {
                                        transmit_status = Some(cb.transmit_status);
                                        session.send(TransmitEngineInput::Callback).await;
                                        break;
                                    }
                                    _ => self.dispatch_frame(f).await,
                                }
                            }
                            Inbound::Frame(f) => self.dispatch_frame(f).await,
                            Inbound::Ack | Inbound::Nak | Inbound::Can => {}
                        }
                    }

                    if !session.done() {
                        self.wait_for_reply(&session, &msg).await?;
                    }
                }
                Ok(TransmitEngineEffect::AckTimedOut) => {
                    if attempts >= msg.max_attempts {
                        session.send(TransmitEngineInput::GiveUp).await;
                    } else {
                        session.send(TransmitEngineInput::Retry).await;
                    }
                }
                Ok(TransmitEngineEffect::SendFailed) => {
                    self.shared.values.notify(Notification::SendFailed {
                        node_id,
                        reason: "no acknowledgement from the node".into(),
                    });
                }
                Err(_) => {}
            }

            if session.done() {
                break;
            }
        }

        let ok = transmit_status == Some(TransmitStatus::Ok);
        if !ok {
            if let Some(stage) = msg.stage_hint {
                retry_or_advance_stage(&self.shared, node_id, stage);
            }
        }

        Ok(ok)
    }

    /// Once the transmit engine has moved past `WaitingForCallback` into
    /// `WaitingForReply` (spec §4.2), waits up to `response_timeout` for the
    /// application-layer reply the message expects. Every frame that arrives
    /// in the meantime is applied via [`Self::dispatch_frame`] regardless of
    /// whether it's the one being waited for, since an unrelated report
    /// shouldn't be dropped just because another message is mid-flight.
    async fn wait_for_reply(&mut self, session: &TransmitSession, msg: &Msg) -> Result<()> {
        let wanted = msg.expected_reply.function_type;
        let timeout = self.shared.options.response_timeout;

        let matched = tokio::time::timeout(timeout, self.wait_for_matching_frame(wanted)).await;

        match matched {
            Ok(Ok(())) => session.send(TransmitEngineInput::Reply).await,
            _ => session.send(TransmitEngineInput::GiveUp).await,
        }
        Ok(())
    }

    /// Reads inbound frames, applying every one, until a frame whose
    /// function type is `wanted` arrives.
    async fn wait_for_matching_frame(&mut self, wanted: Option<FunctionType>) -> Result<()> {
        loop {
            match self.next_inbound().await? {
                Inbound::Frame(f) => {
                    let is_match = wanted == Some(f.function_type);
                    self.dispatch_frame(f).await;
                    if is_match {
                        return Ok(());
                    }
                }
                Inbound::Ack | Inbound::Nak | Inbound::Can => {}
            }
        }
    }

    /// Handles a frame that arrived outside of an active `send_msg` (an
    /// unsolicited report, a `SerialApiStarted` after a reset, ...).
    async fn handle_raw_frame(&mut self, frame: RawSerialFrame) {
        match frame {
            RawSerialFrame::Data(data) => {
                let _ = self.port.write(RawSerialFrame::ControlFlow(ControlFlow::Ack)).await;
                if let Ok(frame) = CommandFrame::try_from_slice(data.as_ref()) {
                    self.dispatch_frame(frame).await;
                }
            }
            _ => {}
        }
    }

    async fn dispatch_frame(&mut self, frame: CommandFrame) {
        match frame.function_type {
            FunctionType::ApplicationCommand => {
                let Ok(cmd) = ApplicationCommandRequest::try_from(&frame) else {
                    return;
                };
                let Ok(cc_frame) = CommandClassFrame::try_from_slice(&cmd.command_data) else {
                    return;
                };
                let Ok(cc) = CC::try_from(cc_frame) else {
                    return;
                };
                self.apply_cc(cmd.source_node_id, cc);
            }
            FunctionType::SerialApiStarted => {
                self.shared.logger.warn("controller reported SerialApiStarted; reconnecting state");
                self.shared.values.notify(Notification::DriverReset);
            }
            _ => {
                // Late or duplicate replies to a bootstrap/send_msg exchange
                // that has already moved on; nothing further to do.
            }
        }
    }

    /// Maps a decoded command-class report onto the value registry (spec
    /// §4.5/§4.6). Only the reporting commands this crate decodes have a
    /// mapping; everything else is visible in the logs via `to_log_payload`
    /// but has no corresponding value.
    fn apply_cc(&mut self, node_id: NodeId, cc: CC) {
        let home_id = self.shared.values.home_id();
        match cc {
            CC::BasicReport(BasicCCReport { current_value, .. }) => {
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    Genre::User,
                    CommandClasses::Basic,
                    0,
                    0,
                    ValueType::Byte,
                );
                self.shared
                    .values
                    .ensure(value_id, ValueMetadata::builder().label("Basic").build());
                if matches!(
                    self.shared.values.on_report(&value_id, ValueVariant::Byte(current_value)),
                    ReportOutcome::RequestRefresh
                ) {
                    queue_refresh(&self.shared, &value_id);
                }
            }
            CC::BinarySwitchReport(BinarySwitchCCReport { current_value, .. }) => {
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    Genre::User,
                    CommandClasses::BinarySwitch,
                    0,
                    0,
                    ValueType::Bool,
                );
                self.shared.values.ensure(
                    value_id,
                    ValueMetadata::builder()
                        .label("Switch")
                        .polling_intensity(1)
                        .build(),
                );
                if matches!(
                    self.shared.values.on_report(&value_id, ValueVariant::Bool(current_value)),
                    ReportOutcome::RequestRefresh
                ) {
                    queue_refresh(&self.shared, &value_id);
                }
            }
            CC::MultilevelSensorReport(report) => {
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    Genre::User,
                    CommandClasses::MultilevelSensor,
                    0,
                    report.sensor_type as u32,
                    ValueType::Decimal,
                );
                self.shared.values.ensure(
                    value_id,
                    ValueMetadata::builder()
                        .label(format!("Sensor {}", report.sensor_type))
                        .read_only(true)
                        .polling_intensity(1)
                        .build(),
                );
                if matches!(
                    self.shared.values.on_report(&value_id, ValueVariant::Decimal(report.value)),
                    ReportOutcome::RequestRefresh
                ) {
                    queue_refresh(&self.shared, &value_id);
                }
            }
            CC::ConfigurationReport(report) => {
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    Genre::Config,
                    CommandClasses::Configuration,
                    0,
                    report.parameter as u32,
                    ValueType::Int,
                );
                self.shared.values.ensure(
                    value_id,
                    ValueMetadata::builder()
                        .label(format!("Parameter {}", report.parameter))
                        .build(),
                );
                if matches!(
                    self.shared.values.on_report(&value_id, ValueVariant::Int(report.value)),
                    ReportOutcome::RequestRefresh
                ) {
                    queue_refresh(&self.shared, &value_id);
                }
            }
            CC::WakeUpIntervalReport(report) => {
                let stage = self.shared.nodes.with_mut(node_id, |n| {
                    n.wake_up_interval = Some(report.wake_up_interval);
                    n.query_stage
                });
                if stage == Some(QueryStage::WakeUp) {
                    advance_discovery(&self.shared, node_id);
                }
            }
            CC::WakeUpNotification(_) => {
                self.shared.nodes.set_awake(node_id, true);
                self.shared.send_notify.notify_one();
            }
            CC::ManufacturerSpecificReport(_) => {
                let stage = self.shared.nodes.with_mut(node_id, |n| n.query_stage);
                if stage == Some(QueryStage::ManufacturerSpecific) {
                    advance_discovery(&self.shared, node_id);
                }
            }
            CC::VersionCommandClassReport(report) => {
                let stage = self.shared.nodes.with_mut(node_id, |n| {
                    n.command_classes
                        .entry(report.requested_cc)
                        .or_default()
                        .version = report.version;
                    n.query_stage
                });
                if stage == Some(QueryStage::Versions) {
                    advance_discovery(&self.shared, node_id);
                }
            }
            CC::AssociationReport(report) => {
                let group_id = report.group_id as u32;
                let value_id = ValueId::new(
                    home_id,
                    node_id,
                    Genre::User,
                    CommandClasses::Association,
                    0,
                    group_id,
                    ValueType::Int,
                );
                self.shared.values.ensure(
                    value_id,
                    ValueMetadata::builder()
                        .label(format!("Association group {}", report.group_id))
                        .build(),
                );
                self.shared
                    .values
                    .on_report(&value_id, ValueVariant::Int(report.node_ids.len() as i32));
                self.shared.values.notify(Notification::Group {
                    node_id,
                    group_id: report.group_id,
                });
                let stage = self.shared.nodes.with_mut(node_id, |n| n.query_stage);
                if stage == Some(QueryStage::Associations) {
                    advance_discovery(&self.shared, node_id);
                }
            }
            other => {
                self.shared.logger.message(format!(
                    "unhandled report from node {node_id}: {:?}",
                    other.to_log_payload()
                ));
            }
        }
    }

    async fn handle_timer(&mut self, due: Vec<u64>) {
        if !due.is_empty() {
            self.shared.logger.message(format!("{} timer(s) fired", due.len()));
        }
    }

    /// Tells every node whose queue has drained and whose interview is
    /// complete to go back to sleep (spec §8 scenario 3): queues
    /// `WakeUpCCNoMoreInformation` and marks it asleep locally. A node still
    /// mid-interview is left alone even with an empty queue, since the next
    /// stage's request hasn't been queued yet while its predecessor's report
    /// is still in flight.
    fn release_drained_sleepers(&self) {
        for node_id in self.shared.nodes.all_ids() {
            let Some(node) = self.shared.nodes.get_clone(node_id) else {
                continue;
            };
            if !node.can_sleep() || !node.awake || !node.query_stage.is_complete() {
                continue;
            }
            if !self.shared.queues.lock().unwrap().is_empty_for(node_id) {
                continue;
            }

            let frame: CommandClassFrame = (&WakeUpCCNoMoreInformation {}).into();
            let Ok(payload) = frame.try_to_vec() else {
                continue;
            };
            let msg = Msg {
                payload,
                ..Msg::new(Some(node_id), Priority::WakeUp)
            };
            self.shared.queues.lock().unwrap().push(msg);
            self.shared.nodes.set_awake(node_id, false);
            self.shared.send_notify.notify_one();
        }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => break,
                due = self.shared.timer.wait_for_due() => {
                    self.handle_timer(due).await;
                }
                _ = self.shared.send_notify.notified() => {
                    while let Some(msg) = self.try_pop() {
                        if let Err(e) = self.send_msg(msg).await {
                            self.shared.logger.error(format!("send failed: {e}"));
                        }
                    }
                    self.release_drained_sleepers();
                }
                frame = self.port.read() => {
                    if let Some(frame) = frame {
                        self.handle_raw_frame(frame).await;
                        self.release_drained_sleepers();
                    } else {
                        self.shared.values.notify(Notification::DriverFailed {
                            reason: "transport closed".into(),
                        });
                        break;
                    }
                }
            }
        }
    }
}

pub type ConfigDir = PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_logger_forwards_to_the_wrapped_logger() {
        struct CountingLogger(u32);
        impl zwave_logging::Logger for CountingLogger {
            fn log(&mut self, _log: LogInfo, _level: Loglevel) {
                self.0 += 1;
            }
            fn log_level(&self) -> Loglevel {
                Loglevel::Info
            }
            fn set_log_level(&mut self, _level: Loglevel) {}
        }

        let sink = SyncLogger(Mutex::new(CountingLogger(0)));
        let info = zwave_logging::LogInfo::builder()
            .label("TEST")
            .payload(zwave_logging::LogPayloadText::new("hi"))
            .build();
        sink.log(info, Loglevel::Info);
        assert_eq!(sink.0.lock().unwrap().0, 1);
    }
}
