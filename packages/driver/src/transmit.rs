use std::time::Duration;

use zwave_core::state_machine::{StateMachine, StateMachineInterpreter};

zwave_core::state_machine! { TransmitEngine {
    State = {
        Idle,
        WaitingForAck,
        WaitingForCallback,
        WaitingForReply,
        Suspended,
        Done(bool),
    },
    Input = {
        Transmit,
        Ack,
        Retry,
        GiveUp,
        Callback,
        Reply,
        NodeAsleep,
        NodeAwake,
    },
    Effect = {
        WriteFrame,
        AckTimedOut,
        SendFailed,
    },
    Condition = {
        HasCallback,
        ExpectsReply,
    },
    Transitions = [
        [Idle => [
            [Transmit => ! WriteFrame => WaitingForAck],
        ]],
        [WaitingForAck => [
            [Ack if HasCallback => WaitingForCallback],
            [Ack if ExpectsReply => WaitingForReply],
            [Ack => Done(true)],
            [Retry => ! WriteFrame => WaitingForAck],
            [GiveUp => ! SendFailed => Done(false)],
        ]],
        [WaitingForCallback => [
            [Callback if ExpectsReply => WaitingForReply],
            [Callback => Done(true)],
            [GiveUp => ! SendFailed => Done(false)],
        ]],
        [WaitingForReply => [
            [Reply => Done(true)],
            [NodeAsleep => Suspended],
            [GiveUp => ! SendFailed => Done(false)],
        ]],
        [Suspended => [
            [NodeAwake => ! WriteFrame => WaitingForAck],
        ]],
    ],
    Delays = [
        [WaitingForAck => [
            [Duration::from_millis(1000) => ! AckTimedOut => WaitingForAck],
        ]]
    ],
    Initial = Idle,
    Final = Done(_),
} }

/// Drives a single [`crate::send_queue::Msg`] through the transmit engine
/// (spec §4.2). `has_callback`/`expects_reply` are fixed for the lifetime of
/// one session, since they only depend on the message being sent, not on
/// anything the engine observes.
pub struct TransmitSession {
    interpreter: StateMachineInterpreter<TransmitEngineState, TransmitEngineEffect, TransmitEngineInput>,
}

impl TransmitSession {
    pub fn new(has_callback: bool, expects_reply: bool) -> Self {
        let machine = TransmitEngine::new();
        let resolve_named = |_: &str| Duration::from_millis(1000);
        let evaluate_condition = move |condition: TransmitEngineCondition| match condition {
            TransmitEngineCondition::HasCallback => has_callback,
            TransmitEngineCondition::ExpectsReply => expects_reply,
        };
        Self {
            interpreter: StateMachineInterpreter::new(machine, resolve_named, evaluate_condition),
        }
    }

    pub async fn send(&self, input: TransmitEngineInput) {
        let _ = self.interpreter.send(input).await;
    }

    pub fn effects(&self) -> tokio::sync::broadcast::Receiver<TransmitEngineEffect> {
        self.interpreter.effect_listener()
    }

    pub fn done(&self) -> bool {
        self.interpreter.done()
    }

    pub async fn result(self) -> bool {
        matches!(
            self.interpreter.result().await,
            Ok(TransmitEngineState::Done(true))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn happy_path_without_callback_or_reply() {
        let session = TransmitSession::new(false, false);
        let mut effects = session.effects();
        session.send(TransmitEngineInput::Transmit).await;
        assert_eq!(effects.recv().await.unwrap(), TransmitEngineEffect::WriteFrame);
        session.send(TransmitEngineInput::Ack).await;
        assert!(session.result().await);
    }

    #[tokio::test]
    async fn giveup_reports_failure() {
        let session = TransmitSession::new(false, false);
        let mut effects = session.effects();
        session.send(TransmitEngineInput::Transmit).await;
        effects.recv().await.unwrap();
        session.send(TransmitEngineInput::GiveUp).await;
        assert_eq!(effects.recv().await.unwrap(), TransmitEngineEffect::SendFailed);
        assert!(!session.result().await);
    }

    #[tokio::test]
    async fn callback_path() {
        let session = TransmitSession::new(true, false);
        session.send(TransmitEngineInput::Transmit).await;
        session.send(TransmitEngineInput::Ack).await;
        session.send(TransmitEngineInput::Callback).await;
        assert!(session.result().await);
    }

    #[tokio::test]
    async fn callback_then_reply_path() {
        let session = TransmitSession::new(true, true);
        session.send(TransmitEngineInput::Transmit).await;
        session.send(TransmitEngineInput::Ack).await;
        session.send(TransmitEngineInput::Callback).await;
        assert!(!session.done());
        session.send(TransmitEngineInput::Reply).await;
        assert!(session.result().await);
    }
}
