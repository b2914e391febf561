use crate::prelude::{Parsable, ParseResult, Serializable};
use derive_try_from_primitive::TryFromPrimitive;
use nom::{combinator::map_res, number::complete::be_u8};
use std::fmt::Display;

/// Why a sleeping node's Z-Wave API module woke up, reported by the `WakeUp`
/// command class (spec §4.12) and consumed by stage `WakeUp` (spec §4.4) to
/// flush the node's queued messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum WakeupReason {
    Reset = 0x00,
    Timer = 0x01,
    WakeUpBeam = 0x02,
    WatchdogReset = 0x03,
    ExternalInterrupt = 0x04,
    PowerUp = 0x05,
    USBSuspend = 0x06,
    SoftwareReset = 0x07,
    EmergencyWatchdogReset = 0x08,
    BrownoutCircuit = 0x09,
    Unknown = 0xff,
}

impl Display for WakeupReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WakeupReason::Reset => "Reset",
            WakeupReason::Timer => "Timer",
            WakeupReason::WakeUpBeam => "Wake up beam",
            WakeupReason::WatchdogReset => "Reset by watchdog",
            WakeupReason::ExternalInterrupt => "External interrupt",
            WakeupReason::PowerUp => "Powered up",
            WakeupReason::USBSuspend => "USB suspend",
            WakeupReason::SoftwareReset => "Reset by software",
            WakeupReason::EmergencyWatchdogReset => "Emergency watchdog reset",
            WakeupReason::BrownoutCircuit => "Reset by brownout circuit",
            WakeupReason::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

impl Parsable for WakeupReason {
    fn parse(i: crate::encoding::Input) -> ParseResult<Self> {
        map_res(be_u8, WakeupReason::try_from)(i)
    }
}

impl Serializable for WakeupReason {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(*self as u8)
    }
}
