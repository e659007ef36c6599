//! The physical link to the panel controller
//!
//! The transport is an opaque collaborator: this crate composes command
//! sequences, the transport moves bytes and honors waits. Transport errors
//! surface unchanged through [`crate::error::DisplayError::Transport`]; no
//! retries are attempted.

use std::convert::Infallible;

/// Byte-level channel to the display controller.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write one command opcode.
    fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error>;

    /// Write payload bytes for the preceding command.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until the controller leaves its busy state.
    fn wait_idle(&mut self) -> Result<(), Self::Error>;

    /// Mandatory settle period demanded by an init sequence.
    fn delay_ms(&mut self, ms: u32) -> Result<(), Self::Error>;
}

/// One recorded transport operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Command(u8),
    Data(Vec<u8>),
    WaitIdle,
    DelayMs(u32),
}

/// Transport that records every operation instead of driving hardware.
///
/// Used by the test suite, and for host-side dry runs of command
/// composition against a panel that is not attached.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub ops: Vec<Op>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opcodes of every recorded command, in order.
    pub fn opcodes(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(opcode) => Some(*opcode),
                _ => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    type Error = Infallible;

    fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error> {
        self.ops.push(Op::Command(opcode));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }

    fn wait_idle(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::WaitIdle);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<(), Self::Error> {
        self.ops.push(Op::DelayMs(ms));
        Ok(())
    }
}
