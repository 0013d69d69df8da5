//! Per-connection voice state.

/// Where a connection stands with respect to calls.
///
/// Screen sharing is a flag on the connection while `InVoice`, not a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    InVoice(String),
}
