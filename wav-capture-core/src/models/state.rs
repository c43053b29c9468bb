use std::fmt;

/// Capture sink state machine.
///
/// State transitions:
/// ```text
/// idle → capturing → stopped
///            ↓          ↓
///            └──→ finalized ←┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
    Stopped,
    Finalized,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// Whether `finalize` may run from this state.
    pub fn can_finalize(&self) -> bool {
        matches!(self, Self::Capturing | Self::Stopped)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Stopped => "stopped",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}
