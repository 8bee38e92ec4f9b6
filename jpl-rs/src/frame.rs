//! Program frame tracking.
//!
//! A program runs inside one `START *name {` … `} END *name` block.  Frames
//! do not nest; [`ProgramFrame`] is the two-state machine that enforces it.

use crate::error::FrameError;

/// Whether a program block is open, and under which name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProgramFrame {
    #[default]
    Closed,
    Open { name: String },
}

impl ProgramFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a frame named `name`.  Fails if one is already open.
    pub fn open(&mut self, name: impl Into<String>) -> Result<(), FrameError> {
        let requested = name.into();
        match self {
            ProgramFrame::Open { name } => Err(FrameError::AlreadyOpen {
                open: name.clone(),
                requested,
            }),
            ProgramFrame::Closed => {
                *self = ProgramFrame::Open { name: requested };
                Ok(())
            }
        }
    }

    /// Close the open frame.  `name` must match the name it was opened with.
    pub fn close(&mut self, name: &str) -> Result<(), FrameError> {
        match self {
            ProgramFrame::Closed => Err(FrameError::NotOpen { name: name.to_owned() }),
            ProgramFrame::Open { name: open } if open != name => Err(FrameError::NameMismatch {
                expected: open.clone(),
                found: name.to_owned(),
            }),
            ProgramFrame::Open { .. } => {
                *self = ProgramFrame::Closed;
                Ok(())
            }
        }
    }

    /// Fail unless a frame is open.
    pub fn require_open(&self) -> Result<(), FrameError> {
        match self {
            ProgramFrame::Open { .. } => Ok(()),
            ProgramFrame::Closed => Err(FrameError::NotStarted),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ProgramFrame::Open { .. })
    }

    /// Name of the open frame, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            ProgramFrame::Open { name } => Some(name),
            ProgramFrame::Closed => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
