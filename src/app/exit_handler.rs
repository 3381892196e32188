//! Exit code logic for the mediacache process.
//!
//! Single responsibility: map per-item success/failure counts to the process exit outcome.

use std::process::ExitCode;

/// Process exit outcome for a command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Partial,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(outcome: ProcessExit) -> Self {
        match outcome {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Partial => ExitCode::from(2),
        }
    }
}

/// Determines the process exit outcome from succeeded and failed item counts.
pub(crate) fn determine_exit_outcome(succeeded: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if succeeded > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
