//! Exit code logic for the installer process.
//!
//! Single responsibility: map installed/failed counts to the process exit outcome.

use crate::ProcessExit;

/// Determines the process exit outcome from installed and unsuccessful
/// package counts. Skipped packages count as unsuccessful.
pub(crate) fn determine_exit_outcome(installed: usize, unsuccessful: usize) -> ProcessExit {
    if unsuccessful == 0 {
        ProcessExit::Success
    } else if installed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
