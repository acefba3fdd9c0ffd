//! Process-wide enforcement switches.
//!
//! Two flags, both plain atomics with relaxed ordering. Toggling is not
//! synchronized with in-flight calls: a call that has already read the
//! switch finishes under the value it read, and concurrent toggles
//! resolve as last-write-wins. Contracts themselves are unaffected -
//! the switch only controls whether checks run, never whether the
//! wrapped callable is invoked.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

static ENFORCEMENT: AtomicBool = AtomicBool::new(true);
static REPORT_UNCHECKED: AtomicBool = AtomicBool::new(false);

/// Turn argument and return checking on or off for the whole process.
///
/// Checking is on by default. While off, guarded callables delegate
/// without inspecting arguments or results.
pub fn set_enforcement(enabled: bool) {
    ENFORCEMENT.store(enabled, Ordering::Relaxed);
    debug!(enabled, "call checking toggled");
}

/// Whether guarded callables currently check their calls.
pub fn enforcement_enabled() -> bool {
    ENFORCEMENT.load(Ordering::Relaxed)
}

/// When enabled, locking a contract logs a warning for every named
/// parameter that has no declared type and will therefore never be
/// checked. Off by default.
pub fn set_report_unchecked(enabled: bool) {
    REPORT_UNCHECKED.store(enabled, Ordering::Relaxed);
}

pub(crate) fn report_unchecked() -> bool {
    REPORT_UNCHECKED.load(Ordering::Relaxed)
}
