//! Ctrl-C coordination for stash runs.
//! The handler installed by the binary flips a one-way flag; the copy executor
//! polls it between rows and the CLI turns it into `HoloError::Interrupted`.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{HoloError, Result};

static STOP: AtomicBool = AtomicBool::new(false);

/// Ask running copies to stop after the current row. Signal-handler safe.
pub fn request() {
    STOP.store(true, Ordering::Relaxed);
}

pub fn is_requested() -> bool {
    STOP.load(Ordering::Relaxed)
}

/// `Err(Interrupted)` once a stop was requested.
pub fn check() -> Result<()> {
    if is_requested() {
        Err(HoloError::Interrupted)
    } else {
        Ok(())
    }
}
