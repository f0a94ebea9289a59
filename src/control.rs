//! Control value sources
//!
//! The engine samples one value per frame. A detector usually runs at its own
//! pace on another thread and publishes into a [`SharedControl`] cell; reads
//! never block and always see the latest value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Anything that can hand the engine this frame's control value
pub trait ControlSource {
    /// `None` (or a non-finite value) means "not ascending"
    fn sample_control_value(&mut self) -> Option<f32>;
}

impl<F> ControlSource for F
where
    F: FnMut() -> Option<f32>,
{
    fn sample_control_value(&mut self) -> Option<f32> {
        self()
    }
}

/// Bits of the "no value" marker
const MISSING: u32 = f32::NAN.to_bits();

/// Lock-free cell holding the latest control value as f32 bits
#[derive(Debug, Clone)]
pub struct SharedControl {
    cell: Arc<AtomicU32>,
}

impl Default for SharedControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedControl {
    /// An empty cell; reads return `None` until something is published
    pub fn new() -> Self {
        Self {
            cell: Arc::new(AtomicU32::new(MISSING)),
        }
    }

    /// Handle for the producing side
    pub fn writer(&self) -> ControlWriter {
        ControlWriter {
            cell: Arc::clone(&self.cell),
        }
    }

    pub fn latest(&self) -> Option<f32> {
        let value = f32::from_bits(self.cell.load(Ordering::Relaxed));
        value.is_finite().then_some(value)
    }
}

impl ControlSource for SharedControl {
    fn sample_control_value(&mut self) -> Option<f32> {
        self.latest()
    }
}

/// Producer half of a [`SharedControl`]
#[derive(Debug, Clone)]
pub struct ControlWriter {
    cell: Arc<AtomicU32>,
}

impl ControlWriter {
    pub fn publish(&self, value: f32) {
        self.cell.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Mark the value missing (e.g. no face in view)
    pub fn clear(&self) {
        self.cell.store(MISSING, Ordering::Relaxed);
    }
}
