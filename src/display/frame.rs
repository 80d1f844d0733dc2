//! Fixed pool of three frame buffers rotated between pipeline roles.
//!
//! Roles hold buffer indices, so a rotation is an index exchange and the
//! buffer contents never move.

use core::mem;

use super::commands::DATA_PREFIX;
use crate::config::{DISPLAY_ROWS, DISPLAY_WIDTH};

/// Pixel bytes in one frame (one byte per column per row).
pub const FRAME_SIZE: usize = DISPLAY_WIDTH * DISPLAY_ROWS;

/// Frame bytes plus the leading data control byte, as sent on the bus.
pub const FRAME_BYTES: usize = FRAME_SIZE + 1;

/// Which buffer currently plays which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Roles {
    pub working: usize,
    pub ready: usize,
    pub transmit: usize,
}

impl Roles {
    /// True when the three roles name three distinct buffers.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 3];
        for index in [self.working, self.ready, self.transmit] {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

pub struct FramePool {
    buffers: [[u8; FRAME_BYTES]; 3],
    roles: Roles,
    transmit_requested: bool,
}

impl FramePool {
    pub const fn new() -> Self {
        let mut blank = [0u8; FRAME_BYTES];
        blank[0] = DATA_PREFIX;
        Self {
            buffers: [blank; 3],
            roles: Roles { working: 0, ready: 1, transmit: 2 },
            transmit_requested: false,
        }
    }

    /// Pixel bytes of the working buffer, row-major.
    pub fn working_mut(&mut self) -> &mut [u8] {
        &mut self.buffers[self.roles.working][1..]
    }

    /// Publish the working buffer as the latest complete frame.
    ///
    /// An earlier frame that has not started transmitting is dropped.
    pub fn commit(&mut self) {
        mem::swap(&mut self.roles.working, &mut self.roles.ready);
        self.transmit_requested = true;
    }

    /// Move the latest complete frame into the transmit role.
    pub fn begin_transmit(&mut self) {
        mem::swap(&mut self.roles.transmit, &mut self.roles.ready);
        self.transmit_requested = false;
    }

    pub fn transmit_requested(&self) -> bool {
        self.transmit_requested
    }

    /// The transmit buffer exactly as it goes on the bus.
    pub fn transmit_bytes(&self) -> &[u8] {
        &self.buffers[self.roles.transmit]
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}
