//! HeaterMonitor: drains a byte source into the latest telemetry.

use crate::input::{ByteSource, InputError};
use heater_proto::{decode, FrameError, FrameHex, FrameSync, Telemetry};

/// Running counters kept across polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorStats {
    /// Bytes read from the source.
    pub bytes_read: u32,
    /// Frames decoded into telemetry.
    pub frames_decoded: u32,
    /// Frames discarded for a bad marker or length.
    pub frames_rejected: u32,
}

/// What a single [`HeaterMonitor::poll`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSummary {
    /// Bytes consumed from the source.
    pub bytes_read: usize,
    /// Frames decoded into telemetry.
    pub frames_decoded: usize,
    /// Frames discarded.
    pub frames_rejected: usize,
    /// The poll stopped early on a premature end marker, leaving any
    /// further bytes in the source for the next poll.
    pub short_circuited: bool,
}

/// Poll-driven heater monitor.
///
/// Owns the byte source, the frame synchronizer and the last decoded
/// [`Telemetry`]. Call [`poll`](Self::poll) whenever the source may have
/// data; partial frames are kept between calls.
///
/// # Error Handling
///
/// Rejected frames are logged and counted, never returned as errors. The
/// telemetry keeps its previous value until the next good frame.
pub struct HeaterMonitor<S> {
    source: S,
    sync: FrameSync,
    telemetry: Telemetry,
    stats: MonitorStats,
}

impl<S: ByteSource> HeaterMonitor<S> {
    /// Create a monitor over a byte source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            sync: FrameSync::new(),
            telemetry: Telemetry::unknown(),
            stats: MonitorStats::default(),
        }
    }

    /// Drain every byte the source currently has.
    ///
    /// Returns early, without reading further, when the command half of a
    /// frame ends prematurely. A source read error is returned as-is; the
    /// synchronizer keeps its state so the next poll carries on.
    pub fn poll(&mut self) -> Result<PollSummary, InputError> {
        let mut summary = PollSummary::default();

        while self.source.available() {
            let byte = match self.source.read() {
                Ok(byte) => byte,
                Err(e) => {
                    error!("Byte source error: {:?}", e);
                    return Err(e);
                }
            };
            summary.bytes_read += 1;
            self.stats.bytes_read = self.stats.bytes_read.wrapping_add(1);

            match self.sync.push_byte(byte) {
                Ok(None) => {}
                Ok(Some(frame)) => {
                    debug!("Frame: [{}]", FrameHex(frame.as_bytes()));
                    if self.accept(frame.as_bytes()) {
                        summary.frames_decoded += 1;
                    } else {
                        summary.frames_rejected += 1;
                    }
                }
                Err(e) => {
                    self.reject(e);
                    summary.frames_rejected += 1;
                    if e.short_circuits() {
                        summary.short_circuited = true;
                        return Ok(summary);
                    }
                }
            }
        }

        Ok(summary)
    }

    fn accept(&mut self, bytes: &[u8]) -> bool {
        match decode(bytes) {
            Ok(telemetry) => {
                self.telemetry = telemetry;
                self.stats.frames_decoded = self.stats.frames_decoded.wrapping_add(1);
                true
            }
            Err(e) => {
                error!("Frame decode failed: {:?}", e);
                self.stats.frames_rejected = self.stats.frames_rejected.wrapping_add(1);
                false
            }
        }
    }

    fn reject(&mut self, e: FrameError) {
        match e {
            FrameError::PrematureEnd => {
                warn!("Invalid transmit packet, resetting frame");
            }
            FrameError::BadResponseStart | FrameError::BadResponseEnd => {
                warn!("Invalid receive packet or incorrect order ({:?}), resetting frame", e);
            }
        }
        self.stats.frames_rejected = self.stats.frames_rejected.wrapping_add(1);
    }

    /// Latest telemetry, or [`Telemetry::unknown`] before the first frame.
    #[inline]
    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// True once at least one frame has been decoded.
    #[inline]
    #[must_use]
    pub fn has_telemetry(&self) -> bool {
        self.telemetry.is_received()
    }

    /// Counters since creation.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Get a reference to the frame synchronizer.
    #[inline]
    #[must_use]
    pub fn sync(&self) -> &FrameSync {
        &self.sync
    }

    /// Get a reference to the byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Decompose the monitor into its byte source.
    pub fn into_source(self) -> S {
        self.source
    }
}
