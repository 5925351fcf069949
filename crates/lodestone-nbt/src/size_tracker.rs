use lodestone_common::{LodestoneError, Result};

/// Running guard over the notional in-memory weight of a decode. Charges are
/// made in bits before each payload is read; the accumulator counts bytes.
///
/// Each decode call owns its tracker exclusively; there is no shared state
/// between decodes.
#[derive(Debug)]
pub struct SizeTracker {
    max: Option<u64>,
    read: u64,
}

impl SizeTracker {
    pub fn new(max_bytes: u64) -> Self {
        SizeTracker {
            max: Some(max_bytes),
            read: 0,
        }
    }

    /// The unbounded sentinel never fails, no matter how large the stream.
    pub fn unbounded() -> Self {
        SizeTracker { max: None, read: 0 }
    }

    /// Bytes accounted so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Charges `bits` against the budget, failing the decode the moment the
    /// accumulator goes past the configured maximum.
    pub fn track(&mut self, bits: u64) -> Result<()> {
        let Some(max) = self.max else {
            return Ok(());
        };

        self.read += bits / 8;
        if self.read > max {
            return Err(LodestoneError::SizeLimitExceeded {
                read: self.read,
                max,
            });
        }
        Ok(())
    }

    /// Charge for a length-prefixed UTF-8 string payload of `bytes` encoded
    /// bytes (multi-byte characters count by their encoded length).
    pub fn track_string(&mut self, bytes: usize) -> Result<()> {
        self.track(16)?;
        self.track(8 * bytes as u64)
    }
}
