use naia_serde::BitWrite;

/// Growable `BitWrite` target for snapshots, deltas and observer payloads.
///
/// `naia_serde::BitWriter` is bounded by a single packet, while a snapshot
/// grows with the collection. Bits are packed LSB first, the order
/// `BitReader` consumes them in.
pub struct PayloadWriter {
    bytes: Vec<u8>,
    bits_written: u32,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bits_written: 0,
        }
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }

    /// Consumes the writer. Unused bits of the final byte are zero.
    pub fn to_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for PayloadWriter {
    fn write_bit(&mut self, bit: bool) {
        let offset = self.bits_written % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1_u8 << offset;
            }
        }
        self.bits_written += 1;
    }

    fn write_byte(&mut self, byte: u8) {
        // byte aligned: no repacking needed
        if self.bits_written % 8 == 0 {
            self.bytes.push(byte);
            self.bits_written += 8;
            return;
        }
        for index in 0..8 {
            self.write_bit((byte >> index) & 1 != 0);
        }
    }

    fn count_bits(&mut self, _bits: u32) {}

    fn is_counter(&self) -> bool {
        false
    }
}
