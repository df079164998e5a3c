//! Minimal replicated value type for end-to-end testing

use tether_shared::{BitReader, BitWrite, Serde, SerdeErr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Serde for Position {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let x = i32::de(reader)?;
        let y = i32::de(reader)?;
        Ok(Self { x, y })
    }

    fn bit_length(&self) -> u32 {
        self.x.bit_length() + self.y.bit_length()
    }
}
