//! Bounds-checked payload cursor.
//!
//! Every multi-byte integer in a packet body is little-endian. Parsers
//! must never read past the declared payload, so all accessors check the
//! remaining length first and report a typed shortfall instead of
//! panicking. The cursor carries its opcode purely for error reporting.

use crate::{Opcode, ProtocolError, Result};

/// Little-endian cursor over one packet body.
#[derive(Debug)]
pub struct PacketReader<'a> {
    opcode: Opcode,
    body: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Wrap a payload for the given opcode.
    #[must_use]
    pub fn new(opcode: Opcode, body: &'a [u8]) -> Self {
        Self { opcode, body, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.body.len() - self.pos
    }

    /// Whether the entire payload has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(ProtocolError::Truncated {
                opcode: self.opcode,
                expected: len,
                actual: self.remaining(),
            });
        }
        let slice = &self.body[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read one byte.
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian u16.
    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Read a little-endian u32.
    pub fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian i32.
    pub fn i32(&mut self) -> Result<i32> {
        Ok(self.u32()? as i32)
    }

    /// Read a little-endian u64.
    pub fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    /// Read a little-endian f32.
    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    /// Read a NUL-terminated UTF-8 string, consuming the terminator.
    pub fn cstring(&mut self) -> Result<String> {
        let rest = &self.body[self.pos..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtocolError::InvalidString { opcode: self.opcode })?;
        let text = std::str::from_utf8(&rest[..nul])
            .map_err(|_| ProtocolError::InvalidString { opcode: self.opcode })?
            .to_owned();
        self.pos += nul + 1;
        Ok(text)
    }

    /// Skip `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OP: Opcode = Opcode::SmsgFriendList;

    #[test]
    fn reads_little_endian_integers() {
        let body = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xFF];
        let mut r = PacketReader::new(OP, &body);
        assert_eq!(r.u64().unwrap(), 0x0807_0605_0403_0201);
        assert_eq!(r.u8().unwrap(), 0xFF);
        assert!(r.is_empty());
    }

    #[test]
    fn shortfall_is_an_error_not_a_panic() {
        let mut r = PacketReader::new(OP, &[0x01, 0x02]);
        let err = r.u32().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Truncated { opcode: OP, expected: 4, actual: 2 }
        );
        // Failed read consumed nothing.
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn cstring_requires_terminator() {
        let mut r = PacketReader::new(OP, b"abc");
        assert_eq!(r.cstring().unwrap_err(), ProtocolError::InvalidString { opcode: OP });

        let mut r = PacketReader::new(OP, b"abc\0rest\0");
        assert_eq!(r.cstring().unwrap(), "abc");
        assert_eq!(r.cstring().unwrap(), "rest");
        assert!(r.is_empty());
    }

    #[test]
    fn cstring_rejects_invalid_utf8() {
        let mut r = PacketReader::new(OP, &[0xFF, 0xFE, 0x00]);
        assert_eq!(r.cstring().unwrap_err(), ProtocolError::InvalidString { opcode: OP });
    }

    #[test]
    fn f32_round_trips_bits() {
        let body = 100.5f32.to_le_bytes();
        let mut r = PacketReader::new(OP, &body);
        assert!((r.f32().unwrap() - 100.5).abs() < f32::EPSILON);
    }
}
