//! Unsigned LEB128 varint encoding for the snapshot wire frame. No crate
//! in the workspace's dependency pack offers one for the shape this
//! format needs (length-prefixed fields inside an already-framed
//! record), so this is hand-rolled, same rationale as the ZIP central
//! directory reader in `schema::creators::jar`.

use std::io::{self, Read, Write};

pub fn write_u64<W: Write>(w: &mut W, mut value: u64) -> io::Result<()> {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            w.write_all(&[byte])?;
            return Ok(());
        }
        w.write_all(&[byte | 0x80])?;
    }
}

pub fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        result |= ((byte[0] & 0x7f) as u64) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "varint too long"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_small_and_large_values() {
        for value in [0u64, 1, 127, 128, 300, u64::MAX] {
            let mut buf = Vec::new();
            write_u64(&mut buf, value).unwrap();
            let mut cursor = std::io::Cursor::new(buf);
            assert_eq!(read_u64(&mut cursor).unwrap(), value);
        }
    }
}
