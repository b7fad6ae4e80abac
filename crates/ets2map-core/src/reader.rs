//! Bounds-checked little-endian reads over byte buffers.

use crate::error::{Error, Result};

/// Fixed-width little-endian reads at arbitrary (unaligned) offsets.
///
/// Every read checks the buffer length first and reports
/// [`Error::OutOfBounds`] instead of panicking.
pub trait ReadBytes {
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]>;

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let bytes = self.read_bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_array::<1>(offset)?[0])
    }

    fn read_i32(&self, offset: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array(offset)?))
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(offset)?))
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(offset)?))
    }

    fn read_f32(&self, offset: usize) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array(offset)?))
    }

    /// Read `count` consecutive i32 values starting at `offset`
    fn read_i32_group(&self, offset: usize, count: usize) -> Result<Vec<i32>> {
        (0..count).map(|k| self.read_i32(offset + k * 4)).collect()
    }
}

impl ReadBytes for [u8] {
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.get(offset..end))
            .ok_or(Error::OutOfBounds {
                offset,
                len,
                size: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unaligned_values() {
        let mut buf = vec![0xFFu8];
        buf.extend_from_slice(&0x1122_3344u32.to_le_bytes());
        buf.extend_from_slice(&(-2i32).to_le_bytes());
        buf.extend_from_slice(&1.5f32.to_le_bytes());

        assert_eq!(buf.read_u8(0).unwrap(), 0xFF);
        assert_eq!(buf.read_u32(1).unwrap(), 0x1122_3344);
        assert_eq!(buf.read_i32(5).unwrap(), -2);
        assert_eq!(buf.read_f32(9).unwrap(), 1.5);
    }

    #[test]
    fn test_read_past_end_is_error() {
        let buf = [0u8; 8];
        assert_eq!(buf.read_u64(0).unwrap(), 0);
        assert!(matches!(
            buf.read_u64(1),
            Err(Error::OutOfBounds { offset: 1, len: 8, size: 8 })
        ));
        assert!(buf.read_u32(usize::MAX).is_err());
    }

    #[test]
    fn test_read_i32_group() {
        let buf: Vec<u8> = [3i32, -1, 7].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(buf.read_i32_group(0, 3).unwrap(), vec![3, -1, 7]);
        assert!(buf.read_i32_group(4, 3).is_err());
    }
}
