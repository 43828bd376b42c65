use super::*;

/// Writer implementation for `Vec<u8>` that appends to the vector. The vector will grow as needed.
///
/// ```
/// # use tagwire::io::Writer;
/// let mut vec = b"{".to_vec();
/// vec.write(b"0007");
/// vec.write_byte(b'}');
/// assert_eq!(vec, b"{0007}");
/// ```
impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, src: &[u8]) {
        self.extend_from_slice(src);
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn write_fill(&mut self, byte: u8, count: usize) {
        self.resize(self.len() + count, byte);
    }
}
