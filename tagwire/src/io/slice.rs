use super::*;

impl<'a> Reader<'a> for &'a [u8] {
    #[inline]
    fn remaining(&self) -> &'a [u8] {
        *self
    }

    #[inline]
    fn consume(&mut self, amt: usize) -> ReadResult<()> {
        let src: &'a [u8] = *self;
        match src.get(amt..) {
            Some(rest) => {
                *self = rest;
                Ok(())
            }
            None => Err(read_size_limit(amt, src.len())),
        }
    }
}
