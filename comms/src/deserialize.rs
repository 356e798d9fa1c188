use std::io;

/// Types that can be rebuilt from the payload of a single frame.
pub trait Deserialize<'a>: Sized {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}
