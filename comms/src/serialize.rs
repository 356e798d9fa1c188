/// Types that can be written into a single frame.
pub trait Serialize<'a> {
    /// Appends the owned part of the encoding into `buf`.
    ///
    /// # Returns
    /// An optional borrowed tail that is written right after `buf` without copying.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}
