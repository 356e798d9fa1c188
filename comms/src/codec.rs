//! Wire encoding for `Matrix`.
//!
//! Payload layout: `rows: u64 BE`, `cols: u64 BE`, then `rows * cols` elements
//! in row-major order using the host's native byte order.

use std::io;

use matrix::{Elem, Matrix};

use crate::{Deserialize, Serialize};

type DimType = u64;
const DIM_SIZE: usize = size_of::<DimType>();
const HEADER_SIZE: usize = 2 * DIM_SIZE;
const ELEM_SIZE: usize = size_of::<Elem>();

fn invalid_data<T>(msg: String) -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::InvalidData, msg))
}

fn read_dim(bytes: &[u8]) -> io::Result<usize> {
    let Ok(raw) = <[u8; DIM_SIZE]>::try_from(bytes) else {
        return invalid_data(format!("dimension field must be {DIM_SIZE} bytes"));
    };

    match usize::try_from(DimType::from_be_bytes(raw)) {
        Ok(dim) => Ok(dim),
        Err(_) => invalid_data("dimension does not fit in usize".to_string()),
    }
}

impl<'a> Serialize<'a> for Matrix {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        let (rows, cols) = self.shape();
        buf.extend_from_slice(&(rows as DimType).to_be_bytes());
        buf.extend_from_slice(&(cols as DimType).to_be_bytes());

        if let Some(elems) = self.as_slice() {
            return Some(bytemuck::cast_slice(elems));
        }

        buf.reserve(rows * cols * ELEM_SIZE);
        for x in self.view().iter() {
            buf.extend_from_slice(&x.to_ne_bytes());
        }

        None
    }
}

impl<'a> Deserialize<'a> for Matrix {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < HEADER_SIZE {
            return invalid_data(format!(
                "matrix payload is {} bytes, must at least be {HEADER_SIZE} bytes",
                buf.len()
            ));
        }

        let (header, body) = buf.split_at(HEADER_SIZE);
        let rows = read_dim(&header[..DIM_SIZE])?;
        let cols = read_dim(&header[DIM_SIZE..])?;

        let expected = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(ELEM_SIZE));

        if expected != Some(body.len()) {
            return invalid_data(format!(
                "a {rows}x{cols} matrix can't be built from {} bytes of elements",
                body.len()
            ));
        }

        let mut data: Vec<Elem> = vec![0; rows * cols];
        bytemuck::cast_slice_mut::<Elem, u8>(&mut data).copy_from_slice(body);

        Matrix::new(rows, cols, data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
