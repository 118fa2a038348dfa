//! The legacy grid file: Fortran unformatted records in host byte order.
//!
//! ```text
//! [36] xmin xmax ymin ymax zmin zmax (f32) nx ny nz (i32) [36]
//! [4*nx*ny] nx*ny f32 values, x fastest [4*nx*ny]      once per z slice
//! ```

use std::io::{self, Read, Write};

use crate::error::GridError;

use super::{BoundingBox, GridSink, GridSpec};

const HEADER_LEN: i32 = 36;

/// Streams complete z slices into a legacy grid file.
#[derive(Debug)]
pub struct MacuWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> MacuWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: Vec::new(),
        }
    }

    pub fn write_header(&mut self, grid: &GridSpec) -> Result<(), GridError> {
        self.buffer.clear();
        for bound in grid.bounds().to_legacy() {
            self.buffer.extend_from_slice(&bound.to_ne_bytes());
        }
        for count in grid.resolution() {
            let count = i32::try_from(count).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "grid resolution exceeds i32")
            })?;
            self.buffer.extend_from_slice(&count.to_ne_bytes());
        }
        write_record(&mut self.writer, &self.buffer)
    }

    pub fn write_slice(&mut self, values: &[f64]) -> Result<(), GridError> {
        self.buffer.clear();
        for &value in values {
            self.buffer.extend_from_slice(&(value as f32).to_ne_bytes());
        }
        write_record(&mut self.writer, &self.buffer)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GridSink for MacuWriter<W> {
    type Output = W;

    fn begin(&mut self, grid: &GridSpec) -> Result<(), GridError> {
        self.write_header(grid)
    }

    /// Interrupted slices are dropped, the file then ends after the last complete slice.
    fn slice(&mut self, _k: usize, values: &[f64], complete: bool) -> Result<(), GridError> {
        if complete {
            self.write_slice(values)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<W, GridError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_record(writer: &mut impl Write, payload: &[u8]) -> Result<(), GridError> {
    let len = i32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "record exceeds i32 length"))?;
    writer.write_all(&len.to_ne_bytes())?;
    writer.write_all(payload)?;
    writer.write_all(&len.to_ne_bytes())?;
    Ok(())
}

fn read_i32(reader: &mut impl Read) -> io::Result<i32> {
    let mut bytes = [0; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_ne_bytes(bytes))
}

fn read_record(reader: &mut impl Read, expected: i32) -> Result<Vec<u8>, GridError> {
    let len = read_i32(reader)?;
    if len != expected {
        return Err(GridError::MalformedRecord {
            expected,
            found: len,
        });
    }

    let mut payload = vec![0; len as usize];
    reader.read_exact(&mut payload)?;

    let trailing = read_i32(reader)?;
    if trailing != len {
        return Err(GridError::MalformedRecord {
            expected: len,
            found: trailing,
        });
    }
    Ok(payload)
}

/// Bounding box and resolution from the first record of a legacy grid file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MacuHeader {
    pub bounds: [f32; 6],
    pub resolution: [i32; 3],
}

impl MacuHeader {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_legacy(self.bounds)
    }
}

pub fn read_macu_header(reader: &mut impl Read) -> Result<MacuHeader, GridError> {
    let payload = read_record(reader, HEADER_LEN)?;
    let mut words = payload
        .chunks_exact(4)
        .map(|word| [word[0], word[1], word[2], word[3]]);

    let mut bounds = [0.0; 6];
    for (bound, word) in bounds.iter_mut().zip(words.by_ref()) {
        *bound = f32::from_ne_bytes(word);
    }
    let mut resolution = [0; 3];
    for (count, word) in resolution.iter_mut().zip(words) {
        *count = i32::from_ne_bytes(word);
    }

    Ok(MacuHeader { bounds, resolution })
}

/// Reads one z slice of `nx * ny` values.
pub fn read_macu_slice(reader: &mut impl Read, nx: usize, ny: usize) -> Result<Vec<f32>, GridError> {
    let expected = i32::try_from(4 * nx * ny)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "slice exceeds i32 length"))?;
    let payload = read_record(reader, expected)?;

    Ok(payload
        .chunks_exact(4)
        .map(|word| f32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use nalgebra::Vector3;

    use super::*;

    fn grid() -> GridSpec {
        GridSpec::new(
            BoundingBox::new(Vector3::new(-1.25, 0.5, -3.0), Vector3::new(2.0, 1.75, 4.5)),
            [3, 2, 4],
        )
        .unwrap()
    }

    #[test]
    fn record_layout() {
        let mut writer = MacuWriter::new(Vec::new());
        writer.write_header(&grid()).unwrap();
        writer.write_slice(&[1.0; 6]).unwrap();
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), 4 + 36 + 4 + 4 + 24 + 4);
        assert_eq!(&bytes[0..4], &36i32.to_ne_bytes());
        assert_eq!(&bytes[40..44], &36i32.to_ne_bytes());
        assert_eq!(&bytes[44..48], &24i32.to_ne_bytes());
        assert_eq!(&bytes[48..52], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn header_and_slices_read_back() {
        let grid = grid();
        let mut writer = MacuWriter::new(Vec::new());
        writer.write_header(&grid).unwrap();
        writer.write_slice(&[0.5, 1.5, 2.5, 3.5, 4.5, 5.5]).unwrap();

        let mut reader = Cursor::new(writer.into_inner());
        let header = read_macu_header(&mut reader).unwrap();
        assert_eq!(header.bounds, [-1.25, 2.0, 0.5, 1.75, -3.0, 4.5]);
        assert_eq!(header.resolution, [3, 2, 4]);
        assert_eq!(header.bounding_box(), *grid.bounds());

        let slice = read_macu_slice(&mut reader, 3, 2).unwrap();
        assert_eq!(slice, vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut bytes = Vec::new();
        write_record(&mut bytes, &[0; 36]).unwrap();
        let last = bytes.len() - 4;
        bytes[last..].copy_from_slice(&40i32.to_ne_bytes());

        assert!(matches!(
            read_macu_header(&mut Cursor::new(&bytes)),
            Err(GridError::MalformedRecord {
                expected: 36,
                found: 40
            })
        ));
        assert!(matches!(
            read_macu_slice(&mut Cursor::new(&bytes), 3, 2),
            Err(GridError::MalformedRecord {
                expected: 24,
                found: 36
            })
        ));
    }

    #[test]
    fn truncated_file_is_an_io_error() {
        let mut bytes = Vec::new();
        write_record(&mut bytes, &[0; 36]).unwrap();
        bytes.truncate(20);

        assert!(matches!(
            read_macu_header(&mut Cursor::new(bytes)),
            Err(GridError::Io(_))
        ));
    }
}
