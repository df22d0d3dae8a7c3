use crate::error::Error;
use crate::state::Memory;
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read};

/// Load an image from any byte source into memory.
///
/// The first big-endian word is the origin; every following big-endian word
/// lands at consecutive addresses from there. Returns the origin. Only a
/// missing origin is an error: an empty body is legal, a trailing odd byte
/// is discarded, and words past the top of memory are discarded.
pub fn load_image<R: Read>(mut reader: R, memory: &mut Memory) -> io::Result<u16> {
    let origin = reader.read_u16::<BigEndian>()?;
    let mut address = origin;

    loop {
        match reader.read_u16::<BigEndian>() {
            Ok(word) => {
                memory.write(address, word);

                if address == u16::max_value() {
                    break;
                }
                address += 1;
            }
            Err(ref error) if error.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(error) => return Err(error),
        }
    }

    Ok(origin)
}

/// Load the image file at `path`, tagging any failure with the path.
pub fn load_path(path: &str, memory: &mut Memory) -> Result<u16, Error> {
    let image_load = |source| Error::ImageLoad {
        path: path.to_string(),
        source,
    };

    let file = File::open(path).map_err(image_load)?;

    load_image(BufReader::new(file), memory).map_err(image_load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn load_image_places_words_at_origin() {
        let mut memory = Memory::new();
        let bytes = vec![0x30, 0x00, 0x12, 0x34, 0xAB, 0xCD];

        let origin = load_image(Cursor::new(bytes), &mut memory).unwrap();

        assert_eq!(origin, 0x3000);
        assert_eq!(memory.read(0x3000), 0x1234);
        assert_eq!(memory.read(0x3001), 0xABCD);
        assert_eq!(memory.read(0x3002), 0);
    }

    #[test]
    fn load_image_with_empty_body() {
        let mut memory = Memory::new();

        let origin = load_image(Cursor::new(vec![0x40, 0x00]), &mut memory).unwrap();

        assert_eq!(origin, 0x4000);
        assert_eq!(memory.read(0x4000), 0);
    }

    #[test]
    fn load_image_without_origin_fails() {
        let mut memory = Memory::new();

        let empty = load_image(Cursor::new(vec![]), &mut memory);
        let half = load_image(Cursor::new(vec![0x30]), &mut memory);

        assert_eq!(empty.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(half.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn load_image_discards_trailing_odd_byte() {
        let mut memory = Memory::new();
        let bytes = vec![0x30, 0x00, 0x12, 0x34, 0xAB];

        load_image(Cursor::new(bytes), &mut memory).unwrap();

        assert_eq!(memory.read(0x3000), 0x1234);
        assert_eq!(memory.read(0x3001), 0);
    }

    #[test]
    fn load_image_truncates_at_top_of_memory() {
        let mut memory = Memory::new();
        let bytes = vec![
            0xFF, 0xFE, // origin 0xFFFE leaves room for two words
            0x00, 0x01, 0x00, 0x02, 0x00, 0x03,
        ];

        load_image(Cursor::new(bytes), &mut memory).unwrap();

        assert_eq!(memory.read(0xFFFE), 1);
        assert_eq!(memory.read(0xFFFF), 2);
        // the third word is discarded, not wrapped to 0x0000
        assert_eq!(memory.read(0x0000), 0);
    }

    #[test]
    fn later_images_overwrite_earlier_ones() {
        let mut memory = Memory::new();

        load_image(Cursor::new(vec![0x30, 0x00, 0x11, 0x11, 0x22, 0x22]), &mut memory).unwrap();
        load_image(Cursor::new(vec![0x30, 0x01, 0x33, 0x33]), &mut memory).unwrap();

        assert_eq!(memory.read(0x3000), 0x1111);
        assert_eq!(memory.read(0x3001), 0x3333);
    }

    #[test]
    fn load_path_reports_the_path() {
        let mut memory = Memory::new();

        let error = load_path("no-such-image.obj", &mut memory).unwrap_err();

        assert_eq!(
            error.to_string(),
            "failed to load image: no-such-image.obj"
        );
    }
}
