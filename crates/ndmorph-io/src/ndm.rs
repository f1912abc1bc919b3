use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use ndmorph_image::Image;

use crate::error::IoError;
use crate::header::ImageHeader;
use crate::pixels::{decode_pixels, encode_pixels, PixelCodec};

/// Leading bytes of every ndm file.
pub const MAGIC: [u8; 4] = *b"NDM1";

/// Write an image to an ndm file.
///
/// The file holds the magic bytes, the length of the JSON header as a little-endian
/// `u32`, the JSON header and the little-endian pixel payload.
///
/// # Arguments
///
/// * `file_path` - The path of the file to create.
/// * `image` - The image to store.
/// * `use_compression` - Compress the pixel payload with zlib.
pub fn write_image<T: PixelCodec, const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<T, N>,
    use_compression: bool,
) -> Result<(), IoError> {
    let header = ImageHeader::from_image(image, use_compression);
    let header_json = serde_json::to_vec(&header)?;
    let header_len =
        u32::try_from(header_json.len()).map_err(|_| IoError::HeaderTooLarge(header_json.len()))?;

    let raw = encode_pixels(image.as_slice());
    let payload = if use_compression {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?
    } else {
        raw
    };

    let mut file = File::create(file_path.as_ref())?;
    file.write_all(&MAGIC)?;
    file.write_all(&header_len.to_le_bytes())?;
    file.write_all(&header_json)?;
    file.write_all(&payload)?;
    file.flush()?;

    log::debug!(
        "wrote {} {} image {:?} ({} payload bytes) to {}",
        header.pixel_type,
        header.ndim(),
        header.size,
        payload.len(),
        file_path.as_ref().display()
    );

    Ok(())
}

fn read_header_from(reader: &mut impl Read) -> Result<ImageHeader, IoError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(IoError::InvalidMagic(magic));
    }

    let mut len = [0u8; 4];
    reader.read_exact(&mut len)?;
    let header_len = u32::from_le_bytes(len) as u64;
    let mut header_json = Vec::new();
    reader.by_ref().take(header_len).read_to_end(&mut header_json)?;
    if header_json.len() as u64 != header_len {
        return Err(IoError::InvalidHeader(format!(
            "expected {} header bytes, found {}",
            header_len,
            header_json.len()
        )));
    }

    let header: ImageHeader = serde_json::from_slice(&header_json)?;
    if header.spacing.len() != header.ndim() || header.origin.len() != header.ndim() {
        return Err(IoError::InvalidHeader(format!(
            "size, spacing and origin lengths differ: {}, {}, {}",
            header.ndim(),
            header.spacing.len(),
            header.origin.len()
        )));
    }
    header.payload_len()?;
    Ok(header)
}

fn open(file_path: &Path) -> Result<BufReader<File>, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(file_path)?))
}

/// Read only the header of an ndm file.
///
/// Lets callers pick the pixel type and dimensionality before reading the pixels.
pub fn read_header(file_path: impl AsRef<Path>) -> Result<ImageHeader, IoError> {
    let mut reader = open(file_path.as_ref())?;
    read_header_from(&mut reader)
}

/// Read an ndm file into an image.
///
/// # Arguments
///
/// * `file_path` - The path of the file.
///
/// # Returns
///
/// The image, with the geometry stored in the file.
///
/// # Errors
///
/// Fails if the file is not an ndm file, or stores another pixel type or
/// dimensionality than requested, or if the payload length differs from the one
/// implied by the header. The payload is never read past that length.
pub fn read_image<T: PixelCodec, const N: usize>(
    file_path: impl AsRef<Path>,
) -> Result<Image<T, N>, IoError> {
    let file_path = file_path.as_ref();
    let mut reader = open(file_path)?;
    let header = read_header_from(&mut reader)?;

    if header.pixel_type != T::PIXEL_TYPE {
        return Err(IoError::PixelTypeMismatch {
            expected: T::PIXEL_TYPE,
            found: header.pixel_type,
        });
    }
    let geometry = header.geometry::<N>()?;

    // one byte past the expected length is enough to detect trailing data
    let expected = header.payload_len()?;
    let limit = (expected as u64).saturating_add(1);
    let mut payload = Vec::new();
    if header.compressed {
        ZlibDecoder::new(reader).take(limit).read_to_end(&mut payload)?;
    } else {
        reader.take(limit).read_to_end(&mut payload)?;
    }
    if payload.len() != expected {
        return Err(IoError::PayloadLength {
            expected,
            actual: payload.len(),
        });
    }

    log::debug!(
        "read {} image {} from {}",
        header.pixel_type,
        geometry,
        file_path.display()
    );

    Ok(Image::new(geometry, decode_pixels(&payload))?)
}

/// Size in bytes of a file on disk.
pub fn file_size(file_path: impl AsRef<Path>) -> Result<u64, IoError> {
    Ok(fs::metadata(file_path)?.len())
}
