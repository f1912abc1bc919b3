use ndmorph_image::Scalar;

/// Pixel types with a fixed little-endian byte representation.
pub trait PixelCodec: Scalar {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Append the little-endian bytes of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode a value from exactly [`Self::WIDTH`] little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_pixel_codec {
    ($($ty:ty),*) => {
        $(
            impl PixelCodec for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_pixel_codec!(u8, i8, u16, i16, u32, i32, f32, f64);

/// Encode pixels into a little-endian byte buffer.
pub fn encode_pixels<T: PixelCodec>(pixels: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * T::WIDTH);
    pixels.iter().for_each(|&v| v.write_le(&mut out));
    out
}

/// Decode a little-endian byte buffer into pixels.
///
/// Trailing bytes that do not form a whole pixel are ignored.
pub fn decode_pixels<T: PixelCodec>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::WIDTH).map(T::read_le).collect()
}
