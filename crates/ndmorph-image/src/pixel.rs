use std::fmt::Debug;
use std::str::FromStr;

use num_traits::{Bounded, NumCast, One, Zero};

use crate::error::ImageError;

/// Numeric family of a pixel type.
///
/// Decides how textual pixel values (boundary overrides, foreground labels) are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// Signed or unsigned integer pixels.
    Integer,
    /// IEEE floating-point pixels.
    FloatingPoint,
}

/// Concrete storage type of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// 8-bit unsigned integer.
    U8,
    /// 8-bit signed integer.
    I8,
    /// 16-bit unsigned integer.
    U16,
    /// 16-bit signed integer.
    I16,
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit signed integer.
    I32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl PixelType {
    /// The numeric family of the pixel type.
    pub fn kind(&self) -> PixelKind {
        match self {
            PixelType::F32 | PixelType::F64 => PixelKind::FloatingPoint,
            _ => PixelKind::Integer,
        }
    }

    /// Size of one pixel in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            PixelType::U8 | PixelType::I8 => 1,
            PixelType::U16 | PixelType::I16 => 2,
            PixelType::U32 | PixelType::I32 | PixelType::F32 => 4,
            PixelType::F64 => 8,
        }
    }

    /// Lowercase name of the type, as used in file headers and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            PixelType::U8 => "u8",
            PixelType::I8 => "i8",
            PixelType::U16 => "u16",
            PixelType::I16 => "i16",
            PixelType::U32 => "u32",
            PixelType::I32 => "i32",
            PixelType::F32 => "f32",
            PixelType::F64 => "f64",
        }
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PixelType {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u8" | "uchar" | "unsigned char" => Ok(PixelType::U8),
            "i8" | "char" => Ok(PixelType::I8),
            "u16" | "ushort" | "unsigned short" => Ok(PixelType::U16),
            "i16" | "short" => Ok(PixelType::I16),
            "u32" | "uint" | "unsigned int" => Ok(PixelType::U32),
            "i32" | "int" => Ok(PixelType::I32),
            "f32" | "float" => Ok(PixelType::F32),
            "f64" | "double" => Ok(PixelType::F64),
            other => Err(ImageError::UnknownPixelType(other.to_string())),
        }
    }
}

/// Trait for pixel scalar types.
///
/// Send and Sync are required to process image lines on the rayon thread pool.
pub trait Scalar:
    Copy + Default + PartialOrd + Debug + Bounded + NumCast + Zero + One + Send + Sync + 'static
{
    /// The numeric family of the type.
    const KIND: PixelKind;

    /// The storage tag of the type.
    const PIXEL_TYPE: PixelType;

    /// The most negative representable value.
    ///
    /// `MIN` for signed integers, zero for unsigned integers and `-MAX` for floats.
    fn lowest() -> Self {
        Self::min_value()
    }
}

macro_rules! impl_scalar {
    ($ty:ty, $kind:expr, $pixel_type:expr) => {
        impl Scalar for $ty {
            const KIND: PixelKind = $kind;
            const PIXEL_TYPE: PixelType = $pixel_type;
        }
    };
}

impl_scalar!(u8, PixelKind::Integer, PixelType::U8);
impl_scalar!(i8, PixelKind::Integer, PixelType::I8);
impl_scalar!(u16, PixelKind::Integer, PixelType::U16);
impl_scalar!(i16, PixelKind::Integer, PixelType::I16);
impl_scalar!(u32, PixelKind::Integer, PixelType::U32);
impl_scalar!(i32, PixelKind::Integer, PixelType::I32);
impl_scalar!(f32, PixelKind::FloatingPoint, PixelType::F32);
impl_scalar!(f64, PixelKind::FloatingPoint, PixelType::F64);
