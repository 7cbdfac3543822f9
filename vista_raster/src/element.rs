// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Storage type of a single channel value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `u8`
    #[default]
    U8,
    /// `i16`
    I16,
    /// `u16`
    U16,
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `i64`
    I64,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Returns `true` for `f32` and `f64`.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Value of a fully opaque alpha channel: 1 for floating point types,
    /// 255 otherwise.
    pub const fn opaque_alpha(self) -> f64 {
        if self.is_float() { 1.0 } else { 255.0 }
    }

    /// Read one element from the start of `bytes` and widen it to `f64`.
    pub(crate) fn read_f64(self, bytes: &[u8]) -> f64 {
        match self {
            Self::U8 => read::<u8>(bytes).to_f64(),
            Self::I16 => read::<i16>(bytes).to_f64(),
            Self::U16 => read::<u16>(bytes).to_f64(),
            Self::I32 => read::<i32>(bytes).to_f64(),
            Self::U32 => read::<u32>(bytes).to_f64(),
            Self::I64 => read::<i64>(bytes).to_f64(),
            Self::U64 => read::<u64>(bytes).to_f64(),
            Self::F32 => read::<f32>(bytes).to_f64(),
            Self::F64 => read::<f64>(bytes),
        }
    }

    /// Convert `value` (saturating) and write it to the start of `bytes`.
    pub(crate) fn write_f64(self, bytes: &mut [u8], value: f64) {
        match self {
            Self::U8 => write(bytes, u8::from_f64(value)),
            Self::I16 => write(bytes, i16::from_f64(value)),
            Self::U16 => write(bytes, u16::from_f64(value)),
            Self::I32 => write(bytes, i32::from_f64(value)),
            Self::U32 => write(bytes, u32::from_f64(value)),
            Self::I64 => write(bytes, i64::from_f64(value)),
            Self::U64 => write(bytes, u64::from_f64(value)),
            Self::F32 => write(bytes, f32::from_f64(value)),
            Self::F64 => write(bytes, value),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::U16 => "uint16",
            Self::I32 => "int32",
            Self::U32 => "uint32",
            Self::I64 => "int64",
            Self::U64 => "uint64",
            Self::F32 => "float",
            Self::F64 => "double",
        })
    }
}

pub(crate) fn read<T: Element>(bytes: &[u8]) -> T {
    bytemuck::pod_read_unaligned(&bytes[..size_of::<T>()])
}

pub(crate) fn write<T: Element>(bytes: &mut [u8], value: T) {
    bytes[..size_of::<T>()].copy_from_slice(bytemuck::bytes_of(&value));
}

mod sealed {
    #[allow(unnameable_types, reason = "prevents implementations outside this crate")]
    pub trait Sealed {}
}

/// A Rust type that can be stored in an image buffer.
///
/// This trait is sealed; it is implemented for exactly the types listed in
/// [`ElementType`].
pub trait Element: bytemuck::Pod + PartialOrd + Default + sealed::Sealed {
    /// The runtime tag of this type.
    const TYPE: ElementType;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Convert from `f64`, saturating at the bounds of the type. `NaN` maps
    /// to zero for integer types.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const TYPE: ElementType = ElementType::$variant;

                #[allow(
                    clippy::cast_lossless,
                    clippy::cast_precision_loss,
                    reason = "64-bit integers may lose precision, which is accepted for pixel values"
                )]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "float to integer `as` casts saturate, which is the intended behavior"
                )]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_element!(
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
);

impl sealed::Sealed for f64 {}

impl Element for f64 {
    const TYPE: ElementType = ElementType::F64;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_conversion() {
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-3.0), 0);
        assert_eq!(u8::from_f64(f64::NAN), 0);
        assert_eq!(i16::from_f64(-1e9), i16::MIN);
        assert_eq!(u8::from_f64(254.9), 254);
    }

    #[test]
    fn byte_round_trip() {
        let mut buf = [0_u8; 8];
        for ty in [
            ElementType::U8,
            ElementType::I16,
            ElementType::U16,
            ElementType::I32,
            ElementType::U32,
            ElementType::I64,
            ElementType::U64,
            ElementType::F32,
            ElementType::F64,
        ] {
            ty.write_f64(&mut buf, 42.0);
            assert_eq!(ty.read_f64(&buf), 42.0, "{ty}");
        }
    }
}
