//! Typed numeric values.

use thiserror::Error;

use super::base::BaseType;

/// A numeric value tagged with the primitive it was read as, or is to be
/// written as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// An error converting a number to a base type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    /// The value cannot be represented by the target type.
    #[error("Value does not fit base type {0:?}.")]
    OutOfRange(BaseType),
    /// The target type does not hold numbers.
    #[error("Base type {0:?} is not numeric.")]
    NotNumeric(BaseType),
}

/// Conversion into a primitive from the widest integer and float forms.
trait Primitive: Sized {
    fn from_integer(x: i128) -> Option<Self>;
    fn from_float(x: f64) -> Option<Self>;
}

macro_rules! primitive_integer {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            fn from_integer(x: i128) -> Option<Self> {
                Self::try_from(x).ok()
            }

            fn from_float(x: f64) -> Option<Self> {
                // Saturating cast; anything that changes on the way back had a
                // fractional part, was out of range, or was NaN.
                let i = x as i128;
                if i as f64 == x { Self::try_from(i).ok() } else { None }
            }
        }
    )*};
}

macro_rules! primitive_float {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            fn from_integer(x: i128) -> Option<Self> {
                Some(x as $t)
            }

            fn from_float(x: f64) -> Option<Self> {
                Some(x as $t)
            }
        }
    )*};
}

primitive_integer!(u8, i8, u16, i16, u32, i32, u64, i64);
primitive_float!(f32, f64);

macro_rules! number {
    ($($variant:ident($t:ty) => $base:ident, $invalid:expr;)*) => {
        impl Number {
            /// The base type this value is stored as.
            pub fn base_type(self) -> BaseType {
                match self {
                    $(Self::$variant(_) => BaseType::$base,)*
                }
            }

            /// The 'invalid' marker value of a base type, written in place of
            /// an absent value.
            pub fn invalid(base_type: BaseType) -> Option<Self> {
                match base_type {
                    $(BaseType::$base => Some(Self::$variant($invalid)),)*
                    BaseType::ByteString => None,
                }
            }

            /// Convert this value to the primitive behind `base_type`.
            ///
            /// Integers must fit the target range; floats convert to integers
            /// only when they hold a whole number in range.
            pub fn cast(self, base_type: BaseType) -> Result<Self, NumberError> {
                let out_of_range = NumberError::OutOfRange(base_type);

                match base_type {
                    $(BaseType::$base => {
                        let x = match self.integer() {
                            Some(i) => <$t as Primitive>::from_integer(i),
                            None => <$t as Primitive>::from_float(self.as_f64()),
                        };
                        Ok(Self::$variant(x.ok_or(out_of_range)?))
                    })*
                    BaseType::ByteString => Err(NumberError::NotNumeric(base_type)),
                }
            }

            /// Read a value of `base_type` from exactly its natural width of
            /// bytes.
            pub(crate) fn from_bytes(base_type: BaseType, r: &[u8], is_le: bool) -> Option<Self> {
                match base_type {
                    $(BaseType::$base => {
                        let r: [u8; size_of::<$t>()] = r.try_into().ok()?;
                        let x = if is_le {
                            <$t>::from_le_bytes(r)
                        } else {
                            <$t>::from_be_bytes(r)
                        };
                        Some(Self::$variant(x))
                    })*
                    BaseType::ByteString => None,
                }
            }

            /// Write this value into exactly its natural width of bytes.
            pub(crate) fn write_bytes(self, w: &mut [u8], is_le: bool) {
                match self {
                    $(Self::$variant(x) => {
                        let r = if is_le { x.to_le_bytes() } else { x.to_be_bytes() };
                        w.copy_from_slice(&r);
                    })*
                }
            }
        }

        $(
            impl From<$t> for Number {
                fn from(x: $t) -> Self {
                    Self::$variant(x)
                }
            }
        )*
    };
}

number! {
    U8(u8) => Uint8, u8::MAX;
    I8(i8) => Sint8, i8::MAX;
    U16(u16) => Uint16, u16::MAX;
    I16(i16) => Sint16, i16::MAX;
    U32(u32) => Uint32, u32::MAX;
    I32(i32) => Sint32, i32::MAX;
    U64(u64) => Uint64, u64::MAX;
    I64(i64) => Sint64, i64::MAX;
    F32(f32) => Float32, f32::from_bits(u32::MAX);
    F64(f64) => Float64, f64::from_bits(u64::MAX);
}

impl Number {
    /// The value as an integer, if it is stored as one.
    pub fn integer(self) -> Option<i128> {
        Some(match self {
            Self::U8(x) => x.into(),
            Self::I8(x) => x.into(),
            Self::U16(x) => x.into(),
            Self::I16(x) => x.into(),
            Self::U32(x) => x.into(),
            Self::I32(x) => x.into(),
            Self::U64(x) => x.into(),
            Self::I64(x) => x.into(),
            Self::F32(_) | Self::F64(_) => return None,
        })
    }

    /// The value as a float, rounding wide integers.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::F32(x) => x.into(),
            Self::F64(x) => x,
            _ => self.integer().map_or(f64::NAN, |i| i as f64),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }
}
