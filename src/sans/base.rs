//! Base types and their natural widths.

/// A primitive storage kind.
///
/// The enumeration is closed. The protocol's `enum`, `byte` and `z`-suffixed
/// codes share storage with an unsigned type and fold into it here; see
/// [`BaseType::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Uint8,
    Sint8,
    Uint16,
    Sint16,
    Uint32,
    Sint32,
    Uint64,
    Sint64,
    Float32,
    Float64,
    ByteString,
}

impl BaseType {
    /// Width in bytes of a single element of this type.
    pub const fn natural_width(self) -> u8 {
        match self {
            Self::Uint8 | Self::Sint8 | Self::ByteString => 1,
            Self::Uint16 | Self::Sint16 => 2,
            Self::Uint32 | Self::Sint32 | Self::Float32 => 4,
            Self::Uint64 | Self::Sint64 | Self::Float64 => 8,
        }
    }

    pub const fn is_string(self) -> bool {
        matches!(self, Self::ByteString)
    }

    /// Look up the base type for a code found in a definition record.
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::Uint8, // enum
            0x01 => Self::Sint8,
            0x02 => Self::Uint8,
            0x83 => Self::Sint16,
            0x84 => Self::Uint16,
            0x85 => Self::Sint32,
            0x86 => Self::Uint32,
            0x07 => Self::ByteString,
            0x88 => Self::Float32,
            0x89 => Self::Float64,
            0x0A => Self::Uint8, // uint8z
            0x8B => Self::Uint16, // uint16z
            0x8C => Self::Uint32, // uint32z
            0x0D => Self::Uint8, // byte
            0x8E => Self::Sint64,
            0x8F => Self::Uint64,
            0x90 => Self::Uint64, // uint64z
            _ => return None,
        })
    }

    /// The canonical code written to definition records.
    pub const fn code(self) -> u8 {
        match self {
            Self::Uint8 => 0x02,
            Self::Sint8 => 0x01,
            Self::Uint16 => 0x84,
            Self::Sint16 => 0x83,
            Self::Uint32 => 0x86,
            Self::Sint32 => 0x85,
            Self::Uint64 => 0x8F,
            Self::Sint64 => 0x8E,
            Self::Float32 => 0x88,
            Self::Float64 => 0x89,
            Self::ByteString => 0x07,
        }
    }
}

/// Width in bytes of a single element of `base_type`.
pub const fn natural_width(base_type: BaseType) -> u8 {
    base_type.natural_width()
}
