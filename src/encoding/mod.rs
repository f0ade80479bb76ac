//! # MessagePack streaming packer and unpacker
//!
//! The caller drives the shape of the stream: values are emitted one call at
//! a time into a [`Packer`] and read back in the same order from an
//! [`Unpacker`]. No value tree is ever materialised and nothing is inferred
//! from types at run time; the two halves meet only in the bytes.
//!
//! # Example
//!
//! ```
//! use mpack::prelude::*;
//!
//! let mut packer = Packer::new();
//! packer.start_array().unwrap();
//! packer.pack_str("position").unwrap();
//! packer.pack_number(9000u32).unwrap();
//! packer.end_array().unwrap();
//!
//! let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
//! assert_eq!(unpacker.unpack_array().unwrap(), 2);
//! assert_eq!(unpacker.unpack_str().unwrap(), "position");
//! assert_eq!(unpacker.unpack_number::<u32>().unwrap(), 9000);
//! ```

pub mod de;
pub mod ser;

mod constants;
pub(crate) use constants::*;

pub use de::{Ext, FromNumber, Marker, Number, Unpacker};
pub use ser::{PackNumber, Packer};

/// Byte-order policy, fixed per packer/unpacker at construction.
///
/// Every multi-byte integer, float, length prefix, container count, and
/// extension type tag passes through this policy. [`Endian::Local`] skips
/// the swap to host order entirely; buffers written in local mode can only
/// be read back on a machine of the same endianness, by an unpacker also in
/// local mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endian {
    /// Big-endian, the canonical interoperable wire order.
    Network,
    /// Host-native order. Not interoperable across hosts.
    Local,
}

impl Default for Endian {
    fn default() -> Endian {
        Endian::Network
    }
}

impl Endian {
    #[inline(always)]
    pub(crate) fn u16_bytes(self, val: u16) -> [u8; 2] {
        match self {
            Endian::Network => val.to_be_bytes(),
            Endian::Local => val.to_ne_bytes(),
        }
    }

    #[inline(always)]
    pub(crate) fn u32_bytes(self, val: u32) -> [u8; 4] {
        match self {
            Endian::Network => val.to_be_bytes(),
            Endian::Local => val.to_ne_bytes(),
        }
    }

    #[inline(always)]
    pub(crate) fn u64_bytes(self, val: u64) -> [u8; 8] {
        match self {
            Endian::Network => val.to_be_bytes(),
            Endian::Local => val.to_ne_bytes(),
        }
    }

    #[inline(always)]
    pub(crate) fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endian::Network => u16::from_be_bytes(bytes),
            Endian::Local => u16::from_ne_bytes(bytes),
        }
    }

    #[inline(always)]
    pub(crate) fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Network => u32::from_be_bytes(bytes),
            Endian::Local => u32::from_ne_bytes(bytes),
        }
    }

    #[inline(always)]
    pub(crate) fn u64_from(self, bytes: [u8; 8]) -> u64 {
        match self {
            Endian::Network => u64::from_be_bytes(bytes),
            Endian::Local => u64::from_ne_bytes(bytes),
        }
    }
}

/// Validation policy, fixed per packer/unpacker at construction.
///
/// [`Mode::Secure`] validates state transitions and input bounds on every
/// operation and surfaces violations as [`Error`](crate::errors::Error)
/// values. [`Mode::Fast`] trusts the caller: protocol-state checks (odd map
/// counts, open containers at message time, closing with nothing open) are
/// skipped and may produce garbage wire bytes, and decoder bounds are left
/// to slice indexing, which panics on overrun instead of returning an
/// error. Fast mode never trades away memory safety.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Check state transitions and buffer bounds on every operation.
    Secure,
    /// Trust the caller; skip the per-operation branches.
    Fast,
}

impl Default for Mode {
    fn default() -> Mode {
        Mode::Secure
    }
}

impl Mode {
    #[inline(always)]
    pub(crate) fn is_secure(self) -> bool {
        matches!(self, Mode::Secure)
    }
}
