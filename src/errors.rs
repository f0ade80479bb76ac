use crate::encoding::Marker;
use failure::Fail;

/// Everything that can go wrong while packing or unpacking.
///
/// Packing can fail through misuse of the container protocol or because a
/// value cannot be represented on the wire; unpacking can additionally fail
/// because the input bytes themselves are broken. Each variant carries the
/// diagnostics needed to point at the offending call or byte.
///
/// In [`Mode::Fast`](crate::encoding::Mode) the state and bounds checks that
/// produce most of these are skipped; see the mode documentation for what
/// remains.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum Error {
    /// A fixed-capacity packer ran out of room.
    #[fail(
        display = "packer capacity of {} bytes exhausted ({} further bytes required)",
        capacity, needed
    )]
    CapacityExhausted { capacity: usize, needed: usize },

    /// The message was read back while containers were still open.
    #[fail(display = "message incomplete, {} container(s) still open", open)]
    IncompleteContainer { open: usize },

    /// A map was closed after an odd number of child emissions, leaving a
    /// key without a value.
    #[fail(display = "map closed after {} items, which is not an even count", items)]
    OddMapCount { items: u64 },

    /// A container was closed while none was open.
    #[fail(display = "no container is open")]
    NoOpenContainer,

    /// A length or element count too large for any wire form.
    #[fail(display = "size {} cannot be represented on the wire", size)]
    SizeOutOfRange { size: u64 },

    /// A byte that no valid stream can contain at this position.
    #[fail(display = "malformed byte {:#04x} at offset {}", byte, offset)]
    MalformedStream { byte: u8, offset: usize },

    /// A read would run past the end of the input.
    #[fail(
        display = "read of {} byte(s) at offset {} exceeds input length {}",
        needed, offset, len
    )]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A typed unpack call found a marker of a different kind.
    #[fail(display = "expected {}, found {:?}", expected, found)]
    TypeMismatch {
        expected: &'static str,
        found: Marker,
    },
}
