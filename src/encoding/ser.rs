use super::*;
use crate::errors::Error;
use smallvec::SmallVec;

/// An open container: the offset of its reserved header byte and the number
/// of child items appended since it was opened.
#[derive(Clone, Copy, Debug)]
struct Frame {
    offset: usize,
    items: u64,
}

/// Backing byte store. Either growable, or a caller-sized region whose
/// overflow is an error.
#[derive(Clone, Debug)]
enum Store {
    Growable(Vec<u8>),
    Fixed { buf: Box<[u8]>, len: usize },
}

impl Store {
    #[inline(always)]
    fn len(&self) -> usize {
        match self {
            Store::Growable(vec) => vec.len(),
            Store::Fixed { len, .. } => *len,
        }
    }

    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        match self {
            Store::Growable(vec) => vec,
            Store::Fixed { buf, len } => &buf[..*len],
        }
    }

    fn clear(&mut self) {
        match self {
            Store::Growable(vec) => vec.clear(),
            Store::Fixed { len, .. } => *len = 0,
        }
    }

    /// Appends a single byte. Returns the offset it was written at.
    #[inline]
    fn push_byte(&mut self, byte: u8) -> Result<usize, Error> {
        match self {
            Store::Growable(vec) => {
                vec.push(byte);
                Ok(vec.len() - 1)
            }
            Store::Fixed { buf, len } => {
                if *len == buf.len() {
                    return Err(Error::CapacityExhausted {
                        capacity: buf.len(),
                        needed: 1,
                    });
                }
                buf[*len] = byte;
                *len += 1;
                Ok(*len - 1)
            }
        }
    }

    #[inline]
    fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        match self {
            Store::Growable(vec) => {
                vec.extend_from_slice(bytes);
                Ok(())
            }
            Store::Fixed { buf, len } => {
                let end = *len + bytes.len();
                if end > buf.len() {
                    return Err(Error::CapacityExhausted {
                        capacity: buf.len(),
                        needed: end - buf.len(),
                    });
                }
                buf[*len..end].copy_from_slice(bytes);
                *len = end;
                Ok(())
            }
        }
    }

    #[inline]
    fn set_byte(&mut self, offset: usize, byte: u8) {
        match self {
            Store::Growable(vec) => vec[offset] = byte,
            Store::Fixed { buf, .. } => buf[offset] = byte,
        }
    }

    /// Replaces the single byte at `offset` with `header`, shifting
    /// everything after it right by `header.len() - 1`.
    fn replace_marker(&mut self, offset: usize, header: &[u8]) -> Result<(), Error> {
        match self {
            Store::Growable(vec) => {
                let _ = vec.splice(offset..offset + 1, header.iter().copied());
                Ok(())
            }
            Store::Fixed { buf, len } => {
                let grown = header.len() - 1;
                let end = *len + grown;
                if end > buf.len() {
                    return Err(Error::CapacityExhausted {
                        capacity: buf.len(),
                        needed: end - buf.len(),
                    });
                }
                buf.copy_within(offset + 1..*len, offset + 1 + grown);
                buf[offset..offset + header.len()].copy_from_slice(header);
                *len = end;
                Ok(())
            }
        }
    }
}

/// Streaming MessagePack encoder.
///
/// Values are appended in emission order; arrays and maps are opened with
/// [`start_array`](Packer::start_array)/[`start_map`](Packer::start_map),
/// filled by emitting children, and closed with the matching `end_*` call,
/// at which point the container header is written over the byte reserved at
/// open time (growing it in place when the count outgrows the fix form).
///
/// # Example
///
/// ```
/// use mpack::prelude::*;
///
/// let mut packer = Packer::new();
/// packer.start_map().unwrap();
/// packer.pack_str("id").unwrap();
/// packer.pack_number(7u8).unwrap();
/// packer.end_map().unwrap();
///
/// assert_eq!(packer.message().unwrap(), [0x81, 0xa2, b'i', b'd', 0x07]);
/// ```
#[derive(Clone, Debug)]
pub struct Packer {
    store: Store,
    frames: SmallVec<[Frame; 8]>,
    endian: Endian,
    mode: Mode,
}

impl Default for Packer {
    fn default() -> Packer {
        Packer::new()
    }
}

impl Packer {
    /// Creates a growable packer in network order and secure mode.
    pub fn new() -> Packer {
        Packer::with_options(Endian::Network, Mode::Secure)
    }

    /// Creates a growable packer with explicit byte-order and validation
    /// policies.
    pub fn with_options(endian: Endian, mode: Mode) -> Packer {
        Packer {
            store: Store::Growable(Vec::new()),
            frames: SmallVec::new(),
            endian,
            mode,
        }
    }

    /// Creates a packer over a fixed region of `capacity` bytes, in network
    /// order and secure mode. Writing past the capacity is a
    /// [`CapacityExhausted`](Error::CapacityExhausted) error.
    pub fn fixed(capacity: usize) -> Packer {
        Packer::fixed_with_options(capacity, Endian::Network, Mode::Secure)
    }

    /// Creates a fixed-capacity packer with explicit byte-order and
    /// validation policies.
    pub fn fixed_with_options(capacity: usize, endian: Endian, mode: Mode) -> Packer {
        Packer {
            store: Store::Fixed {
                buf: vec![0; capacity].into_boxed_slice(),
                len: 0,
            },
            frames: SmallVec::new(),
            endian,
            mode,
        }
    }

    /// Appends nil.
    pub fn pack_nil(&mut self) -> Result<(), Error> {
        self.store.push_byte(NIL)?;
        self.count_item();
        Ok(())
    }

    /// Appends a boolean.
    pub fn pack_bool(&mut self, val: bool) -> Result<(), Error> {
        self.store
            .push_byte(if val { BOOL_TRUE } else { BOOL_FALSE })?;
        self.count_item();
        Ok(())
    }

    /// Appends a number in the narrowest wire form its value admits within
    /// the width class of its type.
    ///
    /// Unsigned values take 1 byte up to 127, then 2/3/5/9 bytes as the
    /// value crosses each power-of-two boundary. Signed values in
    /// `-31..0` take a single byte; all other signed values take the
    /// narrowest of int8/int16/int32/int64. Floats are never promoted or
    /// demoted: an `f32` always travels as float32, an `f64` as float64,
    /// as raw bit patterns.
    pub fn pack_number<T: PackNumber>(&mut self, val: T) -> Result<(), Error> {
        val.pack_into(self)?;
        self.count_item();
        Ok(())
    }

    /// Appends a length-prefixed string. The length written is the exact
    /// byte length of `val`; no terminator travels on the wire.
    pub fn pack_str(&mut self, val: &str) -> Result<(), Error> {
        let bytes = val.as_bytes();
        let len = bytes.len();
        if len <= FIXSTR_MAX_LEN {
            self.store.push_byte(FIXSTR | len as u8)?;
        } else if len <= u8::MAX as usize {
            self.store.push_byte(STR8)?;
            self.store.push_byte(len as u8)?;
        } else if len <= u16::MAX as usize {
            let body = self.endian.u16_bytes(len as u16);
            self.store.push_byte(STR16)?;
            self.store.push_bytes(&body)?;
        } else if len <= u32::MAX as usize {
            let body = self.endian.u32_bytes(len as u32);
            self.store.push_byte(STR32)?;
            self.store.push_bytes(&body)?;
        } else {
            return Err(Error::SizeOutOfRange { size: len as u64 });
        }
        self.store.push_bytes(bytes)?;
        self.count_item();
        Ok(())
    }

    /// Appends an opaque binary blob with the narrowest length prefix.
    pub fn pack_bin(&mut self, val: &[u8]) -> Result<(), Error> {
        let len = val.len();
        if len <= u8::MAX as usize {
            self.store.push_byte(BIN8)?;
            self.store.push_byte(len as u8)?;
        } else if len <= u16::MAX as usize {
            let body = self.endian.u16_bytes(len as u16);
            self.store.push_byte(BIN16)?;
            self.store.push_bytes(&body)?;
        } else if len <= u32::MAX as usize {
            let body = self.endian.u32_bytes(len as u32);
            self.store.push_byte(BIN32)?;
            self.store.push_bytes(&body)?;
        } else {
            return Err(Error::SizeOutOfRange { size: len as u64 });
        }
        self.store.push_bytes(val)?;
        self.count_item();
        Ok(())
    }

    /// Appends an extension record: a signed 32-bit type tag followed by an
    /// opaque payload. Payloads of exactly 1, 2, 4, 8 or 16 bytes use the
    /// fixext forms; everything else uses the narrowest of ext8/16/32.
    ///
    /// # Arguments
    ///
    /// * `tag: i32` - The application-defined extension type.
    /// * `data: &[u8]` - The payload.
    pub fn pack_ext(&mut self, tag: i32, data: &[u8]) -> Result<(), Error> {
        let tag_bytes = self.endian.u32_bytes(tag as u32);
        let len = data.len();
        match len {
            1 => {
                self.store.push_byte(FIXEXT1)?;
            }
            2 => {
                self.store.push_byte(FIXEXT2)?;
            }
            4 => {
                self.store.push_byte(FIXEXT4)?;
            }
            8 => {
                self.store.push_byte(FIXEXT8)?;
            }
            16 => {
                self.store.push_byte(FIXEXT16)?;
            }
            _ if len <= u8::MAX as usize => {
                self.store.push_byte(EXT8)?;
                self.store.push_byte(len as u8)?;
            }
            _ if len <= u16::MAX as usize => {
                let body = self.endian.u16_bytes(len as u16);
                self.store.push_byte(EXT16)?;
                self.store.push_bytes(&body)?;
            }
            _ if len <= u32::MAX as usize => {
                let body = self.endian.u32_bytes(len as u32);
                self.store.push_byte(EXT32)?;
                self.store.push_bytes(&body)?;
            }
            _ => return Err(Error::SizeOutOfRange { size: len as u64 }),
        }
        self.store.push_bytes(&tag_bytes)?;
        self.store.push_bytes(data)?;
        self.count_item();
        Ok(())
    }

    /// Opens an array. The element count is whatever has been emitted when
    /// the matching [`end_array`](Packer::end_array) runs.
    pub fn start_array(&mut self) -> Result<(), Error> {
        let offset = self.store.push_byte(NEVER_USED)?;
        self.count_item();
        self.frames.push(Frame { offset, items: 0 });
        Ok(())
    }

    /// Closes the innermost open container as an array and writes its
    /// header over the byte reserved at open time.
    pub fn end_array(&mut self) -> Result<(), Error> {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None if self.mode.is_secure() => return Err(Error::NoOpenContainer),
            None => return Ok(()),
        };
        self.close_container(frame.offset, frame.items, FIXARR, ARR16, ARR32)
    }

    /// Opens a map. Children must be emitted in key/value pairs.
    pub fn start_map(&mut self) -> Result<(), Error> {
        let offset = self.store.push_byte(NEVER_USED)?;
        self.count_item();
        self.frames.push(Frame { offset, items: 0 });
        Ok(())
    }

    /// Closes the innermost open container as a map. The wire carries the
    /// pair count; in secure mode an odd number of child emissions is an
    /// [`OddMapCount`](Error::OddMapCount) error.
    pub fn end_map(&mut self) -> Result<(), Error> {
        let frame = match self.frames.last() {
            Some(frame) => *frame,
            None if self.mode.is_secure() => return Err(Error::NoOpenContainer),
            None => return Ok(()),
        };
        if self.mode.is_secure() && frame.items % 2 != 0 {
            return Err(Error::OddMapCount { items: frame.items });
        }
        self.frames.pop();
        self.close_container(frame.offset, frame.items / 2, FIXMAP, MAP16, MAP32)
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn current_size(&self) -> usize {
        self.store.len()
    }

    /// Whether every opened container has been closed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrows the packed message. In secure mode this is an
    /// [`IncompleteContainer`](Error::IncompleteContainer) error while any
    /// container is still open; the borrow is valid until the next
    /// mutating call.
    pub fn message(&self) -> Result<&[u8], Error> {
        if self.mode.is_secure() && !self.frames.is_empty() {
            return Err(Error::IncompleteContainer {
                open: self.frames.len(),
            });
        }
        Ok(self.store.as_slice())
    }

    /// Returns the packer to empty, discarding any open containers.
    pub fn clear(&mut self) {
        self.store.clear();
        self.frames.clear();
    }

    /// Bumps the item count of the innermost open container, if any.
    #[inline(always)]
    fn count_item(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.items += 1;
        }
    }

    fn pack_unsigned(&mut self, val: u64) -> Result<(), Error> {
        if val <= MASK_FIXUINT as u64 {
            self.store.push_byte(val as u8)?;
        } else if val <= u8::MAX as u64 {
            self.store.push_byte(UINT8)?;
            self.store.push_byte(val as u8)?;
        } else if val <= u16::MAX as u64 {
            let body = self.endian.u16_bytes(val as u16);
            self.store.push_byte(UINT16)?;
            self.store.push_bytes(&body)?;
        } else if val <= u32::MAX as u64 {
            let body = self.endian.u32_bytes(val as u32);
            self.store.push_byte(UINT32)?;
            self.store.push_bytes(&body)?;
        } else {
            let body = self.endian.u64_bytes(val);
            self.store.push_byte(UINT64)?;
            self.store.push_bytes(&body)?;
        }
        Ok(())
    }

    fn pack_signed(&mut self, val: i64) -> Result<(), Error> {
        if (-31..0).contains(&val) {
            self.store.push_byte(val as u8 | NEG_FIXINT)?;
        } else if let Ok(v) = i8::try_from(val) {
            self.store.push_byte(INT8)?;
            self.store.push_byte(v as u8)?;
        } else if let Ok(v) = i16::try_from(val) {
            let body = self.endian.u16_bytes(v as u16);
            self.store.push_byte(INT16)?;
            self.store.push_bytes(&body)?;
        } else if let Ok(v) = i32::try_from(val) {
            let body = self.endian.u32_bytes(v as u32);
            self.store.push_byte(INT32)?;
            self.store.push_bytes(&body)?;
        } else {
            let body = self.endian.u64_bytes(val as u64);
            self.store.push_byte(INT64)?;
            self.store.push_bytes(&body)?;
        }
        Ok(())
    }

    fn pack_f32(&mut self, val: f32) -> Result<(), Error> {
        let body = self.endian.u32_bytes(val.to_bits());
        self.store.push_byte(FLOAT32)?;
        self.store.push_bytes(&body)
    }

    fn pack_f64(&mut self, val: f64) -> Result<(), Error> {
        let body = self.endian.u64_bytes(val.to_bits());
        self.store.push_byte(FLOAT64)?;
        self.store.push_bytes(&body)
    }

    fn close_container(
        &mut self,
        offset: usize,
        count: u64,
        fix: u8,
        wide16: u8,
        wide32: u8,
    ) -> Result<(), Error> {
        if count <= FIXCOL_MAX_LEN {
            self.store.set_byte(offset, fix | count as u8);
            Ok(())
        } else if count <= u16::MAX as u64 {
            let body = self.endian.u16_bytes(count as u16);
            self.splice_header(offset, &[wide16, body[0], body[1]])
        } else if count <= u32::MAX as u64 {
            let body = self.endian.u32_bytes(count as u32);
            self.splice_header(offset, &[wide32, body[0], body[1], body[2], body[3]])
        } else {
            Err(Error::SizeOutOfRange { size: count })
        }
    }

    /// Grows the reserved header byte at `offset` into `header`, shifting
    /// the tail of the buffer. Any frame still open whose offset lies past
    /// the splice point moves with the shift; frames always open outermost
    /// first, so the loop upholds the invariant rather than doing work.
    fn splice_header(&mut self, offset: usize, header: &[u8]) -> Result<(), Error> {
        self.store.replace_marker(offset, header)?;
        let grown = header.len() - 1;
        for frame in self.frames.iter_mut() {
            if frame.offset > offset {
                frame.offset += grown;
            }
        }
        Ok(())
    }
}

/// Numbers accepted by [`Packer::pack_number`].
///
/// The width class (unsigned, signed, 32-bit float, 64-bit float) is fixed
/// by the implementing type; the wire width is chosen from the value.
pub trait PackNumber: Copy {
    #[doc(hidden)]
    fn pack_into(self, packer: &mut Packer) -> Result<(), Error>;
}

macro_rules! pack_number_unsigned {
    ($($typ:ty),+) => {
        $(
            impl PackNumber for $typ {
                #[inline(always)]
                fn pack_into(self, packer: &mut Packer) -> Result<(), Error> {
                    packer.pack_unsigned(self as u64)
                }
            }
        )+
    };
}
pack_number_unsigned!(u8, u16, u32, u64, usize);

macro_rules! pack_number_signed {
    ($($typ:ty),+) => {
        $(
            impl PackNumber for $typ {
                #[inline(always)]
                fn pack_into(self, packer: &mut Packer) -> Result<(), Error> {
                    packer.pack_signed(self as i64)
                }
            }
        )+
    };
}
pack_number_signed!(i8, i16, i32, i64, isize);

impl PackNumber for f32 {
    #[inline(always)]
    fn pack_into(self, packer: &mut Packer) -> Result<(), Error> {
        packer.pack_f32(self)
    }
}

impl PackNumber for f64 {
    #[inline(always)]
    fn pack_into(self, packer: &mut Packer) -> Result<(), Error> {
        packer.pack_f64(self)
    }
}
