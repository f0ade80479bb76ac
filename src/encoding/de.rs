use super::*;
use crate::errors::Error;
use bytes::Bytes;

/// Classification of a leading wire byte.
///
/// The five fix forms fold their whole byte range into a single variant;
/// everything else is a singleton marker. 0xc1 is reserved by the format
/// and classifies as [`Marker::NeverUsed`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Marker {
    Nil,
    NeverUsed,
    False,
    True,
    Bin8,
    Bin16,
    Bin32,
    Ext8,
    Ext16,
    Ext32,
    Float32,
    Float64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    FixExt1,
    FixExt2,
    FixExt4,
    FixExt8,
    FixExt16,
    Str8,
    Str16,
    Str32,
    Arr16,
    Arr32,
    Map16,
    Map32,
    /// 0x00 -> 0x7f
    FixUInt,
    /// 0x80 -> 0x8f
    FixMap,
    /// 0x90 -> 0x9f
    FixArr,
    /// 0xa0 -> 0xbf
    FixStr,
    /// 0xe0 -> 0xff
    FixInt,
}

impl Marker {
    /// Classifies a leading byte. Total over all 256 values; the fixed
    /// ranges are matched first, then the singleton markers.
    pub fn from_u8(byte: u8) -> Marker {
        match byte {
            0x00..=0x7f => Marker::FixUInt,
            0x80..=0x8f => Marker::FixMap,
            0x90..=0x9f => Marker::FixArr,
            0xa0..=0xbf => Marker::FixStr,
            0xe0..=0xff => Marker::FixInt,
            NIL => Marker::Nil,
            NEVER_USED => Marker::NeverUsed,
            BOOL_FALSE => Marker::False,
            BOOL_TRUE => Marker::True,
            BIN8 => Marker::Bin8,
            BIN16 => Marker::Bin16,
            BIN32 => Marker::Bin32,
            EXT8 => Marker::Ext8,
            EXT16 => Marker::Ext16,
            EXT32 => Marker::Ext32,
            FLOAT32 => Marker::Float32,
            FLOAT64 => Marker::Float64,
            UINT8 => Marker::UInt8,
            UINT16 => Marker::UInt16,
            UINT32 => Marker::UInt32,
            UINT64 => Marker::UInt64,
            INT8 => Marker::Int8,
            INT16 => Marker::Int16,
            INT32 => Marker::Int32,
            INT64 => Marker::Int64,
            FIXEXT1 => Marker::FixExt1,
            FIXEXT2 => Marker::FixExt2,
            FIXEXT4 => Marker::FixExt4,
            FIXEXT8 => Marker::FixExt8,
            FIXEXT16 => Marker::FixExt16,
            STR8 => Marker::Str8,
            STR16 => Marker::Str16,
            STR32 => Marker::Str32,
            ARR16 => Marker::Arr16,
            ARR32 => Marker::Arr32,
            MAP16 => Marker::Map16,
            MAP32 => Marker::Map32,
        }
    }
}

/// A number decoded at its wire width, before conversion to the caller's
/// requested type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    UInt(u64),
    Int(i64),
    Float32(f32),
    Float64(f64),
}

/// Types a decoded [`Number`] can be handed back as.
///
/// Conversion follows `as`-cast semantics: values wider than the requested
/// type truncate, floats requested as integers drop their fraction. Callers
/// are expected to request the width class they packed.
pub trait FromNumber {
    #[doc(hidden)]
    fn from_number(num: Number) -> Self;
}

macro_rules! from_number {
    ($($typ:ty),+) => {
        $(
            impl FromNumber for $typ {
                #[inline(always)]
                fn from_number(num: Number) -> $typ {
                    match num {
                        Number::UInt(v) => v as $typ,
                        Number::Int(v) => v as $typ,
                        Number::Float32(v) => v as $typ,
                        Number::Float64(v) => v as $typ,
                    }
                }
            }
        )+
    };
}
from_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// A decoded extension record. The payload is a zero-copy subrange of the
/// unpacker's input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ext {
    /// Application-defined extension type.
    pub tag: i32,
    /// Opaque payload.
    pub data: Bytes,
}

/// Streaming MessagePack decoder.
///
/// A positional cursor over an input buffer, consumed in reading order.
/// The caller drives the shape: each `unpack_*` call names the kind it
/// expects, and a marker of a different kind is a
/// [`TypeMismatch`](Error::TypeMismatch) that leaves the cursor where it
/// was. Binary and extension payloads come back as zero-copy subranges of
/// the input; strings are copied out.
///
/// # Example
///
/// ```
/// use mpack::prelude::*;
///
/// let mut packer = Packer::new();
/// packer.pack_number(-5i32).unwrap();
/// packer.pack_str("tail").unwrap();
///
/// let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
/// assert_eq!(unpacker.unpack_number::<i32>().unwrap(), -5);
/// assert_eq!(unpacker.unpack_str().unwrap(), "tail");
/// ```
#[derive(Clone, Debug)]
pub struct Unpacker {
    data: Bytes,
    pos: usize,
    endian: Endian,
    mode: Mode,
}

impl Unpacker {
    /// Creates an unpacker over `data` in network order and secure mode.
    pub fn new(data: impl Into<Bytes>) -> Unpacker {
        Unpacker::with_options(data, Endian::Network, Mode::Secure)
    }

    /// Creates an unpacker with explicit byte-order and validation
    /// policies. Both must match the packer that produced `data`.
    pub fn with_options(data: impl Into<Bytes>, endian: Endian, mode: Mode) -> Unpacker {
        Unpacker {
            data: data.into(),
            pos: 0,
            endian,
            mode,
        }
    }

    /// Returns the cursor to the start of the input for replay.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Rebinds the unpacker to a new input and resets the cursor.
    pub fn set(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
        self.pos = 0;
    }

    /// Current cursor offset. Never decreases except through
    /// [`reset`](Unpacker::reset) or [`set`](Unpacker::set).
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Classifies the marker at the cursor without advancing.
    pub fn peek_type(&self) -> Result<Marker, Error> {
        Ok(Marker::from_u8(self.peek_byte()?))
    }

    /// Consumes a nil.
    pub fn unpack_nil(&mut self) -> Result<(), Error> {
        match self.peek_type()? {
            Marker::Nil => {
                self.pos += 1;
                Ok(())
            }
            found => Err(self.unexpected("nil", found)),
        }
    }

    /// Consumes a boolean.
    pub fn unpack_bool(&mut self) -> Result<bool, Error> {
        match self.peek_type()? {
            Marker::True => {
                self.pos += 1;
                Ok(true)
            }
            Marker::False => {
                self.pos += 1;
                Ok(false)
            }
            found => Err(self.unexpected("a bool", found)),
        }
    }

    /// Consumes any numeric wire form and returns it as `T`.
    ///
    /// The value decodes at its wire width; see [`FromNumber`] for how it
    /// reaches `T`. Floats are reconstructed from their transported bit
    /// patterns, never converted arithmetically.
    pub fn unpack_number<T: FromNumber>(&mut self) -> Result<T, Error> {
        self.read_number().map(T::from_number)
    }

    /// Consumes a string and copies it out. Invalid UTF-8 is a
    /// [`MalformedStream`](Error::MalformedStream) error naming the
    /// offending byte.
    pub fn unpack_str(&mut self) -> Result<String, Error> {
        let payload = self.str_payload()?;
        let start = self.pos - payload.len();
        match String::from_utf8(payload.to_vec()) {
            Ok(s) => Ok(s),
            Err(err) => {
                let at = err.utf8_error().valid_up_to();
                Err(Error::MalformedStream {
                    byte: payload[at],
                    offset: start + at,
                })
            }
        }
    }

    /// Consumes a string and returns its raw bytes without UTF-8
    /// validation, as a zero-copy subrange of the input.
    pub fn unpack_str_bytes(&mut self) -> Result<Bytes, Error> {
        self.str_payload()
    }

    /// Consumes a binary blob. The returned bytes are a zero-copy subrange
    /// of the input.
    pub fn unpack_bin(&mut self) -> Result<Bytes, Error> {
        let byte = self.peek_byte()?;
        let len = match Marker::from_u8(byte) {
            Marker::Bin8 => {
                self.pos += 1;
                self.read_u8()? as usize
            }
            Marker::Bin16 => {
                self.pos += 1;
                self.read_u16()? as usize
            }
            Marker::Bin32 => {
                self.pos += 1;
                self.read_u32()? as usize
            }
            found => return Err(self.unexpected("a binary blob", found)),
        };
        self.take(len)
    }

    /// Consumes an extension record. The payload is a zero-copy subrange
    /// of the input.
    pub fn unpack_ext(&mut self) -> Result<Ext, Error> {
        let byte = self.peek_byte()?;
        let len = match Marker::from_u8(byte) {
            Marker::FixExt1 => {
                self.pos += 1;
                1
            }
            Marker::FixExt2 => {
                self.pos += 1;
                2
            }
            Marker::FixExt4 => {
                self.pos += 1;
                4
            }
            Marker::FixExt8 => {
                self.pos += 1;
                8
            }
            Marker::FixExt16 => {
                self.pos += 1;
                16
            }
            Marker::Ext8 => {
                self.pos += 1;
                self.read_u8()? as usize
            }
            Marker::Ext16 => {
                self.pos += 1;
                self.read_u16()? as usize
            }
            Marker::Ext32 => {
                self.pos += 1;
                self.read_u32()? as usize
            }
            found => return Err(self.unexpected("an extension", found)),
        };
        let tag = self.read_u32()? as i32;
        let data = self.take(len)?;
        Ok(Ext { tag, data })
    }

    /// Consumes an array header and returns the element count. The caller
    /// unpacks that many following values.
    pub fn unpack_array(&mut self) -> Result<u32, Error> {
        let byte = self.peek_byte()?;
        match Marker::from_u8(byte) {
            Marker::FixArr => {
                self.pos += 1;
                Ok((byte & MASK_FIXCOL_LEN) as u32)
            }
            Marker::Arr16 => {
                self.pos += 1;
                Ok(self.read_u16()? as u32)
            }
            Marker::Arr32 => {
                self.pos += 1;
                self.read_u32()
            }
            found => Err(self.unexpected("an array", found)),
        }
    }

    /// Consumes a map header and returns the pair count. The caller
    /// unpacks twice that many following values, alternating key/value.
    pub fn unpack_map(&mut self) -> Result<u32, Error> {
        let byte = self.peek_byte()?;
        match Marker::from_u8(byte) {
            Marker::FixMap => {
                self.pos += 1;
                Ok((byte & MASK_FIXCOL_LEN) as u32)
            }
            Marker::Map16 => {
                self.pos += 1;
                Ok(self.read_u16()? as u32)
            }
            Marker::Map32 => {
                self.pos += 1;
                self.read_u32()
            }
            found => Err(self.unexpected("a map", found)),
        }
    }

    /// Bounds guard for the next `needed` bytes. Skipped in fast mode,
    /// where an overrun surfaces as a slice-indexing panic instead.
    #[inline(always)]
    fn check(&self, needed: usize) -> Result<(), Error> {
        if self.mode.is_secure() {
            match self.pos.checked_add(needed) {
                Some(end) if end <= self.data.len() => {}
                _ => {
                    return Err(Error::OutOfBounds {
                        offset: self.pos,
                        needed,
                        len: self.data.len(),
                    })
                }
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn peek_byte(&self) -> Result<u8, Error> {
        self.check(1)?;
        Ok(self.data[self.pos])
    }

    /// Slices `len` payload bytes out of the input without copying.
    #[inline]
    fn take(&mut self, len: usize) -> Result<Bytes, Error> {
        self.check(len)?;
        let out = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(out)
    }

    #[inline]
    fn read_exact<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        self.check(N)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    #[inline(always)]
    fn read_u8(&mut self) -> Result<u8, Error> {
        self.read_exact::<1>().map(|b| b[0])
    }

    #[inline(always)]
    fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_exact::<2>().map(|b| self.endian.u16_from(b))
    }

    #[inline(always)]
    fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_exact::<4>().map(|b| self.endian.u32_from(b))
    }

    #[inline(always)]
    fn read_u64(&mut self) -> Result<u64, Error> {
        self.read_exact::<8>().map(|b| self.endian.u64_from(b))
    }

    fn read_number(&mut self) -> Result<Number, Error> {
        let byte = self.peek_byte()?;
        match Marker::from_u8(byte) {
            Marker::FixUInt => {
                self.pos += 1;
                Ok(Number::UInt((byte & MASK_FIXUINT) as u64))
            }
            Marker::UInt8 => {
                self.pos += 1;
                Ok(Number::UInt(self.read_u8()? as u64))
            }
            Marker::UInt16 => {
                self.pos += 1;
                Ok(Number::UInt(self.read_u16()? as u64))
            }
            Marker::UInt32 => {
                self.pos += 1;
                Ok(Number::UInt(self.read_u32()? as u64))
            }
            Marker::UInt64 => {
                self.pos += 1;
                Ok(Number::UInt(self.read_u64()?))
            }
            Marker::FixInt => {
                self.pos += 1;
                Ok(Number::Int((byte as i8) as i64))
            }
            Marker::Int8 => {
                self.pos += 1;
                Ok(Number::Int((self.read_u8()? as i8) as i64))
            }
            Marker::Int16 => {
                self.pos += 1;
                Ok(Number::Int((self.read_u16()? as i16) as i64))
            }
            Marker::Int32 => {
                self.pos += 1;
                Ok(Number::Int((self.read_u32()? as i32) as i64))
            }
            Marker::Int64 => {
                self.pos += 1;
                Ok(Number::Int(self.read_u64()? as i64))
            }
            Marker::Float32 => {
                self.pos += 1;
                Ok(Number::Float32(f32::from_bits(self.read_u32()?)))
            }
            Marker::Float64 => {
                self.pos += 1;
                Ok(Number::Float64(f64::from_bits(self.read_u64()?)))
            }
            found => Err(self.unexpected("a number", found)),
        }
    }

    fn str_payload(&mut self) -> Result<Bytes, Error> {
        let byte = self.peek_byte()?;
        let len = match Marker::from_u8(byte) {
            Marker::FixStr => {
                self.pos += 1;
                (byte & MASK_FIXSTR_LEN) as usize
            }
            Marker::Str8 => {
                self.pos += 1;
                self.read_u8()? as usize
            }
            Marker::Str16 => {
                self.pos += 1;
                self.read_u16()? as usize
            }
            Marker::Str32 => {
                self.pos += 1;
                self.read_u32()? as usize
            }
            found => return Err(self.unexpected("a string", found)),
        };
        self.take(len)
    }

    fn unexpected(&self, expected: &'static str, found: Marker) -> Error {
        if found == Marker::NeverUsed {
            Error::MalformedStream {
                byte: NEVER_USED,
                offset: self.pos,
            }
        } else {
            Error::TypeMismatch { expected, found }
        }
    }
}
