/// 0xc0
pub(crate) const NIL: u8 = 0xc0;
/// 0xc1, reserved by the format. Doubles as the placeholder written when a
/// container is opened, before its real header is known.
pub(crate) const NEVER_USED: u8 = 0xc1;
/// 0xc2
pub(crate) const BOOL_FALSE: u8 = 0xc2;
/// 0xc3
pub(crate) const BOOL_TRUE: u8 = 0xc3;

/// 0xc4
pub(crate) const BIN8: u8 = 0xc4;
/// 0xc5
pub(crate) const BIN16: u8 = 0xc5;
/// 0xc6
pub(crate) const BIN32: u8 = 0xc6;

/// 0xc7
pub(crate) const EXT8: u8 = 0xc7;
/// 0xc8
pub(crate) const EXT16: u8 = 0xc8;
/// 0xc9
pub(crate) const EXT32: u8 = 0xc9;

/// 0xca
pub(crate) const FLOAT32: u8 = 0xca;
/// 0xcb
pub(crate) const FLOAT64: u8 = 0xcb;

/// 0xcc
pub(crate) const UINT8: u8 = 0xcc;
/// 0xcd
pub(crate) const UINT16: u8 = 0xcd;
/// 0xce
pub(crate) const UINT32: u8 = 0xce;
/// 0xcf
pub(crate) const UINT64: u8 = 0xcf;

/// 0xd0
pub(crate) const INT8: u8 = 0xd0;
/// 0xd1
pub(crate) const INT16: u8 = 0xd1;
/// 0xd2
pub(crate) const INT32: u8 = 0xd2;
/// 0xd3
pub(crate) const INT64: u8 = 0xd3;

/// 0xd4
pub(crate) const FIXEXT1: u8 = 0xd4;
/// 0xd5
pub(crate) const FIXEXT2: u8 = 0xd5;
/// 0xd6
pub(crate) const FIXEXT4: u8 = 0xd6;
/// 0xd7
pub(crate) const FIXEXT8: u8 = 0xd7;
/// 0xd8
pub(crate) const FIXEXT16: u8 = 0xd8;

/// 0xd9
pub(crate) const STR8: u8 = 0xd9;
/// 0xda
pub(crate) const STR16: u8 = 0xda;
/// 0xdb
pub(crate) const STR32: u8 = 0xdb;

/// 0xdc
pub(crate) const ARR16: u8 = 0xdc;
/// 0xdd
pub(crate) const ARR32: u8 = 0xdd;
/// 0xde
pub(crate) const MAP16: u8 = 0xde;
/// 0xdf
pub(crate) const MAP32: u8 = 0xdf;

/// Fixstr tag bits, 0xa0 (covers 0xa0 -> 0xbf)
pub(crate) const FIXSTR: u8 = 0b1010_0000;
/// Fixarray tag bits, 0x90 (covers 0x90 -> 0x9f)
pub(crate) const FIXARR: u8 = 0b1001_0000;
/// Fixmap tag bits, 0x80 (covers 0x80 -> 0x8f)
pub(crate) const FIXMAP: u8 = 0b1000_0000;
/// Negative fixint tag bits, 0xe0 (covers 0xe0 -> 0xff)
pub(crate) const NEG_FIXINT: u8 = 0b1110_0000;

/// 0x7f, payload mask for positive fixint
pub(crate) const MASK_FIXUINT: u8 = 0b0111_1111;
/// 0x1f, length mask for fixstr
pub(crate) const MASK_FIXSTR_LEN: u8 = 0b0001_1111;
/// 0x0f, count mask for fixarray/fixmap
pub(crate) const MASK_FIXCOL_LEN: u8 = 0b0000_1111;

/// Largest payload length a fixstr header can carry.
pub(crate) const FIXSTR_MAX_LEN: usize = MASK_FIXSTR_LEN as usize;
/// Largest element/pair count a fixarray/fixmap header can carry.
pub(crate) const FIXCOL_MAX_LEN: u64 = MASK_FIXCOL_LEN as u64;
