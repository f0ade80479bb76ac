//! # mpack
//!
//! A streaming [MessagePack](https://msgpack.org) packer and unpacker.
//!
//! There is no value tree and no reflection: the caller emits values into a
//! [`Packer`](encoding::Packer) one call at a time and reads them back from
//! an [`Unpacker`](encoding::Unpacker) in the same order. Containers are
//! opened and closed explicitly, and the packer fills in their headers when
//! they close, splicing wider headers in place when a count outgrows its
//! single reserved byte.
//!
//! # Example
//!
//! ```
//! use mpack::prelude::*;
//!
//! let mut packer = Packer::new();
//! packer.start_map().unwrap();
//! packer.pack_str("name").unwrap();
//! packer.pack_str("probe-1").unwrap();
//! packer.pack_str("samples").unwrap();
//! packer.start_array().unwrap();
//! for sample in [3u32, 700, 70_000].iter() {
//!     packer.pack_number(*sample).unwrap();
//! }
//! packer.end_array().unwrap();
//! packer.end_map().unwrap();
//!
//! let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
//! assert_eq!(unpacker.unpack_map().unwrap(), 2);
//! assert_eq!(unpacker.unpack_str().unwrap(), "name");
//! assert_eq!(unpacker.unpack_str().unwrap(), "probe-1");
//! assert_eq!(unpacker.unpack_str().unwrap(), "samples");
//! assert_eq!(unpacker.unpack_array().unwrap(), 3);
//! assert_eq!(unpacker.unpack_number::<u32>().unwrap(), 3);
//! assert_eq!(unpacker.unpack_number::<u32>().unwrap(), 700);
//! assert_eq!(unpacker.unpack_number::<u32>().unwrap(), 70_000);
//! ```

/// MessagePack packer and unpacker.
pub mod encoding;
/// Error type.
pub mod errors;
/// Prelude
pub mod prelude;

pub use bytes::Bytes;
pub use encoding::{Endian, Ext, FromNumber, Marker, Mode, Number, PackNumber, Packer, Unpacker};
pub use errors::Error;
