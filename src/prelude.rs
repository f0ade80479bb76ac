pub use crate::{
    encoding::{Endian, Ext, FromNumber, Marker, Mode, Number, PackNumber, Packer, Unpacker},
    errors::Error,
    Bytes,
};
