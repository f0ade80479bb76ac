use mpack::prelude::*;
use proptest::collection::vec;
use proptest::prelude::*;

/// A caller-side value tree used to drive the packer and check the
/// unpacker. Floats are held as bit patterns so NaNs compare.
#[derive(Clone, Debug, PartialEq)]
enum Value {
    Nil,
    Bool(bool),
    UInt(u64),
    Int(i64),
    F32(u32),
    F64(u64),
    Str(String),
    Bin(Vec<u8>),
    Ext(i32, Vec<u8>),
    Arr(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<u64>().prop_map(Value::UInt),
        any::<i64>().prop_map(Value::Int),
        any::<u32>().prop_map(Value::F32),
        any::<u64>().prop_map(Value::F64),
        any::<String>().prop_map(Value::Str),
        vec(any::<u8>(), 0..64).prop_map(Value::Bin),
        (any::<i32>(), vec(any::<u8>(), 0..48)).prop_map(|(tag, data)| Value::Ext(tag, data)),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..8).prop_map(Value::Arr),
            vec((inner.clone(), inner), 0..8).prop_map(Value::Map),
        ]
    })
}

fn pack_value(packer: &mut Packer, value: &Value) {
    match value {
        Value::Nil => packer.pack_nil().unwrap(),
        Value::Bool(v) => packer.pack_bool(*v).unwrap(),
        Value::UInt(v) => packer.pack_number(*v).unwrap(),
        Value::Int(v) => packer.pack_number(*v).unwrap(),
        Value::F32(bits) => packer.pack_number(f32::from_bits(*bits)).unwrap(),
        Value::F64(bits) => packer.pack_number(f64::from_bits(*bits)).unwrap(),
        Value::Str(v) => packer.pack_str(v).unwrap(),
        Value::Bin(v) => packer.pack_bin(v).unwrap(),
        Value::Ext(tag, data) => packer.pack_ext(*tag, data).unwrap(),
        Value::Arr(items) => {
            packer.start_array().unwrap();
            for item in items {
                pack_value(packer, item);
            }
            packer.end_array().unwrap();
        }
        Value::Map(pairs) => {
            packer.start_map().unwrap();
            for (key, val) in pairs {
                pack_value(packer, key);
                pack_value(packer, val);
            }
            packer.end_map().unwrap();
        }
    }
}

fn check_value(unpacker: &mut Unpacker, value: &Value) {
    match value {
        Value::Nil => unpacker.unpack_nil().unwrap(),
        Value::Bool(v) => assert_eq!(unpacker.unpack_bool().unwrap(), *v),
        Value::UInt(v) => assert_eq!(unpacker.unpack_number::<u64>().unwrap(), *v),
        Value::Int(v) => assert_eq!(unpacker.unpack_number::<i64>().unwrap(), *v),
        Value::F32(bits) => {
            assert_eq!(unpacker.unpack_number::<f32>().unwrap().to_bits(), *bits)
        }
        Value::F64(bits) => {
            assert_eq!(unpacker.unpack_number::<f64>().unwrap().to_bits(), *bits)
        }
        Value::Str(v) => assert_eq!(&unpacker.unpack_str().unwrap(), v),
        Value::Bin(v) => assert_eq!(unpacker.unpack_bin().unwrap(), &v[..]),
        Value::Ext(tag, data) => {
            let ext = unpacker.unpack_ext().unwrap();
            assert_eq!(ext.tag, *tag);
            assert_eq!(ext.data, &data[..]);
        }
        Value::Arr(items) => {
            assert_eq!(unpacker.unpack_array().unwrap() as usize, items.len());
            for item in items {
                check_value(unpacker, item);
            }
        }
        Value::Map(pairs) => {
            assert_eq!(unpacker.unpack_map().unwrap() as usize, pairs.len());
            for (key, val) in pairs {
                check_value(unpacker, key);
                check_value(unpacker, val);
            }
        }
    }
}

/// Bytes the narrowest form takes for an unsigned value.
fn unsigned_width(val: u64) -> usize {
    if val <= 127 {
        1
    } else if val <= u8::MAX as u64 {
        2
    } else if val <= u16::MAX as u64 {
        3
    } else if val <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Bytes the narrowest form takes for a signed value.
fn signed_width(val: i64) -> usize {
    if (-31..0).contains(&val) {
        1
    } else if i8::try_from(val).is_ok() {
        2
    } else if i16::try_from(val).is_ok() {
        3
    } else if i32::try_from(val).is_ok() {
        5
    } else {
        9
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, ..ProptestConfig::default() })]

    #[test]
    fn value_trees_round_trip(value in arb_value()) {
        let mut packer = Packer::new();
        pack_value(&mut packer, &value);
        prop_assert!(packer.is_complete());

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        check_value(&mut unpacker, &value);
        prop_assert_eq!(unpacker.position(), packer.current_size());
    }

    #[test]
    fn value_trees_round_trip_in_local_mode(value in arb_value()) {
        let mut packer = Packer::with_options(Endian::Local, Mode::Secure);
        pack_value(&mut packer, &value);

        let mut unpacker = Unpacker::with_options(
            packer.message().unwrap().to_vec(),
            Endian::Local,
            Mode::Secure,
        );
        check_value(&mut unpacker, &value);
    }

    #[test]
    fn value_trees_round_trip_in_fast_mode(value in arb_value()) {
        let mut packer = Packer::with_options(Endian::Network, Mode::Fast);
        pack_value(&mut packer, &value);

        let mut unpacker = Unpacker::with_options(
            packer.message().unwrap().to_vec(),
            Endian::Network,
            Mode::Fast,
        );
        check_value(&mut unpacker, &value);
    }

    #[test]
    fn unsigned_values_take_the_narrowest_form(val in any::<u64>()) {
        let mut packer = Packer::new();
        packer.pack_number(val).unwrap();
        prop_assert_eq!(packer.current_size(), unsigned_width(val));

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        prop_assert_eq!(unpacker.unpack_number::<u64>().unwrap(), val);
    }

    #[test]
    fn signed_values_take_the_narrowest_form(val in any::<i64>()) {
        let mut packer = Packer::new();
        packer.pack_number(val).unwrap();
        prop_assert_eq!(packer.current_size(), signed_width(val));

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        prop_assert_eq!(unpacker.unpack_number::<i64>().unwrap(), val);
    }

    #[test]
    fn array_counts_match_emissions(lens in vec(0usize..40, 1..6)) {
        let mut packer = Packer::new();
        for len in &lens {
            packer.start_array().unwrap();
            for i in 0..*len {
                packer.pack_number(i as u32).unwrap();
            }
            packer.end_array().unwrap();
        }

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        for len in &lens {
            prop_assert_eq!(unpacker.unpack_array().unwrap() as usize, *len);
            for i in 0..*len {
                prop_assert_eq!(unpacker.unpack_number::<u32>().unwrap(), i as u32);
            }
        }
    }

    #[test]
    fn map_counts_match_pair_emissions(len in 0usize..40) {
        let mut packer = Packer::new();
        packer.start_map().unwrap();
        for i in 0..len {
            packer.pack_number(i as u64).unwrap();
            packer.pack_bool(i % 2 == 0).unwrap();
        }
        packer.end_map().unwrap();

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        prop_assert_eq!(unpacker.unpack_map().unwrap() as usize, len);
        for i in 0..len {
            prop_assert_eq!(unpacker.unpack_number::<u64>().unwrap(), i as u64);
            prop_assert_eq!(unpacker.unpack_bool().unwrap(), i % 2 == 0);
        }
    }

    #[test]
    fn strings_survive_any_content(s in any::<String>()) {
        let mut packer = Packer::new();
        packer.pack_str(&s).unwrap();

        let mut unpacker = Unpacker::new(packer.message().unwrap().to_vec());
        prop_assert_eq!(unpacker.unpack_str().unwrap(), s);
    }
}
