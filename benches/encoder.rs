use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mpack::prelude::*;

const N_FLAT: usize = 2000;
const N_RECORDS: usize = 100;

fn pack_flat(packer: &mut Packer) {
    packer.start_array().unwrap();
    for i in 0..N_FLAT {
        packer.pack_number(i as u64).unwrap();
    }
    packer.end_array().unwrap();
}

fn pack_records(packer: &mut Packer) {
    packer.start_array().unwrap();
    for i in 0..N_RECORDS {
        packer.start_map().unwrap();
        packer.pack_str("id").unwrap();
        packer.pack_number(i as u32).unwrap();
        packer.pack_str("name").unwrap();
        packer.pack_str("some-device-name").unwrap();
        packer.pack_str("reading").unwrap();
        packer.pack_number(i as f64 * 0.5).unwrap();
        packer.pack_str("raw").unwrap();
        packer.pack_bin(&[0xab; 32]).unwrap();
        packer.end_map().unwrap();
    }
    packer.end_array().unwrap();
}

fn bench_enc_flat(c: &mut Criterion) {
    let mut probe = Packer::new();
    pack_flat(&mut probe);
    let size = probe.current_size();

    c.bench_function(
        &format!("Packing a flat array of {} ints, {} bytes out", N_FLAT, size),
        |b| {
            b.iter(|| {
                let mut packer = Packer::new();
                pack_flat(black_box(&mut packer));
                packer.current_size()
            })
        },
    );
}

fn bench_enc_flat_reused(c: &mut Criterion) {
    let mut probe = Packer::new();
    pack_flat(&mut probe);
    let size = probe.current_size();

    c.bench_function(
        &format!(
            "Packing a flat array of {} ints, {} bytes out, packer reused",
            N_FLAT, size
        ),
        |b| {
            let mut packer = Packer::new();
            b.iter(|| {
                packer.clear();
                pack_flat(black_box(&mut packer));
                packer.current_size()
            })
        },
    );
}

fn bench_enc_records(c: &mut Criterion) {
    let mut probe = Packer::new();
    pack_records(&mut probe);
    let size = probe.current_size();

    c.bench_function(
        &format!("Packing {} map records, {} bytes out", N_RECORDS, size),
        |b| {
            b.iter(|| {
                let mut packer = Packer::new();
                pack_records(black_box(&mut packer));
                packer.current_size()
            })
        },
    );
}

fn bench_enc_fast_local(c: &mut Criterion) {
    let mut probe = Packer::new();
    pack_records(&mut probe);
    let size = probe.current_size();

    c.bench_function(
        &format!(
            "Packing {} map records, {} bytes out, fast mode and local order",
            N_RECORDS, size
        ),
        |b| {
            b.iter(|| {
                let mut packer = Packer::with_options(Endian::Local, Mode::Fast);
                pack_records(black_box(&mut packer));
                packer.current_size()
            })
        },
    );
}

criterion_group!(
    benches,
    bench_enc_flat,
    bench_enc_flat_reused,
    bench_enc_records,
    bench_enc_fast_local
);
criterion_main!(benches);
