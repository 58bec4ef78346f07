use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use gx_texture_cmpr::{compress_image, decompress_image, CmprSettings};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("CMPR Encode");

    // 256x256 RGBA image: gradients with a transparent band, so both block modes are exercised.
    let (width, height) = (256usize, 256usize);
    let mut rgba = vec![0u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let pixel = &mut rgba[(y * width + x) * 4..][..4];
            pixel[0] = x as u8;
            pixel[1] = y as u8;
            pixel[2] = (x ^ y) as u8;
            pixel[3] = if (y / 16) % 4 == 3 { x as u8 } else { 255 };
        }
    }

    group.throughput(Throughput::Bytes(rgba.len() as u64));
    group.bench_function("compress_image", |b| {
        b.iter(|| compress_image(black_box(&rgba), width, height, &CmprSettings::default()))
    });

    let encoded = compress_image(&rgba, width, height, &CmprSettings::default()).unwrap();
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("decompress_image", |b| {
        b.iter(|| decompress_image(black_box(&encoded), width, height))
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
