use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ltcodec::{
    ArrayCfg, AsciiStringCfg, AsciiStringCodec, Codec, DynCodec, Registry, Value,
    VariableLenArrayCodec, VarintCfg, VarintCodec,
};

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    for &resolution in &[1, 10, 1000] {
        let cfg = VarintCfg::new(-1_000_000, 1_000_000).resolution(resolution);
        let codec = VarintCodec::new(cfg).unwrap();
        let (bits, _) = codec.encode(&123_456);

        group.bench_with_input(BenchmarkId::new("encode", resolution), &codec, |b, codec| {
            b.iter(|| codec.encode(black_box(&123_456)));
        });
        group.bench_with_input(BenchmarkId::new("decode", resolution), &bits, |b, bits| {
            b.iter(|| codec.decode(&mut bits.reader()).unwrap());
        });
    }

    group.finish();
}

fn bench_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("ascii_string");
    let text = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG".repeat(4);

    for &width in &[6u8, 7, 8] {
        let codec =
            AsciiStringCodec::new(AsciiStringCfg::new(text.len()).bits_per_char(width)).unwrap();
        let (bits, _) = codec.encode(&text);

        group.bench_with_input(BenchmarkId::new("encode", width), &text, |b, text| {
            b.iter(|| codec.encode(text));
        });
        group.bench_with_input(BenchmarkId::new("decode", width), &bits, |b, bits| {
            b.iter(|| codec.decode(&mut bits.reader()).unwrap());
        });
    }

    group.finish();
}

fn bench_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_len_array");
    let registry = Registry::builtin();

    for &len in &[8, 64, 512] {
        let cfg = ArrayCfg::new("int16", len);
        let codec = VariableLenArrayCodec::new(&registry, cfg).unwrap();
        let values = (0..len as i128).map(|i| Value::Int(i * 37 - 5000));
        let value = Value::Array(values.collect());
        let (bits, _) = codec.encode_value(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", len), &value, |b, value| {
            b.iter(|| codec.encode_value(value).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &bits, |b, bits| {
            b.iter(|| codec.decode(&mut bits.reader()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_varint, bench_string, bench_array);
criterion_main!(benches);
