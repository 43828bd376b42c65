use {
    criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    std::hint::black_box,
    tagwire::{
        io::{Reader, Writer},
        BoxError, Config, Engine, Reflect, Tag,
    },
};

/// Left-pads tagged fields with zeroes to the width in the tag.
struct Padded;

impl Tag for Padded {
    type Options = usize;
    type Error = BoxError;

    fn parse(&self, tag_value: &str, width: &mut usize) -> Result<bool, BoxError> {
        *width = tag_value.parse()?;
        Ok(false)
    }

    fn encode(
        &self,
        _field: &str,
        width: Option<&usize>,
        raw: &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), BoxError> {
        let width = width.copied().unwrap_or(0);
        out.write_fill(b'0', width.saturating_sub(raw.len()));
        out.write(raw);
        Ok(())
    }

    fn decode(
        &self,
        _field: &str,
        width: Option<&usize>,
        input: &mut &[u8],
        out: &mut dyn Writer,
    ) -> Result<(), BoxError> {
        let raw = match width {
            Some(&width) => input.take_exact(width.min(input.len()))?,
            None => input.take_until(|b| b == b';' || b == b')'),
        };
        let start = raw.iter().position(|&b| b != b'0').unwrap_or(raw.len());
        out.write(&raw[start..]);
        Ok(())
    }
}

#[derive(Reflect, Default, Clone)]
pub struct SimpleStruct {
    #[tag(padded = "12")]
    pub id: u64,
    #[tag(padded = "12")]
    pub value: u64,
    pub flag: bool,
}

#[derive(Reflect, Default, Clone)]
pub struct Header {
    #[tag(padded = "4")]
    pub version: u16,
    pub kind: String,
}

#[derive(Reflect, Default, Clone)]
pub struct Record {
    #[tagwire(flatten)]
    pub header: Header,
    pub inner: SimpleStruct,
    pub note: Option<String>,
    #[tag(padded = "20")]
    pub total: i64,
}

fn engine() -> Engine<Padded> {
    Engine::new(
        Padded,
        Config::new("padded")
            .with_struct_opener("(")
            .with_struct_closer(")")
            .with_unwrap_when_decoding(true)
            .with_value_separator(";")
            .with_remove_separator_when_decoding(true),
    )
}

fn record(i: u64) -> Record {
    Record {
        header: Header {
            version: 3,
            kind: "ledger".into(),
        },
        inner: SimpleStruct {
            id: i,
            value: i * 7,
            flag: i % 2 == 0,
        },
        note: (i % 3 == 0).then(|| format!("note {i}")),
        total: -(i as i64),
    }
}

fn bench_marshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("Marshal");
    let engine = engine();

    let simple = record(42).inner;
    group.throughput(Throughput::Bytes(engine.marshal(&simple).unwrap().len() as u64));
    group.bench_function("simple", |b| {
        b.iter(|| engine.marshal(black_box(&simple)).unwrap())
    });

    let nested = record(42);
    group.throughput(Throughput::Bytes(engine.marshal(&nested).unwrap().len() as u64));
    group.bench_function("nested", |b| {
        b.iter(|| engine.marshal(black_box(&nested)).unwrap())
    });

    let mut out = Vec::with_capacity(256);
    group.bench_function("nested_into", |b| {
        b.iter(|| {
            out.clear();
            engine.marshal_into(black_box(&nested), &mut out).unwrap();
        })
    });

    group.finish();
}

fn bench_unmarshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("Unmarshal");
    let engine = engine();

    let bytes = engine.marshal(&record(42)).unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("nested", |b| {
        b.iter(|| {
            let mut value = Record::default();
            engine.unmarshal(black_box(&bytes), &mut value).unwrap();
            value
        })
    });

    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch");
    let engine = engine();

    for size in [10u64, 100, 1_000] {
        let records: Vec<Record> = (0..size).map(record).collect();
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("marshal", size), &records, |b, records| {
            b.iter(|| {
                let mut out = Vec::new();
                for record in records {
                    engine.marshal_into(black_box(record), &mut out).unwrap();
                }
                out
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_marshal, bench_unmarshal, bench_batches);
criterion_main!(benches);
