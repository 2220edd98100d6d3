//! Benchmark for inventory normalization
//!
//! Coercion and class lookup over a synthetic multi-socket inventory

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use obmc_redfish_provider::inventory::{CpuMapper, EntityMapper};
use obmc_redfish_provider::normalize::coerce_objects;
use obmc_redfish_provider::{BusValue, FixedWidth, ManagedObjects, ObjectGraph, PropertyMap};

const BOARD: &str = "/org/openbmc/inventory/system/chassis/motherboard";

fn item(fru_type: &str, extra: &[(&str, BusValue)]) -> PropertyMap {
    let mut bag = PropertyMap::new();
    bag.insert("fru_type".into(), fru_type.into());
    bag.insert("present".into(), "True".into());
    bag.insert("FRU File ID".into(), FixedWidth::Byte(1).into());
    for (key, value) in extra {
        bag.insert((*key).into(), value.clone());
    }

    let mut groups = PropertyMap::new();
    groups.insert("org.openbmc.InventoryItem".into(), BusValue::Dict(bag));
    groups
}

fn inventory(sockets: usize, cores: usize, dimms: usize) -> ManagedObjects {
    let mut objects = ManagedObjects::new();

    for cpu in 0..sockets {
        let uuid: BusValue = format!("UUID:{:08x}-0000-0000-0000-000000000000", cpu).into();
        objects.insert(
            format!("{}/cpu{}", BOARD, cpu),
            item("CPU", &[("Custom Field 2", uuid), ("Manufacturer", "IBM".into())]),
        );
        for core in 0..cores {
            objects.insert(
                format!("{}/cpu{}/core{}", BOARD, cpu, core),
                item("CORE", &[("Frequency", FixedWidth::UInt32(3_500).into())]),
            );
        }
    }

    for dimm in 0..dimms {
        objects.insert(
            format!("{}/dimm{}", BOARD, dimm),
            item("DIMM", &[("Size", FixedWidth::UInt64(16 << 30).into())]),
        );
    }

    objects
}

fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let raw = inventory(4, 12, 32);
    group.throughput(Throughput::Elements(raw.len() as u64));

    group.bench_function("coerce_objects", |b| {
        b.iter_batched(
            || raw.clone(),
            |mut objects| coerce_objects(black_box(&mut objects)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let graph = ObjectGraph::from_raw(inventory(4, 12, 32));

    group.bench_function("find_by_class", |b| {
        b.iter(|| graph.find_by_class(black_box("DIMM")).len());
    });

    // Core counting revisits the whole graph once per CPU
    group.bench_function("map_cpus", |b| {
        b.iter(|| CpuMapper::map_entities(black_box(&graph)).map(|cpus| cpus.len()));
    });

    group.finish();
}

criterion_group!(benches, bench_coerce, bench_lookup);
criterion_main!(benches);
