use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lsasm::assembler::assemble;

const FIB: &str = include_str!("../asm/fib.ls");

fn assemble_fib(c: &mut Criterion) {
    c.bench_function("assemble fib", |b| b.iter(|| assemble(black_box(FIB))));
}

fn assemble_full_rom(c: &mut Criterion) {
    // A program that fills the instruction ROM to capacity.
    let mut source = String::new();
    source.push_str("start:\n");
    for i in 0..255 {
        source.push_str(&format!("ADD X{}, {}\n", i % 8, i % 100));
    }
    source.push_str("B start\n");

    c.bench_function("assemble full rom", |b| {
        b.iter(|| assemble(black_box(&source)))
    });
}

criterion_group!(benches, assemble_fib, assemble_full_rom);
criterion_main!(benches);
