//! Benchmarks for the move generator, laser applier, and search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use leiserchess::board::search::{
    iterative_deepening, DeferralTable, PvTable, SearchParams, WorkerState,
};
use leiserchess::board::{EvalWeights, Position};
use leiserchess::tt::TranspositionTable;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    let pos = Position::startpos();
    for depth in 1..=3u32 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| pos.perft(black_box(depth)))
        });
    }
    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    let startpos = Position::startpos();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(startpos.generate_moves()))
    });
    let endgame = Position::from_fen(leiserchess::board::ENDGAME_FEN);
    group.bench_function("endgame", |b| b.iter(|| black_box(endgame.generate_moves())));
    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let weights = EvalWeights::default();
    let pos = Position::startpos();
    c.bench_function("evaluate_startpos", |b| {
        b.iter(|| leiserchess::board::evaluate(black_box(&pos), &weights))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [2, 3] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let pos = Position::startpos();
                let line = vec![pos.line_entry()];
                let tt = TranspositionTable::new(16);
                let deferral = DeferralTable::new();
                let pv = PvTable::new();
                let params = SearchParams::default();
                let weights = EvalWeights::default();
                let mut workers = vec![WorkerState::new(1)];
                iterative_deepening(
                    &pos, &line, &tt, &deferral, &pv, &params, &weights, &mut workers, depth,
                    None,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_eval, bench_search);
criterion_main!(benches);
