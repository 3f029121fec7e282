//! Resolution throughput benchmarks: ranking entries resolved per second.
//!
//! Run with: `cargo bench`
//! Every entry carries a banned fast and a banned charged move, so each one
//! walks the full replacement ladder.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use cupsmith::data::{CupRuleSet, MoveCatalog, PokemonEntry, RankingEntry};
use cupsmith::resolve::{resolve_session, FirstCandidateDisambiguator, ResolutionContext};

fn species_id(index: usize) -> String {
    format!("species{index:04}")
}

fn synthetic_catalog(count: usize) -> MoveCatalog {
    let pokemon: Vec<PokemonEntry> = (0..count)
        .map(|index| PokemonEntry {
            species_id: species_id(index),
            species_name: None,
            fast_moves: vec![
                "FAST_A".to_string(),
                "FAST_B".to_string(),
                "FAST_C".to_string(),
            ],
            charged_moves: vec![
                "CHARGE_A".to_string(),
                "CHARGE_B".to_string(),
                "CHARGE_C".to_string(),
                "CHARGE_D".to_string(),
            ],
            released: true,
        })
        .collect();
    MoveCatalog::from_pokemon(&pokemon)
}

fn synthetic_rankings(count: usize) -> Vec<RankingEntry> {
    (0..count)
        .map(|index| RankingEntry {
            species_id: species_id(index),
            moveset: vec![
                "FAST_A".to_string(),
                "CHARGE_A".to_string(),
                "CHARGE_B".to_string(),
            ],
        })
        .collect()
}

fn synthetic_rules(count: usize) -> CupRuleSet {
    CupRuleSet {
        eligible: (0..count).map(species_id).collect(),
        banned_moves: ["FAST_A", "CHARGE_A"]
            .iter()
            .map(|code| code.to_string())
            .collect(),
    }
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    group.sample_size(50);

    for count in [50usize, 500, 2000] {
        let catalog = synthetic_catalog(count);
        let rankings = synthetic_rankings(count);
        let rules = synthetic_rules(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(format!("resolve_{count}"), &count, |b, _| {
            b.iter_batched(
                || (ResolutionContext::default(), FirstCandidateDisambiguator),
                |(mut context, mut channel)| {
                    black_box(resolve_session(
                        &rankings,
                        &rules,
                        &catalog,
                        &mut context,
                        &mut channel,
                    ))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);
