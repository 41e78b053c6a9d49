//! Pacing Benchmark Suite
//!
//! Per-turn targets for a host running the director once per simulated
//! year:
//!   score_pool_200 ................. < 50μs
//!   evaluate_year_200_events ....... < 100μs
//!   playthrough_80_years ........... < 5ms

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use pacing_core::content::{AgeRange, ArcChoice, ArcDefinition, ArcStage, ArcTrigger, Choice, PoolEvent, Rarity};
use pacing_core::gate::ControlledHistory;
use pacing_core::ledger::HistoryLedger;
use pacing_core::phase::Phase;
use pacing_core::scoring::{ScoringContext, score_all};
use pacing_core::sources::SourceContext;
use pacing_core::{CharacterSnapshot, Director, EventPools, GameContext, PacingConfig, TendencyScores};
use pacing_life::{Catalog, LifeCharacter, Playthrough};

const TAGS: [&str; 5] = ["minor_positive", "minor_negative", "major_positive", "major_negative", "misc"];

fn make_pool(n: usize) -> Vec<PoolEvent> {
    (0..n)
        .map(|i| PoolEvent {
            id: format!("event_{i}"),
            title: format!("Event {i}"),
            tag: TAGS[i % TAGS.len()].to_string(),
            polarity: None,
            age: AgeRange::default(),
            unique: i % 17 == 0,
            rarity: if i % 11 == 0 { Rarity::Rare } else { Rarity::Common },
            categories: if i % 7 == 0 { vec!["career".into()] } else { vec![] },
            choices: vec![Choice::default()],
        })
        .collect()
}

fn make_arcs() -> Vec<ArcDefinition> {
    (0..6)
        .map(|a| ArcDefinition {
            id: format!("arc_{a}"),
            title: format!("Arc {a}"),
            trigger: ArcTrigger::default(),
            base_chance: 0.3,
            stages: (0..4)
                .map(|s| ArcStage {
                    id: format!("arc_{a}_{s}"),
                    text: String::new(),
                    min_turns_since_previous: 1,
                    choices: vec![ArcChoice::default()],
                })
                .collect(),
        })
        .collect()
}

fn adult() -> CharacterSnapshot {
    CharacterSnapshot {
        age: 34,
        stress: 65.0,
        has_job: true,
        ..CharacterSnapshot::default()
    }
}

/// Benchmark: gather and score a 200-event pool (target: < 50μs).
fn bench_score_pool(c: &mut Criterion) {
    let config = PacingConfig::default();
    let pools = EventPools::new(vec![], make_pool(200));
    let character = adult();
    let game = GameContext::at_turn(12);
    let history = ControlledHistory::default();
    let mut ledger = HistoryLedger::from_config(&config.scoring);
    for i in 0..5 {
        ledger.record(TAGS[i], &format!("event_{i}"), pacing_core::Polarity::from_tag(TAGS[i]));
    }

    c.bench_function("score_pool_200", |b| {
        b.iter(|| {
            let sources = SourceContext {
                game: &game,
                events_this_life: 4,
                turns_since_last_event: 2,
                history: &history,
                config: &config,
            };
            let candidates = pools.gather(black_box(&character), &sources);
            let ctx = ScoringContext {
                character: &character,
                tension: 62.0,
                phase: Phase::Climax,
                ledger: &ledger,
                tendencies: TendencyScores::default(),
                config: &config.scoring,
            };
            black_box(score_all(&candidates, &ctx));
        });
    });
}

/// Benchmark: one full director turn (target: < 100μs).
fn bench_evaluate_year(c: &mut Criterion) {
    let mut director = Director::new(PacingConfig::default(), EventPools::new(vec![], make_pool(200)), make_arcs());
    let character = adult();
    let mut rng = StdRng::seed_from_u64(7);
    let mut turn = 0u32;

    c.bench_function("evaluate_year_200_events", |b| {
        b.iter(|| {
            turn = turn.wrapping_add(1);
            if director.current().events_this_life >= 25 {
                director.reset();
            }
            let events = director.evaluate_year(black_box(&character), &GameContext::at_turn(turn), &mut rng);
            black_box(events);
        });
    });
}

/// Benchmark: an 80-year playthrough through the host (target: < 5ms).
fn bench_playthrough(c: &mut Criterion) {
    let catalog = Catalog {
        controlled: vec![],
        pool: make_pool(200),
        arcs: make_arcs(),
    };

    c.bench_function("playthrough_80_years", |b| {
        b.iter(|| {
            let mut life = Playthrough::new(&catalog, PacingConfig::default(), LifeCharacter::newborn("Bench"), 1);
            let resolutions = life.live_years(80, |_| 0);
            black_box(resolutions)
        });
    });
}

criterion_group!(benches, bench_score_pool, bench_evaluate_year, bench_playthrough);
criterion_main!(benches);
