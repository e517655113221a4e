use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ewaste_chat::{ChatContext, ChatResponder, detect_intent};
use ewaste_core::KnowledgeBase;

const RULES_JSON: &str = include_str!("../../../data/disposal_rules.json");

fn bench_intent_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_intent");
    for message in [
        "hello",
        "what are the hazards?",
        "where do I dispose of a battery?",
        "completely unrelated text that matches no rule at all",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(message), message, |b, m| {
            b.iter(|| detect_intent(black_box(m)))
        });
    }
    group.finish();
}

fn bench_respond(c: &mut Criterion) {
    let kb = Arc::new(KnowledgeBase::from_json(RULES_JSON).expect("shipped rules"));
    let responder = ChatResponder::new(kb);
    let with_context = ChatContext::detected("battery", "Battery");
    let without_context = ChatContext::empty();

    c.bench_function("respond/with_context", |b| {
        b.iter(|| responder.respond(black_box("how do I dispose of this?"), &with_context))
    });
    c.bench_function("respond/without_context", |b| {
        b.iter(|| responder.respond(black_box("how do I dispose of this?"), &without_context))
    });
}

criterion_group!(benches, bench_intent_detection, bench_respond);
criterion_main!(benches);
