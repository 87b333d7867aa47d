use bhasha_quiz::llm::parse_quiz;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

fn model_reply(count: usize) -> String {
    let questions: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "question": format!("ప్రశ్న {n}: భారతదేశ రాజధాని ఏది?"),
                "options": ["ఎ) ముంబై", "బి) న్యూఢిల్లీ", "సి) కోల్‌కతా", "డి) చెన్నై"],
                "answer": "బి) న్యూఢిల్లీ",
                "explanation": "న్యూఢిల్లీ 1931 నుండి రాజధాని."
            })
        })
        .collect();
    format!(
        "Here is your quiz:\n```json\n{}\n```",
        json!({ "questions": questions })
    )
}

fn bench_parse_quiz(c: &mut Criterion) {
    let reply = model_reply(20);

    c.bench_function("parse_quiz_20_questions", |b| {
        b.iter(|| {
            let quiz = parse_quiz(black_box(&reply)).expect("failed to parse quiz");
            black_box(quiz);
        });
    });
}

criterion_group!(benches, bench_parse_quiz);
criterion_main!(benches);
