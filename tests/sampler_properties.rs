use std::collections::{HashMap, HashSet};

use interview_assessor::models::question::{Difficulty, ExperienceLevel, Question};
use interview_assessor::services::sampler_service::sample_questions;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Beginner),
        Just(Difficulty::Intermediate),
        Just(Difficulty::Advanced),
    ]
}

fn arb_level() -> impl Strategy<Value = ExperienceLevel> {
    prop_oneof![Just(ExperienceLevel::Entry), Just(ExperienceLevel::Experienced)]
}

fn arb_pool(max_len: usize) -> impl Strategy<Value = Vec<Question>> {
    prop::collection::vec((prop::option::weighted(0.9, 1u32..5), arb_difficulty()), 0..max_len)
        .prop_map(|cells| {
            cells
                .into_iter()
                .enumerate()
                .map(|(idx, (week, difficulty))| Question {
                    id: format!("q{}", idx),
                    week_number: week,
                    difficulty,
                    text: format!("Question {}", idx),
                    keywords: vec![],
                    model_answer: None,
                    source: None,
                })
                .collect()
        })
}

fn abundant_pool(weeks: u32, per_cell: usize) -> Vec<Question> {
    let mut pool = Vec::new();
    for week in 1..=weeks {
        for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced] {
            for n in 0..per_cell {
                pool.push(Question {
                    id: format!("w{}-{:?}-{}", week, difficulty, n),
                    week_number: Some(week),
                    difficulty,
                    text: "q".into(),
                    keywords: vec![],
                    model_answer: None,
                    source: None,
                });
            }
        }
    }
    pool
}

fn advanced_share(questions: &[Question]) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }
    let advanced = questions
        .iter()
        .filter(|q| q.difficulty == Difficulty::Advanced)
        .count();
    advanced as f64 / questions.len() as f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_length_is_count_capped_by_pool(
        pool in arb_pool(60),
        count in 0usize..80,
        level in arb_level(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = sample_questions(&pool, count, level, &mut rng);
        prop_assert_eq!(result.len(), count.min(pool.len()));
    }

    #[test]
    fn prop_no_duplicates_and_subset_of_pool(
        pool in arb_pool(60),
        count in 0usize..80,
        level in arb_level(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = sample_questions(&pool, count, level, &mut rng);
        let pool_ids: HashSet<&str> = pool.iter().map(|q| q.id.as_str()).collect();
        let mut seen = HashSet::new();
        for q in &result {
            prop_assert!(pool_ids.contains(q.id.as_str()), "{} not in pool", q.id);
            prop_assert!(seen.insert(q.id.as_str()), "{} selected twice", q.id);
        }
    }

    #[test]
    fn prop_every_week_is_covered_when_count_allows(
        pool in arb_pool(60),
        extra in 0usize..20,
        level in arb_level(),
        seed in any::<u64>(),
    ) {
        let weeks: HashSet<Option<u32>> = pool.iter().map(|q| q.week_number).collect();
        let count = weeks.len() + extra;
        let mut rng = StdRng::seed_from_u64(seed);
        let result = sample_questions(&pool, count, level, &mut rng);
        let covered: HashSet<Option<u32>> = result.iter().map(|q| q.week_number).collect();
        prop_assert_eq!(covered, weeks);
    }

    #[test]
    fn prop_experienced_is_at_least_as_advanced_as_entry(
        weeks in 1u32..5,
        count in 1usize..30,
        seed in any::<u64>(),
    ) {
        let pool = abundant_pool(weeks, 30);
        let entry = sample_questions(&pool, count, ExperienceLevel::Entry, &mut StdRng::seed_from_u64(seed));
        let experienced = sample_questions(&pool, count, ExperienceLevel::Experienced, &mut StdRng::seed_from_u64(seed));
        prop_assert!(advanced_share(&experienced) >= advanced_share(&entry));
    }
}

#[test]
fn final_order_interleaves_weeks() {
    let pool = abundant_pool(4, 5);
    let mut rng = StdRng::seed_from_u64(31);
    let result = sample_questions(&pool, 20, ExperienceLevel::Entry, &mut rng);
    let weeks: Vec<Option<u32>> = result.iter().map(|q| q.week_number).collect();
    let mut sorted = weeks.clone();
    sorted.sort();
    assert_ne!(weeks, sorted, "weeks should not come back grouped");

    let mut per_week: HashMap<Option<u32>, usize> = HashMap::new();
    for week in weeks {
        *per_week.entry(week).or_insert(0) += 1;
    }
    assert!(per_week.values().all(|&n| n == 5));
}

#[test]
fn week_without_advanced_questions_backfills_from_same_week() {
    let pool: Vec<Question> = (0..6)
        .map(|n| Question {
            id: format!("q{}", n),
            week_number: Some(1),
            difficulty: if n % 2 == 0 {
                Difficulty::Beginner
            } else {
                Difficulty::Intermediate
            },
            text: "q".into(),
            keywords: vec![],
            model_answer: None,
            source: None,
        })
        .collect();
    let mut rng = StdRng::seed_from_u64(12);
    let result = sample_questions(&pool, 5, ExperienceLevel::Experienced, &mut rng);
    assert_eq!(result.len(), 5);
    assert!(result.iter().all(|q| q.difficulty != Difficulty::Advanced));
}
