//! Stratified question sampling.
//!
//! A pool is split into week groups, each week gets an even share of the
//! requested count, and inside a week the share is divided between difficulty
//! buckets according to the candidate's [`ExperienceLevel`]. Shortfalls are
//! backfilled first within the week and then from the whole pool, and the
//! final selection is shuffled so weeks and difficulties are interleaved.
//!
//! All functions take the random source as a parameter so callers can seed it.

use crate::models::question::{Difficulty, DifficultyRatioProfile, ExperienceLevel, Question};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

/// Grouping key for the week allocator.
///
/// Numbered weeks sort ascending; questions without a week number share the
/// `Unassigned` group, which always sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekKey {
    Week(u32),
    Unassigned,
}

impl WeekKey {
    pub fn of(question: &Question) -> Self {
        Self::from(question.week_number)
    }
}

impl From<Option<u32>> for WeekKey {
    fn from(week_number: Option<u32>) -> Self {
        match week_number {
            Some(week) => WeekKey::Week(week),
            None => WeekKey::Unassigned,
        }
    }
}

/// Fisher-Yates shuffle into a new vector. The input slice is left untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Selects `min(count, distinct pool size)` questions balanced across weeks
/// and skewed toward the difficulty mix of `level`.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    level: ExperienceLevel,
    rng: &mut R,
) -> Vec<Question> {
    let pool = dedupe_by_id(pool);
    if pool.is_empty() || count == 0 {
        return Vec::new();
    }

    let weeks = group_by_week(&pool);
    let quotas = week_quotas(count, weeks.len());
    let profile = level.ratio_profile();
    let target = count.min(pool.len());

    let mut selected: Vec<&Question> = Vec::with_capacity(target);
    for ((week, questions), quota) in weeks.iter().zip(quotas) {
        let picked = stratify_week(questions, quota, &profile, rng);
        tracing::debug!(
            ?week,
            quota,
            available = questions.len(),
            picked = picked.len(),
            "Week stratified"
        );
        selected.extend(picked);
    }

    if selected.len() < target {
        let before = selected.len();
        global_backfill(&pool, &mut selected, target, rng);
        tracing::debug!(
            shortfall = target - before,
            filled = selected.len() - before,
            "Global backfill applied"
        );
    }

    tracing::info!(
        requested = count,
        pool_size = pool.len(),
        weeks = weeks.len(),
        selected = selected.len(),
        ?level,
        "Question set sampled"
    );

    shuffle(&selected, rng).into_iter().cloned().collect()
}

/// Splits `count` across `num_weeks` groups: every group gets `count / num_weeks`
/// and the first `count % num_weeks` groups get one more.
pub fn week_quotas(count: usize, num_weeks: usize) -> Vec<usize> {
    if num_weeks == 0 {
        return Vec::new();
    }
    let per_week = count / num_weeks;
    let remainder = count % num_weeks;
    (0..num_weeks)
        .map(|idx| if idx < remainder { per_week + 1 } else { per_week })
        .collect()
}

/// Picks up to `quota` questions from one week, honouring the difficulty
/// profile as far as bucket sizes allow and backfilling from the rest of the
/// week otherwise.
pub fn stratify_week<'a, R: Rng + ?Sized>(
    week: &[&'a Question],
    quota: usize,
    profile: &DifficultyRatioProfile,
    rng: &mut R,
) -> Vec<&'a Question> {
    let beginner = bucket(week, Difficulty::Beginner);
    let intermediate = bucket(week, Difficulty::Intermediate);
    let advanced = bucket(week, Difficulty::Advanced);

    let advanced_target = ratio_target(quota, profile.advanced)
        .min(advanced.len())
        .min(quota);
    let intermediate_target = ratio_target(quota, profile.intermediate)
        .min(intermediate.len())
        .min(quota - advanced_target);
    let beginner_target = quota.saturating_sub(intermediate_target + advanced_target);

    let mut selected: Vec<&'a Question> = Vec::with_capacity(quota.min(week.len()));
    selected.extend(shuffle(&advanced, rng).into_iter().take(advanced_target));
    selected.extend(shuffle(&intermediate, rng).into_iter().take(intermediate_target));
    selected.extend(shuffle(&beginner, rng).into_iter().take(beginner_target));

    if selected.len() < quota {
        let taken: HashSet<&str> = selected.iter().copied().map(|q| q.id.as_str()).collect();
        let remaining: Vec<&'a Question> = week
            .iter()
            .copied()
            .filter(|q| !taken.contains(q.id.as_str()))
            .collect();
        let needed = quota - selected.len();
        selected.extend(shuffle(&remaining, rng).into_iter().take(needed));
    }

    selected
}

fn global_backfill<'a, R: Rng + ?Sized>(
    pool: &[&'a Question],
    selected: &mut Vec<&'a Question>,
    target: usize,
    rng: &mut R,
) {
    let taken: HashSet<&'a str> = selected.iter().copied().map(|q| q.id.as_str()).collect();
    let remaining: Vec<&'a Question> = pool
        .iter()
        .copied()
        .filter(|q| !taken.contains(q.id.as_str()))
        .collect();
    let needed = target.saturating_sub(selected.len());
    selected.extend(shuffle(&remaining, rng).into_iter().take(needed));
}

fn ratio_target(quota: usize, ratio: f64) -> usize {
    (quota as f64 * ratio.clamp(0.0, 1.0)).round() as usize
}

fn bucket<'a>(week: &[&'a Question], difficulty: Difficulty) -> Vec<&'a Question> {
    week.iter()
        .copied()
        .filter(|q| q.difficulty == difficulty)
        .collect()
}

fn group_by_week<'a>(pool: &[&'a Question]) -> BTreeMap<WeekKey, Vec<&'a Question>> {
    let mut groups: BTreeMap<WeekKey, Vec<&'a Question>> = BTreeMap::new();
    for &question in pool {
        groups.entry(WeekKey::of(question)).or_default().push(question);
    }
    groups
}

fn dedupe_by_id(pool: &[Question]) -> Vec<&Question> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(pool.len());
    let mut unique = Vec::with_capacity(pool.len());
    for question in pool {
        if seen.insert(question.id.as_str()) {
            unique.push(question);
        } else {
            tracing::warn!(id = %question.id, "Duplicate question id in pool, keeping first occurrence");
        }
    }
    unique
}
