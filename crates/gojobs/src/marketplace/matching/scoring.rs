use chrono::{DateTime, Utc};

pub const SCORE_FLOOR: i32 = 0;
pub const SCORE_CEILING: i32 = 100;

/// Clamp an accumulated raw score into the published `0..=100` range.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(SCORE_FLOOR, SCORE_CEILING) as u8
}

/// Whole days from `from` to `to`, truncated toward zero and never negative.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().max(0)
}

/// Stable descending sort: equal scores keep the order they were produced in.
pub fn rank_descending<T, F>(items: &mut [T], score: F)
where
    F: Fn(&T) -> u8,
{
    items.sort_by(|left, right| score(right).cmp(&score(left)));
}
