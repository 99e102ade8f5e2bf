//! Ledger memo formatting
//!
//! A verified decision is recorded as a short memo: `WG:<score>:<symbols>`
//! where the symbols are the first two holdings, comma-joined.

pub const MEMO_PREFIX: &str = "WG";
pub const MAX_MEMO_CHARS: usize = 90;

/// Whole scores keep one decimal (`4.0`), others print as-is (`4.67`).
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

pub fn decision_memo<S: AsRef<str>>(score: f64, assets: &[S]) -> String {
    let symbols: Vec<&str> = assets.iter().take(2).map(|s| s.as_ref()).collect();
    let memo = format!("{}:{}:{}", MEMO_PREFIX, format_score(score), symbols.join(","));
    memo.chars().take(MAX_MEMO_CHARS).collect()
}
