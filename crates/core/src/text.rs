//! Text helpers shared by answer input, grading and pronunciation scoring.

/// Maximum number of characters kept per free-text field.
pub const MAX_FIELD_CHARS: usize = 500;

const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '¿', '¡', '«', '»', '“', '”', '‘', '’', '。', '，',
    '！', '？', '、',
];

/// Truncates `input` to at most `max` characters, respecting char boundaries.
#[must_use]
pub fn clamp_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input.to_string(),
    }
}

/// Lowercases, strips punctuation and collapses whitespace.
///
/// Two answers are considered equal when their normalized forms are equal.
#[must_use]
pub fn normalize_answer(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| !STRIPPED_PUNCTUATION.contains(ch))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn answers_match(given: &str, expected: &str) -> bool {
    let given = normalize_answer(given);
    !given.is_empty() && given == normalize_answer(expected)
}

/// Normalized edit similarity in `[0.0, 1.0]`.
#[must_use]
pub fn similarity(left: &str, right: &str) -> f32 {
    let left: Vec<char> = normalize_answer(left).chars().collect();
    let right: Vec<char> = normalize_answer(right).chars().collect();
    let longest = left.len().max(right.len());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(&left, &right);
    #[allow(clippy::cast_precision_loss)]
    let ratio = 1.0 - distance as f32 / longest as f32;
    ratio.clamp(0.0, 1.0)
}

/// Scores a speech transcript against the expected phrase on a 0..=100 scale.
///
/// `confidence` is the recognizer's own confidence in `[0, 1]`; when present it
/// weighs 30% of the score.
#[must_use]
pub fn pronunciation_score(expected: &str, transcript: &str, confidence: Option<f32>) -> u8 {
    let base = similarity(expected, transcript);
    let weighted = match confidence {
        Some(conf) if conf.is_finite() => base * (0.7 + 0.3 * conf.clamp(0.0, 1.0)),
        _ => base,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = (weighted * 100.0).round().clamp(0.0, 100.0) as u8;
    score
}

fn levenshtein(left: &[char], right: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];
    for (i, l) in left.iter().enumerate() {
        current[0] = i + 1;
        for (j, r) in right.iter().enumerate() {
            let cost = usize::from(l != r);
            current[j + 1] = (prev[j + 1] + 1).min(current[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[right.len()]
}
