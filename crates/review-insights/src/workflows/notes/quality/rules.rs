use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const MAX_LENGTH_SCORE: f64 = 25.0;
pub(crate) const MAX_DETAIL_SCORE: f64 = 30.0;
pub(crate) const MAX_STRUCTURE_SCORE: f64 = 25.0;
pub(crate) const MAX_KEYWORD_SCORE: f64 = 20.0;

const TECHNICAL_KEYWORDS: [&str; 16] = [
    "resolved",
    "fixed",
    "configured",
    "installed",
    "updated",
    "deployed",
    "troubleshoot",
    "diagnosed",
    "escalated",
    "documented",
    "tested",
    "verified",
    "implemented",
    "migrated",
    "backed up",
    "restored",
];

const ACTION_INDICATORS: [&str; 10] = [
    "completed",
    "finished",
    "done",
    "resolved",
    "closed",
    "implemented",
    "next steps",
    "follow up",
    "pending",
    "waiting for",
];

const STRUCTURE_INDICATORS: [&str; 10] = [
    "\n", "\r", "\u{2022}", "-", "*", "1.", "2.", "3.", "step", "summary",
];

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit pattern"));
static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}").expect("slash date pattern")
});
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("iso date pattern"));
static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[0-9]+\.").expect("numbered list pattern"));

/// Raw, unrounded sub-scores for a single note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RawScores {
    pub length: f64,
    pub detail: f64,
    pub structure: f64,
    pub keyword: f64,
}

/// Formatting signals detected in the note body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct StructureSignals {
    pub line_breaks: bool,
    pub bullets: bool,
    pub multiple_sentences: bool,
}

pub(crate) fn score_text(text: &str) -> RawScores {
    let word_count = word_count(text);
    let lower = text.to_lowercase();

    let length = length_score(word_count);
    let detail = detail_score(text, &lower);
    let structure = structure_score(structure_signals(text));
    let keyword = keyword_score(&lower, word_count, structure, detail);

    RawScores {
        length,
        detail,
        structure,
        keyword,
    }
}

/// Whitespace-separated tokens. U+FEFF separates words; U+0085 does not.
pub(crate) fn word_count(text: &str) -> usize {
    text.split(is_word_separator)
        .filter(|token| !token.is_empty())
        .count()
}

fn is_word_separator(ch: char) -> bool {
    match ch {
        '\u{feff}' => true,
        '\u{85}' => false,
        other => other.is_whitespace(),
    }
}

pub(crate) fn length_score(word_count: usize) -> f64 {
    if (10..=500).contains(&word_count) {
        if (50..=200).contains(&word_count) {
            25.0
        } else if (20..50).contains(&word_count) {
            15.0
        } else if word_count > 200 {
            20.0
        } else {
            10.0
        }
    } else if word_count < 10 {
        5.0
    } else {
        15.0
    }
}

pub(crate) fn detail_score(text: &str, lower: &str) -> f64 {
    let technical = proportional(matches(lower, &TECHNICAL_KEYWORDS), TECHNICAL_KEYWORDS.len(), 15.0);
    let actions = proportional(matches(lower, &ACTION_INDICATORS), ACTION_INDICATORS.len(), 10.0);

    let has_numbers = DIGITS.is_match(text);
    let has_dates = SLASH_DATE.is_match(text) || ISO_DATE.is_match(text);
    let specificity = match (has_numbers, has_dates) {
        (true, true) => 5.0,
        (true, false) | (false, true) => 2.5,
        (false, false) => 0.0,
    };

    technical + actions + specificity
}

pub(crate) fn structure_signals(text: &str) -> StructureSignals {
    StructureSignals {
        line_breaks: text.contains('\n') || text.contains('\r'),
        bullets: text.contains(['\u{2022}', '-', '*']) || NUMBERED_LINE.is_match(text),
        multiple_sentences: sentence_segments(text) > 2,
    }
}

pub(crate) fn structure_score(signals: StructureSignals) -> f64 {
    let StructureSignals {
        line_breaks,
        bullets,
        multiple_sentences,
    } = signals;

    // bullets + sentences without a line break only earns the single-signal tier
    if line_breaks && bullets && multiple_sentences {
        25.0
    } else if (line_breaks && bullets) || (line_breaks && multiple_sentences) {
        18.0
    } else if line_breaks || bullets || multiple_sentences {
        12.0
    } else {
        5.0
    }
}

pub(crate) fn keyword_score(lower: &str, word_count: usize, structure: f64, detail: f64) -> f64 {
    let mut score = proportional(
        matches(lower, &STRUCTURE_INDICATORS),
        STRUCTURE_INDICATORS.len(),
        MAX_KEYWORD_SCORE,
    );

    if word_count > 100 && structure > 15.0 && detail > 20.0 {
        score = (score + 5.0).min(MAX_KEYWORD_SCORE);
    }

    score
}

/// Number of pieces produced by splitting on runs of `.`, `!` and `?`,
/// counting empty leading and trailing pieces.
fn sentence_segments(text: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for ch in text.chars() {
        let terminator = matches!(ch, '.' | '!' | '?');
        if terminator && !in_run {
            runs += 1;
        }
        in_run = terminator;
    }
    runs + 1
}

fn matches(lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| lower.contains(*term)).count()
}

fn proportional(matched: usize, total: usize, ceiling: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((matched as f64 / total as f64) * ceiling).min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_thresholds_follow_nested_bands() {
        assert_eq!(length_score(0), 5.0);
        assert_eq!(length_score(9), 5.0);
        assert_eq!(length_score(10), 10.0);
        assert_eq!(length_score(19), 10.0);
        assert_eq!(length_score(20), 15.0);
        assert_eq!(length_score(49), 15.0);
        assert_eq!(length_score(50), 25.0);
        assert_eq!(length_score(200), 25.0);
        assert_eq!(length_score(201), 20.0);
        assert_eq!(length_score(500), 20.0);
        assert_eq!(length_score(501), 15.0);
    }

    #[test]
    fn word_count_treats_bom_as_space_and_nel_as_text() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
        assert_eq!(word_count("one\u{a0}two\u{3000}three"), 3);
        assert_eq!(word_count("one\u{feff}two"), 2);
        assert_eq!(word_count("one\u{85}two"), 1);
    }

    #[test]
    fn sentence_segments_count_trailing_pieces() {
        assert_eq!(sentence_segments(""), 1);
        assert_eq!(sentence_segments("no terminator"), 1);
        assert_eq!(sentence_segments("One. Two."), 3);
        assert_eq!(sentence_segments("Wait...what?!"), 3);
    }

    #[test]
    fn bullet_and_sentences_without_line_break_scores_single_tier() {
        let signals = structure_signals("Step - check cables. Reboot. Done.");
        assert!(signals.bullets);
        assert!(signals.multiple_sentences);
        assert!(!signals.line_breaks);
        assert_eq!(structure_score(signals), 12.0);
    }

    #[test]
    fn numbered_lines_count_as_bullets() {
        let signals = structure_signals("Summary\n1. Reset password\n2. Confirmed login");
        assert!(signals.bullets);
        assert!(signals.line_breaks);
    }

    #[test]
    fn specificity_requires_digits_and_dates_for_full_credit() {
        let none = detail_score("nothing specific", "nothing specific");
        let digits = detail_score("port 443 open", "port 443 open");
        let dated = detail_score("seen on 2024-01-15", "seen on 2024-01-15");
        let slash = detail_score("seen 1/5/24", "seen 1/5/24");

        assert_eq!(none, 0.0);
        assert_eq!(digits, 2.5);
        assert_eq!(dated, 5.0);
        assert_eq!(slash, 5.0);
    }

    #[test]
    fn technical_and_action_terms_are_proportional() {
        let text = "resolved and fixed";
        // resolved appears in both lists
        let expected = (2.0 / 16.0) * 15.0 + (1.0 / 10.0) * 10.0;
        assert!((detail_score(text, text) - expected).abs() < 1e-9);
    }

    #[test]
    fn keyword_bonus_needs_length_structure_and_detail() {
        let lower = "step";
        let base = keyword_score(lower, 101, 18.0, 20.5);
        assert!((base - (2.0 + 5.0)).abs() < 1e-9);
        assert!((keyword_score(lower, 100, 18.0, 20.5) - 2.0).abs() < 1e-9);
        assert!((keyword_score(lower, 101, 12.0, 20.5) - 2.0).abs() < 1e-9);
        assert!((keyword_score(lower, 101, 18.0, 20.0) - 2.0).abs() < 1e-9);
    }
}
