//! Lexicon-based sentiment scoring.
//!
//! Each known word carries an integer weight between -5 and +5 (AFINN
//! style). The score of a text is the sum of the weights of its words; a
//! negator immediately before a weighted word flips that word's sign
//! ("not good" scores -3). The label is a function of the score's sign only.

use crate::models::{Sentiment, SentimentLabel};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9']+").expect("valid token regex"));

static LEXICON: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| WEIGHTS.iter().copied().collect());

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "doesn't", "doesnt", "isn't", "isnt", "wasn't",
    "wasnt", "aren't", "arent", "won't", "wont", "can't", "cant", "cannot", "didn't", "didnt",
];

const WEIGHTS: &[(&str, i32)] = &[
    // positive
    ("achieve", 2),
    ("achieved", 2),
    ("achieves", 2),
    ("advance", 1),
    ("advances", 1),
    ("amazing", 4),
    ("approve", 2),
    ("approved", 2),
    ("approves", 2),
    ("award", 3),
    ("awarded", 3),
    ("awesome", 4),
    ("benefit", 2),
    ("best", 3),
    ("better", 2),
    ("boost", 1),
    ("boosts", 1),
    ("breakthrough", 3),
    ("celebrate", 3),
    ("celebrates", 3),
    ("confident", 2),
    ("effective", 2),
    ("excellent", 3),
    ("excited", 3),
    ("exciting", 3),
    ("fantastic", 4),
    ("free", 1),
    ("gain", 2),
    ("gains", 2),
    ("glad", 3),
    ("good", 3),
    ("great", 3),
    ("growth", 2),
    ("happy", 3),
    ("help", 2),
    ("helps", 2),
    ("hope", 2),
    ("hopeful", 2),
    ("improve", 2),
    ("improved", 2),
    ("improves", 2),
    ("innovative", 2),
    ("love", 3),
    ("optimistic", 2),
    ("outstanding", 5),
    ("perfect", 3),
    ("popular", 3),
    ("positive", 2),
    ("progress", 2),
    ("record", 1),
    ("recover", 2),
    ("recovers", 2),
    ("rescue", 2),
    ("rescued", 2),
    ("safe", 1),
    ("strong", 2),
    ("success", 2),
    ("successful", 3),
    ("support", 2),
    ("supports", 2),
    ("surge", 1),
    ("thrilled", 5),
    ("top", 2),
    ("triumph", 4),
    ("upgrade", 1),
    ("welcome", 2),
    ("win", 4),
    ("wins", 4),
    ("winner", 4),
    ("won", 3),
    ("wonderful", 4),
    // negative
    ("abuse", -3),
    ("accident", -2),
    ("alarm", -2),
    ("angry", -3),
    ("attack", -1),
    ("attacks", -1),
    ("bad", -3),
    ("ban", -2),
    ("banned", -2),
    ("bankrupt", -3),
    ("breach", -2),
    ("broken", -1),
    ("bug", -2),
    ("bugs", -2),
    ("catastrophe", -3),
    ("collapse", -2),
    ("collapses", -2),
    ("concern", -2),
    ("concerns", -2),
    ("crash", -2),
    ("crashes", -2),
    ("crisis", -3),
    ("dead", -3),
    ("death", -2),
    ("decline", -1),
    ("declines", -1),
    ("delay", -1),
    ("delayed", -1),
    ("disaster", -2),
    ("drop", -1),
    ("drops", -1),
    ("fail", -2),
    ("failed", -2),
    ("fails", -2),
    ("failure", -2),
    ("fear", -2),
    ("fears", -2),
    ("fraud", -4),
    ("hack", -1),
    ("hacked", -1),
    ("hate", -3),
    ("horrible", -3),
    ("hurt", -2),
    ("illegal", -3),
    ("kill", -3),
    ("killed", -3),
    ("lawsuit", -2),
    ("layoffs", -2),
    ("lose", -3),
    ("loses", -3),
    ("loss", -3),
    ("losses", -3),
    ("outage", -2),
    ("panic", -3),
    ("poor", -2),
    ("problem", -2),
    ("problems", -2),
    ("recall", -2),
    ("risk", -2),
    ("risks", -2),
    ("sad", -2),
    ("scam", -2),
    ("scandal", -3),
    ("shortage", -2),
    ("slump", -2),
    ("terrible", -3),
    ("threat", -2),
    ("threats", -2),
    ("vulnerability", -2),
    ("warn", -2),
    ("warning", -3),
    ("weak", -2),
    ("worry", -3),
    ("worse", -3),
    ("worst", -3),
    ("wrong", -2),
];

/// Score `text` and bucket the score into a label.
///
/// # Examples
///
/// ```ignore
/// let s = classify("Launch is a great success");
/// assert_eq!(s.score, 5);
/// assert_eq!(s.label, SentimentLabel::Positive);
/// ```
pub fn classify(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let mut score = 0;
    let mut negated = false;

    for token in TOKEN.find_iter(&lower).map(|m| m.as_str()) {
        if let Some(weight) = LEXICON.get(token) {
            score += if negated { -weight } else { *weight };
        }
        negated = NEGATORS.contains(&token);
    }

    Sentiment {
        score,
        label: label_for(score),
    }
}

/// Positive above zero, Negative below, Neutral at zero.
pub fn label_for(score: i32) -> SentimentLabel {
    match score {
        s if s > 0 => SentimentLabel::Positive,
        s if s < 0 => SentimentLabel::Negative,
        _ => SentimentLabel::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_follows_score_sign() {
        assert_eq!(label_for(5), SentimentLabel::Positive);
        assert_eq!(label_for(0), SentimentLabel::Neutral);
        assert_eq!(label_for(-3), SentimentLabel::Negative);
    }

    #[test]
    fn test_positive_headline() {
        let s = classify("Launch is a great success");
        assert_eq!(s.score, 5);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_headline() {
        let s = classify("Markets crash in worst decline amid growing fear of crisis");
        assert_eq!(s.score, -2 - 3 - 1 - 2 - 3);
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_headline() {
        let s = classify("The committee met to discuss the upcoming schedule");
        assert_eq!(s.score, 0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_negation_flips_next_word() {
        let s = classify("Not good");
        assert_eq!(s.score, -3);
        assert_eq!(s.label, SentimentLabel::Negative);

        // Negation only reaches the word right after the negator.
        assert_eq!(classify("not the good one").score, 3);
        assert_eq!(classify("This isn't bad").score, 3);
    }

    #[test]
    fn test_punctuation_and_case_are_ignored() {
        assert_eq!(classify("GREAT!!! Success.").score, 5);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let s = classify("");
        assert_eq!(s.score, 0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let text = "Record gains despite outage";
        assert_eq!(classify(text), classify(text));
    }
}
