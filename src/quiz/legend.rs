//! Legend mode: indirect-clue guessing as an optional alternative to the
//! classic multiple-choice flow.

use crate::dto::content::ContentItem;

/// How strictly a legend-mode guess is matched against the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrictness {
    /// Only an exact (case-insensitive, trimmed) match counts.
    Exact,
    /// Accept when either string contains the other and the guess is longer
    /// than `min_guess_len - 1` characters. This looseness is deliberate: the
    /// clue is indirect, so near-titles are rewarded.
    Fuzzy {
        /// Minimum guess length for containment matches to count.
        min_guess_len: usize,
    },
}

impl Default for MatchStrictness {
    fn default() -> Self {
        MatchStrictness::Fuzzy { min_guess_len: 4 }
    }
}

/// Outcome of checking a legend-mode guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendVerdict {
    /// No guess was entered.
    Empty,
    /// The guess matches the title under the configured strictness.
    Correct,
    /// The guess does not match.
    Incorrect,
}

/// Check a free-text guess against the content title.
pub fn check_guess(guess: &str, title: &str, strictness: MatchStrictness) -> LegendVerdict {
    let guess = guess.trim().to_lowercase();
    if guess.is_empty() {
        return LegendVerdict::Empty;
    }

    let title = title.trim().to_lowercase();
    if guess == title {
        return LegendVerdict::Correct;
    }

    if let MatchStrictness::Fuzzy { min_guess_len } = strictness {
        if guess.chars().count() >= min_guess_len
            && (title.contains(&guess) || guess.contains(&title))
        {
            return LegendVerdict::Correct;
        }
    }

    LegendVerdict::Incorrect
}

/// Rotating clue styles used to prompt the AI for an indirect hint.
const HINT_STYLES: [&str; 5] = [
    "Give a SIDE CHARACTER from \"{title}\" that hardcore fans will know.",
    "Give an ICONIC OBJECT or PLACE related to \"{title}\".",
    "Give a LORE HINT in one sentence without saying the title.",
    "Give a MUSIC/OST/ARTIST clue related to \"{title}\".",
    "Give a GAMEPLAY or UNIVERSE unique element for \"{title}\".",
];

/// Build the indirect-clue prompt for a legend round, rotating the clue style
/// with `round`.
pub fn legend_prompt(content: &ContentItem, round: usize) -> String {
    let style = HINT_STYLES[round % HINT_STYLES.len()].replace("{title}", &content.title);

    format!(
        "You are a legendary storyteller for a pop culture quiz.\n{style}\n\n\
         Content details:\nTitle: {}\nGenre: {}\nOverview: {}\nType: {}\n\n\
         Respond ONLY in a short sentence or noun phrase.\nDo not include the title name.",
        content.title,
        content.genre.as_deref().unwrap_or_default(),
        content.overview.as_deref().unwrap_or_default(),
        content.media_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::content::{MediaType, Source};

    #[test]
    fn exact_match_always_counts() {
        for strictness in [MatchStrictness::Exact, MatchStrictness::default()] {
            assert_eq!(
                check_guess("  The Matrix ", "the matrix", strictness),
                LegendVerdict::Correct
            );
        }
    }

    #[test]
    fn fuzzy_containment_requires_long_enough_guess() {
        let fuzzy = MatchStrictness::default();

        assert_eq!(
            check_guess("matrix", "The Matrix", fuzzy),
            LegendVerdict::Correct
        );
        assert_eq!(
            check_guess("The Matrix Reloaded", "The Matrix", fuzzy),
            LegendVerdict::Correct
        );
        // Too short for a containment match.
        assert_eq!(check_guess("mat", "The Matrix", fuzzy), LegendVerdict::Incorrect);
    }

    #[test]
    fn exact_strictness_rejects_containment() {
        assert_eq!(
            check_guess("matrix", "The Matrix", MatchStrictness::Exact),
            LegendVerdict::Incorrect
        );
    }

    #[test]
    fn empty_guess_is_flagged() {
        assert_eq!(
            check_guess("   ", "The Matrix", MatchStrictness::default()),
            LegendVerdict::Empty
        );
    }

    #[test]
    fn prompt_rotates_styles_and_embeds_metadata() {
        let content = ContentItem {
            id: "1".into(),
            title: "Celeste".into(),
            media_type: MediaType::Game,
            poster: String::new(),
            year: None,
            genre: Some("Platformer".into()),
            overview: Some("A mountain climb.".into()),
            source: Source::Rawg,
            artist: None,
            album: None,
            preview_url: None,
            duration_secs: None,
            followers: None,
        };

        let first = legend_prompt(&content, 0);
        let second = legend_prompt(&content, 1);
        assert!(first.contains("SIDE CHARACTER"));
        assert!(second.contains("ICONIC OBJECT"));
        assert!(first.contains("Platformer"));
        assert_eq!(first, legend_prompt(&content, HINT_STYLES.len()));
    }
}
