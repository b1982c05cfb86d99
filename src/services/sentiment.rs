//! Wordlist sentiment scoring for journal entries
//!
//! AFINN-style scoring: split on non-alphanumeric characters, lowercase
//! each token, and sum the valence of every known word. Unknown words
//! score zero, so the result is a small signed integer that the client
//! can bucket into rough positive/negative/neutral bands.
//!
//! The list below is a curated subset of a general-purpose valence list
//! plus recovery vocabulary (craving, relapse, sober, trigger, ...).

/// Valence table, sorted by word for binary search
static WORDS: &[(&str, i32)] = &[
    ("abandoned", -2),
    ("abuse", -3),
    ("accepted", 1),
    ("ache", -2),
    ("afraid", -2),
    ("alive", 1),
    ("alone", -2),
    ("amazing", 4),
    ("angry", -3),
    ("anxious", -2),
    ("ashamed", -2),
    ("awful", -3),
    ("bad", -3),
    ("beautiful", 3),
    ("best", 3),
    ("better", 2),
    ("blessed", 3),
    ("brave", 2),
    ("broke", -1),
    ("broken", -1),
    ("calm", 2),
    ("care", 2),
    ("clean", 2),
    ("confident", 2),
    ("craving", -2),
    ("crisis", -3),
    ("cry", -1),
    ("crying", -2),
    ("dead", -3),
    ("defeated", -2),
    ("depressed", -2),
    ("despair", -3),
    ("died", -3),
    ("difficult", -1),
    ("disappointed", -2),
    ("dread", -2),
    ("drunk", -2),
    ("easy", 1),
    ("empty", -1),
    ("encouraged", 2),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("excited", 3),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fear", -2),
    ("fight", -1),
    ("fine", 2),
    ("free", 1),
    ("fun", 4),
    ("glad", 3),
    ("good", 3),
    ("grateful", 3),
    ("great", 3),
    ("grief", -2),
    ("happy", 3),
    ("hate", -3),
    ("hated", -3),
    ("healing", 2),
    ("healthy", 2),
    ("hell", -4),
    ("helpless", -2),
    ("hope", 2),
    ("hopeful", 2),
    ("hopeless", -2),
    ("hurt", -2),
    ("hurting", -2),
    ("inspired", 2),
    ("joy", 3),
    ("kind", 2),
    ("lonely", -2),
    ("lost", -3),
    ("love", 3),
    ("loved", 3),
    ("miserable", -3),
    ("miss", -2),
    ("motivated", 2),
    ("nervous", -2),
    ("nightmare", -3),
    ("numb", -1),
    ("overwhelmed", -2),
    ("pain", -2),
    ("panic", -3),
    ("peace", 2),
    ("peaceful", 2),
    ("proud", 2),
    ("regret", -2),
    ("relapse", -3),
    ("relapsed", -3),
    ("relaxed", 2),
    ("relief", 1),
    ("relieved", 2),
    ("sad", -2),
    ("safe", 1),
    ("scared", -2),
    ("shame", -2),
    ("sick", -2),
    ("slipped", -2),
    ("smile", 2),
    ("sober", 2),
    ("sobriety", 2),
    ("strength", 2),
    ("stress", -1),
    ("stressed", -2),
    ("strong", 2),
    ("struggle", -2),
    ("struggling", -2),
    ("stuck", -2),
    ("support", 2),
    ("supported", 2),
    ("temptation", -2),
    ("tempted", -2),
    ("terrible", -3),
    ("thankful", 2),
    ("tired", -2),
    ("triggered", -2),
    ("trouble", -2),
    ("ugly", -3),
    ("upset", -2),
    ("urge", -2),
    ("useless", -2),
    ("weak", -2),
    ("win", 4),
    ("wonderful", 4),
    ("worried", -3),
    ("worry", -3),
    ("worse", -3),
    ("worst", -3),
    ("worthless", -2),
    ("wrong", -2),
];

/// Score a piece of text.
///
/// Deterministic: the same content always yields the same score.
pub fn score(content: &str) -> i32 {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| valence(&token.to_lowercase()))
        .sum()
}

fn valence(word: &str) -> i32 {
    WORDS
        .binary_search_by_key(&word, |&(entry, _)| entry)
        .map(|idx| WORDS[idx].1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wordlist_is_sorted_and_unique() {
        // binary_search_by_key depends on this
        for pair in WORDS.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "{} must sort before {}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn test_positive_entry() {
        // grateful (+3) + proud (+2)
        assert_eq!(score("Feeling grateful and proud today"), 5);
    }

    #[test]
    fn test_negative_entry() {
        // awful (-3) + wrong (-2)
        assert_eq!(score("Awful day, everything went wrong"), -5);
    }

    #[test]
    fn test_neutral_entry() {
        assert_eq!(score("Went to the store and bought groceries"), 0);
        assert_eq!(score(""), 0);
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        // sober (+2) + happy (+3)
        assert_eq!(score("SOBER!!! and... HAPPY?"), 5);
        assert_eq!(score("sober and happy"), 5);
    }

    #[test]
    fn test_recovery_vocabulary_scores() {
        assert!(score("fighting a craving, almost relapsed") < 0);
        assert!(score("one year sober, feeling strong") > 0);
    }

    #[test]
    fn test_mixed_entry_sums_valences() {
        // happy (+3) + sad (-2)
        assert_eq!(score("happy but sad"), 1);
    }
}
