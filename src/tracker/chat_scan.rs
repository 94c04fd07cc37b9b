use log::debug;

use crate::tracker::ads::is_advertising;
use crate::tracker::normalize::normalize;
use crate::tracker::reputation::ReputationTracker;

/// Scan text spoken above a player's head. Returns true when this call
/// flagged a new advertiser.
pub fn on_overhead_speech(
    actor: &str,
    text: &str,
    ad_words: &[String],
    reputation: &mut ReputationTracker,
) -> bool {
    scan(actor, text, ad_words, reputation, "overhead")
}

/// Scan a public chat line. Players already flagged are skipped outright.
pub fn on_public_chat(
    actor: &str,
    text: &str,
    ad_words: &[String],
    reputation: &mut ReputationTracker,
) -> bool {
    if reputation.is_advertiser(&normalize(actor)) {
        return false;
    }
    scan(actor, text, ad_words, reputation, "message")
}

fn scan(
    actor: &str,
    text: &str,
    ad_words: &[String],
    reputation: &mut ReputationTracker,
    source: &str,
) -> bool {
    // An empty list would match every line
    if ad_words.is_empty() {
        return false;
    }

    let player = normalize(actor);
    let message = text.to_lowercase();
    let seen_advertising = is_advertising(&message, ad_words);

    debug!(
        "{}: {} from {}: {}",
        seen_advertising,
        player.as_str().to_uppercase(),
        source,
        message
    );

    seen_advertising && reputation.record_advertiser(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad_words() -> Vec<String> {
        vec!["free".to_string(), "gold".to_string()]
    }

    #[test]
    fn test_overhead_ad_flags_speaker() {
        let mut reputation = ReputationTracker::new();

        assert!(on_overhead_speech("Gold\u{00A0}Guy", "FREE GOLD trade me", &ad_words(), &mut reputation));
        assert!(reputation.is_advertiser(&normalize("gold guy")));
    }

    #[test]
    fn test_partial_match_does_not_flag() {
        let mut reputation = ReputationTracker::new();

        assert!(!on_public_chat("Someone", "selling gold", &ad_words(), &mut reputation));
        assert_eq!(reputation.advertiser_count(), 0);
    }

    #[test]
    fn test_repeat_ads_flag_once() {
        let mut reputation = ReputationTracker::new();

        assert!(on_public_chat("Spammer", "free gold", &ad_words(), &mut reputation));
        assert!(!on_public_chat("Spammer", "free gold", &ad_words(), &mut reputation));
        assert!(!on_overhead_speech("spammer", "free gold", &ad_words(), &mut reputation));
        assert_eq!(reputation.advertiser_count(), 1);
    }

    #[test]
    fn test_empty_word_list_disables_detection() {
        let mut reputation = ReputationTracker::new();

        assert!(!on_public_chat("Anyone", "hello there", &[], &mut reputation));
        assert!(!on_overhead_speech("Anyone", "hello there", &[], &mut reputation));
        assert_eq!(reputation.advertiser_count(), 0);
    }
}
