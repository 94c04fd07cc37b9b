/// True when every ad word appears somewhere in the message.
///
/// Plain case-insensitive substring containment: no tokenizing and no word
/// boundaries, so "cash" matches "cashier". An empty word list matches
/// every message; callers decide whether that means "disabled".
pub fn is_advertising(message: &str, ad_words: &[String]) -> bool {
    let message = message.to_lowercase();
    ad_words
        .iter()
        .all(|word| message.contains(word.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_all_words_required() {
        let ad_words = words(&["free", "gold"]);

        assert!(is_advertising("free gold 4 sale", &ad_words));
        assert!(!is_advertising("gold only", &ad_words));
    }

    #[test]
    fn test_case_insensitive_and_order_independent() {
        let ad_words = words(&["Gold", "FREE"]);

        assert!(is_advertising("FrEe GOLD at the ge", &ad_words));
        assert!(is_advertising("gold gold free", &ad_words));
    }

    #[test]
    fn test_substring_without_word_boundaries() {
        assert!(is_advertising("ask the cashier", &words(&["cash"])));
    }

    #[test]
    fn test_empty_word_list_matches_everything() {
        assert!(is_advertising("hello", &[]));
        assert!(is_advertising("", &[]));
    }
}
