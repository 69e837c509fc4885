use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Tokens shorter than this are dropped.
pub const MIN_TOKEN_LEN: usize = 2;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Drop common English function words. Off unless a site asks for it.
    pub stopwords: bool,
}

/// Folds the accented letters used in Spanish and Catalan text to their base
/// letter. Expects lowercase input; anything outside the table is returned as is.
pub fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' => 'a',
        'é' | 'è' => 'e',
        'í' | 'ï' => 'i',
        'ó' | 'ò' => 'o',
        'ú' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Removes markup tags, replacing each with a space so adjacent words stay apart.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, " ").into_owned()
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Normalize raw (possibly marked-up) text into lowercase alphabetic tokens.
pub fn normalize(text: &str) -> Vec<String> {
    normalize_with(text, &TokenizerOptions::default())
}

/// Same as [`normalize`], honoring the given options.
pub fn normalize_with(text: &str, options: &TokenizerOptions) -> Vec<String> {
    let stripped = strip_tags(text).to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in stripped.chars().map(fold_char) {
        if c.is_ascii_lowercase() {
            current.push(c);
            continue;
        }
        push_token(&mut tokens, &mut current, options);
    }
    push_token(&mut tokens, &mut current, options);
    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String, options: &TokenizerOptions) {
    if current.len() >= MIN_TOKEN_LEN && !(options.stopwords && is_stopword(current)) {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = normalize("<p>Gold Medal, 2019!</p>");
        assert_eq!(t, vec!["gold", "medal"]);
    }

    #[test]
    fn tags_separate_words() {
        assert_eq!(normalize("alpha<br/>beta"), vec!["alpha", "beta"]);
    }

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(normalize("a b cd e"), vec!["cd"]);
    }

    #[test]
    fn unfolded_letters_split_words() {
        // 'ß' is not in the fold table, so it acts as a separator.
        assert_eq!(normalize("straße"), vec!["stra"]);
    }

    #[test]
    fn stopwords_only_when_enabled() {
        let text = "The history of the olympiad";
        assert_eq!(normalize(text), vec!["the", "history", "of", "the", "olympiad"]);
        let opts = TokenizerOptions { stopwords: true };
        assert_eq!(normalize_with(text, &opts), vec!["history", "olympiad"]);
    }
}
