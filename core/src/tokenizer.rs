use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}_]+(?:['’\-][\p{L}\p{N}_]+)*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd","your","yours","yourself","yourselves",
            "he","him","his","himself","she","she's","her","hers","herself","it","it's","its","itself",
            "they","them","their","theirs","themselves","what","which","who","whom","this","that","that'll","these","those",
            "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
            "a","an","the","and","but","if","or","because","as","until","while","of","at","by","for","with","about","against",
            "between","into","through","during","before","after","above","below","to","from","up","down","in","out","on","off",
            "over","under","again","further","then","once","here","there","when","where","why","how",
            "all","any","both","each","few","more","most","other","some","such","no","nor","not","only","own","same","so","than",
            "too","very","s","t","can","will","just","don","don't","should","should've","now","d","ll","m","o","re","ve","y",
            "ain","aren","aren't","couldn","couldn't","didn","didn't","doesn","doesn't","hadn","hadn't","hasn","hasn't",
            "haven","haven't","isn","isn't","ma","mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't",
            "shouldn","shouldn't","wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't"
        ];
        words.iter().copied().collect()
    };
}

/// Text to ordered normalized terms. Used for document text at build time and
/// for every query token, so both sides agree on the vocabulary.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// NFKC + lowercase, alphabetic words only, English stopwords removed, Snowball stems.
pub struct EnglishNormalizer {
    stemmer: Stemmer,
}

impl EnglishNormalizer {
    pub fn new() -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English) }
    }
}

impl Default for EnglishNormalizer {
    fn default() -> Self { Self::new() }
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

impl Normalizer for EnglishNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut terms = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let mut token = mat.as_str();
            if let Some(stripped) = token.strip_suffix("'s").or_else(|| token.strip_suffix("’s")) {
                token = stripped;
            }
            // numbers, hyphenated compounds and contractions are not terms
            if token.is_empty() || !token.chars().all(char::is_alphabetic) { continue; }
            if is_stopword(token) { continue; }
            terms.push(self.stemmer.stem(token).into_owned());
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = EnglishNormalizer::new().normalize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
        assert!(!t.iter().any(|w| w.contains('\'')));
    }
}
