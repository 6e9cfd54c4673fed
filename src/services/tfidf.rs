//! TF-IDF vectorization and cosine similarity over product text
//!
//! Term weights use smoothed inverse document frequency
//! (`ln((1 + n) / (1 + df)) + 1`) and every document vector is
//! l2-normalized, so the dot product of two rows is their cosine
//! similarity. Vectors are kept sparse; a catalog-sized corpus is
//! refit on every build, which keeps the model free of hidden state.

use std::collections::HashMap;

/// English stop-words removed before vectorization
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Splits text into lowercase alphanumeric tokens of at least two
/// characters, with stop-words removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().nth(1).is_some())
        .map(str::to_lowercase)
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

/// Fitted TF-IDF model over one document corpus
///
/// Row order matches the corpus order passed to [`TfidfModel::fit`].
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    /// Sparse l2-normalized rows, term indices ascending
    rows: Vec<Vec<(usize, f64)>>,
}

impl TfidfModel {
    /// Fits the vocabulary, document frequencies, and normalized rows
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        let mut term_counts: Vec<HashMap<usize, f64>> = Vec::with_capacity(documents.len());

        for document in documents {
            let mut counts: HashMap<usize, f64> = HashMap::new();
            for token in tokenize(document.as_ref()) {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next_index);
                if index == doc_freq.len() {
                    doc_freq.push(0);
                }
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
            for &index in counts.keys() {
                doc_freq[index] += 1;
            }
            term_counts.push(counts);
        }

        let total_docs = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + total_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = term_counts
            .into_iter()
            .map(|counts| {
                let mut entries: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(index, tf)| (index, tf * idf[index]))
                    .collect();
                entries.sort_by_key(|&(index, _)| index);
                let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for entry in &mut entries {
                        entry.1 /= norm;
                    }
                }
                entries
            })
            .collect();

        Self { vocabulary, rows }
    }

    /// Number of documents in the fitted corpus
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct terms in the fitted vocabulary
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of document `index` against every document in
    /// the corpus, in corpus order
    ///
    /// Values are in [0, 1]; the entry at `index` itself is 1.0 for any
    /// document with at least one non-stop-word term.
    pub fn similarity_row(&self, index: usize) -> Vec<f64> {
        let row = &self.rows[index];
        self.rows
            .iter()
            .map(|other| sparse_dot(row, other))
            .collect()
    }
}

/// Dot product of two sparse vectors with ascending term indices
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut sum = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
