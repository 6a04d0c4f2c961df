//! TF-IDF weighting over tokenized queries

use std::collections::{BTreeMap, HashMap, HashSet};

/// Term frequency normalized by document length
pub fn calculate_tf(tokens: &[String]) -> HashMap<String, f64> {
    let mut tf = HashMap::new();

    if tokens.is_empty() {
        return tf;
    }

    for token in tokens {
        *tf.entry(token.clone()).or_insert(0.0) += 1.0;
    }

    let total = tokens.len() as f64;
    for value in tf.values_mut() {
        *value /= total;
    }

    tf
}

/// Inverse document frequency table with a sorted vocabulary
///
/// Each weight is `ln(total_docs / (docs_containing_term + 1))`. The
/// vocabulary order is the iteration order of the underlying `BTreeMap`, so
/// vectors built against the same table always line up component-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    weights: BTreeMap<String, f64>,
    document_count: usize,
}

impl IdfTable {
    /// Get the weight of a term, if it is in the vocabulary
    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    /// Iterate the vocabulary in vector order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Number of distinct terms, i.e. the vector dimension
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of documents the table was computed from
    pub fn document_count(&self) -> usize {
        self.document_count
    }
}

/// Compute IDF weights across a collection of tokenized documents
pub fn calculate_idf<D>(documents: &[D]) -> IdfTable
where
    D: AsRef<[String]>,
{
    let total_docs = documents.len();
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();

    for document in documents {
        let unique: HashSet<&str> = document.as_ref().iter().map(String::as_str).collect();
        for term in unique {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
    }

    let weights = doc_freq
        .into_iter()
        .map(|(term, count)| {
            let idf = (total_docs as f64 / (count as f64 + 1.0)).ln();
            (term.to_string(), idf)
        })
        .collect();

    IdfTable {
        weights,
        document_count: total_docs,
    }
}

/// Build a TF-IDF vector aligned to the table's vocabulary
///
/// Terms of the document that are not in the vocabulary are ignored; terms of
/// the vocabulary that are absent from the document contribute zero.
pub fn create_vector(tokens: &[String], idf: &IdfTable) -> Vec<f64> {
    let tf = calculate_tf(tokens);

    idf.weights
        .iter()
        .map(|(term, weight)| tf.get(term).map_or(0.0, |freq| freq * weight))
        .collect()
}
