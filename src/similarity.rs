use crate::models::Embedding;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PairLabel {
    #[display(fmt = "related")]
    Related,
    #[display(fmt = "unrelated")]
    Unrelated,
}

/// Index pair into the text list plus the relation the caller expects.
/// Static configuration; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityPair {
    pub a: usize,
    pub b: usize,
    pub label: PairLabel,
}

impl SimilarityPair {
    pub fn related(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            label: PairLabel::Related,
        }
    }

    pub fn unrelated(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            label: PairLabel::Unrelated,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub related_min: f32,
    pub unrelated_max: f32,
}

#[derive(Debug)]
pub struct PairOutcome {
    pub pair: SimilarityPair,
    pub score: Option<f32>,
    pub passed: bool,
    pub error: Option<Error>,
}

#[derive(Debug)]
pub struct SimilarityReport {
    pub outcomes: Vec<PairOutcome>,
    pub passed: bool,
}

/// Cosine similarity of two equal-length vectors, in [-1, 1]. Returns `None`
/// when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = x as f64;
        let y = y as f64;
        dot = x.mul_add(y, dot);
        norm_a = x.mul_add(x, norm_a);
        norm_b = y.mul_add(y, norm_b);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return None;
    }

    Some((dot / denom) as f32)
}

/// Score every pair against the fetched embeddings. Bad indices and mixed
/// dimensions are caller bugs and fail the whole run before any scoring;
/// per-pair fetch failures and degenerate vectors are recorded in the report
/// without blocking the remaining pairs.
pub fn verify(
    results: &[Result<Embedding>],
    pairs: &[SimilarityPair],
    thresholds: &Thresholds,
) -> Result<SimilarityReport> {
    for pair in pairs {
        for index in [pair.a, pair.b] {
            if index >= results.len() {
                return Err(Error::Config(format!(
                    "pair ({}, {}) references text {} but only {} embeddings exist",
                    pair.a,
                    pair.b,
                    index,
                    results.len()
                )));
            }
        }
        if let (Ok(left), Ok(right)) = (&results[pair.a], &results[pair.b]) {
            if left.dimension() != right.dimension() {
                return Err(Error::Config(format!(
                    "pair ({}, {}) mixes dimensions {} and {}",
                    pair.a,
                    pair.b,
                    left.dimension(),
                    right.dimension()
                )));
            }
        }
    }

    let outcomes: Vec<PairOutcome> = pairs
        .iter()
        .map(|&pair| score_pair(results, pair, thresholds))
        .collect();
    let passed = outcomes.iter().all(|outcome| outcome.passed);

    Ok(SimilarityReport { outcomes, passed })
}

fn score_pair(
    results: &[Result<Embedding>],
    pair: SimilarityPair,
    thresholds: &Thresholds,
) -> PairOutcome {
    let left = match &results[pair.a] {
        Ok(embedding) => embedding,
        Err(_) => {
            return PairOutcome {
                pair,
                score: None,
                passed: false,
                error: Some(Error::MissingEmbedding { index: pair.a }),
            }
        }
    };
    let right = match &results[pair.b] {
        Ok(embedding) => embedding,
        Err(_) => {
            return PairOutcome {
                pair,
                score: None,
                passed: false,
                error: Some(Error::MissingEmbedding { index: pair.b }),
            }
        }
    };

    match cosine_similarity(left.values(), right.values()) {
        Some(score) => {
            let passed = match pair.label {
                PairLabel::Related => score >= thresholds.related_min,
                PairLabel::Unrelated => score <= thresholds.unrelated_max,
            };
            PairOutcome {
                pair,
                score: Some(score),
                passed,
                error: None,
            }
        }
        None => {
            // A zero vector cannot attest relatedness either way.
            let index = if left.values().iter().all(|v| *v == 0.0) {
                pair.a
            } else {
                pair.b
            };
            PairOutcome {
                pair,
                score: Some(0.0),
                passed: false,
                error: Some(Error::DegenerateVector { index }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    const TOLERANCE: f32 = 1e-3;

    lazy_static! {
        // Unit vectors chosen so the cosine against [1, 0] is the x component.
        static ref CORPUS: Vec<crate::Result<Embedding>> = vec![
            Ok(Embedding::from(vec![1.0, 0.0])),
            Ok(Embedding::from(vec![0.85, 0.526_783])),
            Ok(Embedding::from(vec![0.42, 0.907_524])),
            Ok(Embedding::from(vec![0.38, 0.924_986])),
        ];
    }

    fn default_pairs() -> Vec<SimilarityPair> {
        vec![
            SimilarityPair::related(0, 1),
            SimilarityPair::unrelated(0, 2),
            SimilarityPair::unrelated(0, 3),
        ]
    }

    fn default_thresholds() -> Thresholds {
        Thresholds {
            related_min: 0.8,
            unrelated_max: 0.6,
        }
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];

        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < TOLERANCE);
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        let a = [0.3, -1.2, 2.5, 0.7];
        let score = cosine_similarity(&a, &a).unwrap();
        assert!((score - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn cosine_is_scale_invariant() {
        let a = [1.0, 2.0, 3.0];
        let scaled: Vec<f32> = a.iter().map(|v| v * 2.5).collect();

        let score = cosine_similarity(&a, &scaled).unwrap();
        assert!((score - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn cosine_of_zero_vector_is_undefined() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), None);
    }

    #[test]
    fn default_thresholds_pass_the_corpus() {
        let report = verify(&CORPUS, &default_pairs(), &default_thresholds()).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        let scores: Vec<f32> = report
            .outcomes
            .iter()
            .map(|outcome| outcome.score.expect("pair should have scored"))
            .collect();
        assert!((scores[0] - 0.85).abs() < TOLERANCE);
        assert!((scores[1] - 0.42).abs() < TOLERANCE);
        assert!((scores[2] - 0.38).abs() < TOLERANCE);
        assert!(report.outcomes.iter().all(|outcome| outcome.passed));
        assert!(report.passed);
    }

    #[test]
    fn tighter_related_threshold_fails_the_run() {
        let thresholds = Thresholds {
            related_min: 0.9,
            unrelated_max: 0.6,
        };
        let report = verify(&CORPUS, &default_pairs(), &thresholds).unwrap();

        assert!(!report.outcomes[0].passed);
        assert!(report.outcomes[1].passed);
        assert!(report.outcomes[2].passed);
        assert!(!report.passed);
    }

    #[test]
    fn related_threshold_is_inclusive() {
        let results = vec![
            Ok(Embedding::from(vec![1.0, 0.0])),
            Ok(Embedding::from(vec![2.0, 0.0])),
        ];
        let thresholds = Thresholds {
            related_min: 1.0,
            unrelated_max: 0.6,
        };

        let report = verify(&results, &[SimilarityPair::related(0, 1)], &thresholds).unwrap();
        assert!(report.outcomes[0].passed);
    }

    #[test]
    fn out_of_range_index_is_fatal_before_scoring() {
        let pairs = vec![SimilarityPair::related(0, 5)];
        let err = verify(&CORPUS, &pairs, &default_thresholds()).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn mixed_dimensions_are_fatal() {
        let results = vec![
            Ok(Embedding::from(vec![1.0, 0.0])),
            Ok(Embedding::from(vec![1.0, 0.0, 0.0])),
        ];
        let pairs = vec![SimilarityPair::related(0, 1)];

        let err = verify(&results, &pairs, &default_thresholds()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn failed_fetch_marks_its_pairs_and_spares_the_rest() {
        let results = vec![
            Ok(Embedding::from(vec![1.0, 0.0])),
            Err(Error::Transport("connection reset".to_string())),
            Ok(Embedding::from(vec![0.42, 0.907_524])),
        ];
        let pairs = vec![
            SimilarityPair::related(0, 1),
            SimilarityPair::unrelated(0, 2),
        ];

        let report = verify(&results, &pairs, &default_thresholds()).unwrap();

        assert_eq!(report.outcomes[0].score, None);
        assert!(!report.outcomes[0].passed);
        assert!(matches!(
            report.outcomes[0].error,
            Some(Error::MissingEmbedding { index: 1 })
        ));
        assert!(report.outcomes[1].passed);
        assert!(!report.passed);
    }

    #[test]
    fn zero_norm_vector_is_flagged_degenerate() {
        let results = vec![
            Ok(Embedding::from(vec![0.0, 0.0])),
            Ok(Embedding::from(vec![1.0, 0.0])),
        ];
        let pairs = vec![SimilarityPair::unrelated(0, 1)];

        let report = verify(&results, &pairs, &default_thresholds()).unwrap();

        assert_eq!(report.outcomes[0].score, Some(0.0));
        assert!(!report.outcomes[0].passed);
        assert!(matches!(
            report.outcomes[0].error,
            Some(Error::DegenerateVector { index: 0 })
        ));
    }
}
