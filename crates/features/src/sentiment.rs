//! Sentiment scoring through an opaque three-class classifier.
//!
//! The classifier returns class probabilities ordered
//! `[negative, neutral, positive]`; the score is their expectation over
//! `[-1, 0, 1]`, a value in [-1, 1].

use newslabel_core::{Error, Result, ScoredWindow};
use tracing::debug;

/// Weights of the negative, neutral and positive classes.
pub const CLASS_WEIGHTS: [f64; 3] = [-1.0, 0.0, 1.0];

/// A pretrained text classifier, treated as a pure function of its input.
pub trait SentimentModel {
    /// Class probabilities `[negative, neutral, positive]`, one row per text.
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<[f64; 3]>>;
}

impl<M: SentimentModel + ?Sized> SentimentModel for &M {
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<[f64; 3]>> {
        (**self).predict_proba(texts)
    }
}

/// Expected class weight under the given probabilities.
#[inline]
pub fn expected_score(probs: &[f64; 3]) -> f64 {
    probs.iter().zip(CLASS_WEIGHTS).map(|(p, w)| p * w).sum()
}

/// Batches texts through a sentiment model.
pub struct SentimentScorer<M> {
    model: M,
    batch_size: usize,
}

impl<M: SentimentModel> SentimentScorer<M> {
    /// Create a scorer; `batch_size` must be positive.
    pub fn new(model: M, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::config("sentiment batch_size must be > 0"));
        }
        Ok(Self { model, batch_size })
    }

    /// Score every text, in input order.
    pub fn score<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<f64>> {
        let mut scores = Vec::with_capacity(texts.len());
        for (batch_no, batch) in texts.chunks(self.batch_size).enumerate() {
            let batch: Vec<&str> = batch.iter().map(|t| t.as_ref()).collect();
            let probs = self.model.predict_proba(&batch)?;
            if probs.len() != batch.len() {
                return Err(Error::sentiment(format!(
                    "model returned {} rows for a batch of {}",
                    probs.len(),
                    batch.len()
                )));
            }
            scores.extend(probs.iter().map(expected_score));
            debug!(batch = batch_no, scored = scores.len(), total = texts.len(), "Scored sentiment batch");
        }
        Ok(scores)
    }

    /// Fill in the sentiment of each window from its title.
    pub fn score_windows(&self, rows: &mut [ScoredWindow]) -> Result<()> {
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        let scores = self.score(&titles)?;
        for (row, score) in rows.iter_mut().zip(scores) {
            row.sentiment = Some(score);
        }
        Ok(())
    }
}
