use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accuracy assumed for a judge before any evidence.
pub const PRIOR_ACCURACY: f64 = 0.8;

/// Fixed number of EM sweeps per update.
const EM_SWEEPS: usize = 10;

/// Judge ids at or above this bound (or the configured judge count, if
/// larger) are ignored. State is dense per judge id.
pub const MAX_JUDGES: usize = 1024;

/// One label given by one judge for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub judge_id: usize,
    pub item_id: usize,
    pub label: usize,
}

impl Judgment {
    pub fn new(judge_id: usize, item_id: usize, label: usize) -> Self {
        Self {
            judge_id,
            item_id,
            label,
        }
    }
}

/// Per-judge accuracy and confusion estimates.
///
/// State persists across [`update_reliability`](Self::update_reliability)
/// calls for the lifetime of the owner. Not synchronized: concurrent planning
/// sessions each need their own instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeReliability {
    judge_accuracies: Vec<f64>,
    /// `confusion_matrices[judge][true_label][given_label]`
    confusion_matrices: Vec<Vec<Vec<f64>>>,
    num_labels: usize,
    #[serde(default)]
    estimated_labels: BTreeMap<usize, usize>,
}

impl JudgeReliability {
    pub fn new(num_judges: usize, num_labels: usize) -> Self {
        let num_labels = num_labels.max(2);
        Self {
            judge_accuracies: vec![PRIOR_ACCURACY; num_judges],
            confusion_matrices: vec![prior_confusion(num_labels); num_judges],
            num_labels,
            estimated_labels: BTreeMap::new(),
        }
    }

    pub fn num_judges(&self) -> usize {
        self.judge_accuracies.len()
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn accuracy(&self, judge_id: usize) -> Option<f64> {
        self.judge_accuracies.get(judge_id).copied()
    }

    pub fn accuracies(&self) -> &[f64] {
        &self.judge_accuracies
    }

    pub fn confusion_matrix(&self, judge_id: usize) -> Option<&Vec<Vec<f64>>> {
        self.confusion_matrices.get(judge_id)
    }

    /// Vote weight for a judge; unseen judges get the prior.
    pub fn weight_for(&self, judge_id: usize) -> f64 {
        self.accuracy(judge_id).unwrap_or(PRIOR_ACCURACY)
    }

    /// Latent labels estimated by the most recent update, keyed by item.
    pub fn estimated_labels(&self) -> &BTreeMap<usize, usize> {
        &self.estimated_labels
    }

    /// Run a fixed number of EM sweeps over the given judgments.
    ///
    /// Judges without a vote in this batch keep their current estimates.
    /// Labels outside `[0, num_labels)` and judge ids past [`MAX_JUDGES`] are
    /// ignored.
    pub fn update_reliability(&mut self, judgments: &[Judgment]) {
        let judge_limit = MAX_JUDGES.max(self.num_judges());
        let mut by_item: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
        for j in judgments {
            if j.label >= self.num_labels || j.judge_id >= judge_limit {
                continue;
            }
            self.ensure_judge(j.judge_id);
            by_item
                .entry(j.item_id)
                .or_default()
                .push((j.judge_id, j.label));
        }
        if by_item.is_empty() {
            return;
        }

        let mut truth: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..EM_SWEEPS {
            // E-step: reliability-weighted vote per item.
            for (&item, votes) in &by_item {
                let mut tally = vec![0.0; self.num_labels];
                for &(judge, label) in votes {
                    tally[label] += self.judge_accuracies[judge];
                }
                truth.insert(item, argmax(&tally));
            }

            // M-step: Laplace-smoothed accuracy and confusion rows.
            let num_judges = self.judge_accuracies.len();
            let mut correct = vec![0usize; num_judges];
            let mut total = vec![0usize; num_judges];
            let mut counts = vec![vec![vec![0usize; self.num_labels]; self.num_labels]; num_judges];
            for (item, votes) in &by_item {
                let true_label = truth[item];
                for &(judge, label) in votes {
                    total[judge] += 1;
                    if label == true_label {
                        correct[judge] += 1;
                    }
                    counts[judge][true_label][label] += 1;
                }
            }

            for judge in 0..num_judges {
                if total[judge] == 0 {
                    continue;
                }
                self.judge_accuracies[judge] =
                    (correct[judge] as f64 + 1.0) / (total[judge] as f64 + 2.0);
                for (true_label, row) in counts[judge].iter().enumerate() {
                    let row_total: usize = row.iter().sum();
                    if row_total == 0 {
                        continue;
                    }
                    let denom = row_total as f64 + self.num_labels as f64;
                    for (given, &c) in row.iter().enumerate() {
                        self.confusion_matrices[judge][true_label][given] =
                            (c as f64 + 1.0) / denom;
                    }
                }
            }
        }

        self.estimated_labels = truth;
    }

    fn ensure_judge(&mut self, judge_id: usize) {
        while self.judge_accuracies.len() <= judge_id {
            self.judge_accuracies.push(PRIOR_ACCURACY);
            self.confusion_matrices
                .push(prior_confusion(self.num_labels));
        }
    }
}

impl Default for JudgeReliability {
    fn default() -> Self {
        Self::new(0, 2)
    }
}

/// Near-identity confusion matrix: `PRIOR_ACCURACY` on the diagonal, the rest
/// spread evenly.
fn prior_confusion(num_labels: usize) -> Vec<Vec<f64>> {
    let off = (1.0 - PRIOR_ACCURACY) / (num_labels - 1) as f64;
    (0..num_labels)
        .map(|t| {
            (0..num_labels)
                .map(|g| if t == g { PRIOR_ACCURACY } else { off })
                .collect()
        })
        .collect()
}

/// Index of the largest value; ties resolve to the lowest index.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv { (i, v) } else { (bi, bv) }
        })
        .0
}
