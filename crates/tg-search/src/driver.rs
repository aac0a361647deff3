//! Grid search orchestration: expansion, worker-pool scoring,
//! aggregation and ranking, and the winning refit.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tg_types::{
    CandidateSummary, Dataset, EmptyGridError, Estimator, EstimatorBuilder, FitError, ParamSet,
    Scorer, TuneError, TuneResult,
};

use crate::folds::FoldPlan;
use crate::grid::ParamGrid;
use crate::run::SearchRun;

/// Tuning configuration for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of cross-validation folds (K >= 2).
    pub k_folds: usize,
    /// Maximum number of scoring units evaluated concurrently.
    pub workers: usize,
    /// Seed for the fold shuffle.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k_folds: 5,
            workers: 4,
            seed: 0,
        }
    }
}

impl SearchConfig {
    pub fn with_k_folds(mut self, k: usize) -> Self {
        self.k_folds = k;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything a finished search hands back: the aggregated result table
/// in enumeration order, the winning row, the model refit on the full
/// dataset, and the run record.
pub struct SearchOutcome {
    pub summaries: Vec<CandidateSummary>,
    pub best: CandidateSummary,
    pub model: Box<dyn Estimator>,
    pub run: SearchRun,
}

/// Exhaustive search over a parameter grid with cross-validated scoring.
pub struct GridSearchDriver {
    grid: ParamGrid,
    config: SearchConfig,
}

impl GridSearchDriver {
    pub fn new(grid: ParamGrid, config: SearchConfig) -> Self {
        Self { grid, config }
    }

    /// Run the full search: expand the grid, score every combination on
    /// every fold, rank by mean score, and refit the winner once on the
    /// complete dataset.
    ///
    /// Fails fast: the first scoring failure aborts the search, since a
    /// partial leaderboard without a winner would be misleading.
    pub fn run(
        &self,
        data: &Dataset,
        builder: &dyn EstimatorBuilder,
        scorer: &dyn Scorer,
    ) -> TuneResult<SearchOutcome> {
        let candidates = self.grid.expand()?;
        if candidates.is_empty() {
            return Err(EmptyGridError.into());
        }
        let plan = FoldPlan::new(data.n_rows(), self.config.k_folds, self.config.seed)?;

        let mut run = SearchRun::new(candidates.len(), plan.k());
        run.mark_running();
        info!(
            run_id = %run.id,
            candidates = candidates.len(),
            folds = plan.k(),
            workers = self.config.workers,
            metric = scorer.name(),
            "Starting grid search"
        );

        let fold_scores =
            match self.score_all(&candidates, data, &plan, builder, scorer, &mut run) {
                Ok(scores) => scores,
                Err(e) => {
                    run.mark_failed(e.to_string());
                    warn!(run_id = %run.id, "Grid search failed: {}", e);
                    return Err(e);
                }
            };

        let mut summaries: Vec<CandidateSummary> = candidates
            .into_iter()
            .zip(fold_scores)
            .enumerate()
            .map(|(i, (params, scores))| CandidateSummary::aggregate(i, params, scores))
            .collect();
        let best_index = assign_ranks(&mut summaries);
        let best = summaries[best_index].clone();

        info!(
            candidate = best.candidate,
            params = %best.params,
            mean = best.mean_score,
            "Refitting winning candidate on the full dataset"
        );
        let mut model = builder.build();
        model.configure(&best.params)?;
        model.fit(data).map_err(|e| refit_error(best.candidate, e))?;

        run.mark_completed(best.mean_score);
        Ok(SearchOutcome {
            summaries,
            best,
            model,
            run,
        })
    }

    /// Score every (candidate, fold) unit through a bounded worker pool.
    ///
    /// Units are independent, so P workers pull from a shared task
    /// channel and report back on a result channel. An atomic flag
    /// cancels outstanding work once any unit fails; in-flight units
    /// finish, queued ones are abandoned.
    fn score_all(
        &self,
        candidates: &[ParamSet],
        data: &Dataset,
        plan: &FoldPlan,
        builder: &dyn EstimatorBuilder,
        scorer: &dyn Scorer,
        run: &mut SearchRun,
    ) -> TuneResult<Vec<Vec<f64>>> {
        let k = plan.k();
        let n_units = candidates.len() * k;
        let workers = self.config.workers.max(1).min(n_units);

        let (task_tx, task_rx) = bounded::<(usize, usize)>(n_units);
        let (result_tx, result_rx) = bounded::<(usize, usize, TuneResult<f64>)>(n_units);
        for ci in 0..candidates.len() {
            for fi in 0..k {
                task_tx
                    .send((ci, fi))
                    .map_err(|_| TuneError::Internal("task channel closed".to_string()))?;
            }
        }
        drop(task_tx);

        let cancelled = AtomicBool::new(false);
        std::thread::scope(|s| {
            for _ in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let cancelled = &cancelled;
                s.spawn(move || {
                    while let Ok((ci, fi)) = task_rx.recv() {
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        let outcome =
                            evaluate_unit(&candidates[ci], ci, fi, data, plan, builder, scorer);
                        if outcome.is_err() {
                            cancelled.store(true, Ordering::Relaxed);
                        }
                        // Bounded at n_units, so this never blocks.
                        let _ = result_tx.send((ci, fi, outcome));
                    }
                });
            }
        });
        drop(result_tx);

        let mut scores: Vec<Vec<Option<f64>>> = vec![vec![None; k]; candidates.len()];
        let mut first_error: Option<(usize, usize, TuneError)> = None;
        while let Ok((ci, fi, outcome)) = result_rx.try_recv() {
            match outcome {
                Ok(score) => {
                    debug!(candidate = ci, fold = fi, score, "Scored fold");
                    scores[ci][fi] = Some(score);
                    run.complete_unit();
                }
                Err(e) => {
                    // Several units can fail before cancellation lands;
                    // surface the one with the smallest (candidate, fold)
                    // so the reported error is independent of scheduling.
                    let replace = first_error
                        .as_ref()
                        .map_or(true, |(c, f, _)| (ci, fi) < (*c, *f));
                    if replace {
                        first_error = Some((ci, fi, e));
                    }
                }
            }
        }
        if let Some((ci, fi, e)) = first_error {
            warn!(candidate = ci, fold = fi, "Aborting search: {}", e);
            return Err(e);
        }

        let mut table = Vec::with_capacity(candidates.len());
        for (ci, folds) in scores.into_iter().enumerate() {
            let mut row = Vec::with_capacity(k);
            for (fi, score) in folds.into_iter().enumerate() {
                row.push(score.ok_or_else(|| {
                    TuneError::Internal(format!("missing score for candidate {ci} fold {fi}"))
                })?);
            }
            table.push(row);
        }
        Ok(table)
    }
}

/// Train and score one (candidate, fold) unit on a fresh estimator.
fn evaluate_unit(
    params: &ParamSet,
    candidate: usize,
    fold: usize,
    data: &Dataset,
    plan: &FoldPlan,
    builder: &dyn EstimatorBuilder,
    scorer: &dyn Scorer,
) -> TuneResult<f64> {
    let train = data.take(&plan.train_indices(fold))?;
    let test = data.take(plan.test_indices(fold))?;

    let mut model = builder.build();
    model.configure(params)?;
    model
        .fit(&train)
        .map_err(|e| fold_error(candidate, fold, e))?;
    let predicted = model
        .predict(&test)
        .map_err(|e| fold_error(candidate, fold, e))?;
    Ok(scorer.score(test.labels(), &predicted))
}

/// Wrap a training failure with its unit context. Grid errors pass
/// through untouched: an unknown parameter is a malformed search space,
/// not a failed fit.
fn fold_error(candidate: usize, fold: usize, err: TuneError) -> TuneError {
    match err {
        e @ TuneError::Grid(_) => e,
        e => FitError::Fold {
            candidate,
            fold,
            message: e.to_string(),
        }
        .into(),
    }
}

fn refit_error(candidate: usize, err: TuneError) -> TuneError {
    match err {
        e @ TuneError::Grid(_) => e,
        e => FitError::Refit {
            candidate,
            message: e.to_string(),
        }
        .into(),
    }
}

/// Rank candidates by descending mean score; ties keep enumeration
/// order. Returns the index of the rank-1 candidate.
fn assign_ranks(summaries: &mut [CandidateSummary]) -> usize {
    let mut order: Vec<usize> = (0..summaries.len()).collect();
    order.sort_by(|&a, &b| {
        summaries[b]
            .mean_score
            .partial_cmp(&summaries[a].mean_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for (pos, &idx) in order.iter().enumerate() {
        summaries[idx].rank = pos + 1;
    }
    order[0]
}
