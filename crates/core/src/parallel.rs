//! Parallel processing utilities.

use anyhow::{Result, bail};
use log::error;
use rayon::prelude::*;

/// Result of a parallel batch operation.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if !self.all_succeeded() {
            bail!("{operation} failed: {} of {} failed", self.failed, self.total());
        }
        Ok(())
    }
}

/// Process items in parallel with consistent error reporting.
///
/// Successful outputs are returned in input order next to the counts.
pub fn process_parallel_iter<T, R, F>(
    label: &str,
    items: impl IntoIterator<Item = T>,
    op: F,
) -> (BatchResult, Vec<R>)
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let items: Vec<T> = items.into_iter().collect();
    let results: Vec<_> = items.into_par_iter().map(&op).collect();

    let mut result = BatchResult::default();
    let mut outputs = Vec::with_capacity(results.len());
    for r in results {
        match r {
            Ok(output) => {
                result.succeeded += 1;
                outputs.push(output);
            }
            Err(e) => {
                error!("{e:?}");
                result.failed += 1;
            }
        }
    }

    println!("  {label}: {} of {} succeeded", result.succeeded, result.total());
    (result, outputs)
}

/// Collect results from parallel operations without printing.
pub fn collect_parallel<T, R, F>(items: &[T], op: F) -> Vec<Result<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync + Send,
{
    items.par_iter().map(op).collect()
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_batch_counts_failures() {
        let (result, outputs) = process_parallel_iter("double", 0..10, |i| {
            if i % 5 == 0 { Err(anyhow!("bad item {i}")) } else { Ok(i * 2) }
        });

        assert_eq!(result.total(), 10);
        assert_eq!(outputs, vec![2, 4, 6, 8, 12, 14, 16, 18]);
        assert_eq!(result.failed, 2);
        assert!(!result.all_succeeded());
        assert!(result.ok_or_bail("double").is_err());
    }

    #[test]
    fn test_collect_parallel_keeps_order() {
        let results = collect_parallel(&[1, 2, 3], |i| Ok(i * 10));
        let values: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(values, vec![10, 20, 30]);
    }
}
