use rayon::prelude::*;

/// Maps `func` over `items` preserving input order.
///
/// `None` uses rayon's global pool, `Some(1)` runs inline and any larger count
/// gets a dedicated pool of that size.
pub fn run_in_parallel<T, R, F>(items: Vec<T>, jobs: Option<usize>, func: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    match jobs {
        Some(0) | Some(1) => items.into_iter().map(func).collect(),
        Some(count) => match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
            Ok(pool) => pool.install(|| items.into_par_iter().map(func).collect()),
            Err(err) => {
                tracing::warn!(%err, "failed to build thread pool, running inline");
                items.into_iter().map(func).collect()
            }
        },
        None => items.into_par_iter().map(func).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::run_in_parallel;

    #[test]
    fn preserves_order_for_every_job_setting() {
        let items: Vec<u32> = (0..64).collect();
        let expected: Vec<u32> = items.iter().map(|n| n * 2).collect();
        for jobs in [None, Some(1), Some(4)] {
            assert_eq!(run_in_parallel(items.clone(), jobs, |n| n * 2), expected);
        }
    }
}
