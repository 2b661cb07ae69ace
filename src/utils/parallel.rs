/// Thread pool setup for the distance matrix stage
use tracing::debug;

/// Worker count for a requested value, where 0 means every core
pub fn resolve_threads(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get()
    } else {
        requested
    }
}

/// Size the global rayon pool once per process.
///
/// Returns the number of threads in use. A pool that was already built is
/// left as is.
pub fn configure_thread_pool(requested: usize) -> usize {
    let threads = resolve_threads(requested);
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => threads,
        Err(e) => {
            debug!("Global thread pool already configured: {}", e);
            rayon::current_num_threads()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_threads() {
        assert_eq!(resolve_threads(3), 3);
        assert!(resolve_threads(0) >= 1);
    }

    #[test]
    fn test_configure_twice_is_harmless() {
        let first = configure_thread_pool(2);
        let second = configure_thread_pool(4);
        assert!(first >= 1);
        assert_eq!(second, rayon::current_num_threads());
    }
}
