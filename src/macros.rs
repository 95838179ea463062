/// Maps `$f` over `$items` with their index and collects into a `Result<Vec<_>, _>`.
///
/// The first error in index order wins. Sequentially this stops at that error; under
/// `parallel` every item is mapped before the results are scanned in order.
#[macro_export]
macro_rules! try_collect_if_parallel {
    ($items:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        let collected = rayon::prelude::IntoParallelIterator::into_par_iter($items)
            .enumerate()
            .map($f)
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>();
        #[cfg(not(feature = "parallel"))]
        let collected = ::core::iter::IntoIterator::into_iter($items)
            .enumerate()
            .map($f)
            .collect::<Result<Vec<_>, _>>();
        collected
    }};
}

#[macro_export]
macro_rules! sort_if_parallel {
    ($collection:expr, $compare:expr) => {
        #[cfg(feature = "parallel")]
        rayon::prelude::ParallelSliceMut::par_sort_unstable_by($collection, $compare);
        #[cfg(not(feature = "parallel"))]
        $collection.sort_unstable_by($compare);
    };
}
