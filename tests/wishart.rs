use assert_float_eq::assert_float_absolute_eq;
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use wishart_pivots::{Error, Wishart, draw_wishart, partition};

const SEED: u64 = 123;

macro_rules! gen_partition_tests {
    ($($p:expr),+) => {
        pastey::paste! {$(
            #[test]
            fn [<wishart_draws_partition_and_reassemble_ $p>]() {
                let mut rng = StdRng::seed_from_u64(SEED);
                let draws = draw_wishart(10, $p + 2, &DMatrix::<f64>::identity($p, $p), &mut rng)
                    .unwrap();

                for w in &draws {
                    for k in 1..$p {
                        let blocks = partition(w, k, k).unwrap();

                        assert_eq!(&blocks.reassemble(), w);
                        assert_eq!(blocks.m21, blocks.m12.transpose());
                    }

                    assert!(matches!(partition(w, 0, 0), Err(Error::InvalidPartition { .. })));
                    assert!(matches!(partition(w, $p, $p), Err(Error::InvalidPartition { .. })));
                }
            }
        )+}
    };
}

gen_partition_tests!(2, 3, 5, 8);

#[test]
fn sample_mean_converges_to_dof_times_identity() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let dof = 12;
    let count = 5000;
    let draws = draw_wishart(count, dof, &DMatrix::<f64>::identity(4, 4), &mut rng).unwrap();
    let mean = draws.iter().fold(DMatrix::<f64>::zeros(4, 4), |acc, w| acc + w) / count as f64;

    for i in 0..4 {
        for j in 0..4 {
            let expected = if i == j { dof as f64 } else { 0.0 };
            assert_float_absolute_eq!(mean[(i, j)], expected, 0.5);
        }
    }
}

#[test]
fn sample_iter_draws_independent_matrices() {
    let wishart = Wishart::<f64>::scaled_identity(6, 3, 1.0).unwrap();
    let draws: Vec<DMatrix<f64>> =
        wishart.sample_iter(StdRng::seed_from_u64(SEED)).take(5).collect();

    for (i, a) in draws.iter().enumerate() {
        for b in &draws[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn accessors_describe_the_distribution() {
    let scale = DMatrix::from_row_slice(2, 2, &[1.0, 0.3, 0.3, 2.0]);
    let wishart = Wishart::new(7, &scale).unwrap();

    assert_eq!(wishart.dof(), 7);
    assert_eq!(wishart.dim(), 2);
    assert_eq!(wishart.scale(), &scale);
    assert_float_absolute_eq!(wishart.mean()[(1, 1)], 14.0, 1e-12);
    assert_float_absolute_eq!(wishart.mean()[(0, 1)], 2.1, 1e-12);
}

#[test]
fn non_positive_definite_scale_is_propagated() {
    let scale = DMatrix::from_row_slice(2, 2, &[-1.0, 0.0, 0.0, 1.0]);
    let mut rng = StdRng::seed_from_u64(SEED);

    assert_eq!(draw_wishart(3, 5, &scale, &mut rng), Err(Error::NonPositiveDefiniteScale));
}
