#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

#[macro_use]
pub(crate) mod macros;

mod distribution;
mod error;
mod matrix;
mod methods;
mod wishart;

use std::iter::Sum;

pub use distribution::EmpiricalDistribution;
pub use error::Error;
pub use matrix::{Partition, partition};
pub use methods::*;
use num_traits::{Float as Float_, Num, NumAssign, NumOps};
pub use wishart::{Wishart, draw_wishart};

/// A convenience trait combining bounds frequently used for floating-point computations.
#[cfg(feature = "parallel")]
pub trait Float: Float_ + Num + NumAssign + NumOps + Sum + Send + Sync {}

/// Blanket implementation of [`Float`] for any type that satisfies its bounds.
#[cfg(feature = "parallel")]
impl<T: Float_ + Num + NumAssign + NumOps + Sum + Send + Sync> Float for T {}

/// A convenience trait combining bounds frequently used for floating-point computations.
#[cfg(not(feature = "parallel"))]
pub trait Float: Float_ + Num + NumAssign + NumOps + Sum {}

/// Blanket implementation of [`Float`] for any type that satisfies its bounds.
#[cfg(not(feature = "parallel"))]
impl<T: Float_ + Num + NumAssign + NumOps + Sum> Float for T {}

#[cfg(all(feature = "serde", test))]
mod serde_tests {
    use serde_test::{Token, assert_tokens};

    use super::{EmpiricalDistribution, SimulationParameters, TestKind};

    #[test]
    fn test_simulation_parameters_tokens() {
        let params = SimulationParameters::new(100, 4, 10_000).with_seed(7);

        assert_tokens(
            &params,
            &[
                Token::Struct {
                    name: "SimulationParameters",
                    len: 4,
                },
                Token::Str("nsample"),
                Token::U64(100),
                Token::Str("pvariates"),
                Token::U64(4),
                Token::Str("iterations"),
                Token::U64(10_000),
                Token::Str("seed"),
                Token::Some,
                Token::U64(7),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_test_kind_tokens() {
        assert_tokens(
            &TestKind::Regression { part: 2 },
            &[
                Token::StructVariant {
                    name: "TestKind",
                    variant: "Regression",
                    len: 1,
                },
                Token::Str("part"),
                Token::U64(2),
                Token::StructVariantEnd,
            ],
        );
    }

    #[test]
    fn test_empirical_distribution_tokens() {
        let distribution = EmpiricalDistribution::from_values(vec![0.25, 1.5]);

        assert_tokens(
            &distribution,
            &[
                Token::Struct {
                    name: "EmpiricalDistribution",
                    len: 1,
                },
                Token::Str("values"),
                Token::Seq { len: Some(2) },
                Token::F64(0.25),
                Token::F64(1.5),
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );
    }
}
