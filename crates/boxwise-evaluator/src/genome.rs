//! Heuristic weights and their text form.
//!
//! A [`Genome`] holds one weight per scoring feature. Every weight is bounded
//! to `[-WEIGHT_LIMIT, WEIGHT_LIMIT]`; random initialisation, mutation and
//! file loading all use this single bound.
//!
//! The text form is six newline-separated numbers in [`Gene::ALL`] order:
//!
//! ```text
//! 0.98412
//! 0.576126
//! 0.31509
//! -0.972065
//! 0.020435
//! 0.660055
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Bound on the absolute value of every weight.
pub const WEIGHT_LIMIT: f64 = 1.0;

/// Number of weights in a genome.
pub const GENE_COUNT: usize = 6;

/// Identifies one weight of a [`Genome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Gene {
    #[display("no_count")]
    NoCount,
    #[display("one_count")]
    OneCount,
    #[display("two_count")]
    TwoCount,
    #[display("three_count")]
    ThreeCount,
    #[display("line_length")]
    LineLength,
    #[display("margin")]
    Margin,
}

impl Gene {
    pub const ALL: [Self; GENE_COUNT] = [
        Self::NoCount,
        Self::OneCount,
        Self::TwoCount,
        Self::ThreeCount,
        Self::LineLength,
        Self::Margin,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParseGenomeError {
    #[display("expected {} weights, got {}", GENE_COUNT, count)]
    WrongCount { count: usize },
    #[display("weight {gene}: invalid number {text:?}")]
    InvalidNumber {
        gene: Gene,
        #[error(not(source))]
        text: String,
    },
    #[display("{_0}")]
    OutOfBounds(GenomeBoundsError),
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("weight {} = {} is outside +/-{}", gene, value, WEIGHT_LIMIT)]
pub struct GenomeBoundsError {
    pub gene: Gene,
    pub value: f64,
}

/// The six weights of the position heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Weight of the share of cells with no drawn side.
    pub no_count: f64,
    /// Weight of the share of cells with one drawn side.
    pub one_count: f64,
    /// Weight of the share of cells with two drawn sides.
    pub two_count: f64,
    /// Weight of the share of cells with three drawn sides.
    pub three_count: f64,
    /// Weight of the normalised length of the move just played.
    pub line_length: f64,
    /// Weight of the normalised score margin.
    pub margin: f64,
}

impl Genome {
    pub const ZERO: Self = Self::from_weights([0.0; GENE_COUNT]);

    /// A well-performing genome found by a long evolution run.
    pub const TUNED: Self = Self::from_weights([
        0.984_120, 0.576_126, 0.315_090, -0.972_065, 0.020_435, 0.660_055,
    ]);

    #[must_use]
    pub const fn from_weights(weights: [f64; GENE_COUNT]) -> Self {
        let [no_count, one_count, two_count, three_count, line_length, margin] = weights;
        Self {
            no_count,
            one_count,
            two_count,
            three_count,
            line_length,
            margin,
        }
    }

    /// Builds a genome by calling `f` once per gene, in [`Gene::ALL`] order.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Gene) -> f64,
    {
        Self::from_weights(Gene::ALL.map(&mut f))
    }

    #[must_use]
    pub const fn weights(&self) -> [f64; GENE_COUNT] {
        [
            self.no_count,
            self.one_count,
            self.two_count,
            self.three_count,
            self.line_length,
            self.margin,
        ]
    }

    #[must_use]
    pub const fn weight(&self, gene: Gene) -> f64 {
        self.weights()[gene.index()]
    }

    pub fn weight_mut(&mut self, gene: Gene) -> &mut f64 {
        match gene {
            Gene::NoCount => &mut self.no_count,
            Gene::OneCount => &mut self.one_count,
            Gene::TwoCount => &mut self.two_count,
            Gene::ThreeCount => &mut self.three_count,
            Gene::LineLength => &mut self.line_length,
            Gene::Margin => &mut self.margin,
        }
    }

    /// Checks that every weight is finite and within [`WEIGHT_LIMIT`].
    pub fn validate(&self) -> Result<(), GenomeBoundsError> {
        for gene in Gene::ALL {
            let value = self.weight(gene);
            if !value.is_finite() || value.abs() > WEIGHT_LIMIT {
                return Err(GenomeBoundsError { gene, value });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for weight in self.weights() {
            writeln!(f, "{weight}")?;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = ParseGenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        if lines.len() != GENE_COUNT {
            return Err(ParseGenomeError::WrongCount { count: lines.len() });
        }
        let mut genome = Self::ZERO;
        for (gene, text) in Gene::ALL.into_iter().zip(lines) {
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseGenomeError::InvalidNumber {
                    gene,
                    text: text.to_owned(),
                })?;
            *genome.weight_mut(gene) = value;
        }
        genome.validate().map_err(ParseGenomeError::OutOfBounds)?;
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form() {
        let text = Genome::TUNED.to_string();
        assert_eq!(text.lines().count(), GENE_COUNT);
        assert_eq!(text.lines().next(), Some("0.98412"));
        let parsed: Genome = text.parse().unwrap();
        assert_eq!(parsed, Genome::TUNED);
    }

    #[test]
    fn test_parse_tolerates_blank_lines() {
        let genome: Genome = "0.5\n-0.25\n\n0\n1\n-1\n0.125\n\n".parse().unwrap();
        assert_eq!(genome.two_count, 0.0);
        assert_eq!(genome.margin, 0.125);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0.1\n0.2\n".parse::<Genome>(),
            Err(ParseGenomeError::WrongCount { count: 2 })
        );
        assert!(matches!(
            "0.1\n0.2\nabc\n0\n0\n0\n".parse::<Genome>(),
            Err(ParseGenomeError::InvalidNumber {
                gene: Gene::TwoCount,
                ..
            })
        ));
        assert!(matches!(
            "0\n0\n0\n0\n0\n6\n".parse::<Genome>(),
            Err(ParseGenomeError::OutOfBounds(GenomeBoundsError {
                gene: Gene::Margin,
                ..
            }))
        ));
        assert!("0\n0\nNaN\n0\n0\n0\n".parse::<Genome>().is_err());
    }

    #[test]
    fn test_weight_accessors_agree() {
        let mut next = 0.0;
        let mut genome = Genome::from_fn(|_| {
            next += 0.1;
            next
        });
        for gene in Gene::ALL {
            assert_eq!(genome.weight(gene), genome.weights()[gene.index()]);
        }
        *genome.weight_mut(Gene::LineLength) = -0.75;
        assert_eq!(genome.line_length, -0.75);
        assert!(genome.validate().is_ok());
    }

    #[test]
    fn test_serde_uses_gene_names() {
        let json = serde_json::to_value(Genome::from_weights([0.5, 0.0, 0.0, 0.0, 0.0, -1.0])).unwrap();
        assert_eq!(json["no_count"], 0.5);
        assert_eq!(json["margin"], -1.0);
        let back: Genome = serde_json::from_value(json).unwrap();
        assert_eq!(back.no_count, 0.5);
    }

    #[test]
    fn test_tuned_is_in_bounds() {
        assert!(Genome::TUNED.validate().is_ok());
        assert!(Genome::ZERO.validate().is_ok());
    }
}
