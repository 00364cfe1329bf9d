//! Genome operators for the genetic algorithm.
//!
//! # Operations
//!
//! - **Initialization**: [`random_genome`] draws every weight uniformly from
//!   `[-WEIGHT_LIMIT, WEIGHT_LIMIT]`
//! - **Crossover**: [`crossover`] takes each weight from one parent or the
//!   other with equal probability
//! - **Mutation**: [`mutate`] nudges a single weight by a random fraction of
//!   its own value
//! - **Breeding**: [`breed`] is crossover followed by mutation
//!
//! # Design Decisions
//!
//! ## Proportional Mutation
//!
//! The perturbation is a fraction (0 to 100%) of the current value, added or
//! subtracted with equal probability. Small weights therefore move little and
//! a weight of exactly zero never moves; crossover and fresh random genomes
//! are what reintroduce it. The result is always clamped to the genome bound.
//!
//! ## One Bound
//!
//! Random initialization, mutation and genome files all share
//! [`WEIGHT_LIMIT`], so a bred genome always passes
//! [`Genome::validate`].

use boxwise_evaluator::genome::{Gene, Genome, WEIGHT_LIMIT};
use rand::{Rng, seq::IndexedRandom as _};

/// Probability that a freshly bred child is mutated.
pub const MUTATION_RATE: f64 = 0.1;

/// Creates a genome with every weight uniform in `[-WEIGHT_LIMIT, WEIGHT_LIMIT]`.
///
/// # Examples
///
/// ```
/// use boxwise_training::breeding;
///
/// let genome = breeding::random_genome(&mut rand::rng());
/// assert!(genome.validate().is_ok());
/// ```
pub fn random_genome<R>(rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    Genome::from_fn(|_| rng.random_range(-WEIGHT_LIMIT..=WEIGHT_LIMIT))
}

/// Uniform crossover: each weight comes from `a`, or from `b` with
/// probability 0.5, independently per weight.
pub fn crossover<R>(a: &Genome, b: &Genome, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    Genome::from_fn(|gene| {
        if rng.random_bool(0.5) {
            b.weight(gene)
        } else {
            a.weight(gene)
        }
    })
}

/// Mutates at most one weight of `genome`.
///
/// With probability `rate`, one weight is picked uniformly and moved by a
/// uniform fraction of its value in a random direction, then clamped to
/// `[-WEIGHT_LIMIT, WEIGHT_LIMIT]`.
///
/// # Arguments
///
/// * `genome` - Genome to mutate in place
/// * `rate` - Probability of mutating at all (0.0 to 1.0)
/// * `rng` - Random number generator
///
/// # Returns
///
/// The gene that was mutated, if any.
pub fn mutate<R>(genome: &mut Genome, rate: f64, rng: &mut R) -> Option<Gene>
where
    R: Rng + ?Sized,
{
    if !rng.random_bool(rate) {
        return None;
    }
    let gene = *Gene::ALL.choose(rng)?;
    let weight = genome.weight_mut(gene);
    let delta = rng.random_range(0.0..=1.0) * *weight;
    let moved = if rng.random_bool(0.5) {
        *weight + delta
    } else {
        *weight - delta
    };
    *weight = moved.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
    Some(gene)
}

/// Breeds a child of `a` and `b`: [`crossover`] then [`mutate`].
pub fn breed<R>(a: &Genome, b: &Genome, mutation_rate: f64, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    let mut child = crossover(a, b, rng);
    mutate(&mut child, mutation_rate, rng);
    child
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_genome_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let genome = random_genome(&mut rng);
            assert!(genome.validate().is_ok(), "{genome:?}");
        }
    }

    #[test]
    fn test_breeding_with_itself_without_mutation_is_identity() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..100 {
            let a = random_genome(&mut rng);
            assert_eq!(breed(&a, &a, 0.0, &mut rng), a);
        }
    }

    #[test]
    fn test_crossover_takes_each_weight_from_a_parent() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = Genome::from_weights([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let b = Genome::from_weights([-0.1, -0.2, -0.3, -0.4, -0.5, -0.6]);
        let mut from_b = [0; 6];
        for _ in 0..1000 {
            let child = crossover(&a, &b, &mut rng);
            for gene in Gene::ALL {
                let w = child.weight(gene);
                assert!(w == a.weight(gene) || w == b.weight(gene));
                if w == b.weight(gene) {
                    from_b[gene.index()] += 1;
                }
            }
        }
        for count in from_b {
            assert!((400..600).contains(&count), "{count} of 1000 from b");
        }
    }

    #[test]
    fn test_mutation_changes_at_most_one_weight() {
        let mut rng = Pcg32::seed_from_u64(4);
        let original = Genome::from_weights([0.5, -0.5, 0.25, -0.25, 0.75, -0.75]);
        for _ in 0..200 {
            let mut genome = original;
            let mutated = mutate(&mut genome, 1.0, &mut rng);
            let gene = mutated.unwrap();
            for other in Gene::ALL.into_iter().filter(|&g| g != gene) {
                assert_eq!(genome.weight(other), original.weight(other));
            }
        }
    }

    #[test]
    fn test_mutation_rate_zero_never_mutates() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut genome = Genome::TUNED;
        for _ in 0..100 {
            assert_eq!(mutate(&mut genome, 0.0, &mut rng), None);
        }
        assert_eq!(genome, Genome::TUNED);
    }

    #[test]
    fn test_repeated_mutation_stays_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut genome = Genome::from_weights([WEIGHT_LIMIT, -WEIGHT_LIMIT, 0.9, -0.9, 0.5, 0.0]);
        for _ in 0..10_000 {
            mutate(&mut genome, 1.0, &mut rng);
            assert!(genome.validate().is_ok(), "{genome:?}");
        }
        // Zero is a fixed point of proportional mutation.
        assert_eq!(genome.weight(Gene::Margin), 0.0);
    }
}
