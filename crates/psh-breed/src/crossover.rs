//! Subtree and segment crossover.
//!
//! Cut-points are drawn in `[0, size)` and address point `cut + 1`, so the
//! root of a parent is never exchanged as a whole.

use psh_core::RandomSource;
use psh_ir::{fits, Program};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How two-point crossover repeats draws that produce oversized children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryScope {
    /// Both children must fit in the same attempt
    #[default]
    Pair,
    /// Each child retries on its own draws
    PerParent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Draw the same cut-points in both parents
    pub homologous: bool,
    /// Attempts before two-point crossover gives up
    pub tries: usize,
    pub retry_scope: RetryScope,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            homologous: false,
            tries: 10,
            retry_scope: RetryScope::Pair,
        }
    }
}

/// A crossover operator over two parents
pub trait Crossover {
    /// Both children, in parent order
    fn cross(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> (Program, Program);

    /// Only the child built on `a`
    fn cross_first(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> Program;
}

/// Swaps one subtree between the parents
#[derive(Debug, Clone)]
pub struct SinglePointCrossover {
    homologous: bool,
    max_points: usize,
}

impl SinglePointCrossover {
    pub fn new(config: &CrossoverConfig, max_points: usize) -> Self {
        Self {
            homologous: config.homologous,
            max_points,
        }
    }

    fn draw(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> (usize, usize) {
        if self.homologous {
            let cut = rng.below(a.size().min(b.size()));
            (cut, cut)
        } else {
            let cut_a = rng.below(a.size());
            let cut_b = rng.below(b.size());
            (cut_a, cut_b)
        }
    }

    fn bounded(&self, child: Program, parent: &Program) -> Program {
        if fits(&child, self.max_points) {
            child
        } else {
            trace!(size = child.size(), max = self.max_points, "child too large, keeping parent");
            parent.clone()
        }
    }
}

/// `into` with its point `cut_into + 1` replaced by a copy of `from`'s
/// point `cut_from + 1`
fn graft(into: &Program, cut_into: usize, from: &Program, cut_from: usize) -> Program {
    from.extract_point(cut_from + 1)
        .and_then(|donor| into.replace_point(cut_into + 1, donor))
        .unwrap_or_else(|| into.clone())
}

impl Crossover for SinglePointCrossover {
    fn cross(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> (Program, Program) {
        if a.size() == 0 || b.size() == 0 {
            return (a.clone(), b.clone());
        }

        let (cut_a, cut_b) = self.draw(a, b, rng);
        trace!(cut_a, cut_b, "single point crossover");
        let child_a = graft(a, cut_a, b, cut_b);
        let child_b = graft(b, cut_b, a, cut_a);
        (self.bounded(child_a, a), self.bounded(child_b, b))
    }

    fn cross_first(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> Program {
        if a.size() == 0 || b.size() == 0 {
            return a.clone();
        }

        let (cut_a, cut_b) = self.draw(a, b, rng);
        self.bounded(graft(a, cut_a, b, cut_b), a)
    }
}

/// An ordered pair of cut-points delimiting a sibling segment
type Cuts = (usize, usize);

/// Exchanges runs of sibling subtrees between the parents
#[derive(Debug, Clone)]
pub struct TwoPointCrossover {
    config: CrossoverConfig,
    max_points: usize,
}

impl TwoPointCrossover {
    pub fn new(config: CrossoverConfig, max_points: usize) -> Self {
        Self { config, max_points }
    }

    fn ordered(low: usize, high: usize) -> Cuts {
        if low > high {
            (high, low)
        } else {
            (low, high)
        }
    }

    /// Draws for one attempt, in the order `a.low a.high b.low b.high`
    fn draw(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> (Cuts, Cuts) {
        if self.config.homologous {
            let bound = a.size().min(b.size());
            let low = rng.below(bound);
            let high = rng.below(bound);
            let cuts = Self::ordered(low, high);
            (cuts, cuts)
        } else {
            let low = rng.below(a.size());
            let high = rng.below(a.size());
            let cuts_a = Self::ordered(low, high);
            let low = rng.below(b.size());
            let high = rng.below(b.size());
            (cuts_a, Self::ordered(low, high))
        }
    }

    fn exchange(into: &Program, into_cuts: Cuts, from: &Program, from_cuts: Cuts) -> Program {
        let target = into.segment(into_cuts.0 + 1, into_cuts.1 + 1);
        let donor = from.segment(from_cuts.0 + 1, from_cuts.1 + 1);
        match (target, donor) {
            (Some(target), Some(donor)) => into.splice(&target, donor.atoms),
            _ => into.clone(),
        }
    }

    /// First child built on `a` that fits, drawing afresh on each attempt
    fn retry_one(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> Option<Program> {
        for attempt in 0..self.config.tries {
            let (cuts_a, cuts_b) = self.draw(a, b, rng);
            let child = Self::exchange(a, cuts_a, b, cuts_b);
            if fits(&child, self.max_points) {
                trace!(attempt, ?cuts_a, ?cuts_b, "two point crossover");
                return Some(child);
            }
        }
        None
    }
}

impl Crossover for TwoPointCrossover {
    fn cross(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> (Program, Program) {
        if a.size() == 0 || b.size() == 0 {
            return (a.clone(), b.clone());
        }

        match self.config.retry_scope {
            RetryScope::Pair => {
                for attempt in 0..self.config.tries {
                    let (cuts_a, cuts_b) = self.draw(a, b, rng);
                    let child_a = Self::exchange(a, cuts_a, b, cuts_b);
                    let child_b = Self::exchange(b, cuts_b, a, cuts_a);
                    if fits(&child_a, self.max_points) && fits(&child_b, self.max_points) {
                        trace!(attempt, ?cuts_a, ?cuts_b, "two point crossover");
                        return (child_a, child_b);
                    }
                }
                trace!(tries = self.config.tries, "no fitting children, keeping parents");
                (a.clone(), b.clone())
            }
            RetryScope::PerParent => {
                let child_a = self.retry_one(a, b, rng).unwrap_or_else(|| a.clone());
                let child_b = self.retry_one(b, a, rng).unwrap_or_else(|| b.clone());
                (child_a, child_b)
            }
        }
    }

    fn cross_first(&self, a: &Program, b: &Program, rng: &mut dyn RandomSource) -> Program {
        if a.size() == 0 || b.size() == 0 {
            return a.clone();
        }
        self.retry_one(a, b, rng).unwrap_or_else(|| a.clone())
    }
}
