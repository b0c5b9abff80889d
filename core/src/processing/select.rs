use crate::interface::Candidate;
use crate::prelude::{ProcessingStage, StageResult};

/// Picks the largest candidate; the earliest one wins an exact tie.
#[derive(Debug, Default)]
pub struct CandidateSelector;

impl CandidateSelector {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessingStage for CandidateSelector {
    type Input = [Candidate];
    type Output = Option<Candidate>;

    fn name(&self) -> &'static str {
        "candidate-selector"
    }

    fn execute(&self, candidates: &[Candidate]) -> StageResult<Option<Candidate>> {
        let best = candidates.iter().fold(None::<&Candidate>, |best, c| match best {
            Some(b) if b.area >= c.area => Some(b),
            _ => Some(c),
        });
        Ok(best.copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(area: f64, hull_index: usize) -> Candidate {
        Candidate {
            centroid: (hull_index as f64, 0.0),
            area,
            hull_index,
        }
    }

    #[test]
    fn no_candidates_means_no_target() {
        assert_eq!(CandidateSelector::new().execute(&[]).unwrap(), None);
    }

    #[test]
    fn largest_area_wins_in_any_order() {
        let forward = [candidate(300.0, 0), candidate(900.0, 1)];
        let backward = [candidate(900.0, 0), candidate(300.0, 1)];
        let selector = CandidateSelector::new();
        assert_eq!(selector.execute(&forward).unwrap().unwrap().area, 900.0);
        assert_eq!(selector.execute(&backward).unwrap().unwrap().area, 900.0);
    }

    #[test]
    fn tie_goes_to_first_in_trace_order() {
        let tied = [candidate(100.0, 0), candidate(500.0, 1), candidate(500.0, 2)];
        let chosen = CandidateSelector::new().execute(&tied).unwrap().unwrap();
        assert_eq!(chosen.hull_index, 1);
    }
}
