use std::time::Instant;

use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SortNumbersInput {
    pub numbers: Vec<i32>,
    #[serde(default)]
    pub algorithm: SortAlgorithm,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    #[default]
    Parallel,
    Sequential,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SortNumbersResult {
    pub sorted_numbers: Vec<i32>,
    pub algorithm: SortAlgorithm,
    pub input_length: usize,
    pub computation_time_ms: u64,
}

pub async fn sort_numbers(input: &SortNumbersInput) -> eyre::Result<SortNumbersResult> {
    let started = Instant::now();
    let mut numbers = input.numbers.clone();

    match input.algorithm {
        SortAlgorithm::Parallel => numbers.par_sort_unstable(),
        SortAlgorithm::Sequential => numbers.sort_unstable(),
    }

    Ok(SortNumbersResult {
        input_length: numbers.len(),
        sorted_numbers: numbers,
        algorithm: input.algorithm,
        computation_time_ms: started.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn both_algorithms_agree() {
        let numbers = vec![3, -1, 4, 1, 5, 9, -2, 6, 5, 3, 5];
        for algorithm in [SortAlgorithm::Parallel, SortAlgorithm::Sequential] {
            let input = SortNumbersInput {
                numbers: numbers.clone(),
                algorithm,
            };
            let result = sort_numbers(&input).await.unwrap();
            assert_eq!(result.sorted_numbers, vec![-2, -1, 1, 3, 3, 4, 5, 5, 5, 6, 9]);
            assert_eq!(result.input_length, 11);
            assert_eq!(result.algorithm, algorithm);
        }
    }

    #[tokio::test]
    async fn empty_input() {
        let input = SortNumbersInput {
            numbers: vec![],
            algorithm: SortAlgorithm::Sequential,
        };
        let result = sort_numbers(&input).await.unwrap();
        assert!(result.sorted_numbers.is_empty());
        assert_eq!(result.input_length, 0);
    }
}
