use std::time::Instant;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FibonacciInput {
    pub n: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FibonacciResult {
    pub value: u64,
    pub computation_time_ms: u64,
    pub n: u32,
}

/// Iterative fibonacci; values past `u64::MAX` saturate.
pub async fn fibonacci(input: &FibonacciInput) -> eyre::Result<FibonacciResult> {
    let started = Instant::now();

    let (mut current, mut next) = (0u64, 1u64);
    for _ in 0..input.n {
        let sum = current.saturating_add(next);
        current = next;
        next = sum;
    }

    Ok(FibonacciResult {
        value: current,
        computation_time_ms: started.elapsed().as_millis() as u64,
        n: input.n,
    })
}
