use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Largest sieve accepted; one byte per candidate is allocated.
pub const MAX_PRIME_LIMIT: u32 = 50_000_000;

/// Below this the parallel collection costs more than it saves.
const PARALLEL_THRESHOLD: u32 = 1_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FindPrimesInput {
    pub limit: u32,
    #[serde(default = "default_use_parallel")]
    pub use_parallel: bool,
}

fn default_use_parallel() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FindPrimesResult {
    pub primes: Vec<u32>,
    pub count: usize,
    pub limit: u32,
    pub computation_time_ms: u64,
    pub used_parallel: bool,
}

/// All primes `<= limit`, in ascending order.
pub async fn find_primes(input: &FindPrimesInput) -> eyre::Result<FindPrimesResult> {
    eyre::ensure!(
        input.limit <= MAX_PRIME_LIMIT,
        "limit {} exceeds the maximum of {}",
        input.limit,
        MAX_PRIME_LIMIT
    );

    let started = Instant::now();
    let sieve = sieve(input.limit);

    let primes: Vec<u32> = if input.use_parallel && input.limit >= PARALLEL_THRESHOLD {
        (0..=input.limit)
            .into_par_iter()
            .filter(|&i| sieve[i as usize])
            .collect()
    } else {
        (0..=input.limit).filter(|&i| sieve[i as usize]).collect()
    };

    Ok(FindPrimesResult {
        count: primes.len(),
        primes,
        limit: input.limit,
        computation_time_ms: started.elapsed().as_millis() as u64,
        used_parallel: input.use_parallel,
    })
}

/// Sieve of Eratosthenes: `sieve[i]` is true when `i` is prime.
fn sieve(limit: u32) -> Vec<bool> {
    let limit = limit as usize;
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    if limit >= 1 {
        is_prime[1] = false;
    }

    let mut i = 2;
    while i * i <= limit {
        if is_prime[i] {
            for multiple in (i * i..=limit).step_by(i) {
                is_prime[multiple] = false;
            }
        }
        i += 1;
    }
    is_prime
}
