// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Index Map Module
//!
//! Writes every output slot from a function of its flat offset.
//!
//! Each slot is computed independently from read-only inputs, so with the
//! `parallel_proc` feature the walk is split across the rayon pool.

#[cfg(feature = "parallel_proc")]
use rayon::prelude::*;

/// Sets `out[d] = f(d)` for every `d`.
#[inline]
pub fn fill_indexed<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel_proc")]
    {
        out.par_iter_mut().enumerate().for_each(|(d, slot)| *slot = f(d));
    }
    #[cfg(not(feature = "parallel_proc"))]
    {
        for (d, slot) in out.iter_mut().enumerate() {
            *slot = f(d);
        }
    }
}
