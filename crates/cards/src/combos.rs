// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Combinatorial helpers for enumerating card subsets.
//!
//! The equity engine walks k-card combinations in combinatorial order so that
//! the enumeration space can be partitioned across worker tasks, each task
//! starts from its own nth subset.

/// Creates table for nck(n, k) for n <= 52 and k <= 7.
const fn make_nck() -> [[u64; 8]; 53] {
    let mut t = [[0u64; 8]; 53];
    let mut n = 0;

    while n <= 52 {
        // base case nck(n, 0) = 1
        t[n][0] = 1;

        let mut k = 1;
        while k <= 7 {
            // nck(n, k) = nck(n-1, k-1) + nck(n-1, k)
            if n > 0 {
                t[n][k] = t[n - 1][k - 1] + t[n - 1][k];
            }
            k += 1;
        }

        n += 1;
    }

    t
}

const NCKS: [[u64; 8]; 53] = make_nck();

/// Returns the binomial coefficient for n choose k.
#[inline]
pub fn nck(n: usize, k: usize) -> u64 {
    assert!(n <= 52, "n={n} must be 0 <= n <= 52");
    assert!(k <= 7, "k={k} must be 0 <= k <= 7");

    NCKS[n][k]
}

/// Uses the combinatorial number system to convert n to a
/// k-combination (see Theorem L pg. 260 Knuth 4a).
fn nth_ksubset(mut n: u64, k: usize) -> [usize; 7] {
    assert!(k <= 7);

    let mut out = [0; 7];
    for k in (0..k).rev() {
        let mut c = k;
        while nck(c, k + 1) <= n {
            c += 1;
        }

        c = c.saturating_sub(1);
        out[k] = c;

        n = n.saturating_sub(nck(c, k + 1));
    }

    out
}

/// Calls the given closure for count k-subsets starting from the nth ksubset.
///
/// The closure receives the k positions of the subset in 0..n, in increasing
/// order. Stops early when the subsets are exhausted.
pub fn for_each_ksubset<F>(n: usize, k: usize, nth: u64, count: u64, mut f: F)
where
    F: FnMut(&[usize]),
{
    assert!((1..=7).contains(&k), "1 <= k <= 7");

    if count == 0 || nth >= nck(n, k) {
        return;
    }

    // Algorithm L from TAOCP 4a
    let mut c = vec![0usize; k + 3];

    let ks = nth_ksubset(nth, k);
    for i in 0..k {
        c[i + 1] = ks[i];
    }

    c[k + 1] = n;

    let mut counter = 1;
    loop {
        f(&c[1..=k]);

        counter += 1;
        if counter > count {
            break;
        }

        let mut j = 1;
        while c[j] + 1 == c[j + 1] {
            c[j] = j - 1;
            j += 1;
        }

        if j > k {
            break;
        }

        c[j] += 1;
    }
}
