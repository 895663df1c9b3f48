#![cfg(kani)]
//! Kani proof harnesses for the priority reorganization model.
//!
//! The model mirrors `reorganize` and `pack` over fixed-size arrays: slot `i`
//! of a scope holds an item tag and its priority, and a dense scope of `n`
//! items has priorities `1..=n` in slot order.
//!
//! Run with: `cargo kani --tests --harness <harness_name>`

/// Maximum scope size for bounded proofs.
const MAX_N: usize = 8;

/// A dense scope of `n` items tagged `0..n`.
fn dense(n: usize) -> ([u8; MAX_N], [i32; MAX_N]) {
    let mut tags = [0_u8; MAX_N];
    let mut priorities = [0_i32; MAX_N];
    let mut i: usize = 0;
    while i < n {
        tags[i] = i as u8;
        priorities[i] = (i + 1) as i32;
        i += 1;
    }
    (tags, priorities)
}

/// Move the item at priority `old` to `new` (clamped to `n`), rewriting the
/// priorities of the moved span. Returns the span bounds.
fn model_reorganize(
    n: usize,
    tags: &mut [u8; MAX_N],
    priorities: &mut [i32; MAX_N],
    old: i32,
    new: i32,
) -> (usize, usize) {
    let max = n as i32;
    let new = if new < 1 || new > max { max } else { new };
    let from = (old - 1) as usize;
    let to = (new - 1) as usize;

    let moved = tags[from];
    if from < to {
        let mut i = from;
        while i < to {
            tags[i] = tags[i + 1];
            i += 1;
        }
    } else {
        let mut i = from;
        while i > to {
            tags[i] = tags[i - 1];
            i -= 1;
        }
    }
    tags[to] = moved;

    let (lo, hi) = if from < to { (from, to) } else { (to, from) };
    let mut i = lo;
    while i <= hi {
        priorities[i] = (i + 1) as i32;
        i += 1;
    }
    (lo, hi)
}

/// Remove slot `victim` and renumber the rest. Returns how many priorities
/// changed.
fn model_pack(
    n: usize,
    tags: &mut [u8; MAX_N],
    priorities: &mut [i32; MAX_N],
    victim: usize,
) -> usize {
    let mut i = victim;
    while i + 1 < n {
        tags[i] = tags[i + 1];
        priorities[i] = priorities[i + 1];
        i += 1;
    }
    let mut changed = 0;
    let mut j: usize = 0;
    while j + 1 < n {
        if priorities[j] != (j + 1) as i32 {
            priorities[j] = (j + 1) as i32;
            changed += 1;
        }
        j += 1;
    }
    changed
}

// ---------------------------------------------------------------------------
// Proof 1: Density
//
// Moving any item to any target leaves priorities exactly 1..=n.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(10)]
fn reorganize_keeps_density() {
    let n: usize = kani::any();
    kani::assume(n >= 1 && n <= MAX_N);
    let old: i32 = kani::any();
    kani::assume(old >= 1 && old <= n as i32);
    let new: i32 = kani::any();
    kani::assume(new >= -2 && new <= MAX_N as i32 + 2);

    let (mut tags, mut priorities) = dense(n);
    model_reorganize(n, &mut tags, &mut priorities, old, new);

    let mut i: usize = 0;
    while i < n {
        kani::assert(priorities[i] == (i + 1) as i32, "scope is not dense");
        i += 1;
    }
}

// ---------------------------------------------------------------------------
// Proof 2: Permutation
//
// Reorganizing never loses or duplicates an item.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(10)]
fn reorganize_is_a_permutation() {
    let n: usize = kani::any();
    kani::assume(n >= 1 && n <= MAX_N);
    let old: i32 = kani::any();
    kani::assume(old >= 1 && old <= n as i32);
    let new: i32 = kani::any();
    kani::assume(new >= 1 && new <= n as i32);

    let (mut tags, mut priorities) = dense(n);
    model_reorganize(n, &mut tags, &mut priorities, old, new);

    let mut seen = [false; MAX_N];
    let mut i: usize = 0;
    while i < n {
        let tag = tags[i] as usize;
        kani::assert(tag < n, "unknown item");
        kani::assert(!seen[tag], "item duplicated");
        seen[tag] = true;
        i += 1;
    }
    kani::assert(tags[(new - 1) as usize] == (old - 1) as u8, "moved item not at target");
}

// ---------------------------------------------------------------------------
// Proof 3: Minimal altered set
//
// Items outside the returned span keep both their slot and their priority.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(10)]
fn outside_span_untouched() {
    let n: usize = kani::any();
    kani::assume(n >= 1 && n <= MAX_N);
    let old: i32 = kani::any();
    kani::assume(old >= 1 && old <= n as i32);
    let new: i32 = kani::any();
    kani::assume(new >= 1 && new <= n as i32);

    let (mut tags, mut priorities) = dense(n);
    let (lo, hi) = model_reorganize(n, &mut tags, &mut priorities, old, new);

    let mut i: usize = 0;
    while i < n {
        if i < lo || i > hi {
            kani::assert(tags[i] == i as u8, "item outside span moved");
            kani::assert(priorities[i] == (i + 1) as i32, "priority outside span changed");
        }
        i += 1;
    }
}

// ---------------------------------------------------------------------------
// Proof 4: Delete
//
// Packing after removing slot `victim` changes exactly the items after it
// and leaves the scope dense.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(10)]
fn pack_closes_the_gap() {
    let n: usize = kani::any();
    kani::assume(n >= 1 && n <= MAX_N);
    let victim: usize = kani::any();
    kani::assume(victim < n);

    let (mut tags, mut priorities) = dense(n);
    let changed = model_pack(n, &mut tags, &mut priorities, victim);

    kani::assert(changed == n - 1 - victim, "unexpected number of changed items");
    let mut i: usize = 0;
    while i + 1 < n {
        kani::assert(priorities[i] == (i + 1) as i32, "scope is not dense");
        kani::assert(tags[i] as usize != victim, "deleted item still present");
        i += 1;
    }
}
