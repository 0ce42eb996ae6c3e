// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use rand::RngCore;

/// Minimum nonce length in bytes for a freshly generated DIGEST challenge.
pub const MIN_NONCE_LEN: usize = 8;

/// Draws `len` bytes from the operating system's CSPRNG. Unlike a
/// time-seeded PRNG, this is not predictable from the wall clock.
pub fn fresh_nonce(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}
