//! Randomness as an explicit input.
//!
//! Object keys need an opaque discriminator so that concurrent issuers never
//! collide without coordinating. The [`Entropy`] trait is the seam: the
//! production source draws from the thread-local OS-seeded generator, and
//! tests can substitute a fixed value to make keys fully deterministic.

/// Supplies random bits for object-key discriminators.
pub trait Entropy: Send + Sync {
    /// Fresh random bits. Each call may return a different value.
    fn random_bits(&self) -> u128;
}

/// OS-seeded randomness via the thread-local generator.
///
/// Holds no state of its own, so any number of threads can share one value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn random_bits(&self) -> u128 {
        rand::random()
    }
}

/// A source that always returns the same bits.
///
/// For tests and golden fixtures. Keys generated with a [`FixedClock`]
/// (see [`crate::clock`]) and fixed entropy are identical on every call —
/// which is exactly what a golden fixture wants and exactly what production
/// must never do.
///
/// [`FixedClock`]: crate::clock::FixedClock
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u128);

impl Entropy for FixedEntropy {
    fn random_bits(&self) -> u128 {
        self.0
    }
}
