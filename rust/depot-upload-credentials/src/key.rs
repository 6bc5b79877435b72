//! Object key generation.
//!
//! Keys are `prefix / generated-name [.extension]` paths. The generated name
//! is a ULID assembled from the injected clock's millisecond timestamp and
//! the injected entropy's random bits, which makes collisions across
//! concurrent issuers practically impossible without any coordination, and
//! makes keys fully deterministic under a pinned clock and entropy source.
//!
//! The separator is always `/` regardless of host OS, and caller-supplied
//! prefixes pass through verbatim — a prefix like `2024/01/07` is a
//! partitioning choice the caller already made.

use ulid::Ulid;

use crate::clock::Clock;
use crate::entropy::Entropy;

/// A key under which an object is stored in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// The key as a string path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized file extension.
///
/// Stored without the dot; displays with exactly one leading dot. Parsing
/// is idempotent: `"jpg"`, `".jpg"`, and `" .jpg "` all normalize to `.jpg`,
/// and blank or dot-only input normalizes to nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension(String);

impl Extension {
    /// Normalize caller-supplied extension input.
    ///
    /// Returns `None` for empty, whitespace-only, or dot-only input.
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.trim().trim_start_matches('.').trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    /// The extension without its leading dot.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.0)
    }
}

/// Generates unique object keys from a clock and an entropy source.
///
/// Pure: no I/O, no shared mutable state, safe for unlimited concurrent use.
#[derive(Debug, Clone)]
pub struct KeyGenerator<C, E> {
    clock: C,
    entropy: E,
}

impl<C: Clock, E: Entropy> KeyGenerator<C, E> {
    /// Create a generator over the given clock and entropy source.
    pub fn new(clock: C, entropy: E) -> Self {
        Self { clock, entropy }
    }

    /// The clock this generator stamps keys with.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Generate a key with a fresh name, optionally suffixed.
    pub fn generate(&self, prefix: &str, extension: Option<&Extension>) -> ObjectKey {
        let millis = self.clock.now().timestamp_millis() as u64;
        let name = Ulid::from_parts(millis, self.entropy.random_bits()).to_string();
        let name = match extension {
            Some(ext) => format!("{}{}", name, ext),
            None => name,
        };
        join(prefix, &name)
    }

    /// Build a key from an explicit file name instead of a generated one.
    pub fn generate_named(&self, prefix: &str, file_name: &str) -> ObjectKey {
        join(prefix, file_name)
    }
}

/// Carry the *source* file's extension onto a key.
///
/// Server-mediated uploads store under a generated key but keep the uploaded
/// file's suffix so the stored object's name still supports content-type
/// inference. A source name without an extension leaves the key untouched.
pub fn append_extension_of(source_name: &str, key: ObjectKey) -> ObjectKey {
    match source_extension(source_name) {
        Some(ext) => ObjectKey(format!("{}.{}", key.0, ext)),
        None => key,
    }
}

/// The extension of a file name, if it has a meaningful one.
fn source_extension(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

fn join(prefix: &str, name: &str) -> ObjectKey {
    if prefix.is_empty() {
        ObjectKey(name.to_string())
    } else {
        ObjectKey(format!("{}/{}", prefix, name))
    }
}
