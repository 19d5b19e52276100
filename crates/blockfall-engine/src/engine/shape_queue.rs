use std::{collections::VecDeque, fmt};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Shape;

/// How a [`ShapeQueue`] refills its lookahead buffer.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum QueuePolicy {
    /// Shuffled bags holding each of the 7 shapes once.
    #[default]
    #[display("seven-bag")]
    SevenBag,
    /// Every draw is independent and uniform over the 7 shapes.
    #[display("uniform")]
    Uniform,
}

/// Seed for deterministic shape generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator of a [`ShapeQueue`]. The same seed and policy always produce the
/// same sequence of shapes, which is what replays rely on.
///
/// Serializes as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{QueuePolicy, ShapeQueue, ShapeSeed};
/// use rand::Rng as _;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let mut a = ShapeQueue::with_seed(QueuePolicy::SevenBag, seed);
/// let mut b = ShapeQueue::with_seed(QueuePolicy::SevenBag, seed);
/// assert_eq!(a.poll(), b.poll());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Parses a seed from up to 32 hex digits.
    #[must_use]
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.is_empty() || hex_str.len() > 32 {
            return None;
        }
        let num = u128::from_str_radix(hex_str, 16).ok()?;
        Some(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        Self::from_hex(&hex_str)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex: {hex_str}")))
    }
}

/// Allows generating random `ShapeSeed` values with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

/// An endless, peekable sequence of upcoming shapes.
///
/// The queue keeps a lookahead buffer that is refilled according to its
/// [`QueuePolicy`]. The buffer always holds more than [`Shape::LEN`] shapes, so
/// [`peek`](Self::peek) never has to generate anything.
///
/// Cloning a queue clones its buffer and generator state: the clone yields the
/// same future shapes as the original, and polling one never affects the other.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeQueue;
///
/// let mut queue = ShapeQueue::new();
/// let next = queue.peek();
/// let preview = queue.peek_next(5);
/// assert_eq!(preview[0], next);
/// assert_eq!(queue.poll(), next);
/// ```
#[derive(Debug, Clone)]
pub struct ShapeQueue {
    rng: Pcg32,
    policy: QueuePolicy,
    buffer: VecDeque<Shape>,
}

impl Default for ShapeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeQueue {
    /// Creates a seven-bag queue with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(QueuePolicy::default())
    }

    /// Creates a queue with the given policy and a random seed.
    #[must_use]
    pub fn with_policy(policy: QueuePolicy) -> Self {
        Self::with_seed(policy, rand::rng().random())
    }

    /// Like [`Self::with_policy`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(policy: QueuePolicy, seed: ShapeSeed) -> Self {
        let rng = Pcg32::from_seed(seed.0);
        let buffer = VecDeque::with_capacity(Shape::LEN * 2);
        let mut this = Self {
            rng,
            policy,
            buffer,
        };
        this.fill(Shape::LEN + 1);
        this
    }

    #[must_use]
    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Extends the buffer until it holds at least `len` shapes.
    fn fill(&mut self, len: usize) {
        while self.buffer.len() < len {
            match self.policy {
                QueuePolicy::SevenBag => {
                    let mut bag = Shape::ALL;
                    bag.shuffle(&mut self.rng);
                    self.buffer.extend(bag);
                }
                QueuePolicy::Uniform => {
                    let shape = self.rng.random();
                    self.buffer.push_back(shape);
                }
            }
        }
    }

    /// Returns the next shape without consuming it.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty (should never happen with proper refill logic).
    #[must_use]
    pub fn peek(&self) -> Shape {
        *self
            .buffer
            .front()
            .expect("shape buffer should never be empty")
    }

    /// Returns the next `n` shapes, in order, without consuming them.
    ///
    /// When `n` exceeds the buffered lookahead, the missing shapes are generated
    /// from a copy of the generator, so they are exactly the shapes later
    /// [`poll`](Self::poll) calls will return.
    #[must_use]
    pub fn peek_next(&self, n: usize) -> Vec<Shape> {
        if n <= self.buffer.len() {
            return self.buffer.iter().take(n).copied().collect();
        }
        let mut extended = self.clone();
        extended.fill(n);
        extended.buffer.into_iter().take(n).collect()
    }

    /// Consumes and returns the next shape.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty (should never happen with proper refill logic).
    pub fn poll(&mut self) -> Shape {
        let shape = self
            .buffer
            .pop_front()
            .expect("shape buffer should never be empty");
        self.fill(Shape::LEN + 1);
        shape
    }

    /// Returns an iterator over the buffered lookahead.
    pub fn buffered(&self) -> impl Iterator<Item = Shape> + '_ {
        self.buffer.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> ShapeSeed {
        ShapeSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ])
    }

    #[test]
    fn test_deterministic_shape_generation() {
        for policy in [QueuePolicy::SevenBag, QueuePolicy::Uniform] {
            let mut queue1 = ShapeQueue::with_seed(policy, seed());
            let mut queue2 = ShapeQueue::with_seed(policy, seed());
            for _ in 0..50 {
                assert_eq!(queue1.poll(), queue2.poll());
            }
        }
    }

    #[test]
    fn test_seven_bag_deals_every_shape_once_per_bag() {
        let mut queue = ShapeQueue::with_seed(QueuePolicy::SevenBag, seed());
        for _ in 0..10 {
            let mut bag: Vec<_> = (0..Shape::LEN).map(|_| queue.poll()).collect();
            bag.sort_by_key(|s| s.index());
            assert_eq!(bag, Shape::ALL);
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut queue = ShapeQueue::with_seed(QueuePolicy::Uniform, seed());
        let next = queue.peek();
        assert_eq!(queue.peek(), next);
        assert_eq!(queue.poll(), next);
    }

    #[test]
    fn test_peek_next_beyond_buffer_matches_polls() {
        for policy in [QueuePolicy::SevenBag, QueuePolicy::Uniform] {
            let mut queue = ShapeQueue::with_seed(policy, seed());
            let preview = queue.peek_next(40);
            assert_eq!(preview.len(), 40);
            assert_eq!(queue.peek(), preview[0]);

            let polled: Vec<_> = (0..40).map(|_| queue.poll()).collect();
            assert_eq!(polled, preview);
        }
    }

    #[test]
    fn test_peek_next_zero() {
        let queue = ShapeQueue::new();
        assert!(queue.peek_next(0).is_empty());
    }

    #[test]
    fn test_buffer_never_runs_low() {
        let mut queue = ShapeQueue::with_seed(QueuePolicy::SevenBag, seed());
        for _ in 0..100 {
            queue.poll();
            assert!(queue.buffered().count() > Shape::LEN);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = ShapeQueue::with_seed(QueuePolicy::SevenBag, seed());
        let before = original.peek_next(20);
        let mut copy = original.clone();

        for _ in 0..15 {
            copy.poll();
        }
        assert_eq!(original.peek_next(20), before);

        let from_original: Vec<_> = (0..20).map(|_| original.poll()).collect();
        assert_eq!(from_original, before);
        assert_eq!(copy.peek(), before[15]);
    }

    mod shape_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: ShapeSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: ShapeSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = ShapeSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();

            // Big-endian: bytes appear in order as hex pairs
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = ShapeSeed::from_bytes([0; 16]);
            assert_eq!(seed.to_string(), "00000000000000000000000000000000");
            assert_eq!(ShapeSeed::from_hex("0"), Some(seed));
        }

        #[test]
        fn test_error_invalid_hex_characters() {
            let json = "\"ghijklmnopqrstuvwxyzghijklmnopqr\"";
            let err = serde_json::from_str::<ShapeSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
        }

        #[test]
        fn test_error_wrong_length() {
            for json in ["\"\"", "\"0123456789abcdef0123456789abcde\""] {
                let err = serde_json::from_str::<ShapeSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"));
            }
        }

        #[test]
        fn test_from_hex_rejects_garbage() {
            assert_eq!(ShapeSeed::from_hex(""), None);
            assert_eq!(ShapeSeed::from_hex("xyz"), None);
            assert_eq!(ShapeSeed::from_hex(&"f".repeat(33)), None);
        }
    }
}
