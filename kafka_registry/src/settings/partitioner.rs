use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Strategy for messages sent without an explicit partition.
///
/// Configured as an integer: `1` is random, `2` is round-robin and anything
/// else falls back to hashing the key.
#[derive(Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(from = "i64")]
pub enum Partitioner {
    #[default]
    Hash,
    Random,
    RoundRobin,
}

impl From<i64> for Partitioner {
    fn from(value: i64) -> Self {
        match value {
            1 => Partitioner::Random,
            2 => Partitioner::RoundRobin,
            _ => Partitioner::Hash,
        }
    }
}

// librdkafka has no round-robin partitioner, keyless messages get an explicit
// partition from the producer instead.
impl Display for Partitioner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Partitioner::Hash | Partitioner::RoundRobin => write!(f, "fnv1a_random"),
            Partitioner::Random => write!(f, "random"),
        }
    }
}
