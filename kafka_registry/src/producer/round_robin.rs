use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Same as librdkafka's default `topic.metadata.refresh.interval.ms`.
pub const PARTITIONS_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Per-topic cursor cycling through partitions for keyless messages.
///
/// A recorded partition count goes stale after the refresh interval, so
/// partitions added to a topic start receiving messages once the caller
/// records a fresh count.
#[derive(Debug)]
pub struct RoundRobinCursor {
    topics: Mutex<HashMap<String, TopicCursor>>,
    refresh_interval: Duration,
}

#[derive(Debug)]
struct TopicCursor {
    partitions_count: i32,
    refreshed_at: Instant,
    next: i32,
}

impl Default for RoundRobinCursor {
    fn default() -> Self {
        Self::with_refresh_interval(PARTITIONS_REFRESH_INTERVAL)
    }
}

impl RoundRobinCursor {
    pub fn with_refresh_interval(refresh_interval: Duration) -> Self {
        Self {
            topics: Mutex::default(),
            refresh_interval,
        }
    }

    /// Recorded partition count of `topic`, `None` when unknown or stale.
    pub fn partitions_count(&self, topic: &str) -> Option<i32> {
        let topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);

        topics
            .get(topic)
            .filter(|x| x.refreshed_at.elapsed() < self.refresh_interval)
            .map(|x| x.partitions_count)
    }

    /// Records the current partition count of `topic`. The cursor position is
    /// kept and wrapped into the new range.
    pub fn set_partitions_count(&self, topic: &str, partitions_count: i32) {
        let partitions_count = partitions_count.max(1);
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);

        let cursor = topics.entry(topic.to_owned()).or_insert(TopicCursor {
            partitions_count,
            refreshed_at: Instant::now(),
            next: 0,
        });
        cursor.partitions_count = partitions_count;
        cursor.refreshed_at = Instant::now();
        cursor.next %= partitions_count;
    }

    /// Returns the partition for the next message. A topic without a recorded
    /// count always gets partition 0.
    pub fn next_partition(&self, topic: &str) -> i32 {
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(cursor) = topics.get_mut(topic) else {
            return 0;
        };

        let partition = cursor.next;
        cursor.next = (cursor.next + 1) % cursor.partitions_count;

        partition
    }
}
