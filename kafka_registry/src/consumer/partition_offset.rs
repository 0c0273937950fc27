use getset::Getters;

#[derive(Debug, Getters, Copy, Clone, PartialEq, Eq, Hash)]
#[getset(get = "pub")]
pub struct PartitionOffset {
    partition: i32,
    offset: i64,
}

impl PartitionOffset {
    pub fn new(partition: i32, offset: i64) -> PartitionOffset {
        Self { partition, offset }
    }
}
