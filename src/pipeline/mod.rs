// The topic engine and the cache that wraps it.

pub mod cache;
pub mod hottest;

pub use cache::ReportCache;
pub use hottest::{find_hottest_topic, EngineParams, HottestTopic, NoTrendReason, TopicReport};
