// NewsBuzz: find the hottest news topic of the day
//
// This is the library root. The engine (topics, sentiment, pipeline) is
// synchronous and free of I/O; collection, configuration and output sit
// around it.

pub mod articles;
pub mod collector;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod sentiment;
pub mod topics;
