//! Stream ingestion
//!
//! Socket bytes become lines (`framer`), lines become records (`parser`), and
//! the receiver applies them to the hand store from a background thread.

pub mod framer;
pub mod parser;
pub mod receiver;
pub mod stats;

pub use framer::{split_datagram, Framed, LineFramer};
pub use parser::{parse_line, RawRecord, RecordKind};
pub use receiver::{Ingestor, StopToken, StreamReceiver};
pub use stats::{RateMeter, ReceiverStats, StatsSnapshot};
