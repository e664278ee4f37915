//! Change feed adapters.
//!
//! - `ChangeFeedSender` - Bounded, backpressured [`ChangePublisher`](crate::ports::ChangePublisher)
//! - `ChangeFeedReceiver` - Single-consumer read side drained by the dispatcher

mod change_feed;

pub use change_feed::{channel, ChangeFeedReceiver, ChangeFeedSender, DEFAULT_FEED_CAPACITY};
