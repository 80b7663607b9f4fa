//! Tweet storage backends implementing [`tweetapp_core::TweetService`].

pub mod memory;

pub use memory::InMemoryTweetService;
