//! `tweetapp` Server: HTTP tweet API, request orchestration, and AMQP notifications.

pub mod network;
pub mod notify;
pub mod service;
pub mod storage;

pub use network::NetworkModule;
pub use notify::{NotificationPublisher, NotifyConfig};
pub use service::{ServerConfig, TweetOrchestrator};
