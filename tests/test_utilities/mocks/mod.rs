mod mock_feed_fetcher;
mod mock_notification_channel;

pub use mock_feed_fetcher::MockFeedFetcher;
pub use mock_notification_channel::MockNotificationChannel;
