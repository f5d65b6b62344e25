mod scheduler;

pub use scheduler::{daily_cron, DailyScheduler};
