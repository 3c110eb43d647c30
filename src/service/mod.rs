mod report;
mod subscription;

pub use report::{render, Outcome, Report};
pub use subscription::{Subscription, Subscriptions};
