pub mod payment_plan;
pub mod recommend;
pub mod timeline;
pub mod tradeoff;
