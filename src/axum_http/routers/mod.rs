pub mod analytics;
pub mod billing;
pub mod content;
pub mod experiments;
pub mod export;
pub mod messages;
pub mod promo_codes;
pub mod session;
pub mod spreads;
pub mod users;
