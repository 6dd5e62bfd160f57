//! The explicit mutation -> cache-key contract. Every mutation the console
//! can issue names exactly the keys it invalidates: the affected entity key
//! plus any list key that could contain it. Nothing is inferred.

/// Cache resource names, shared between use cases and the invalidation table.
pub mod resources {
    pub const USERS: &str = "users";
    pub const USER: &str = "user";
    pub const PAYMENTS: &str = "payments";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const SPREADS: &str = "tarot-spreads";
    pub const SPREAD: &str = "tarot-spread";
    pub const MESSAGES: &str = "messages";
    pub const HOROSCOPES: &str = "horoscopes";
    pub const HOROSCOPE: &str = "horoscope";
    pub const PROMO_CODES: &str = "promo-codes";
    pub const EXPERIMENTS: &str = "experiments";
    pub const EXPERIMENT_RESULTS: &str = "experiment-results";
    pub const UTM_ANALYTICS: &str = "utm-analytics";
    pub const DASHBOARD: &str = "dashboard";
    pub const FUNNEL: &str = "funnel";
    pub const MONITORING: &str = "monitoring";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySelector {
    /// Every key under the resource, regardless of parameters.
    Resource(&'static str),
    /// One entity key.
    Entity(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminMutation {
    UpdateUserSubscription { user_id: i64 },
    GiftUser { user_id: i64 },
    BulkUserAction,
    UpdateSubscriptionStatus { subscription_id: i64 },
    SendMessage,
    CancelMessage { message_id: i64 },
    UpdateHoroscopeContent { zodiac_sign: String },
    CreatePromoCode,
    UpdatePromoCode { promo_id: i64 },
    DeletePromoCode { promo_id: i64 },
    CreateExperiment,
    StartExperiment { experiment_id: i64 },
    StopExperiment { experiment_id: i64 },
}

impl AdminMutation {
    pub fn invalidated_keys(&self) -> Vec<KeySelector> {
        use KeySelector::{Entity, Resource};
        use resources::*;

        match self {
            AdminMutation::UpdateUserSubscription { user_id }
            | AdminMutation::GiftUser { user_id } => vec![
                Entity(USER, user_id.to_string()),
                Resource(USERS),
            ],
            // The backend applies a bulk action to an arbitrary subset, so
            // every user detail key could be affected.
            AdminMutation::BulkUserAction => vec![Resource(USER), Resource(USERS)],
            AdminMutation::UpdateSubscriptionStatus { subscription_id: _ } => {
                vec![Resource(SUBSCRIPTIONS)]
            }
            AdminMutation::SendMessage => vec![Resource(MESSAGES)],
            AdminMutation::CancelMessage { message_id: _ } => vec![Resource(MESSAGES)],
            AdminMutation::UpdateHoroscopeContent { zodiac_sign } => vec![
                Entity(HOROSCOPE, zodiac_sign.clone()),
                Resource(HOROSCOPES),
            ],
            AdminMutation::CreatePromoCode
            | AdminMutation::UpdatePromoCode { .. }
            | AdminMutation::DeletePromoCode { .. } => vec![Resource(PROMO_CODES)],
            AdminMutation::CreateExperiment => vec![Resource(EXPERIMENTS)],
            AdminMutation::StartExperiment { experiment_id }
            | AdminMutation::StopExperiment { experiment_id } => vec![
                Entity(EXPERIMENT_RESULTS, experiment_id.to_string()),
                Resource(EXPERIMENTS),
            ],
        }
    }
}
