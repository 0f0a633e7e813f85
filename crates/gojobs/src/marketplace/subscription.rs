use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{SubscriptionId, UserId};
use super::matching::scoring::days_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    BasicPro,
    StandardPro,
    PremiumPro,
    ApplyAi,
    ApplyAiPro,
}

impl PlanType {
    pub const fn label(self) -> &'static str {
        match self {
            PlanType::BasicPro => "Basic Pro",
            PlanType::StandardPro => "Standard Pro",
            PlanType::PremiumPro => "Premium Pro",
            PlanType::ApplyAi => "ApplyAI",
            PlanType::ApplyAiPro => "ApplyAI Pro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub const fn period_days(self) -> i64 {
        match self {
            BillingCycle::Weekly => 7,
            BillingCycle::Monthly => 30,
            BillingCycle::Yearly => 365,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        }
    }
}

/// Paid plan gating premium features for a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_type: PlanType,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SubscriptionStatus,
    #[serde(default = "default_auto_renew")]
    pub auto_renew: bool,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

fn default_auto_renew() -> bool {
    true
}

impl Subscription {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_between(now, self.expires_at)
    }

    /// Start a fresh billing period at `now`. Cancelled plans must be re-purchased instead.
    pub fn renew(&mut self, now: DateTime<Utc>) -> Result<(), SubscriptionError> {
        if !matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Expired
        ) {
            return Err(SubscriptionError::NotRenewable(self.status));
        }

        self.status = SubscriptionStatus::Active;
        self.starts_at = now;
        self.expires_at = now + Duration::days(self.billing_cycle.period_days());
        self.auto_renew = true;
        self.cancelled_at = None;
        Ok(())
    }

    /// Stop auto-renewal. Access continues until the current `expires_at`.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), SubscriptionError> {
        if self.status == SubscriptionStatus::Cancelled {
            return Err(SubscriptionError::AlreadyCancelled);
        }

        self.status = SubscriptionStatus::Cancelled;
        self.auto_renew = false;
        self.cancelled_at = Some(now);
        Ok(())
    }

    pub fn status_view(&self, now: DateTime<Utc>) -> SubscriptionStatusView {
        SubscriptionStatusView {
            subscription_id: self.id,
            plan: self.plan_type.label(),
            status: self.status.label(),
            active: self.is_active_at(now),
            days_remaining: self.days_remaining(now),
            auto_renew: self.auto_renew,
            expires_at: self.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("subscription is already cancelled")]
    AlreadyCancelled,
    #[error("a {} subscription cannot be renewed", .0.label())]
    NotRenewable(SubscriptionStatus),
}

/// Sanitized representation of a subscription for callers.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusView {
    pub subscription_id: SubscriptionId,
    pub plan: &'static str,
    pub status: &'static str,
    pub active: bool,
    pub days_remaining: i64,
    pub auto_renew: bool,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monthly(now: DateTime<Utc>) -> Subscription {
        Subscription {
            id: SubscriptionId(1),
            user_id: UserId(10),
            plan_type: PlanType::StandardPro,
            amount: 29.0,
            billing_cycle: BillingCycle::Monthly,
            starts_at: now - Duration::days(20),
            expires_at: now + Duration::days(10),
            status: SubscriptionStatus::Active,
            auto_renew: true,
            cancelled_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn renew_starts_a_new_period_from_now() {
        let now = now();
        let mut subscription = monthly(now);
        subscription.status = SubscriptionStatus::Expired;
        subscription.auto_renew = false;

        subscription.renew(now).expect("expired plans renew");

        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(subscription.starts_at, now);
        assert_eq!(subscription.expires_at, now + Duration::days(30));
        assert!(subscription.auto_renew);
        assert_eq!(subscription.days_remaining(now), 30);
    }

    #[test]
    fn weekly_and_yearly_cycles_use_their_period() {
        let now = now();
        let mut subscription = monthly(now);
        subscription.billing_cycle = BillingCycle::Weekly;
        subscription.renew(now).expect("renews");
        assert_eq!(subscription.expires_at, now + Duration::days(7));

        subscription.billing_cycle = BillingCycle::Yearly;
        subscription.renew(now).expect("renews");
        assert_eq!(subscription.expires_at, now + Duration::days(365));
    }

    #[test]
    fn cancelled_plans_cannot_renew_or_cancel_again() {
        let now = now();
        let mut subscription = monthly(now);
        subscription.cancel(now).expect("first cancel succeeds");

        assert!(!subscription.auto_renew);
        assert_eq!(subscription.cancelled_at, Some(now));
        assert_eq!(subscription.expires_at, now + Duration::days(10));
        assert_eq!(
            subscription.cancel(now),
            Err(SubscriptionError::AlreadyCancelled)
        );
        assert_eq!(
            subscription.renew(now),
            Err(SubscriptionError::NotRenewable(
                SubscriptionStatus::Cancelled
            ))
        );
    }

    #[test]
    fn lapsed_plans_report_zero_days_and_inactive() {
        let now = now();
        let subscription = monthly(now - Duration::days(40));

        assert!(!subscription.is_active_at(now));
        assert_eq!(subscription.days_remaining(now), 0);
        let view = subscription.status_view(now);
        assert!(!view.active);
        assert_eq!(view.status, "active");
    }
}
