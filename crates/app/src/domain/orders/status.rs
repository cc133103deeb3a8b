//! Order lifecycle.
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered -> returned
//!    |           |
//!    +-----------+-> cancelled
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::Delivered, Self::Returned)
        )
    }

    pub const fn is_cancellable(self) -> bool {
        self.can_transition_to(Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Gateway,
    Cod,
    Card,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Cod => "cod",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gateway" => Ok(Self::Gateway),
            "cod" => Ok(Self::Cod),
            "card" => Ok(Self::Card),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(String);

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownPaymentStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use OrderStatus::{Cancelled, Confirmed, Delivered, Pending, Processing, Returned, Shipped};

    #[test]
    fn forward_progression_is_allowed() {
        for (from, to) in [
            (Pending, Confirmed),
            (Confirmed, Processing),
            (Processing, Shipped),
            (Shipped, Delivered),
            (Delivered, Returned),
        ] {
            assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
        }
    }

    #[test]
    fn only_early_states_can_be_cancelled() {
        let cancellable: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|status| status.is_cancellable())
            .collect();

        assert_eq!(cancellable, [Pending, Confirmed]);
    }

    #[test]
    fn terminal_states_go_nowhere() {
        for from in [Cancelled, Returned] {
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} should be rejected");
            }
        }
    }

    #[test]
    fn skipping_steps_is_rejected() {
        assert!(!Pending.can_transition_to(Processing));
        assert!(!Confirmed.can_transition_to(Shipped));
        assert!(!Processing.can_transition_to(Delivered));
        assert!(!Shipped.can_transition_to(Returned));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn moving_backwards_is_rejected() {
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Shipped.can_transition_to(Processing));
    }

    #[test]
    fn statuses_parse_their_own_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
        }

        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn payment_enums_parse_their_own_names() {
        for method in [PaymentMethod::Gateway, PaymentMethod::Cod, PaymentMethod::Card] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().ok(), Some(method));
        }

        for status in [PaymentStatus::Pending, PaymentStatus::Paid, PaymentStatus::Failed] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().ok(), Some(status));
        }
    }
}
