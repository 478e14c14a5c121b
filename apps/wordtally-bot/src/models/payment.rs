use std::fmt;
use std::str::FromStr;

/// Invoice payload binding a subscription purchase to a chat and an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionPayload {
    pub chat_id: i64,
    pub amount: u32,
}

impl fmt::Display for SubscriptionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription:{}:{}", self.chat_id, self.amount)
    }
}

impl FromStr for SubscriptionPayload {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("subscription"), Some(chat), Some(amount), None) => Ok(Self {
                chat_id: chat.parse()?,
                amount: amount.parse()?,
            }),
            _ => anyhow::bail!("unrecognised invoice payload: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_format() {
        let p = SubscriptionPayload {
            chat_id: -100,
            amount: 19900,
        };
        assert_eq!(p.to_string(), "subscription:-100:19900");
        assert_eq!("subscription:-100:19900".parse::<SubscriptionPayload>().unwrap(), p);
    }

    #[test]
    fn rejects_foreign_payloads() {
        assert!("topup:1".parse::<SubscriptionPayload>().is_err());
        assert!("subscription:x:1".parse::<SubscriptionPayload>().is_err());
        assert!("subscription:1:2:3".parse::<SubscriptionPayload>().is_err());
    }
}
