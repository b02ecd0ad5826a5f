//! Records exchanged with the banking API
//!
//! Both records are read-only snapshots. Decoding is lenient: a missing or
//! malformed `amount`, `balance` or `createdAt` becomes `None` instead of
//! failing the whole list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format::format_date;
use crate::time::parse_timestamp;

/// Kind of balance movement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
    /// Anything the client does not recognise, kept verbatim
    Other(String),
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Other(String::new())
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "deposit" => TransactionType::Deposit,
            "withdraw" => TransactionType::Withdraw,
            "transfer" => TransactionType::Transfer,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        kind.to_string()
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    /// Strict parse used for user-selected filters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TransactionType::from(s.to_string()) {
            TransactionType::Other(_) => Err(format!("Invalid transaction type: {}", s)),
            kind => Ok(kind),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdraw => write!(f, "withdraw"),
            TransactionType::Transfer => write!(f, "transfer"),
            TransactionType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single ledger entry of the session user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(rename = "toUsername", default, skip_serializing_if = "Option::is_none")]
    pub to_username: Option<String>,
}

impl Transaction {
    pub fn new(kind: TransactionType, amount: f64, created_at: &str) -> Self {
        Self {
            kind,
            amount: Some(amount),
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    /// Identifier, whichever of `_id` / `id` the backend sent
    pub fn id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    /// Parsed `createdAt`; `None` when missing or unparseable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Absolute amount; a missing amount counts as zero
    pub fn magnitude(&self) -> f64 {
        self.amount.filter(|a| a.is_finite()).map(f64::abs).unwrap_or(0.0)
    }

    /// Money coming into the account
    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Deposit
    }

    /// Headline for list rows
    pub fn title(&self) -> String {
        match &self.kind {
            TransactionType::Deposit => "Deposit".to_string(),
            TransactionType::Withdraw => "Withdrawal".to_string(),
            TransactionType::Transfer => match self.counterparty() {
                Some(user) => format!("Sent to {}", user),
                None => "Transfer".to_string(),
            },
            TransactionType::Other(_) => "Transaction".to_string(),
        }
    }

    /// Secondary line: the counterparty for transfers, otherwise the date
    pub fn detail(&self) -> String {
        match (&self.kind, self.counterparty()) {
            (TransactionType::Transfer, Some(user)) => format!("to @{}", user),
            _ => format_date(self.created_at.as_deref().unwrap_or_default()),
        }
    }

    fn counterparty(&self) -> Option<&str> {
        self.to_username.as_deref().filter(|u| !u.is_empty())
    }
}

/// A user account as listed by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Account {
    /// Identifier, whichever of `_id` / `id` the backend sent
    pub fn id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    /// Handle shown in lists
    pub fn handle(&self) -> String {
        if self.username.is_empty() {
            "@unknown".to_string()
        } else {
            format!("@{}", self.username)
        }
    }
}

/// Login / registration form
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token issued by the backend on login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Body of every balance mutation
#[derive(Debug, Clone, Serialize)]
pub struct AmountRequest {
    pub amount: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<TransactionType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?
        .map(TransactionType::from)
        .unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("deposit".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!("Withdraw".parse::<TransactionType>().unwrap(), TransactionType::Withdraw);
        assert_eq!("transfer".parse::<TransactionType>().unwrap(), TransactionType::Transfer);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_decode_backend_transaction() {
        let json = r#"{
            "_id": "65a1",
            "type": "transfer",
            "amount": 25.5,
            "createdAt": "2024-01-05T10:00:00.000Z",
            "toUsername": "bob"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id(), Some("65a1"));
        assert_eq!(tx.kind, TransactionType::Transfer);
        assert_eq!(tx.amount, Some(25.5));
        assert!(tx.timestamp().is_some());
        assert_eq!(tx.title(), "Sent to bob");
        assert_eq!(tx.detail(), "to @bob");
    }

    #[test]
    fn test_decode_malformed_fields() {
        let json = r#"[
            {"id": 7, "type": "refund", "amount": "oops", "createdAt": 12},
            {"type": "deposit", "amount": "12.50"},
            {"type": null},
            {}
        ]"#;
        let txs: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txs.len(), 4);

        assert_eq!(txs[0].id(), Some("7"));
        assert_eq!(txs[0].kind, TransactionType::Other("refund".to_string()));
        assert_eq!(txs[0].amount, None);
        assert_eq!(txs[0].magnitude(), 0.0);
        assert_eq!(txs[0].title(), "Transaction");
        assert!(txs[0].timestamp().is_none());

        assert_eq!(txs[1].amount, Some(12.5));
        assert!(txs[1].is_credit());

        assert_eq!(txs[2].kind, TransactionType::default());
        assert_eq!(txs[3].kind, TransactionType::default());
        assert_eq!(txs[3].id(), None);
    }

    #[test]
    fn test_titles_and_details() {
        let deposit = Transaction::new(TransactionType::Deposit, 10.0, "2024-01-05T10:00:00Z");
        assert_eq!(deposit.title(), "Deposit");
        assert_eq!(deposit.detail(), "Jan 5, 2024");

        let withdraw = Transaction::new(TransactionType::Withdraw, -10.0, "2024-01-05T10:00:00Z");
        assert_eq!(withdraw.title(), "Withdrawal");
        assert_eq!(withdraw.magnitude(), 10.0);

        let transfer = Transaction::new(TransactionType::Transfer, 10.0, "2024-01-05T10:00:00Z");
        assert_eq!(transfer.title(), "Transfer");
        assert_eq!(transfer.detail(), "Jan 5, 2024");
    }

    #[test]
    fn test_account_accepts_either_id() {
        let a: Account = serde_json::from_str(r#"{"_id": "abc", "username": "alice", "balance": 10}"#).unwrap();
        let b: Account = serde_json::from_str(r#"{"id": "def", "username": "bob"}"#).unwrap();
        let both: Account = serde_json::from_str(r#"{"_id": "x", "id": "y", "username": "c"}"#).unwrap();

        assert_eq!(a.id(), Some("abc"));
        assert_eq!(a.balance, Some(10.0));
        assert_eq!(b.id(), Some("def"));
        assert_eq!(b.balance, None);
        assert_eq!(both.id(), Some("x"));
        assert_eq!(a.handle(), "@alice");
        assert_eq!(Account::default().handle(), "@unknown");
    }

    #[test]
    fn test_type_serializes_as_string() {
        let tx = Transaction::new(TransactionType::Withdraw, 5.0, "2024-01-05");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "withdraw");
        assert_eq!(json["createdAt"], "2024-01-05");
    }
}
