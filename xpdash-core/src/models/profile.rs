use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub login: String,
    /// Review effort given vs. received. Null for users with no audits.
    #[serde(default)]
    pub audit_ratio: Option<f64>,
}

/// `transaction_aggregate { aggregate { sum { amount } count } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAggregate {
    pub aggregate: XpAggregateFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAggregateFields {
    pub sum: SumAggregate,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumAggregate {
    /// Null when there is nothing to sum.
    pub amount: Option<i64>,
}

/// `result_aggregate { aggregate { count } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountAggregate {
    pub aggregate: CountFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountFields {
    pub count: i64,
}
