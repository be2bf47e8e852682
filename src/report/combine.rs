use std::collections::HashMap;

use crate::report::row::{Row, Value};

/// Derived columns appended to every combined row.
pub const OPENING: &str = "valor_inicial";
pub const DEBITS: &str = "debitos";
pub const CREDITS: &str = "creditos";
pub const BALANCE: &str = "saldo";

/// Column layout for the detailed balance report.
pub const DETAIL_COLUMNS: [&str; 10] = [
    "ter_nit", "ter_raz", "clc_cod", "doc_num", "doc_fec", "mov_det", OPENING, DEBITS, CREDITS,
    BALANCE,
];

/// Column layout for the condensed balance report.
pub const SUMMARY_COLUMNS: [&str; 4] = ["ter_nit", "ter_raz", BALANCE, "mov_det"];

/// How to join movement history against balance rows.
#[derive(Debug, Clone)]
pub struct CombineSpec {
    /// Fields concatenated into the composite join key.
    pub key_fields: Vec<String>,
    pub opening_field: String,
    pub debit_field: String,
    pub credit_field: String,
    /// Label used for the optional alphabetic sort.
    pub label_field: String,
    pub alphabetic: bool,
}

impl Default for CombineSpec {
    fn default() -> Self {
        Self {
            key_fields: ["suc_cod", "anx_cod", "ter_nit", "clc_cod", "doc_num", "doc_fec"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            opening_field: "sal_ini".to_string(),
            debit_field: "sal_deb".to_string(),
            credit_field: "sal_crd".to_string(),
            label_field: "ter_raz".to_string(),
            alphabetic: false,
        }
    }
}

struct BalanceTotals {
    opening: f64,
    debits: f64,
    credits: f64,
    balance: f64,
}

fn composite_key(row: &Row, fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| row.raw(f))
        .collect::<Vec<_>>()
        .join("_")
}

/// Merge movement history with balance rows. Each history row gains the four
/// derived balance columns, zeroed when no balance row shares its composite
/// key. Rows with no financial movement at all are dropped.
pub fn combine(history: &[Row], balances: &[Row], spec: &CombineSpec) -> Vec<Row> {
    let mut by_key: HashMap<String, BalanceTotals> = HashMap::new();
    for bal in balances {
        let opening = bal.number(&spec.opening_field);
        let debits = bal.number(&spec.debit_field);
        let credits = bal.number(&spec.credit_field);
        by_key.insert(
            composite_key(bal, &spec.key_fields),
            BalanceTotals {
                opening,
                debits,
                credits,
                balance: opening + debits + credits,
            },
        );
    }

    let zero = BalanceTotals {
        opening: 0.0,
        debits: 0.0,
        credits: 0.0,
        balance: 0.0,
    };

    let mut merged: Vec<Row> = history
        .iter()
        .filter_map(|his| {
            let totals = by_key
                .get(&composite_key(his, &spec.key_fields))
                .unwrap_or(&zero);

            // A row with no movement on any derived field is not reportable
            if totals.opening == 0.0
                && totals.debits == 0.0
                && totals.credits == 0.0
                && totals.balance == 0.0
            {
                return None;
            }

            let mut row = his.clone();
            row.set(OPENING, Value::Number(totals.opening));
            row.set(DEBITS, Value::Number(totals.debits));
            row.set(CREDITS, Value::Number(totals.credits));
            row.set(BALANCE, Value::Number(totals.balance));
            Some(row)
        })
        .collect();

    if spec.alphabetic {
        merged.sort_by(|a, b| a.text(&spec.label_field).cmp(b.text(&spec.label_field)));
    }

    merged
}
