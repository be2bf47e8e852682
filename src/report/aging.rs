use chrono::NaiveDate;
use std::collections::HashMap;

use crate::report::row::{Row, Value};

/// Column layout for the aging report.
pub const AGING_COLUMNS: [&str; 9] = [
    "ter_nit",
    "ter_raz",
    "sin_vencer",
    "dias_1_30",
    "dias_31_90",
    "dias_91_180",
    "dias_181_360",
    "mas_360",
    "total",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgingOrder {
    /// Alphabetic by razon social
    #[default]
    Name,
    /// Lexicographic by NIT
    Nit,
}

/// Field bindings for the aging fold.
#[derive(Debug, Clone)]
pub struct AgingSpec {
    pub id_field: String,
    pub label_field: String,
    pub due_field: String,
    pub amount_field: String,
    pub order: AgingOrder,
}

impl Default for AgingSpec {
    fn default() -> Self {
        Self {
            id_field: "ter_nit".to_string(),
            label_field: "ter_raz".to_string(),
            due_field: "anf_vcto".to_string(),
            amount_field: "sal_can".to_string(),
            order: AgingOrder::Name,
        }
    }
}

/// Accumulated totals for one identifier. The bucket fields sum to `total`
/// minus whatever came from rows without a due date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgingRecord {
    pub nit: String,
    pub name: String,
    pub sin_vencer: f64,
    pub dias_1_30: f64,
    pub dias_31_90: f64,
    pub dias_91_180: f64,
    pub dias_181_360: f64,
    pub mas_360: f64,
    pub total: f64,
}

impl AgingRecord {
    fn add(&mut self, amount: f64, days_overdue: Option<i64>) {
        if let Some(days) = days_overdue {
            if days < 0 {
                self.sin_vencer += amount;
            } else if days <= 30 {
                self.dias_1_30 += amount;
            } else if days <= 90 {
                self.dias_31_90 += amount;
            } else if days <= 180 {
                self.dias_91_180 += amount;
            } else if days <= 360 {
                self.dias_181_360 += amount;
            } else {
                self.mas_360 += amount;
            }
        }
        // undated amounts still count toward the total
        self.total += amount;
    }

    pub fn to_row(&self) -> Row {
        Row::from_pairs(vec![
            ("ter_nit".to_string(), Value::Text(self.nit.clone())),
            ("ter_raz".to_string(), Value::Text(self.name.clone())),
            ("sin_vencer".to_string(), Value::Number(self.sin_vencer)),
            ("dias_1_30".to_string(), Value::Number(self.dias_1_30)),
            ("dias_31_90".to_string(), Value::Number(self.dias_31_90)),
            ("dias_91_180".to_string(), Value::Number(self.dias_91_180)),
            (
                "dias_181_360".to_string(),
                Value::Number(self.dias_181_360),
            ),
            ("mas_360".to_string(), Value::Number(self.mas_360)),
            ("total".to_string(), Value::Number(self.total)),
        ])
    }
}

/// Fold rows into per-identifier aging buckets relative to the cutoff date.
/// The first row seen for an identifier seeds the label fields. Row order
/// does not affect the resulting sums.
pub fn bucketize(rows: &[Row], cutoff: NaiveDate, spec: &AgingSpec) -> Vec<AgingRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<AgingRecord> = Vec::new();

    for row in rows {
        let nit = row.raw(&spec.id_field);
        let slot = *index.entry(nit.clone()).or_insert_with(|| {
            records.push(AgingRecord {
                nit,
                name: row.text(&spec.label_field).to_string(),
                ..AgingRecord::default()
            });
            records.len() - 1
        });

        let amount = row.number(&spec.amount_field);
        let days_overdue = row
            .date(&spec.due_field)
            .map(|due| (cutoff - due).num_days());
        records[slot].add(amount, days_overdue);
    }

    match spec.order {
        AgingOrder::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
        AgingOrder::Nit => records.sort_by(|a, b| a.nit.cmp(&b.nit)),
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    fn aging_row(nit: &str, name: &str, due: Option<&str>, amount: &str) -> Row {
        let mut row = Row::new();
        row.set("ter_nit", Value::Text(nit.to_string()));
        row.set("ter_raz", Value::Text(name.to_string()));
        match due {
            Some(d) => row.set("anf_vcto", Value::Text(d.to_string())),
            None => row.set("anf_vcto", Value::Null),
        }
        row.set("sal_can", Value::Text(amount.to_string()));
        row
    }

    #[test]
    fn hundred_and_five_days_overdue_lands_in_91_180() {
        let rows = vec![aging_row("900", "Acme", Some("2024-01-01"), "100")];
        let records = bucketize(&rows, cutoff(), &AgingSpec::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dias_31_90, 0.0);
        assert_eq!(records[0].dias_91_180, 100.0);
        assert_eq!(records[0].total, 100.0);
    }

    #[test]
    fn boundary_days_pick_the_lower_bucket() {
        let cases = [
            ("2024-04-16", "sin_vencer"),  // -1 day
            ("2024-04-15", "dias_1_30"),   // 0 days
            ("2024-03-16", "dias_1_30"),   // 30 days
            ("2024-03-15", "dias_31_90"),  // 31 days
            ("2024-01-16", "dias_31_90"),  // 90 days
            ("2024-01-15", "dias_91_180"), // 91 days
            ("2023-10-18", "dias_91_180"), // 180 days
            ("2023-10-17", "dias_181_360"), // 181 days
            ("2023-04-21", "dias_181_360"), // 360 days
            ("2023-04-20", "mas_360"),     // 361 days
        ];

        for (due, bucket) in cases {
            let rows = vec![aging_row("900", "Acme", Some(due), "10")];
            let rec = &bucketize(&rows, cutoff(), &AgingSpec::default())[0];
            let buckets = [
                ("sin_vencer", rec.sin_vencer),
                ("dias_1_30", rec.dias_1_30),
                ("dias_31_90", rec.dias_31_90),
                ("dias_91_180", rec.dias_91_180),
                ("dias_181_360", rec.dias_181_360),
                ("mas_360", rec.mas_360),
            ];
            for (name, value) in buckets {
                let expected = if name == bucket { 10.0 } else { 0.0 };
                assert_eq!(value, expected, "due {due} expected bucket {bucket}");
            }
        }
    }

    #[test]
    fn undated_rows_contribute_only_to_total() {
        let rows = vec![
            aging_row("900", "Acme", Some("2024-04-01"), "50"),
            aging_row("900", "Acme", None, "25"),
            aging_row("900", "Acme", Some("not a date"), "5"),
        ];
        let rec = &bucketize(&rows, cutoff(), &AgingSpec::default())[0];

        assert_eq!(rec.total, 80.0);
        let bucket_sum = rec.sin_vencer
            + rec.dias_1_30
            + rec.dias_31_90
            + rec.dias_91_180
            + rec.dias_181_360
            + rec.mas_360;
        assert_eq!(bucket_sum, 50.0);
    }

    #[test]
    fn first_row_seeds_the_label() {
        let rows = vec![
            aging_row("900", "Acme S.A.", Some("2024-04-01"), "10"),
            aging_row("900", "ACME (renamed)", Some("2024-04-01"), "10"),
        ];
        let records = bucketize(&rows, cutoff(), &AgingSpec::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Acme S.A.");
        assert_eq!(records[0].total, 20.0);
    }

    #[test]
    fn fold_is_order_independent() {
        let mut rows = vec![
            aging_row("900", "Acme", Some("2024-01-01"), "100"),
            aging_row("901", "Beta", Some("2024-04-10"), "40"),
            aging_row("900", "Acme", None, "60"),
            aging_row("901", "Beta", Some("2022-01-01"), "7"),
        ];
        let forward = bucketize(&rows, cutoff(), &AgingSpec::default());
        rows.reverse();
        let backward = bucketize(&rows, cutoff(), &AgingSpec::default());
        assert_eq!(forward, backward);
    }

    #[test]
    fn order_modes_sort_by_name_or_nit() {
        let rows = vec![
            aging_row("902", "Acme", Some("2024-04-01"), "10"),
            aging_row("900", "Zeta", Some("2024-04-01"), "10"),
        ];

        let by_name = bucketize(&rows, cutoff(), &AgingSpec::default());
        assert_eq!(by_name[0].name, "Acme");

        let spec = AgingSpec {
            order: AgingOrder::Nit,
            ..AgingSpec::default()
        };
        let by_nit = bucketize(&rows, cutoff(), &spec);
        assert_eq!(by_nit[0].nit, "900");
    }
}
