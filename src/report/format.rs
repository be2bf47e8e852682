use crate::config::ColumnKind;
use crate::report::row::Value;

/// Format a cell for display according to its column kind.
pub fn format_cell(kind: ColumnKind, value: &Value) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (ColumnKind::Number, v) => format_amount(v.number()),
        (ColumnKind::Date, v) => v
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.raw()),
        (ColumnKind::Text, v) => v.raw(),
    }
}

/// Format a money amount with two decimal places and thousands separators
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let negative = whole.starts_with('-');
    let digits = if negative { &whole[1..] } else { whole };
    let grouped = format_grouped_int(digits.parse::<i64>().unwrap_or(0));

    if negative {
        format!("-{}.{}", grouped, frac)
    } else {
        format!("{}.{}", grouped, frac)
    }
}

pub fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn amounts_are_grouped_with_two_decimals() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-4500.5), "-4,500.50");
    }

    #[test]
    fn cells_follow_column_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        assert_eq!(
            format_cell(ColumnKind::Number, &Value::Text("100".into())),
            "100.00"
        );
        assert_eq!(format_cell(ColumnKind::Date, &Value::Date(date)), "2024-04-15");
        assert_eq!(
            format_cell(ColumnKind::Text, &Value::Text("Acme".into())),
            "Acme"
        );
        assert_eq!(format_cell(ColumnKind::Number, &Value::Null), "");
    }
}
