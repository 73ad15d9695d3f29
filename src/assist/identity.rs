use crate::ast::{ROW_ID, Row, Value};
use crate::dataset::Table;
use rust_decimal::Decimal;
use std::time::{SystemTime, UNIX_EPOCH};

/// How fresh identities are minted for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityScheme {
    /// Continue counting after the largest existing id.
    Sequential(Decimal),
    /// `gen_<unix-millis>_<index>` strings.
    Generated(u128),
}

impl IdentityScheme {
    /// Sequential when every existing id is a number (or there are none) and
    /// `count` more ids fit after the largest one.
    pub fn for_table(table: &Table, count: usize) -> Self {
        let mut max = Decimal::ZERO;
        for row in table.rows() {
            match row.get(ROW_ID).and_then(Value::as_number) {
                Some(id) => max = max.max(id),
                None => return Self::Generated(unix_millis()),
            }
        }

        if max.checked_add(Decimal::from(count)).is_none() {
            log::debug!(
                "Ids of table '{}' are exhausted, generating string ids",
                table.name()
            );
            return Self::Generated(unix_millis());
        }
        Self::Sequential(max)
    }

    pub fn identity(&self, index: usize) -> Value {
        match self {
            Self::Sequential(max) => max
                .checked_add(Decimal::from(index))
                .and_then(|id| id.checked_add(Decimal::ONE))
                .map_or_else(|| generated(unix_millis(), index), Value::Number),
            Self::Generated(millis) => generated(*millis, index),
        }
    }
}

fn generated(millis: u128, index: usize) -> Value {
    Value::String(format!("gen_{millis}_{index}"))
}

/// Give `rows` fresh identities for `table` and fill every declared column
/// the generator left out with `Null`.
pub fn assign(table: &Table, rows: Vec<Row>) -> Vec<Row> {
    let scheme = IdentityScheme::for_table(table, rows.len());
    rows.into_iter()
        .enumerate()
        .map(|(index, mut row)| {
            for column in table.columns() {
                row.entry(column.name.clone()).or_insert(Value::Null);
            }
            row.insert(ROW_ID.to_string(), scheme.identity(index));
            row
        })
        .collect()
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnType;
    use crate::dataset::{Column, seed};

    fn keyed_table(ids: &[Value]) -> Table {
        let rows = ids
            .iter()
            .map(|id| {
                [
                    (ROW_ID.to_string(), id.clone()),
                    ("label".to_string(), Value::from("x")),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        Table::new(
            "k",
            "keyed",
            None,
            vec![
                Column::primary_key("id", ColumnType::String),
                Column::new("label", ColumnType::String),
            ],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_sequential_after_max() {
        let dataset = seed::dataset().unwrap();
        let orders = dataset.table("t2").unwrap();

        let rows = assign(orders, vec![Row::new(), Row::new()]);
        assert_eq!(rows[0][ROW_ID], Value::from(107));
        assert_eq!(rows[1][ROW_ID], Value::from(108));
    }

    #[test]
    fn test_exhausted_numeric_ids_fall_back_to_generated() {
        let table = keyed_table(&[Value::from(1), Value::Number(Decimal::MAX)]);
        let rows = assign(&table, vec![Row::new()]);
        assert!(rows[0][ROW_ID].to_string().starts_with("gen_"));

        let near_max = Decimal::MAX - Decimal::ONE;
        let table = keyed_table(&[Value::Number(near_max)]);
        assert_eq!(
            IdentityScheme::for_table(&table, 1),
            IdentityScheme::Sequential(near_max)
        );
        assert!(matches!(
            IdentityScheme::for_table(&table, 2),
            IdentityScheme::Generated(_)
        ));

        let rows = assign(&table, vec![Row::new(), Row::new()]);
        assert!(rows.iter().all(|r| r[ROW_ID].to_string().starts_with("gen_")));
        let id = IdentityScheme::Sequential(Decimal::MAX).identity(0);
        assert!(id.to_string().starts_with("gen_"), "{id}");
    }

    #[test]
    fn test_empty_table_starts_at_one() {
        let table = keyed_table(&[]);
        assert_eq!(
            IdentityScheme::for_table(&table, 1),
            IdentityScheme::Sequential(Decimal::ZERO)
        );
        assert_eq!(assign(&table, vec![Row::new()])[0][ROW_ID], Value::from(1));
    }

    #[test]
    fn test_generated_for_string_ids() {
        let table = keyed_table(&[Value::from("a"), Value::from(3)]);
        let rows = assign(&table, vec![Row::new(), Row::new()]);

        let first = rows[0][ROW_ID].to_string();
        let second = rows[1][ROW_ID].to_string();
        assert!(first.starts_with("gen_") && first.ends_with("_0"), "{first}");
        assert!(second.ends_with("_1"), "{second}");
    }

    #[test]
    fn test_assign_fills_missing_columns_and_overrides_id() {
        let table = keyed_table(&[Value::from(4)]);
        let row: Row = [
            (ROW_ID.to_string(), Value::from(4)),
            ("extra".to_string(), Value::Bool(true)),
        ]
        .into_iter()
        .collect();

        let rows = assign(&table, vec![row]);
        assert_eq!(rows[0][ROW_ID], Value::from(5));
        assert_eq!(rows[0]["label"], Value::Null);
        assert_eq!(rows[0]["extra"], Value::Bool(true));
    }
}
