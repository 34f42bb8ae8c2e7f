// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Uniform rows handed to the table renderer.
//!
//! Synthetic summary lines (totals, dividers, net change) are variants of
//! [`SummaryRow`] rather than magic category ids; the sentinel ids survive
//! only as [`SummaryRow::tag`] so consumers can identify a row without
//! parsing its text.

use comfy_table::Table;
use serde::Serialize;

use crate::holdings::Holding;
use crate::models::{Category, Investment, Record};
use crate::utils::{fmt_cents, fmt_optional_cents, pretty_table};

pub const NET_CHANGE_ID: i64 = 0;
pub const DELETED_ID: i64 = -1;
pub const DIVIDER_ID: i64 = -2;
pub const TOTAL_INCOME_ID: i64 = -3;
pub const TOTAL_EXPENDITURE_ID: i64 = -4;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Per-month amounts in cents, index 0 = January.
pub type MonthlyAmounts = [i64; 12];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryRow {
    Category {
        id: i64,
        name: String,
        is_income: bool,
        months: MonthlyAmounts,
    },
    Divider,
    TotalIncome { months: MonthlyAmounts },
    TotalExpenditure { months: MonthlyAmounts },
    NetChange { months: MonthlyAmounts },
}

impl SummaryRow {
    pub fn tag(&self) -> i64 {
        match self {
            SummaryRow::Category { id, .. } => *id,
            SummaryRow::Divider => DIVIDER_ID,
            SummaryRow::TotalIncome { .. } => TOTAL_INCOME_ID,
            SummaryRow::TotalExpenditure { .. } => TOTAL_EXPENDITURE_ID,
            SummaryRow::NetChange { .. } => NET_CHANGE_ID,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SummaryRow::Category { name, .. } => name,
            SummaryRow::Divider => "",
            SummaryRow::TotalIncome { .. } => "Total Income",
            SummaryRow::TotalExpenditure { .. } => "Total Expenditure",
            SummaryRow::NetChange { .. } => "Net Change",
        }
    }

    pub fn months(&self) -> Option<&MonthlyAmounts> {
        match self {
            SummaryRow::Category { months, .. }
            | SummaryRow::TotalIncome { months }
            | SummaryRow::TotalExpenditure { months }
            | SummaryRow::NetChange { months } => Some(months),
            SummaryRow::Divider => None,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, SummaryRow::Divider)
    }
}

/// A record paired with the name of its category, `None` when detached.
#[derive(Debug, Clone, Serialize)]
pub struct RecordLine {
    #[serde(flatten)]
    pub record: Record,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Record,
    Category,
    Investment,
    Summary,
    Holding,
}

impl RowKind {
    pub fn headers(self) -> Vec<&'static str> {
        match self {
            RowKind::Record => vec!["ID", "Date", "Description", "Amount", "Category"],
            RowKind::Category => vec!["ID", "Name", "Type", "Description"],
            RowKind::Investment => vec!["ID", "Date", "Code", "Qty", "Unit Price", "Cost"],
            RowKind::Summary => {
                let mut h = vec![""];
                h.extend(MONTH_LABELS);
                h.push("Total");
                h
            }
            RowKind::Holding => vec![
                "Code",
                "Qty",
                "Avg Buy Price",
                "Current Price",
                "Total In",
                "Current Value",
                "P/L",
                "%P/L",
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Row {
    Record(RecordLine),
    Category(Category),
    Investment(Investment),
    Summary(SummaryRow),
    Holding(Holding),
}

impl Row {
    pub fn kind(&self) -> RowKind {
        match self {
            Row::Record(_) => RowKind::Record,
            Row::Category(_) => RowKind::Category,
            Row::Investment(_) => RowKind::Investment,
            Row::Summary(_) => RowKind::Summary,
            Row::Holding(_) => RowKind::Holding,
        }
    }

    pub fn cells(&self) -> Vec<String> {
        match self {
            Row::Record(line) => vec![
                line.record.id.to_string(),
                line.record.date.to_string(),
                line.record.description.clone(),
                fmt_cents(line.record.amount),
                line.category
                    .clone()
                    .unwrap_or_else(|| "(deleted)".to_string()),
            ],
            Row::Category(c) => vec![
                c.id.to_string(),
                c.name.clone(),
                if c.is_income { "income" } else { "expenditure" }.to_string(),
                c.description.clone(),
            ],
            Row::Investment(i) => vec![
                i.id.to_string(),
                i.date.to_string(),
                i.code.clone(),
                i.quantity.normalize().to_string(),
                fmt_cents(i.unit_price),
                fmt_optional_cents(i.cost().and_then(crate::utils::round_cents)),
            ],
            Row::Summary(s) if s.is_divider() => vec![String::new(); 14],
            Row::Summary(s) => {
                let months = s.months().copied().unwrap_or_default();
                let mut cells = Vec::with_capacity(14);
                cells.push(s.label().to_string());
                cells.extend(months.iter().map(|m| fmt_cents(*m)));
                cells.push(fmt_cents(months.iter().sum()));
                cells
            }
            Row::Holding(h) => vec![
                h.code.clone(),
                h.quantity.normalize().to_string(),
                fmt_cents(h.avg_buy_price),
                fmt_optional_cents(h.current_price),
                fmt_cents(h.total_in),
                fmt_optional_cents(h.current_value),
                fmt_optional_cents(h.profit),
                h.profit_pct
                    .map(|p| format!("{:.2}%", p))
                    .unwrap_or_else(|| "—".to_string()),
            ],
        }
    }
}

/// Renders rows of one kind under that kind's headers.
pub fn table(kind: RowKind, rows: impl IntoIterator<Item = Row>) -> Table {
    let body = rows.into_iter().map(|r| r.cells()).collect();
    pretty_table(&kind.headers(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sentinel_tags_do_not_overlap_real_ids() {
        let rows = [
            SummaryRow::Divider,
            SummaryRow::TotalIncome { months: [0; 12] },
            SummaryRow::TotalExpenditure { months: [0; 12] },
            SummaryRow::NetChange { months: [0; 12] },
        ];
        for r in &rows {
            assert!(r.tag() < 1);
        }
        assert_ne!(DELETED_ID, DIVIDER_ID);
    }

    #[test]
    fn summary_row_cells_include_total() {
        let mut months = [0; 12];
        months[0] = 1_000;
        months[11] = 250;
        let row = Row::Summary(SummaryRow::TotalIncome { months });
        let cells = row.cells();
        assert_eq!(cells.len(), RowKind::Summary.headers().len());
        assert_eq!(cells[0], "Total Income");
        assert_eq!(cells[1], "$10.00");
        assert_eq!(cells[13], "$12.50");
    }

    #[test]
    fn divider_renders_blank() {
        let cells = Row::Summary(SummaryRow::Divider).cells();
        assert!(cells.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn detached_record_renders_deleted_placeholder() {
        let line = RecordLine {
            record: Record {
                id: 3,
                date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                description: "rent".into(),
                amount: -120_000,
                category_id: None,
            },
            category: None,
        };
        let cells = Row::Record(line).cells();
        assert_eq!(cells[3], "-$1200.00");
        assert_eq!(cells[4], "(deleted)");
    }
}
