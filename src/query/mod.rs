pub mod cache;
pub mod compiler;
pub mod lexer;
pub mod matcher;

pub use cache::QueryCache;
pub use compiler::{Expr, compile};
pub use lexer::{Token, tokenize};
pub use matcher::{Field, evaluate, matches};

use crate::record::PrayerRecord;

/// A query string compiled once and reusable across record lists
#[derive(Debug)]
pub struct CompiledQuery {
    expr: Option<Expr>,
    /// Blank queries skip evaluation entirely
    blank: bool,
}

impl CompiledQuery {
    pub fn new(query: &str) -> Self {
        if query.trim().is_empty() {
            return Self {
                expr: None,
                blank: true,
            };
        }

        let tokens = tokenize(query);
        tracing::debug!(?tokens, "tokenized search query");
        let expr = compile(&tokens);
        match &expr {
            Some(expr) => tracing::debug!(tree = %expr, "compiled search query"),
            None => tracing::debug!("search query compiled to nothing"),
        }

        Self { expr, blank: false }
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn is_match(&self, record: &PrayerRecord) -> bool {
        self.blank || evaluate(record, self.expr.as_ref())
    }

    /// Matching records, in input order
    pub fn filter<'a>(&self, records: &'a [PrayerRecord]) -> Vec<&'a PrayerRecord> {
        if self.blank {
            return records.iter().collect();
        }

        records
            .iter()
            .filter(|record| {
                let matched = self.is_match(record);
                tracing::trace!(id = %record.id, matched, "evaluated record");
                matched
            })
            .collect()
    }
}

/// Records matching `query`, borrowed from the input in order
pub fn filter_refs<'a>(records: &'a [PrayerRecord], query: &str) -> Vec<&'a PrayerRecord> {
    CompiledQuery::new(query).filter(records)
}

/// Records matching `query`, in input order. A blank query returns every
/// record unchanged.
pub fn filter_records(records: &[PrayerRecord], query: &str) -> Vec<PrayerRecord> {
    if query.trim().is_empty() {
        return records.to_vec();
    }

    filter_refs(records, query).into_iter().cloned().collect()
}
