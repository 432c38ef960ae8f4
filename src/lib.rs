//! # prayerq - Smart Prayer-Request Search
//!
//! prayerq filters a family prayer log with a small query language:
//! bare words, quoted phrases, `name:` / `request:` / `answer:` field
//! terms, `AND` / `OR` operators and parentheses. Adjacent terms are joined
//! with an implicit `AND`, and `AND` binds tighter than `OR`.
//!
//! ## Architecture
//!
//! - [`query`] - Tokenizer, precedence compiler, evaluator, query cache
//! - [`record`] - Prayer record model and log operations
//! - [`output`] - Terminal rendering of results
//! - [`utils`] - Config and app data directory
//!
//! The `prayerq` binary only reads a log. Creating, answering and editing
//! records ([`PrayerRecord::new_request`], [`PrayerRecord::mark_answered`],
//! [`PrayerRecord::edit_request`], [`PrayerRecord::edit_answer`]) is
//! library API for the application that owns the log.
//!
//! ## Quick Start
//!
//! ```
//! use prayerq::query::filter_records;
//! use prayerq::record::parse_records;
//!
//! let records = parse_records(r#"[
//!     {"id": "1", "name": "Ann", "requestText": "job interview", "status": "current"},
//!     {"id": "2", "name": "Ben", "requestText": "surgery recovery",
//!      "answerText": "fully healed", "status": "answered"}
//! ]"#).unwrap();
//!
//! let found = filter_records(&records, "request:surgery OR name:ann");
//! assert_eq!(found.len(), 2);
//!
//! let found = filter_records(&records, "name:ann AND request:surgery");
//! assert!(found.is_empty());
//! ```

pub mod output;
pub mod query;
pub mod record;
pub mod utils;

pub use query::filter_records;
pub use record::PrayerRecord;
