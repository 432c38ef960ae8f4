use crate::query::compiler::Expr;
use crate::record::PrayerRecord;

/// Record attribute a field-scoped term can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Request,
    Answer,
}

impl Field {
    /// Parse a lower-cased field prefix. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Field::Name),
            "request" => Some(Field::Request),
            "answer" => Some(Field::Answer),
            _ => None,
        }
    }
}

/// Leaf term after classification
#[derive(Debug, Clone, PartialEq, Eq)]
enum Term<'a> {
    /// Quoted phrase or bare word, tested against every field
    Anywhere(&'a str),
    /// `field:value`, tested against one field
    Scoped(Field, &'a str),
    /// `field:value` with an unrecognized field
    UnknownField,
}

impl<'a> Term<'a> {
    /// Classify an already lower-cased term
    fn classify(text: &'a str) -> Self {
        if let Some(quoted) = text.strip_prefix('"') {
            let phrase = quoted.strip_suffix('"').unwrap_or(quoted);
            return Term::Anywhere(phrase);
        }

        match text.split_once(':') {
            Some((field, value)) => match Field::parse(field) {
                Some(field) => Term::Scoped(field, value),
                None => Term::UnknownField,
            },
            None => Term::Anywhere(text),
        }
    }
}

/// Evaluate an expression tree against a record. No tree matches everything.
pub fn evaluate(record: &PrayerRecord, expr: Option<&Expr>) -> bool {
    match expr {
        None => true,
        Some(expr) => eval_node(record, expr),
    }
}

/// Walks the left spine with an explicit stack. Each pending right side
/// is tagged with the left result that still requires evaluating it:
/// `true` for `AND`, `false` for `OR`.
fn eval_node(record: &PrayerRecord, expr: &Expr) -> bool {
    let mut pending: Vec<(bool, &Expr)> = Vec::new();
    let mut node = expr;

    loop {
        let result = loop {
            match node {
                Expr::And(l, r) => {
                    pending.push((true, r));
                    node = l;
                }
                Expr::Or(l, r) => {
                    pending.push((false, r));
                    node = l;
                }
                Expr::Value(text) => break matches(record, text),
            }
        };

        loop {
            match pending.pop() {
                None => return result,
                Some((needs, right)) if result == needs => {
                    node = right;
                    break;
                }
                // Short-circuit: the operator's value is the left result
                Some(_) => {}
            }
        }
    }
}

/// Leaf predicate: case-insensitive containment test of one term
pub fn matches(record: &PrayerRecord, text: &str) -> bool {
    let needle = text.to_lowercase();

    match Term::classify(&needle) {
        Term::Anywhere(phrase) => {
            contains(&record.name, phrase)
                || contains(&record.request_text, phrase)
                || contains(record.answer().unwrap_or(""), phrase)
        }
        Term::Scoped(Field::Name, value) => contains(&record.name, value),
        Term::Scoped(Field::Request, value) => contains(&record.request_text, value),
        Term::Scoped(Field::Answer, value) => record
            .answer()
            .map(|answer| contains(answer, value))
            .unwrap_or(false),
        Term::UnknownField => false,
    }
}

/// `needle` must already be lower-cased
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
