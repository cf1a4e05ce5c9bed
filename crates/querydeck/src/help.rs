//! Reference table of the constraint operators understood downstream.
//!
//! Constraints are opaque to querydeck; this list only helps users write them.

/// A constraint operator and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    /// Operator as typed in a constraint
    pub symbol: &'static str,
    /// Short description
    pub description: &'static str,
}

const fn op(symbol: &'static str, description: &'static str) -> Operator {
    Operator {
        symbol,
        description,
    }
}

/// Operators in display order.
pub const OPERATORS: &[Operator] = &[
    op("$lt", "Less Than"),
    op("$lte", "Less Than Or Equal To"),
    op("$gt", "Greater Than"),
    op("$gte", "Greater Than Or Equal To"),
    op("$ne", "Not Equal To"),
    op("$in", "Contained In"),
    op("$inQuery", "Contained in query results"),
    op("$nin", "Not Contained in"),
    op("$exists", "A value is set for the key"),
    op("$select", "Match key value to query result"),
    op("$dontSelect", "Ignore keys with value equal to query result"),
    op("$all", "Contains all of the given values"),
    op("$regex", "Match regular expression"),
    op("order", "Specify a field to sort by"),
    op("limit", "Limit the number of objects returned by the query"),
    op("skip", "Use with limit to paginate through results"),
    op("keys", "Restrict the fields returned by the query"),
    op("include", "Use on Pointer columns to return the full object"),
    op("&", "Append constraints"),
];

/// Look up an operator by its symbol.
#[must_use]
pub fn lookup(symbol: &str) -> Option<&'static Operator> {
    OPERATORS.iter().find(|o| o.symbol == symbol)
}
