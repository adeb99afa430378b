use std::collections::BTreeSet;

/// A position within a time unit, e.g. minute 30 or month 12.
pub type Ordinal = u32;

/// The set of positions a field matches.
pub type OrdinalSet = BTreeSet<Ordinal>;
