use crate::ordinal::Ordinal;

/// A single element of a cron field before any step is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    All,
    Point(Ordinal),
    Range(Ordinal, Ordinal),
}

/// An element of a comma separated cron field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSpecifier {
    Specifier(Specifier),
    Period(Specifier, u32),
}
