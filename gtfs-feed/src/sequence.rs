/// Ordering key of a GTFS sequence column (`stop_sequence`, `shape_pt_sequence`)
///
/// Numeric values sort by their value. Missing or non-numeric values are greater than any number,
/// so with a stable sort they end up last, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SequenceKey {
    /// The value parsed as an integer
    Numeric(i64),
    /// The value is missing, empty or not an integer
    Invalid,
}

impl SequenceKey {
    /// Parses the raw value of a sequence column
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse().ok())
            .map(SequenceKey::Numeric)
            .unwrap_or(SequenceKey::Invalid)
    }
}
