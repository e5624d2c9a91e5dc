use crate::sequence::SequenceKey;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The feed files that can be read as a [Table]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedTable {
    /// `stops.txt`
    Stops,
    /// `routes.txt`
    Routes,
    /// `trips.txt`
    Trips,
    /// `stop_times.txt`
    StopTimes,
    /// `shapes.txt`
    Shapes,
}

impl FeedTable {
    /// Every supported table, in the order they are usually listed in a feed
    pub const ALL: [FeedTable; 5] = [
        FeedTable::Stops,
        FeedTable::Routes,
        FeedTable::Trips,
        FeedTable::StopTimes,
        FeedTable::Shapes,
    ];

    /// Logical name of the table, as used in the API paths
    pub fn name(&self) -> &'static str {
        match self {
            FeedTable::Stops => "stops",
            FeedTable::Routes => "routes",
            FeedTable::Trips => "trips",
            FeedTable::StopTimes => "stop_times",
            FeedTable::Shapes => "shapes",
        }
    }

    /// Name of the file backing the table
    pub fn file_name(&self) -> &'static str {
        match self {
            FeedTable::Stops => "stops.txt",
            FeedTable::Routes => "routes.txt",
            FeedTable::Trips => "trips.txt",
            FeedTable::StopTimes => "stop_times.txt",
            FeedTable::Shapes => "shapes.txt",
        }
    }
}

impl fmt::Display for FeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of a feed file
///
/// Values are kept as the raw strings of the file. Every record of a [Table] shares the same header,
/// so all of them expose the same set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    headers: Arc<Vec<String>>,
    values: Vec<String>,
}

impl Record {
    pub(crate) fn new(headers: Arc<Vec<String>>, mut values: Vec<String>) -> Self {
        // Short rows are legal in the wild, the missing trailing fields are empty
        values.resize(headers.len(), String::new());
        Record { headers, values }
    }

    /// Value of the column, None if the table has no such column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Value of the column, None if the column is absent or the value is empty
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Ordering key of a sequence column such as `stop_sequence` or `shape_pt_sequence`
    pub fn sequence(&self, column: &str) -> SequenceKey {
        SequenceKey::parse(self.get(column))
    }

    /// `(column, value)` pairs in header order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// All the rows of a feed file, in the order of the file
#[derive(Debug)]
pub struct Table {
    kind: FeedTable,
    headers: Arc<Vec<String>>,
    records: Vec<Record>,
}

impl Table {
    pub(crate) fn new(kind: FeedTable, headers: Arc<Vec<String>>, records: Vec<Record>) -> Self {
        Table {
            kind,
            headers,
            records,
        }
    }

    /// Which feed file this table was read from
    pub fn kind(&self) -> FeedTable {
        self.kind
    }

    /// Column names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All records, in file order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterates over the records in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records, the header excluded
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the file only holds a header
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose column equals the value
    pub fn find(&self, column: &str, value: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.get(column) == Some(value))
    }

    /// Records whose column equals the value, in file order
    pub fn filter<'a, 'b>(
        &'a self,
        column: &'b str,
        value: &'b str,
    ) -> impl Iterator<Item = &'a Record> + 'b
    where
        'a: 'b,
    {
        self.records
            .iter()
            .filter(move |r| r.get(column) == Some(value))
    }

    /// Map from the values of a column to their record
    ///
    /// If a value appears several times, the first record in file order is kept.
    pub fn index_by(&self, column: &str) -> HashMap<&str, &Record> {
        let mut index = HashMap::with_capacity(self.records.len());
        for record in &self.records {
            if let Some(key) = record.get(column) {
                index.entry(key).or_insert(record);
            }
        }
        index
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
