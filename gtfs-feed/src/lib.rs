/*! Reads the tables of a static [GTFS](https://gtfs.org/) feed.

A Gtfs feed is a collection of CSV files (often bundled as a zip file).
Each file represents a collection of one type (stops, routes, etc.) that have relationships through unique identifiers.

To get started, see [FeedReader].

## Design decisions

### Loosely typed records

A [Record] maps the column names of a file to the raw string values of a line. No value is converted
when reading, and columns that the GTFS reference does not define are kept as they are.
This keeps optional and sparse columns, and the column order of the file, intact when republishing the data.

The only typed view is [SequenceKey], used to order `stop_sequence` and `shape_pt_sequence`.

### One table at a time

A [Table] is read from a [FeedSource] on demand, so a caller only pays for the files it needs.
The order of the lines is always the order of the file.

*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;

pub mod error;
mod feed_reader;
mod sequence;
mod table;


pub use error::Error;
pub use feed_reader::{FeedReader, FeedSource};
pub use sequence::SequenceKey;
pub use table::{FeedTable, Record, Table};
