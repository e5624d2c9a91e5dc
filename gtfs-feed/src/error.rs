//! Module for the error management
use thiserror::Error;

/// Specific line from a CSV file that could not be read
#[derive(Debug)]
pub struct LineError {
    /// Headers of the CSV file
    pub headers: Vec<String>,
    /// Values of the line that could not be parsed
    pub values: Vec<String>,
}

/// An error that can occur when reading a GTFS feed table.
#[derive(Error, Debug)]
pub enum Error {
    /// The file backing a table is not present in the feed
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// The given path to the GTFS is neither a file nor a directory
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    /// The file is empty and has no header row
    #[error("'{0}' has no header row")]
    MissingHeader(String),
    /// The header names the same column twice
    #[error("column '{column}' appears several times in the header of '{file_name}'")]
    DuplicateHeader {
        /// File name holding the header
        file_name: String,
        /// The repeated column
        column: String,
    },
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
        /// The line that could not be parsed by the csv library
        line_in_error: Option<LineError>,
    },
    /// A row has more fields than the header declares
    #[error("line {line} of '{file_name}' has more fields than its header")]
    InvalidRecord {
        /// File name containing the row
        file_name: String,
        /// Line number of the row, as reported by the csv library
        line: u64,
        /// Content of the row
        line_in_error: LineError,
    },
    /// Error when trying to unzip the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
