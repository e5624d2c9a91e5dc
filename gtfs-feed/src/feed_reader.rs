use crate::error::LineError;
use crate::{Error, FeedTable, Record, Table};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Where the feed files are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A directory holding the `.txt` files
    Directory(PathBuf),
    /// A zip archive holding the `.txt` files, possibly under a sub-directory
    Archive(PathBuf),
}

impl FeedSource {
    /// A file is considered as a zip archive, a directory as an extracted feed
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();
        if p.is_file() {
            Ok(FeedSource::Archive(p.to_owned()))
        } else if p.is_dir() {
            Ok(FeedSource::Directory(p.to_owned()))
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Directory(p) => write!(f, "directory {}", p.display()),
            FeedSource::Archive(p) => write!(f, "archive {}", p.display()),
        }
    }
}

/// Allows to parameterize how the feed files are parsed
///
/// ```
///let reader = gtfs_feed::FeedReader::default().trim_fields(false);
///let source = gtfs_feed::FeedSource::from_path("fixtures/basic")?;
///let stops = reader.read_table(&source, gtfs_feed::FeedTable::Stops)?;
///assert_eq!(Some("stop1"), stops.records()[0].get("stop_id"));
/// # Ok::<(), gtfs_feed::Error>(())
///```
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct FeedReader {
    /// Trim the whitespaces around the fields and the headers
    ///
    /// It costs a bit of time. If your data is clean, you can switch it off
    #[derivative(Default(value = "true"))]
    pub trim_fields: bool,
}

impl FeedReader {
    /// Should the fields be trimmed (default: true)
    ///
    /// Returns Self and can be chained
    pub fn trim_fields(mut self, trim_fields: bool) -> Self {
        self.trim_fields = trim_fields;
        self
    }

    /// Reads one table from the feed
    pub fn read_table(&self, source: &FeedSource, table: FeedTable) -> Result<Table, Error> {
        match source {
            FeedSource::Directory(dir) => self.read_table_from_directory(dir, table),
            FeedSource::Archive(path) => self.read_table_from_archive(path, table),
        }
    }

    /// Reads one table from any [std::io::Read]
    ///
    /// A leading UTF-8 BOM is skipped. The first line is the header.
    pub fn read_table_from_reader<R: Read>(
        &self,
        mut reader: R,
        table: FeedTable,
    ) -> Result<Table, Error> {
        let file_name = table.file_name();

        let mut bom = Vec::with_capacity(UTF8_BOM.len());
        reader
            .by_ref()
            .take(UTF8_BOM.len() as u64)
            .read_to_end(&mut bom)
            .map_err(|e| Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?;
        let prefix: &[u8] = if bom == UTF8_BOM { &[] } else { &bom };

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(if self.trim_fields {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(prefix.chain(reader));

        let headers = csv_reader.headers().map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: None,
        })?;
        if headers.is_empty() {
            return Err(Error::MissingHeader(file_name.to_owned()));
        }
        let headers: Vec<String> = headers.iter().map(String::from).collect();
        if let Some(column) = duplicate_column(&headers) {
            return Err(Error::DuplicateHeader {
                file_name: file_name.to_owned(),
                column: column.to_owned(),
            });
        }
        let headers = Arc::new(headers);

        // Pre-allocate a StringRecord for performance reasons
        let mut rec = csv::StringRecord::new();
        let mut records = Vec::new();

        while csv_reader.read_record(&mut rec).map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: None,
        })? {
            if rec.len() > headers.len() {
                return Err(Error::InvalidRecord {
                    file_name: file_name.to_owned(),
                    line: rec.position().map(|p| p.line()).unwrap_or_default(),
                    line_in_error: LineError {
                        headers: headers.to_vec(),
                        values: rec.iter().map(String::from).collect(),
                    },
                });
            }
            records.push(Record::new(
                headers.clone(),
                rec.iter().map(String::from).collect(),
            ));
        }

        Ok(Table::new(table, headers, records))
    }

    fn read_table_from_directory(&self, dir: &Path, table: FeedTable) -> Result<Table, Error> {
        let path = dir.join(table.file_name());
        if !path.exists() {
            return Err(Error::MissingFile(table.file_name().to_owned()));
        }
        let file = File::open(&path).map_err(|e| Error::NamedFileIO {
            file_name: table.file_name().to_owned(),
            source: Box::new(e),
        })?;
        self.read_table_from_reader(BufReader::new(file), table)
    }

    fn read_table_from_archive(&self, path: &Path, table: FeedTable) -> Result<Table, Error> {
        let file = File::open(path).map_err(|e| Error::NamedFileIO {
            file_name: format!("{}", path.display()),
            source: Box::new(e),
        })?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        let mut index = None;
        for i in 0..archive.len() {
            let archive_file = archive.by_index(i)?;
            let entry_path = Path::new(archive_file.name());
            if entry_path.file_name() == Some(OsStr::new(table.file_name())) {
                index = Some(i);
                break;
            }
        }

        let i = index.ok_or_else(|| Error::MissingFile(table.file_name().to_owned()))?;
        let archive_file = archive.by_index(i).map_err(|e| Error::NamedFileIO {
            file_name: table.file_name().to_owned(),
            source: Box::new(e),
        })?;
        self.read_table_from_reader(archive_file, table)
    }
}

fn duplicate_column(headers: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .map(String::as_str)
        .find(|column| !seen.insert(*column))
}
