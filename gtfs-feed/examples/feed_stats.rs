use gtfs_feed::{FeedReader, FeedSource, FeedTable};
use std::time::Instant;

/// prints the number of lines of every table of the feed given as a cli argument
fn main() {
    let file_path = std::env::args()
        .nth(1)
        .expect("you should put the path of the feed to load");

    println!("reading feed {}", &file_path);
    let source = match FeedSource::from_path(&file_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {:?}", e);
            return;
        }
    };

    let reader = FeedReader::default();
    for table in FeedTable::ALL {
        let now = Instant::now();
        match reader.read_table(&source, table) {
            Ok(t) => println!(
                "  {}: {} objects, {} columns, read in {} ms",
                table,
                t.len(),
                t.headers().len(),
                now.elapsed().as_millis()
            ),
            Err(e) => println!("  {}: could not read {}", table, e),
        }
    }
}
