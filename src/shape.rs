use gtfs_feed::{Record, Table};

pub const SHAPE_ID: &str = "shape_id";
pub const SHAPE_PT_SEQUENCE: &str = "shape_pt_sequence";

/// Points of one shape, ordered by `shape_pt_sequence`
///
/// Points sharing a sequence number keep their file order. An unknown shape has no point.
pub fn shape_points<'a>(shapes: &'a Table, shape_id: &str) -> Vec<&'a Record> {
    let mut points: Vec<&Record> = shapes.filter(SHAPE_ID, shape_id).collect();
    points.sort_by_cached_key(|point| point.sequence(SHAPE_PT_SEQUENCE));
    points
}
