//! EXIF capture time for scanned photos
//!
//! A weight read off a photographed display should be dated to when the
//! photo was taken, not when it was processed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use exif::{In, Reader, Tag};

/// Read the capture datetime from an image's EXIF block.
///
/// Prefers `DateTimeOriginal` and falls back to `DateTime`. Returns `None`
/// when the file carries no EXIF data or the field does not parse.
pub fn capture_time(path: &Path) -> Option<DateTime<Utc>> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;

    parse_exif_datetime(&field.display_value().to_string())
}

/// EXIF datetimes are local camera time in "YYYY:MM:DD HH:MM:SS" form
fn parse_exif_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => Some(local.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}
