//! Artifact filename computation
//!
//! `<series>_<first-3-usernames>[_and_{n}_more]_<iso-date>.pdf`, with the
//! series name sanitized to filesystem-safe characters.

use chrono::NaiveDate;

/// Usernames spelled out in the filename before collapsing to a count
pub const USERNAMES_IN_FILENAME: usize = 3;

/// Replace every non-alphanumeric character with an underscore
///
/// Consecutive replacements collapse into a single underscore so names
/// like `"Karya Siswa #1!"` stay readable.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }

    out
}

/// Compute the deterministic artifact filename
///
/// `usernames` must be the distinct owner usernames in dataset order.
pub fn export_filename(series_nama: &str, usernames: &[String], today: NaiveDate) -> String {
    let mut name = sanitize(series_nama);

    let shown: Vec<&str> = usernames
        .iter()
        .take(USERNAMES_IN_FILENAME)
        .map(|s| s.as_str())
        .collect();
    if !shown.is_empty() {
        name.push('_');
        name.push_str(&shown.join("_"));
    }
    if usernames.len() > USERNAMES_IN_FILENAME {
        name.push_str(&format!(
            "_and_{}_more",
            usernames.len() - USERNAMES_IN_FILENAME
        ));
    }

    name.push('_');
    name.push_str(&today.format("%Y-%m-%d").to_string());
    name.push_str(".pdf");
    name
}
