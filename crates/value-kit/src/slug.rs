/// Make a string usable as a url segment
///
/// Every space becomes `-`, the first `.` is removed, and the result is
/// lowercased. Other characters pass through.
pub fn slugify(input: &str) -> String {
    input.replace(' ', "-").replacen('.', "", 1).to_lowercase()
}
