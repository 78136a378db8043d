//! File naming rules shared by the fetch and extraction stages.
//!
//! Segment files and the stored source both derive their names from the
//! media title, so one slug rule keeps a job directory consistent.

/// Reduces a media title to a filesystem-safe slug.
///
/// Every character outside `[A-Za-z0-9]` becomes an underscore and the
/// result is lowercased. Titles with no usable characters fall back to
/// `untitled` so downstream file names never reduce to separators.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.chars().all(|c| c == '_') {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Builds the output file name for one cut interval.
///
/// Ordinals are 1-based so the first file a listing shows is `_segment_1`.
pub fn segment_file_name(slug: &str, ordinal: usize, extension: &str) -> String {
    format!("{slug}_segment_{ordinal}.{extension}")
}

/// Builds the file name the fetched source is stored under.
pub fn source_file_name(slug: &str, extension: &str) -> String {
    format!("{slug}_source.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_replaces_non_alphanumeric() {
        assert_eq!(slugify("My Song (Live) [2024]"), "my_song__live___2024_");
    }

    #[test]
    fn slug_lowercases() {
        assert_eq!(slugify("ABCdef123"), "abcdef123");
    }

    #[test]
    fn slug_falls_back_for_unusable_titles() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("!!! ???"), "untitled");
    }

    #[test]
    fn segment_names_are_one_based() {
        assert_eq!(segment_file_name("mix", 1, "mp3"), "mix_segment_1.mp3");
        assert_eq!(segment_file_name("mix", 12, "mp3"), "mix_segment_12.mp3");
    }

    #[test]
    fn source_name_carries_extension() {
        assert_eq!(source_file_name("mix", "m4a"), "mix_source.m4a");
    }
}
