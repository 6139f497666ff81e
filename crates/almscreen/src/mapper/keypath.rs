//! Colon-delimited datapoint key helpers.

use super::error::{MapperError, Result};

/// Split a key into its segments. An empty key has no segments.
pub fn segments(key: &str) -> Vec<&str> {
    if key.is_empty() {
        Vec::new()
    } else {
        key.split(':').collect()
    }
}

/// First segment of a key (the controller / root node of the DMS tree).
pub fn root(key: &str) -> Result<&str> {
    match key.split(':').next() {
        Some(first) if !first.is_empty() => Ok(first),
        _ => Err(MapperError::EmptyKey),
    }
}

/// Prefix sequence used by the similarity scoring.
///
/// One entry per segment: entry 0 is the first segment, entry i (i > 0) is
/// the separator-less concatenation of the first i segments. The first
/// segment therefore appears twice for multi-segment keys and the full key
/// is never part of the sequence:
///
/// ```text
/// "MSR01:H01:Uwp" -> ["MSR01", "MSR01", "MSR01H01"]
/// ```
///
/// Concatenation instead of rejoining is the established scoring convention;
/// changing it to a colon-joined form changes scores on real projects.
pub fn ancestor_prefixes(key: &str) -> Vec<String> {
    let parts = segments(key);
    (0..parts.len())
        .map(|i| {
            if i == 0 {
                parts[0].to_string()
            } else {
                parts[..i].concat()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_basics() {
        assert_eq!(segments("MSR01:H01:Uwp"), vec!["MSR01", "H01", "Uwp"]);
        assert_eq!(segments("MSR01"), vec!["MSR01"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn root_is_first_segment() {
        assert_eq!(root("PLC2:Valve1").unwrap(), "PLC2");
        assert_eq!(root("PLC2").unwrap(), "PLC2");
    }

    #[test]
    fn root_of_empty_key_fails() {
        assert!(matches!(root(""), Err(MapperError::EmptyKey)));
    }

    #[test]
    fn prefixes_concatenate_without_separator() {
        assert_eq!(
            ancestor_prefixes("MSR01:H01:Uwp"),
            vec!["MSR01", "MSR01", "MSR01H01"]
        );
    }

    #[test]
    fn prefixes_of_short_keys() {
        assert_eq!(ancestor_prefixes("MSR01"), vec!["MSR01"]);
        assert_eq!(ancestor_prefixes("MSR01:H01"), vec!["MSR01", "MSR01"]);
        assert!(ancestor_prefixes("").is_empty());
    }
}
