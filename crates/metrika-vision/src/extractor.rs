//! Weight token extraction from recognized text lines

use std::sync::LazyLock;

use regex::Regex;

/// A plausible scale reading: one to three digits, a comma or period
/// decimal separator and one or two decimals, or a bare two or three digit
/// integer. The separator form is tried first at each position.
static WEIGHT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,3}[,.][0-9]{1,2})|([0-9]{2,3})").ok());

/// Extract the first plausible weight token from recognized text lines.
///
/// Lines are examined in recognition order and all whitespace is removed
/// from a line before matching, so digit groups separated only by spaces
/// fuse into one token ("9 99" is read as "999"). The first match in the
/// first matching line wins, a comma separator is normalized to a period,
/// and no further lines are examined. Values are not range checked.
///
/// Returns `None` when no line carries a matching token.
pub fn extract_weight<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let pattern = WEIGHT_PATTERN.as_ref()?;

    for line in lines {
        let stripped: String = line
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if let Some(matched) = pattern.find(&stripped) {
            return Some(matched.as_str().replace(',', "."));
        }
    }

    None
}
