//! Character normalization for Persian date text
//!
//! Blog pages mix Persian digits, Arabic-Indic digits and Arabic letter
//! variants depending on the editor that produced them.

/// Replaces Persian (`۰`-`۹`) and Arabic-Indic (`٠`-`٩`) digits with ASCII digits
///
/// # Examples
///
/// ```
/// use blog_harvest::date::to_ascii_digits;
///
/// assert_eq!(to_ascii_digits("۱۳۹۵"), "1395");
/// assert_eq!(to_ascii_digits("١٤:٣٠"), "14:30");
/// ```
pub fn to_ascii_digits(input: &str) -> String {
    input.chars().map(ascii_digit).collect()
}

fn ascii_digit(c: char) -> char {
    let offset = match c {
        '\u{06F0}'..='\u{06F9}' => c as u32 - 0x06F0,
        '\u{0660}'..='\u{0669}' => c as u32 - 0x0660,
        _ => return c,
    };
    char::from_digit(offset, 10).unwrap_or(c)
}

/// Folds Arabic yeh/kaf into their Persian forms and drops zero-width joiners
pub(crate) fn fold_letters(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\u{200C}' | '\u{200D}'))
        .map(|c| match c {
            '\u{064A}' | '\u{0649}' => '\u{06CC}',
            '\u{0643}' => '\u{06A9}',
            other => other,
        })
        .collect()
}
