use once_cell::sync::Lazy;
use serde::Serialize;

pub const SPECIAL_MARKERS: [char; 15] = [
    '.', '(', ')', '\\', '/', ':', ';', '-', '_', '[', ']', '•', '◦', '*', ',',
];

const ROMAN_LIMIT: u32 = 150;

static ALPHABET: Lazy<Vec<String>> = Lazy::new(|| ('a'..='z').map(String::from).collect());

static ALPHABET_UPPERCASE: Lazy<Vec<String>> =
    Lazy::new(|| ('A'..='Z').map(String::from).collect());

static ROMAN_NUMBERS: Lazy<Vec<String>> =
    Lazy::new(|| (1..=ROMAN_LIMIT).map(to_roman).collect());

static ROMAN_NUMBERS_LOWERCASE: Lazy<Vec<String>> = Lazy::new(|| {
    ROMAN_NUMBERS
        .iter()
        .map(|numeral| numeral.to_lowercase())
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstCharactersType {
    Unclassified,
    RomanUppercase,
    RomanLowercase,
    Digits,
    Uppercase,
}

impl FirstCharactersType {
    pub fn is_numbering(self) -> bool {
        matches!(
            self,
            Self::RomanUppercase | Self::RomanLowercase | Self::Digits
        )
    }
}

pub fn is_special_marker(ch: char) -> bool {
    SPECIAL_MARKERS.contains(&ch)
}

/// First whitespace-delimited word of a title; spaces, newlines and tabs split.
pub fn first_characters(text: &str) -> &str {
    text.split([' ', '\n', '\t']).next().unwrap_or_default()
}

pub fn classify_first_characters(first_characters: &str) -> FirstCharactersType {
    let clean: Vec<char> = first_characters
        .chars()
        .filter(|ch| !is_special_marker(*ch))
        .collect();

    if clean.is_empty() {
        return FirstCharactersType::Unclassified;
    }

    if clean.iter().all(|ch| "IVXL".contains(*ch)) {
        FirstCharactersType::RomanUppercase
    } else if clean.iter().all(|ch| "ivxl".contains(*ch)) {
        FirstCharactersType::RomanLowercase
    } else if clean.iter().all(|ch| ch.is_ascii_digit()) {
        FirstCharactersType::Digits
    } else if clean.iter().all(|ch| is_own_uppercase(*ch)) {
        FirstCharactersType::Uppercase
    } else {
        FirstCharactersType::Unclassified
    }
}

fn is_own_uppercase(ch: char) -> bool {
    let mut upper = ch.to_uppercase();
    upper.next() == Some(ch) && upper.next().is_none()
}

/// 1-based position of the trailing marker in [`SPECIAL_MARKERS`], 0 when there is none.
pub fn bullet_points_type(first_characters: &str) -> usize {
    first_characters
        .chars()
        .last()
        .and_then(|last| SPECIAL_MARKERS.iter().position(|marker| *marker == last))
        .map_or(0, |position| position + 1)
}

pub fn inner_special_markers_count(first_characters: &str) -> usize {
    let char_count = first_characters.chars().count();
    first_characters
        .chars()
        .take(char_count.saturating_sub(1))
        .filter(|ch| is_special_marker(*ch))
        .count()
}

/// Markers a preceding sibling heading could start with.
///
/// `"B."` yields `"A."`, `"1.3)"` yields `"1.2)"` and `"v"` yields both `"u"` and `"iv"`.
/// A first word with no numbering core but at least four characters is returned as-is so
/// that repeated literal headings ("Appendix", "Chapter") line up.
pub fn previous_marker(first_characters: &str) -> Vec<String> {
    let chars: Vec<char> = first_characters.chars().collect();

    let mut end = chars.len();
    while end > 0 && is_special_marker(chars[end - 1]) {
        end -= 1;
    }

    let mut start = end;
    while start > 0 && !is_special_marker(chars[start - 1]) {
        start -= 1;
    }

    let prefix: String = chars[..start].iter().collect();
    let core: String = chars[start..end].iter().collect();
    let trailing: String = chars[end..].iter().collect();

    let previous_items = previous_items(&core);
    if previous_items.is_empty() {
        if chars.len() >= 4 {
            return vec![first_characters.to_string()];
        }
        return Vec::new();
    }

    previous_items
        .into_iter()
        .map(|item| format!("{prefix}{item}{trailing}"))
        .collect()
}

fn previous_items(item: &str) -> Vec<String> {
    let alphabets: [&[String]; 4] = [
        ALPHABET.as_slice(),
        ALPHABET_UPPERCASE.as_slice(),
        ROMAN_NUMBERS.as_slice(),
        ROMAN_NUMBERS_LOWERCASE.as_slice(),
    ];

    let mut items: Vec<String> = alphabets
        .iter()
        .filter_map(|alphabet| {
            let index = alphabet.iter().position(|entry| entry == item)?;
            index.checked_sub(1).map(|previous| alphabet[previous].clone())
        })
        .collect();

    if !item.is_empty() && item.chars().all(|ch| ch.is_ascii_digit()) {
        if let Ok(value) = item.parse::<i64>() {
            items.push((value - 1).to_string());
        }
    }

    items
}

fn to_roman(mut value: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for (weight, numeral) in NUMERALS {
        while value >= weight {
            out.push_str(numeral);
            value -= weight;
        }
    }
    out
}
