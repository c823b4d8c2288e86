//! Static city/region directory.

use std::collections::BTreeSet;

/// Recognized city and region names, in directory declaration order.
///
/// Note: "Івано‑Франківськ" deliberately contains a non-breaking hyphen
/// (U+2011), which is what the picker sends back and what city name
/// normalization folds into a plain ASCII hyphen.
pub const REGIONS: &[&str] = &[
    "Вінниця",
    "Волинь",
    "Дніпро",
    "Донецьк",
    "Житомир",
    "Закарпаття",
    "Запоріжжя",
    "Івано‑Франківськ",
    "Київ",
    "Кіровоград",
    "Луганськ",
    "Львів",
    "Миколаїв",
    "Одесса",
    "Полтава",
    "Рівне",
    "Сумська область",
    "Тернопіль",
    "Харків",
    "Херсон",
    "Хмельниччина",
    "Черкаси",
    "Чернівці",
    "Чернігів",
    "Севастополь",
];

/// Returns the sorted set of unique first letters across all directory
/// entries, uppercased.
#[must_use]
pub fn first_letters() -> Vec<String> {
    let mut letters = BTreeSet::new();
    for city in REGIONS {
        if let Some(first) = city.chars().next() {
            letters.insert(first.to_uppercase().collect::<String>());
        }
    }
    letters.into_iter().collect()
}

/// Returns the directory entries starting with the given letter,
/// case-insensitive, in declaration order.
///
/// An unmatched letter yields an empty list, not an error.
#[must_use]
pub fn starting_with(letter: &str) -> Vec<&'static str> {
    let letter = letter.to_uppercase();
    REGIONS
        .iter()
        .copied()
        .filter(|city| city.starts_with(&letter))
        .collect()
}
