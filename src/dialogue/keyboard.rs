//! Inline menu layout builders.

use super::event::CallbackAction;

/// A labeled menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Visible button label.
    pub label: String,

    /// Action dispatched when the button is tapped.
    pub action: CallbackAction,
}

impl Button {
    /// Creates a button.
    #[must_use]
    pub fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Inline menu: labeled actions grouped into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    /// Button rows, top to bottom.
    pub rows: Vec<Vec<Button>>,
}

/// Main menu; includes the weather shortcut row only when the user has
/// a pinned city.
#[must_use]
pub fn main_menu(pinned_city: &str) -> Keyboard {
    let mut rows = vec![
        vec![Button::new("👤Профіль", CallbackAction::Profile)],
        vec![Button::new("🏙️Обрати місто", CallbackAction::ShowLetters)],
    ];
    if !pinned_city.is_empty() {
        rows.push(vec![Button::new(
            "🔍Дізнатись погоду в моєму місті",
            CallbackAction::Weather(pinned_city.to_owned()),
        )]);
    }
    Keyboard { rows }
}

/// Profile menu; the name button label depends on whether a name is
/// already set.
#[must_use]
pub fn profile_menu(has_name: bool) -> Keyboard {
    let name_label = if has_name {
        "✏️Редагувати ім'я"
    } else {
        "✏️Додати ім'я"
    };
    Keyboard {
        rows: vec![
            vec![Button::new(name_label, CallbackAction::ChangeName)],
            vec![Button::new("🔍 Історія", CallbackAction::SendHistory)],
            vec![Button::new("🏙️Обрати місто", CallbackAction::ShowLetters)],
            vec![Button::new("↩️Назад", CallbackAction::Back)],
        ],
    }
}

/// First-letter picker: a grid of letters, four per row, plus a back
/// button.
#[must_use]
pub fn letters_menu(letters: &[String]) -> Keyboard {
    let buttons: Vec<Button> = letters
        .iter()
        .map(|letter| Button::new(letter.clone(), CallbackAction::Letter(letter.clone())))
        .collect();

    let mut rows: Vec<Vec<Button>> = buttons.chunks(4).map(<[Button]>::to_vec).collect();
    rows.push(vec![Button::new("↩️Назад", CallbackAction::Back)]);
    Keyboard { rows }
}

/// City picker: matching cities plus a back-to-letters button, two per
/// row.
#[must_use]
pub fn cities_menu(cities: &[&str]) -> Keyboard {
    let mut buttons: Vec<Button> = cities
        .iter()
        .map(|city| Button::new(*city, CallbackAction::City((*city).to_owned())))
        .collect();
    buttons.push(Button::new("🔙 Назад", CallbackAction::ShowLetters));

    Keyboard {
        rows: buttons.chunks(2).map(<[Button]>::to_vec).collect(),
    }
}

/// Single "add as my city" affordance attached to a successful lookup.
#[must_use]
pub fn add_city_menu(city: &str) -> Keyboard {
    Keyboard {
        rows: vec![vec![Button::new(
            "🏙️ Додати місто як своє",
            CallbackAction::AddCity(city.to_owned()),
        )]],
    }
}
