//! Conversation controller implementation.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::event::{CallbackAction, Command, Event};
use super::keyboard;
use super::reply::{OutMessage, Reply};
use super::session::SessionState;
use super::text::{is_valid_name, normalize_city_name};
use crate::cities;
use crate::storage::{HistoryEntry, QueryOutcome, StoreError, UserProfile, UserStore, ensure};
use crate::weather::{WeatherError, WeatherProvider};

const GREETING_FIRST_TIME: &str =
    "Привіт! Введи назву міста, щоб дізнатись погоду, або обери опцію нижче.";
const GREETING_RETURNING: &str =
    "Привіт знову! Обери опцію нижче або введи назву міста, щоб дізнатись погоду.";
const NAME_PROMPT: &str = "Введи своє ім'я (до 32 символів, лише букви, пробіли, дефіси):";
const INVALID_NAME: &str =
    "❌ Некоректне ім'я! Дозволено тільки букви, пробіли, дефіси, до 32 символів.";
const INVALID_CITY: &str = "❌ Некоректна назва міста!";
const INVALID_CITY_RETRY: &str = "❌ Некоректна назва міста! Введіть коректну назву.";
const CITY_NOT_FOUND: &str = "Місто не знайдено. Перевір назву.";
const WEATHER_UNAVAILABLE: &str = "Щось пішло не так з погодою...";
const HISTORY_EMPTY: &str = "🕳️ Історія порожня.";
const LETTERS_PROMPT: &str = "Оберіть літеру міста:";

/// The dialogue state machine.
///
/// Every event re-reads the whole profile store, applies the handler
/// logic, and rewrites the store if it was mutated. The store mutex
/// serializes the load-mutate-save sequence so concurrent events for
/// different users cannot lose updates.
pub struct DialogueHandler<W> {
    /// Whole-file profile store, guarded as a single unit.
    store: Mutex<UserStore>,

    /// Weather lookup client.
    weather: W,

    /// Ephemeral per-user session state.
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl<W: WeatherProvider> DialogueHandler<W> {
    /// Creates a controller over the given store and weather client.
    #[must_use]
    pub fn new(store: UserStore, weather: W) -> Self {
        Self {
            store: Mutex::new(store),
            weather,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Handles one inbound event for one user and renders the reply.
    ///
    /// Session state is taken (and thereby reset to idle) before
    /// dispatch; only the name-entry flow puts it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store cannot be read or written.
    /// Lookup and validation failures are rendered as reply text, not
    /// errors.
    pub async fn handle(&self, user_id: &str, event: Event) -> Result<Reply, StoreError> {
        debug!("Handling event from {}: {:?}", user_id, event);

        let session = self
            .sessions
            .lock()
            .await
            .remove(user_id)
            .unwrap_or_default();

        match event {
            Event::Text(text) if session == SessionState::AwaitingName => {
                self.set_name(user_id, &text).await
            }
            Event::Text(text) => self.weather_query(user_id, &text).await,
            Event::Command(Command::Start) | Event::Callback(CallbackAction::Back) => {
                self.greet(user_id).await
            }
            Event::Command(Command::Profile) | Event::Callback(CallbackAction::Profile) => {
                self.profile(user_id).await
            }
            Event::Callback(CallbackAction::ChangeName) => self.prompt_name(user_id).await,
            Event::Callback(CallbackAction::SendHistory) => self.history(user_id).await,
            Event::Callback(CallbackAction::ShowLetters) => Ok(Self::letters()),
            Event::Callback(CallbackAction::Letter(letter)) => Ok(Self::cities_for_letter(&letter)),
            Event::Callback(CallbackAction::City(city) | CallbackAction::AddCity(city)) => {
                self.set_city(user_id, &city).await
            }
            Event::Callback(CallbackAction::Weather(city)) => Ok(self.pinned_weather(&city).await),
        }
    }

    /// `/start` and "back": greet and show the main menu.
    async fn greet(&self, user_id: &str) -> Result<Reply, StoreError> {
        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        if ensure(&mut profiles, user_id) {
            info!("Created profile for new user {}", user_id);
            store.save_all(&profiles)?;
        }

        let city = profiles[user_id].city.as_str();
        let text = if city.is_empty() {
            GREETING_FIRST_TIME
        } else {
            GREETING_RETURNING
        };
        Ok(Reply::with_menu(text, keyboard::main_menu(city)))
    }

    /// `/profile` and the profile menu tap.
    async fn profile(&self, user_id: &str) -> Result<Reply, StoreError> {
        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        if ensure(&mut profiles, user_id) {
            info!("Created profile for new user {}", user_id);
            store.save_all(&profiles)?;
        }

        Ok(Reply {
            messages: vec![profile_card(&profiles[user_id])],
        })
    }

    /// "Edit name": prompt and await the next free-text message.
    async fn prompt_name(&self, user_id: &str) -> Result<Reply, StoreError> {
        self.sessions
            .lock()
            .await
            .insert(user_id.to_owned(), SessionState::AwaitingName);
        Ok(Reply::text(NAME_PROMPT))
    }

    /// Free text while awaiting a name.
    async fn set_name(&self, user_id: &str, raw: &str) -> Result<Reply, StoreError> {
        let name = raw.trim();
        if !is_valid_name(name) {
            // Stay in name entry until valid input arrives.
            self.sessions
                .lock()
                .await
                .insert(user_id.to_owned(), SessionState::AwaitingName);
            return Ok(Reply::text(INVALID_NAME));
        }

        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        ensure(&mut profiles, user_id);
        if let Some(profile) = profiles.get_mut(user_id) {
            profile.name = name.to_owned();
        }
        store.save_all(&profiles)?;
        info!("User {} set name", user_id);

        Ok(Reply::text(format!("Ім'я змінено на: {name}")).and(profile_card(&profiles[user_id])))
    }

    /// "History" tap.
    async fn history(&self, user_id: &str) -> Result<Reply, StoreError> {
        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        if ensure(&mut profiles, user_id) {
            store.save_all(&profiles)?;
        }

        let history = &profiles[user_id].history;
        if history.is_empty() {
            return Ok(Reply::text(HISTORY_EMPTY));
        }

        let lines: Vec<String> = history
            .iter()
            .map(|entry| format!("🕒 {}: {}", entry.datetime, entry.query))
            .collect();
        Ok(Reply::text(format!("📜 Твоя історія:\n{}", lines.join("\n"))))
    }

    /// "Choose city by letter" tap.
    fn letters() -> Reply {
        Reply::with_menu(
            LETTERS_PROMPT,
            keyboard::letters_menu(&cities::first_letters()),
        )
    }

    /// Letter selection from the picker.
    fn cities_for_letter(letter: &str) -> Reply {
        let matches = cities::starting_with(letter);
        if matches.is_empty() {
            Reply::text(format!("Міст не знайдено на літеру '{letter}'."))
        } else {
            Reply::with_menu(
                format!("Міста на літеру '{letter}':"),
                keyboard::cities_menu(&matches),
            )
        }
    }

    /// City selection or "add city as mine" tap.
    async fn set_city(&self, user_id: &str, raw: &str) -> Result<Reply, StoreError> {
        let city = normalize_city_name(raw);
        if !is_valid_name(&city) {
            return Ok(Reply::text(INVALID_CITY));
        }

        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        ensure(&mut profiles, user_id);
        if let Some(profile) = profiles.get_mut(user_id) {
            profile.city.clone_from(&city);
        }
        store.save_all(&profiles)?;
        info!("User {} pinned city \"{}\"", user_id, city);

        Ok(Reply::text(format!("🏙️ {city} встановлено у профіль!"))
            .and(profile_card(&profiles[user_id])))
    }

    /// Pinned-city weather shortcut. Not recorded in history.
    async fn pinned_weather(&self, raw: &str) -> Reply {
        let city = normalize_city_name(raw);
        if !is_valid_name(&city) {
            return Reply::text(INVALID_CITY);
        }

        match self.weather.fetch(&city).await {
            Ok(report) => Reply::text(report.to_text()),
            Err(WeatherError::NotFound) => Reply::text(CITY_NOT_FOUND),
            Err(WeatherError::Unavailable(reason)) => {
                warn!("Weather lookup for \"{}\" failed: {}", city, reason);
                Reply::text(WEATHER_UNAVAILABLE)
            }
        }
    }

    /// Free-text fallback: treat the message as a city name, look up
    /// the weather, and record the query in history either way.
    async fn weather_query(&self, user_id: &str, raw: &str) -> Result<Reply, StoreError> {
        let city = normalize_city_name(raw);
        if !is_valid_name(&city) {
            return Ok(Reply::text(INVALID_CITY_RETRY));
        }

        let store = self.store.lock().await;
        let mut profiles = store.load_all()?;
        ensure(&mut profiles, user_id);

        let lookup = self.weather.fetch(&city).await;
        let outcome = if lookup.is_ok() {
            QueryOutcome::Success
        } else {
            QueryOutcome::Failed
        };
        if let Some(profile) = profiles.get_mut(user_id) {
            profile.history.push(HistoryEntry::now(&city, outcome));
        }
        store.save_all(&profiles)?;

        Ok(match lookup {
            Ok(report) => {
                if profiles[user_id].city == city {
                    Reply::text(report.to_text())
                } else {
                    Reply::with_menu(report.to_text(), keyboard::add_city_menu(&city))
                }
            }
            Err(WeatherError::NotFound) => Reply::text(CITY_NOT_FOUND),
            Err(WeatherError::Unavailable(reason)) => {
                warn!("Weather lookup for \"{}\" failed: {}", city, reason);
                Reply::text(WEATHER_UNAVAILABLE)
            }
        })
    }
}

impl<W> std::fmt::Debug for DialogueHandler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueHandler").finish_non_exhaustive()
    }
}

/// Renders the profile card with its menu.
fn profile_card(profile: &UserProfile) -> OutMessage {
    let name = if profile.name.is_empty() {
        "Ім'я не задано"
    } else {
        profile.name.as_str()
    };
    let city = if profile.city.is_empty() {
        "Місто не задано"
    } else {
        profile.city.as_str()
    };

    OutMessage::with_menu(
        format!("👤Профіль👤\nІм'я: {name}\nМісто: {city}"),
        keyboard::profile_menu(!profile.name.is_empty()),
    )
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::weather::WeatherReport;

    /// Configurable stand-in for the weather provider.
    #[derive(Clone)]
    enum StubWeather {
        Resolves,
        Unknown,
        Down,
    }

    impl WeatherProvider for StubWeather {
        fn fetch(
            &self,
            city: &str,
        ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send {
            let stub = self.clone();
            let city = city.to_owned();
            async move {
                match stub {
                    Self::Resolves => Ok(WeatherReport {
                        city,
                        temp: 3.0,
                        feels_like: 1.0,
                        description: "Хмарно".to_owned(),
                        wind_speed: 5.0,
                    }),
                    Self::Unknown => Err(WeatherError::NotFound),
                    Self::Down => Err(WeatherError::Unavailable("connection refused".to_owned())),
                }
            }
        }
    }

    fn handler(test: &str, weather: StubWeather) -> DialogueHandler<StubWeather> {
        let path = std::env::temp_dir().join(format!(
            "weather_profile_bot_dialogue_{test}_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        DialogueHandler::new(UserStore::new(path), weather)
    }

    async fn load(handler: &DialogueHandler<StubWeather>) -> crate::storage::ProfileMap {
        handler.store.lock().await.load_all().unwrap()
    }

    #[tokio::test]
    async fn test_start_creates_profile_with_first_time_greeting() {
        let handler = handler("start_new", StubWeather::Resolves);

        let reply = handler
            .handle("100", Event::Command(Command::Start))
            .await
            .unwrap();

        let first = reply.first().unwrap();
        assert_eq!(first.text, GREETING_FIRST_TIME);
        // No pinned city, so no weather shortcut row.
        assert_eq!(first.keyboard.as_ref().unwrap().rows.len(), 2);

        let profiles = load(&handler).await;
        assert_eq!(profiles["100"], UserProfile::default());
    }

    #[tokio::test]
    async fn test_start_with_pinned_city_uses_returning_greeting() {
        let handler = handler("start_returning", StubWeather::Resolves);
        handler
            .handle("100", Event::Callback(CallbackAction::City("Київ".to_owned())))
            .await
            .unwrap();

        let reply = handler
            .handle("100", Event::Command(Command::Start))
            .await
            .unwrap();

        let first = reply.first().unwrap();
        assert_eq!(first.text, GREETING_RETURNING);
        assert_eq!(first.keyboard.as_ref().unwrap().rows.len(), 3);
    }

    #[tokio::test]
    async fn test_name_entry_accepts_valid_name() {
        let handler = handler("name_valid", StubWeather::Resolves);

        let prompt = handler
            .handle("1", Event::Callback(CallbackAction::ChangeName))
            .await
            .unwrap();
        assert_eq!(prompt.first().unwrap().text, NAME_PROMPT);

        let reply = handler
            .handle("1", Event::Text("Олена-Мар'я".to_owned()))
            .await
            .unwrap();
        assert_eq!(reply.messages[0].text, "Ім'я змінено на: Олена-Мар'я");
        assert!(reply.messages[1].text.contains("Олена-Мар'я"));

        let profiles = load(&handler).await;
        assert_eq!(profiles["1"].name, "Олена-Мар'я");

        // Session is back to idle: the next text is a weather query.
        let next = handler
            .handle("1", Event::Text("Київ".to_owned()))
            .await
            .unwrap();
        assert!(next.first().unwrap().text.starts_with("Місто: Київ"));
    }

    #[tokio::test]
    async fn test_name_entry_rejects_invalid_and_stays_waiting() {
        let handler = handler("name_invalid", StubWeather::Resolves);
        handler
            .handle("1", Event::Callback(CallbackAction::ChangeName))
            .await
            .unwrap();

        let reply = handler
            .handle("1", Event::Text("123!!!".to_owned()))
            .await
            .unwrap();
        assert_eq!(reply.first().unwrap().text, INVALID_NAME);
        assert_eq!(load(&handler).await.get("1"), None);

        // Still awaiting a name: a valid one is accepted next.
        let reply = handler
            .handle("1", Event::Text("Іван".to_owned()))
            .await
            .unwrap();
        assert_eq!(reply.messages[0].text, "Ім'я змінено на: Іван");
    }

    #[tokio::test]
    async fn test_other_events_reset_name_entry() {
        let handler = handler("name_reset", StubWeather::Resolves);
        handler
            .handle("1", Event::Callback(CallbackAction::ChangeName))
            .await
            .unwrap();
        handler
            .handle("1", Event::Command(Command::Start))
            .await
            .unwrap();

        // The pending name entry was dropped by /start.
        let reply = handler
            .handle("1", Event::Text("Київ".to_owned()))
            .await
            .unwrap();
        assert!(reply.first().unwrap().text.starts_with("Місто:"));
        assert_eq!(load(&handler).await["1"].name, "");
    }

    #[tokio::test]
    async fn test_free_text_success_appends_history_and_offers_add_city() {
        let handler = handler("query_success", StubWeather::Resolves);

        let reply = handler
            .handle("5", Event::Text("Кіїв".to_owned()))
            .await
            .unwrap();

        let first = reply.first().unwrap();
        assert!(first.text.starts_with("Місто: Кіїв"));
        let menu = first.keyboard.as_ref().unwrap();
        assert_eq!(
            menu.rows[0][0].action,
            CallbackAction::AddCity("Кіїв".to_owned())
        );

        let profiles = load(&handler).await;
        assert_eq!(profiles["5"].history.len(), 1);
        assert_eq!(profiles["5"].history[0].query, "Кіїв");
        assert_eq!(profiles["5"].history[0].outcome, QueryOutcome::Success);
    }

    #[tokio::test]
    async fn test_free_text_for_pinned_city_has_no_affordance() {
        let handler = handler("query_pinned", StubWeather::Resolves);
        handler
            .handle("5", Event::Callback(CallbackAction::City("Київ".to_owned())))
            .await
            .unwrap();

        let reply = handler
            .handle("5", Event::Text("Київ".to_owned()))
            .await
            .unwrap();
        assert!(reply.first().unwrap().keyboard.is_none());
    }

    #[tokio::test]
    async fn test_free_text_failure_appends_failed_entry() {
        let handler = handler("query_failed", StubWeather::Unknown);

        let reply = handler
            .handle("5", Event::Text("Нереальне".to_owned()))
            .await
            .unwrap();
        let first = reply.first().unwrap();
        assert_eq!(first.text, CITY_NOT_FOUND);
        assert!(first.keyboard.is_none());

        let profiles = load(&handler).await;
        assert_eq!(profiles["5"].history.len(), 1);
        assert_eq!(profiles["5"].history[0].outcome, QueryOutcome::Failed);
    }

    #[tokio::test]
    async fn test_free_text_provider_down_is_generic_failure() {
        let handler = handler("query_down", StubWeather::Down);

        let reply = handler
            .handle("5", Event::Text("Київ".to_owned()))
            .await
            .unwrap();
        assert_eq!(reply.first().unwrap().text, WEATHER_UNAVAILABLE);
        assert_eq!(
            load(&handler).await["5"].history[0].outcome,
            QueryOutcome::Failed
        );
    }

    #[tokio::test]
    async fn test_invalid_free_text_leaves_no_trace() {
        let handler = handler("query_invalid", StubWeather::Resolves);

        let reply = handler
            .handle("5", Event::Text("Київ!!!".to_owned()))
            .await
            .unwrap();
        assert_eq!(reply.first().unwrap().text, INVALID_CITY_RETRY);
        // No profile was created and nothing was persisted.
        assert!(load(&handler).await.get("5").is_none());
    }

    #[tokio::test]
    async fn test_history_grows_monotonically() {
        let handler = handler("history_grows", StubWeather::Resolves);
        handler.handle("9", Event::Text("Київ".to_owned())).await.unwrap();
        handler.handle("9", Event::Text("Львів".to_owned())).await.unwrap();

        let profiles = load(&handler).await;
        let queries: Vec<&str> = profiles["9"]
            .history
            .iter()
            .map(|e| e.query.as_str())
            .collect();
        assert_eq!(queries, vec!["Київ", "Львів"]);
    }

    #[tokio::test]
    async fn test_history_rendering() {
        let handler = handler("history_render", StubWeather::Resolves);

        let reply = handler
            .handle("9", Event::Callback(CallbackAction::SendHistory))
            .await
            .unwrap();
        assert_eq!(reply.first().unwrap().text, HISTORY_EMPTY);

        handler.handle("9", Event::Text("Київ".to_owned())).await.unwrap();
        let reply = handler
            .handle("9", Event::Callback(CallbackAction::SendHistory))
            .await
            .unwrap();
        let text = &reply.first().unwrap().text;
        assert!(text.starts_with("📜 Твоя історія:"));
        assert!(text.contains("Київ"));
    }

    #[tokio::test]
    async fn test_letter_with_no_cities() {
        let handler = handler("letter_empty", StubWeather::Resolves);

        let reply = handler
            .handle("2", Event::Callback(CallbackAction::Letter("Я".to_owned())))
            .await
            .unwrap();
        let first = reply.first().unwrap();
        assert_eq!(first.text, "Міст не знайдено на літеру 'Я'.");
        assert!(first.keyboard.is_none());
    }

    #[tokio::test]
    async fn test_letter_with_cities_renders_picker() {
        let handler = handler("letter_match", StubWeather::Resolves);

        let reply = handler
            .handle("2", Event::Callback(CallbackAction::Letter("Х".to_owned())))
            .await
            .unwrap();
        let first = reply.first().unwrap();
        assert_eq!(first.text, "Міста на літеру 'Х':");
        assert!(first.keyboard.is_some());
    }

    #[tokio::test]
    async fn test_city_selection_normalizes_dashes() {
        let handler = handler("city_normalize", StubWeather::Resolves);

        let reply = handler
            .handle(
                "3",
                Event::Callback(CallbackAction::City("Івано\u{2011}Франківськ".to_owned())),
            )
            .await
            .unwrap();
        assert_eq!(
            reply.messages[0].text,
            "🏙️ Івано-Франківськ встановлено у профіль!"
        );
        assert_eq!(load(&handler).await["3"].city, "Івано-Франківськ");
    }

    #[tokio::test]
    async fn test_invalid_city_selection_is_rejected() {
        let handler = handler("city_invalid", StubWeather::Resolves);

        let reply = handler
            .handle("3", Event::Callback(CallbackAction::AddCity("<svg>".to_owned())))
            .await
            .unwrap();
        assert_eq!(reply.first().unwrap().text, INVALID_CITY);
        assert_eq!(load(&handler).await.get("3"), None);
    }

    #[tokio::test]
    async fn test_pinned_weather_shortcut_skips_history() {
        let handler = handler("pinned_shortcut", StubWeather::Resolves);
        handler
            .handle("4", Event::Callback(CallbackAction::City("Київ".to_owned())))
            .await
            .unwrap();

        let reply = handler
            .handle(
                "4",
                Event::Callback(CallbackAction::Weather("Київ".to_owned())),
            )
            .await
            .unwrap();
        assert!(reply.first().unwrap().text.starts_with("Місто: Київ"));
        assert!(load(&handler).await["4"].history.is_empty());
    }

    #[tokio::test]
    async fn test_profile_card_placeholders() {
        let handler = handler("profile_card", StubWeather::Resolves);

        let reply = handler
            .handle("8", Event::Command(Command::Profile))
            .await
            .unwrap();
        let first = reply.first().unwrap();
        assert_eq!(
            first.text,
            "👤Профіль👤\nІм'я: Ім'я не задано\nМісто: Місто не задано"
        );
        assert_eq!(first.keyboard.as_ref().unwrap().rows[0][0].label, "✏️Додати ім'я");
    }
}
