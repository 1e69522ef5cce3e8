//! Application glue between the session core and the outside world.
//!
//! All mutation goes through the shared `Arc<Mutex<App>>`: keyboard input,
//! countdown ticks and fetch completions each lock it, apply a session
//! transition, and release. The mutex serializes those event sources, and
//! the session's resolve-once lock plus the countdown generation counter
//! make a late tick racing a click harmless in either order.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::models::{Category, Difficulty, Question};
use crate::session::{Phase, QuizSession};
use crate::source::{FetchError, OpenTdbClient, QuestionFilters, QuestionSource};
use crate::store::{self, FileStore, KeyValueStore, NAME_KEY};
use crate::summary::Summary;
use crate::terminal;
use crate::ui;

/// Shared application state.
pub type SharedApp = Arc<Mutex<App>>;

/// Pause between a successful fetch and the first question, so the
/// loading screen does not just flash.
const LOADING_REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// Longest accepted player name.
const NAME_MAX_LENGTH: usize = 24;

/// Difficulty choices cycled on the welcome screen; index 0 is "any".
const DIFFICULTY_CHOICES: [Option<Difficulty>; 4] = [
    None,
    Some(Difficulty::Easy),
    Some(Difficulty::Medium),
    Some(Difficulty::Hard),
];

/// Which screen to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Loading,
    Quiz,
    Result,
}

/// Options handed over from the command line.
pub struct RunOptions {
    pub name: Option<String>,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub store_path: std::path::PathBuf,
}

pub struct App {
    pub session: QuizSession,
    pub store: FileStore,
    pub categories: Vec<Category>,
    pub name_input: String,
    /// 0 = any category, otherwise `categories[index - 1]`.
    pub category_index: usize,
    /// Index into [`DIFFICULTY_CHOICES`].
    pub difficulty_index: usize,
    pub selected_option: usize,
    pub high_score: usize,
    pub summary: Option<Summary>,
    pub error: Option<String>,
    pub loading_since: Option<Instant>,
    pub should_quit: bool,
    /// Category id requested on the command line, resolved to an index
    /// once the directory arrives.
    preset_category: Option<u32>,
    /// Identifies the countdown allowed to tick the session. Bumped to
    /// cancel: a task holding a stale generation exits without touching
    /// anything.
    timer_generation: u64,
    /// Identifies the fetch attempt allowed to start or fail the quiz.
    /// Bumped whenever loading starts or is abandoned, so a slow response
    /// from an earlier attempt cannot start a quiz with the wrong
    /// questions, nor abort a later attempt with its stale error.
    fetch_generation: u64,
    rng: StdRng,
}

impl App {
    pub fn new(options: RunOptions) -> Self {
        let store = FileStore::open(&options.store_path);
        let name_input = options
            .name
            .or_else(|| store.get(NAME_KEY))
            .unwrap_or_default();
        let high_score = store::high_score(&store);
        let difficulty_index = DIFFICULTY_CHOICES
            .iter()
            .position(|d| *d == options.difficulty)
            .unwrap_or(0);

        Self {
            session: QuizSession::new(),
            store,
            categories: Vec::new(),
            name_input,
            category_index: 0,
            difficulty_index,
            selected_option: 0,
            high_score,
            summary: None,
            error: None,
            loading_since: None,
            should_quit: false,
            preset_category: options.category,
            timer_generation: 0,
            fetch_generation: 0,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.session.phase() {
            Phase::Idle => Screen::Welcome,
            Phase::Loading => Screen::Loading,
            Phase::InProgress => Screen::Quiz,
            Phase::Completed => Screen::Result,
        }
    }

    /// Category and difficulty currently selected on the welcome screen.
    pub fn filters(&self) -> QuestionFilters {
        let category = self
            .category_index
            .checked_sub(1)
            .and_then(|i| self.categories.get(i))
            .map(|c| c.id);
        QuestionFilters {
            category,
            difficulty: DIFFICULTY_CHOICES[self.difficulty_index],
        }
    }

    /// Display name of the selected category.
    pub fn category_label(&self) -> &str {
        self.category_index
            .checked_sub(1)
            .and_then(|i| self.categories.get(i))
            .map(|c| c.name.as_str())
            .unwrap_or("Any Category")
    }

    /// Display name of the selected difficulty.
    pub fn difficulty_label(&self) -> &str {
        match DIFFICULTY_CHOICES[self.difficulty_index] {
            None => "Any Difficulty",
            Some(Difficulty::Easy) => "Easy",
            Some(Difficulty::Medium) => "Medium",
            Some(Difficulty::Hard) => "Hard",
        }
    }

    fn set_categories(&mut self, categories: Vec<Category>) {
        if let Some(id) = self.preset_category {
            self.category_index = categories
                .iter()
                .position(|c| c.id == id)
                .map(|i| i + 1)
                .unwrap_or(0);
        }
        self.categories = categories;
    }

    /// Invalidate any outstanding countdown and return the generation a
    /// new one should carry.
    fn bump_timer_generation(&mut self) -> u64 {
        self.timer_generation += 1;
        self.timer_generation
    }

    /// Shuffle and show the question at the cursor. Returns the countdown
    /// generation for the caller to spawn a ticker with.
    fn present_current(&mut self) -> u64 {
        self.selected_option = 0;
        let generation = self.bump_timer_generation();
        self.session.present_question(&mut self.rng);
        generation
    }

    /// Enter loading for a new fetch attempt. Returns the attempt token
    /// the fetch continuation must present in [`App::apply_fetch_result`].
    fn begin_attempt(&mut self, name: &str) -> Option<u64> {
        if !self.session.begin_loading(name) {
            return None;
        }
        self.fetch_generation += 1;
        self.loading_since = Some(Instant::now());
        Some(self.fetch_generation)
    }

    /// Abandon the loading screen. The outstanding attempt's token is
    /// invalidated; its response will be discarded on arrival.
    fn cancel_loading(&mut self) {
        self.fetch_generation += 1;
        self.session.load_failed();
        self.loading_since = None;
    }

    /// Apply a completed fetch for `attempt`. A stale attempt (abandoned,
    /// or superseded by a retry) is discarded without touching the
    /// session. On a live successful attempt the quiz starts and the
    /// countdown generation to spawn a ticker with is returned.
    fn apply_fetch_result(
        &mut self,
        attempt: u64,
        result: Result<Vec<Question>, FetchError>,
    ) -> Option<u64> {
        if attempt != self.fetch_generation {
            return None;
        }

        match result {
            Ok(questions) => {
                if !self.session.begin(questions) {
                    return None;
                }
                self.loading_since = None;
                Some(self.present_current())
            }
            Err(e) => {
                self.session.load_failed();
                self.loading_since = None;
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// One countdown tick on behalf of the ticker holding `generation`.
    /// Returns false once the ticker should stop: its generation was
    /// invalidated, the question resolved, or the countdown ran out.
    fn countdown_tick(&mut self, generation: u64) -> bool {
        if self.timer_generation != generation {
            return false;
        }
        match self.session.tick() {
            Some(0) => {
                if self.session.timer_expired() {
                    self.bump_timer_generation();
                }
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Leave the quiz or result screen for the welcome screen.
    fn teardown(&mut self) {
        self.bump_timer_generation();
        self.fetch_generation += 1;
        self.session.reset();
        self.summary = None;
        self.error = None;
        self.loading_since = None;
        self.high_score = store::high_score(&self.store);
    }

    /// Build the summary once the last question is advanced past.
    fn complete(&mut self) {
        self.summary = self.session.finalize(&mut self.store);
        self.high_score = store::high_score(&self.store);
    }
}

/// Run the quiz TUI until the player quits.
pub async fn run(options: RunOptions) -> io::Result<()> {
    let app: SharedApp = Arc::new(Mutex::new(App::new(options)));
    spawn_category_fetch(Arc::clone(&app));

    let mut term = terminal::init()?;
    let result = run_tui(&app, &mut term).await;
    terminal::restore()?;
    result
}

async fn run_tui(app: &SharedApp, term: &mut terminal::AppTerminal) -> io::Result<()> {
    loop {
        {
            let guard = app.lock().await;
            if guard.should_quit {
                return Ok(());
            }
            term.draw(|frame| ui::render(frame, &guard))?;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, key.code).await;
            }
        }
    }
}

/// Dispatch a key press according to the current screen.
async fn handle_input(app: &SharedApp, key: KeyCode) {
    let mut guard = app.lock().await;
    match guard.screen() {
        Screen::Welcome => handle_welcome_input(app, &mut guard, key),
        Screen::Loading => handle_loading_input(&mut guard, key),
        Screen::Quiz => handle_quiz_input(app, &mut guard, key),
        Screen::Result => handle_result_input(&mut guard, key),
    }
}

fn handle_welcome_input(app: &SharedApp, guard: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') if guard.name_input.is_empty() => {
            guard.should_quit = true;
        }
        KeyCode::Char(c) => {
            if guard.name_input.chars().count() < NAME_MAX_LENGTH {
                guard.name_input.push(c);
            }
            guard.error = None;
        }
        KeyCode::Backspace => {
            guard.name_input.pop();
            guard.error = None;
        }
        KeyCode::Left => {
            let choices = guard.categories.len() + 1;
            guard.category_index = (guard.category_index + choices - 1) % choices;
        }
        KeyCode::Right => {
            let choices = guard.categories.len() + 1;
            guard.category_index = (guard.category_index + 1) % choices;
        }
        KeyCode::Up => {
            let choices = DIFFICULTY_CHOICES.len();
            guard.difficulty_index = (guard.difficulty_index + choices - 1) % choices;
        }
        KeyCode::Down => {
            guard.difficulty_index = (guard.difficulty_index + 1) % DIFFICULTY_CHOICES.len();
        }
        KeyCode::Enter => {
            let name = guard.name_input.trim().to_string();
            if name.is_empty() {
                guard.error = Some("Enter a name to play".to_string());
                return;
            }

            guard.store.set(NAME_KEY, &name);
            guard.error = None;
            let filters = guard.filters();
            if let Some(attempt) = guard.begin_attempt(&name) {
                spawn_question_fetch(Arc::clone(app), filters, attempt);
            }
        }
        KeyCode::Esc => {
            guard.should_quit = true;
        }
        _ => {}
    }
}

fn handle_loading_input(guard: &mut App, key: KeyCode) {
    // Backing out returns to the welcome screen; the outstanding fetch's
    // attempt token is invalidated so its response is discarded.
    if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
        guard.cancel_loading();
    }
}

fn handle_quiz_input(app: &SharedApp, guard: &mut App, key: KeyCode) {
    if guard.session.is_locked() {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                if guard.session.advance() {
                    if guard.session.phase() == Phase::Completed {
                        guard.bump_timer_generation();
                        guard.complete();
                    } else {
                        let generation = guard.present_current();
                        spawn_countdown(Arc::clone(app), generation);
                    }
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => guard.should_quit = true,
            KeyCode::Esc => guard.teardown(),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            let count = guard.session.options().len();
            if count > 0 {
                guard.selected_option = (guard.selected_option + count - 1) % count;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let count = guard.session.options().len();
            if count > 0 {
                guard.selected_option = (guard.selected_option + 1) % count;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let selected = guard.selected_option;
            if guard.session.submit_answer(selected).is_some() {
                guard.bump_timer_generation();
            }
        }
        KeyCode::Char('s') => {
            if guard.session.skip() {
                guard.bump_timer_generation();
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => guard.should_quit = true,
        KeyCode::Esc => guard.teardown(),
        _ => {}
    }
}

fn handle_result_input(guard: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => guard.teardown(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => guard.should_quit = true,
        _ => {}
    }
}

/// Populate the category dropdown, best-effort.
fn spawn_category_fetch(app: SharedApp) {
    tokio::spawn(async move {
        let client = OpenTdbClient::new();
        match client.list_categories().await {
            Ok(categories) => {
                let mut guard = app.lock().await;
                guard.set_categories(categories);
            }
            Err(e) => log::warn!("category fetch failed: {}", e),
        }
    });
}

/// Fetch the question set for one attempt, then hand the outcome to
/// [`App::apply_fetch_result`], which discards it if the attempt is no
/// longer the live one.
fn spawn_question_fetch(app: SharedApp, filters: QuestionFilters, attempt: u64) {
    tokio::spawn(async move {
        let client = OpenTdbClient::new();
        let result = client.fetch_questions(filters).await;
        if result.is_ok() {
            tokio::time::sleep(LOADING_REVEAL_DELAY).await;
        }

        let mut guard = app.lock().await;
        if let Some(generation) = guard.apply_fetch_result(attempt, result) {
            spawn_countdown(Arc::clone(&app), generation);
        }
    });
}

/// Tick the session once per second until the question resolves, the
/// countdown expires, or the generation is invalidated.
fn spawn_countdown(app: SharedApp, generation: u64) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut guard = app.lock().await;
            if !guard.countdown_tick(generation) {
                return;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QUESTION_SECONDS;

    fn test_app(tag: &str) -> App {
        let store_path = std::env::temp_dir().join(format!("trivia_app_{}.json", tag));
        let _ = std::fs::remove_file(&store_path);
        App::new(RunOptions {
            name: Some("Ada".into()),
            category: None,
            difficulty: None,
            store_path,
        })
    }

    fn make_questions(label: &str) -> Vec<Question> {
        (0..3)
            .map(|i| Question {
                prompt: format!("{} question {}?", label, i),
                correct_answer: format!("{} right {}", label, i),
                incorrect_answers: vec![
                    format!("{} wrong {}a", label, i),
                    format!("{} wrong {}b", label, i),
                    format!("{} wrong {}c", label, i),
                ],
            })
            .collect()
    }

    #[test]
    fn test_stale_fetch_success_is_discarded() {
        let mut app = test_app("stale_success");
        let first = app.begin_attempt("Ada").unwrap();
        app.cancel_loading();
        let second = app.begin_attempt("Ada").unwrap();
        assert_ne!(first, second);

        // The abandoned attempt's response arrives late. It must not
        // start the quiz.
        assert_eq!(app.apply_fetch_result(first, Ok(make_questions("old"))), None);
        assert_eq!(app.screen(), Screen::Loading);

        // The live attempt still starts normally, with its own questions.
        assert!(app.apply_fetch_result(second, Ok(make_questions("new"))).is_some());
        assert_eq!(app.screen(), Screen::Quiz);
        let prompt = &app.session.current_question().unwrap().prompt;
        assert!(prompt.starts_with("new"));
    }

    #[test]
    fn test_stale_fetch_error_does_not_abort_live_attempt() {
        let mut app = test_app("stale_error");
        let first = app.begin_attempt("Ada").unwrap();
        app.cancel_loading();
        let second = app.begin_attempt("Ada").unwrap();

        assert_eq!(
            app.apply_fetch_result(first, Err(FetchError::Timeout)),
            None
        );
        assert_eq!(app.screen(), Screen::Loading);
        assert!(app.error.is_none());

        assert!(app.apply_fetch_result(second, Ok(make_questions("live"))).is_some());
        assert_eq!(app.screen(), Screen::Quiz);
    }

    #[test]
    fn test_live_fetch_error_returns_to_welcome() {
        let mut app = test_app("live_error");
        let attempt = app.begin_attempt("Ada").unwrap();

        assert_eq!(
            app.apply_fetch_result(attempt, Err(FetchError::EmptyResult)),
            None
        );
        assert_eq!(app.screen(), Screen::Welcome);
        assert!(app.error.is_some());
        assert!(app.loading_since.is_none());
    }

    #[test]
    fn test_teardown_invalidates_outstanding_fetch() {
        let mut app = test_app("teardown_fetch");
        let attempt = app.begin_attempt("Ada").unwrap();
        app.teardown();

        assert_eq!(app.apply_fetch_result(attempt, Ok(make_questions("x"))), None);
        assert_eq!(app.screen(), Screen::Welcome);
    }

    #[test]
    fn test_countdown_tick_only_honours_live_generation() {
        let mut app = test_app("countdown");
        let attempt = app.begin_attempt("Ada").unwrap();
        let generation = app
            .apply_fetch_result(attempt, Ok(make_questions("q")))
            .unwrap();

        assert!(app.countdown_tick(generation));
        assert_eq!(app.session.seconds_remaining(), QUESTION_SECONDS - 1);

        // A ticker surviving from an earlier question must not decrement.
        assert!(!app.countdown_tick(generation - 1));
        assert_eq!(app.session.seconds_remaining(), QUESTION_SECONDS - 1);
    }

    #[test]
    fn test_countdown_tick_stops_after_teardown() {
        let mut app = test_app("countdown_teardown");
        let attempt = app.begin_attempt("Ada").unwrap();
        let generation = app
            .apply_fetch_result(attempt, Ok(make_questions("q")))
            .unwrap();
        app.teardown();

        assert!(!app.countdown_tick(generation));
        assert_eq!(app.screen(), Screen::Welcome);
    }

    #[test]
    fn test_countdown_reaching_zero_resolves_question() {
        let mut app = test_app("countdown_zero");
        let attempt = app.begin_attempt("Ada").unwrap();
        let generation = app
            .apply_fetch_result(attempt, Ok(make_questions("q")))
            .unwrap();

        for _ in 0..QUESTION_SECONDS - 1 {
            assert!(app.countdown_tick(generation));
        }
        // The final tick expires the timer and stops the ticker.
        assert!(!app.countdown_tick(generation));
        assert!(app.session.is_locked());
        assert!(app.session.answers()[0].was_skipped_or_timed_out);
    }
}
