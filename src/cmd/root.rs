use crate::data::{AppSettings, store};
use crate::ui::calendar_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run(source_override: Option<&str>) -> Result<()> {
    let settings = AppSettings::load()?;
    let source = source_override.unwrap_or(&settings.source).to_string();

    // The store is loaded exactly once, before the terminal enters raw mode.
    // A failure is terminal for the session: the app starts in its error
    // state with navigation disabled.
    let load = store::load(&source);
    let today = Local::now().date_naive();

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let mut app = App::new(load, settings, today, source);
    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // Persist runtime toggles (numeral style) for the next session.
    app.settings.save()?;

    result
}
