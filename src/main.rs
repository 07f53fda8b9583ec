//! Terminal driver for a pixfeed session.
//!
//! A line-oriented stand-in for a real UI. Each plain line is the new content
//! of the search box and goes through the debouncer; `:`-prefixed commands
//! drive the category, the filters and scrolling.
//!
//! ```text
//! stdin ──lines──▶ debouncer ──terms──┐
//!   │                                 ▼
//!   └──commands──────────────▶ FeedSession ──▶ render
//!                                     ▲
//!                    worker replies ──┘
//! ```
//!
//! # Commands
//!
//! - `<text>`: set search box text (empty line clears it)
//! - `:cat [name]`: select a category, or clear it
//! - `:filter key=value ...`: apply a facet set
//! - `:clear key`: remove one facet
//! - `:reset`: remove all facets
//! - `:more`: scroll to the end of the list
//! - `:back`: scroll away from the end
//! - `:scroll content viewport offset`: report a raw scroll position
//! - `:show`: print the feed
//! - `:q`: quit

#![allow(clippy::multiple_crate_versions)]

use pixfeed::domain::query::FACET_NAMES;
use pixfeed::input::{spawn_search_debouncer, ScrollMetrics, SearchInput};
use pixfeed::worker::FetchReply;
use pixfeed::{Config, Event, Facets, FeedSession};
use tokio::io::{AsyncBufReadExt, BufReader};

/// How many items `render` prints.
const VISIBLE_ITEMS: usize = 12;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Search(SearchInput),
    Feed(Event),
    Show,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let Some(command) = line.strip_prefix(':') else {
        return if line.is_empty() {
            Command::Search(SearchInput::Clear)
        } else {
            Command::Search(SearchInput::Keystroke(line.to_string()))
        };
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (name, args.as_slice()) {
        ("cat", []) => Command::Feed(Event::CategoryChanged(None)),
        ("cat", [category]) => Command::Feed(Event::CategoryChanged(Some((*category).to_string()))),
        ("filter", pairs) if !pairs.is_empty() => parse_facets(pairs)
            .map_or_else(Command::Invalid, |facets| Command::Feed(Event::FiltersApplied(facets))),
        ("clear", [facet]) => Command::Feed(Event::FilterCleared((*facet).to_string())),
        ("reset", []) => Command::Feed(Event::FiltersReset),
        ("more", []) => Command::Feed(Event::ScrollNearEnd),
        ("back", []) => Command::Feed(Event::ScrollRetreated),
        ("scroll", [content, viewport, offset]) => {
            match (content.parse(), viewport.parse(), offset.parse()) {
                (Ok(content), Ok(viewport), Ok(offset)) => {
                    Command::Feed(Event::Scrolled(ScrollMetrics::new(content, viewport, offset)))
                }
                _ => Command::Invalid("scroll expects three numbers".to_string()),
            }
        }
        ("show", []) => Command::Show,
        ("help" | "h", []) => Command::Help,
        ("q" | "quit", []) => Command::Quit,
        _ => Command::Invalid(format!("unknown command :{command}")),
    }
}

fn parse_facets(pairs: &[&str]) -> Result<Facets, String> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, value)| !key.is_empty() && !value.is_empty())
                .ok_or_else(|| format!("expected key=value, got {pair:?}"))?;
            if !FACET_NAMES.contains(&key) {
                return Err(format!(
                    "unknown facet {key:?}, expected one of {}",
                    FACET_NAMES.join(", ")
                ));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn print_help() {
    println!("text            set search text (empty line clears)");
    println!(":cat [name]     select or clear a category");
    println!(":filter k=v ..  apply facets ({})", FACET_NAMES.join(", "));
    println!(":clear k        remove one facet");
    println!(":reset          remove all facets");
    println!(":more / :back   scroll to / away from the end");
    println!(":scroll c v o   raw scroll position");
    println!(":show           print the feed");
    println!(":q              quit");
}

fn config_from_args() -> pixfeed::Result<Config> {
    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (Some("--config"), Some(path)) => {
            let path = pixfeed::infrastructure::expand_tilde(&path);
            Ok(Config::from_file(path)?.with_overrides(|key| std::env::var(key).ok()))
        }
        (None, _) => Config::load(),
        _ => Err(pixfeed::FeedError::Config(
            "usage: pixfeed [--config <path>]".to_string(),
        )),
    }
}

fn show(session: &mut FeedSession) {
    for notice in session.take_notices() {
        eprintln!("! {} failed: {}", notice.mode, notice.message);
    }
    pixfeed::ui::render(&session.snapshot(), VISIBLE_ITEMS);
}

enum Input {
    Line(Option<String>),
    Committed(Option<String>),
    Reply(Option<FetchReply>),
}

#[tokio::main]
async fn main() -> pixfeed::Result<()> {
    let config = config_from_args()?;
    match pixfeed::observability::init_tracing(&config) {
        Ok(path) => eprintln!("traces: {}", path.display()),
        Err(e) => eprintln!("tracing disabled: {e}"),
    }

    let mut session = pixfeed::initialize(&config)?;
    let (search_input, mut committed) = spawn_search_debouncer(config.search_debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    session.handle(&Event::Start)?;
    print_help();

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            term = committed.recv() => Input::Committed(term),
            reply = session.next_reply(), if session.outstanding() > 0 => Input::Reply(reply),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => match parse_command(line.trim()) {
                Command::Search(input) => {
                    if search_input.send(input).is_err() {
                        tracing::warn!("search debouncer stopped");
                    }
                }
                Command::Feed(event) => {
                    if session.handle(&event)? {
                        show(&mut session);
                    }
                }
                Command::Show => show(&mut session),
                Command::Help => print_help(),
                Command::Quit => break,
                Command::Invalid(message) => eprintln!("? {message}"),
            },
            Input::Committed(Some(term)) => {
                tracing::debug!(term = %term, "search committed from input");
                session.handle(&Event::SearchCommitted(term))?;
            }
            Input::Committed(None) => break,
            Input::Reply(Some(reply)) => {
                if session.handle(&Event::FetchCompleted(reply))? {
                    show(&mut session);
                }
            }
            Input::Reply(None) => {}
        }
    }

    tracing::info!(items = session.state().items().len(), "session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_go_to_the_search_box() {
        assert_eq!(
            parse_command("red fox"),
            Command::Search(SearchInput::Keystroke("red fox".into()))
        );
        assert_eq!(parse_command(""), Command::Search(SearchInput::Clear));
    }

    #[test]
    fn commands_map_to_events() {
        assert_eq!(
            parse_command(":cat nature"),
            Command::Feed(Event::CategoryChanged(Some("nature".into())))
        );
        assert_eq!(parse_command(":cat"), Command::Feed(Event::CategoryChanged(None)));
        assert_eq!(parse_command(":more"), Command::Feed(Event::ScrollNearEnd));
        assert_eq!(
            parse_command(":clear colors"),
            Command::Feed(Event::FilterCleared("colors".into()))
        );
        assert_eq!(parse_command(":q"), Command::Quit);
    }

    #[test]
    fn filter_parses_all_pairs() {
        let expected: Facets = [
            ("order".to_string(), "popular".to_string()),
            ("colors".to_string(), "red".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            parse_command(":filter order=popular colors=red"),
            Command::Feed(Event::FiltersApplied(expected))
        );
        assert!(matches!(parse_command(":filter order"), Command::Invalid(_)));
        assert!(matches!(parse_command(":filter size=large"), Command::Invalid(_)));
        assert!(matches!(parse_command(":filter"), Command::Invalid(_)));
    }

    #[test]
    fn scroll_needs_three_numbers() {
        assert_eq!(
            parse_command(":scroll 2000 800 1199.5"),
            Command::Feed(Event::Scrolled(ScrollMetrics::new(2000.0, 800.0, 1199.5)))
        );
        assert!(matches!(parse_command(":scroll 1 2"), Command::Invalid(_)));
        assert!(matches!(parse_command(":scroll a b c"), Command::Invalid(_)));
    }
}
