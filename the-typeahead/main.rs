mod cli;
mod command;
mod logging;

use std::sync::Arc;

use anyhow::{
  Context,
  Result,
};
use clap::Parser;
use the_typeahead::{
  Config,
  Typeahead,
  coordinator::Origin,
  fetch::{
    Fetcher,
    MemoryFetcher,
    WikipediaFetcher,
  },
  pagination::Advance,
  paths,
};
use the_typeahead_lib::reset::StatePath;
use tokio::io::{
  AsyncBufReadExt,
  BufReader,
};

use crate::{
  cli::Args,
  command::Command,
};

#[tokio::main]
async fn main() -> Result<()> {
  let exit_code = main_impl().await?;
  std::process::exit(exit_code);
}

async fn main_impl() -> Result<i32> {
  let args = Args::parse();
  logging::setup(args.verbosity, args.log_file.clone()).context("failed to set up logging")?;

  let config_file = match args.config_file {
    Some(path) => path,
    None => paths::default_config_file()?,
  };
  let config = Config::load(&config_file).context("failed to load config")?;

  let fetcher: Arc<dyn Fetcher> = if args.offline {
    Arc::new(MemoryFetcher::demo())
  } else {
    Arc::new(WikipediaFetcher::new(&config.search.endpoint)?)
  };
  let session = Typeahead::new(&config, fetcher)?;

  run(session).await?;
  Ok(0)
}

/// Snapshot of what was last printed, to avoid re-rendering unchanged lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
  generation: u64,
  loading:    bool,
  visible:    bool,
  len:        usize,
  start:      usize,
  end:        usize,
}

impl Frame {
  fn of(session: &Typeahead) -> Self {
    let list = session.list();
    Self {
      generation: list.generation(),
      loading:    list.is_loading(),
      visible:    list.is_visible(),
      len:        list.items().len(),
      start:      list.window().start,
      end:        list.window().end,
    }
  }
}

async fn run(mut session: Typeahead) -> Result<()> {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut last_frame = Frame::of(&session);

  loop {
    tokio::select! {
      line = lines.next_line() => {
        let Some(line) = line? else {
          break;
        };
        match Command::parse(&line) {
          Ok(Command::Quit) => break,
          Ok(command) => execute(&mut session, command),
          Err(err) => eprintln!("{err}"),
        }
      },
      alive = session.next_update() => {
        if !alive {
          break;
        }
      },
    }

    let frame = Frame::of(&session);
    if frame != last_frame {
      render(&session);
      last_frame = frame;
    }
  }
  Ok(())
}

fn execute(session: &mut Typeahead, command: Command) {
  match command {
    Command::Input(value) => session.input(&value),
    Command::More => report(&session.load_more()),
    Command::Scroll(scroll_top) => {
      if let Some(advance) = session.scroll_to(scroll_top) {
        report(&advance);
      }
      render(session);
    },
    Command::Select(sn) => {
      match session.select(sn) {
        Some(selected) => {
          println!(
            "selected [{}] {}: {}",
            selected.sn, selected.title, selected.snippet
          )
        },
        None => eprintln!("no suggestion with serial {sn}"),
      }
    },
    Command::Reset(paths) => {
      session.reset(&paths);
      let paths: Vec<_> = paths.iter().map(StatePath::to_string).collect();
      println!("reset {}", paths.join(", "));
    },
    Command::ResetLenient(paths) => session.reset_lenient(paths.split(',')),
    Command::Click(target) => {
      if session.pointer(target) {
        println!("suggestions hidden");
      }
    },
    Command::State => print_state(session),
    Command::Quit => {},
  }
}

fn report(advance: &Advance) {
  match advance {
    Advance::Requested { page, .. } => println!("loading page {page}"),
    Advance::Exhausted {
      current_page,
      total_pages,
    } => println!("no more pages ({current_page}/{total_pages})"),
    Advance::InFlight => println!("still loading"),
    Advance::NoQuery => println!("nothing to page through"),
  }
}

fn render(session: &Typeahead) {
  let list = session.list();
  let query = list.query().unwrap_or_default();
  if list.is_loading() {
    println!("searching {query:?}...");
    return;
  }
  if !list.is_visible() {
    if !list.items().is_empty() {
      return;
    }
    match list.origin() {
      Some(Origin::Failed) => {
        let state = session.state();
        let reason = state
          .last_error()
          .map_or("unknown error", |error| error.message());
        println!("search for {query:?} failed: {reason}");
      },
      Some(Origin::Cache | Origin::Network) => println!("no results for {query:?}"),
      Some(Origin::EmptyQuery) | None => {},
    }
    return;
  }
  let window = list.window();
  println!(
    "{query:?}: rows {}..{} of {} ({})",
    window.start,
    window.end,
    list.items().len(),
    window.css_transform()
  );
  for row in list.rows() {
    println!("  [{:>4}] {}", row.sn, row.title);
  }
}

fn print_state(session: &Typeahead) {
  let store = session.store();
  let state = session.state();
  println!("revision {}", store.revision());
  let mut queries: Vec<_> = state.queries().collect();
  queries.sort_by_key(|(query, _)| *query);
  for (query, results) in queries {
    let pages = state
      .page_info(query)
      .map(|info| {
        let total = info
          .total_pages
          .map_or_else(|| "?".to_owned(), |total| total.to_string());
        format!("page {}/{total}", info.current_page)
      })
      .unwrap_or_default();
    println!("  {query:?}: {} results {pages}", results.len());
  }
  println!(
    "search: {:?}, next page: {:?}",
    state.search_loading(),
    state.next_page_loading()
  );
  if let Some(error) = state.last_error() {
    println!("last error: {error}");
  }
  if let Some(selected) = state.selected_result() {
    match serde_json::to_string_pretty(selected) {
      Ok(json) => println!("selected: {json}"),
      Err(err) => eprintln!("failed to encode selection: {err}"),
    }
  }
  for transition in store.transitions().iter().rev().take(5) {
    println!(
      "  #{} {} {}",
      transition.revision,
      transition.action,
      transition.query.as_deref().unwrap_or_default()
    );
  }
}
