// src/main.rs

use clap::Parser;
use indicatif::ProgressBar;
use std::io;
use std::time::{Duration, Instant};
use yellow_snow::cli::Args;
use yellow_snow::config::Config;
use yellow_snow::heat::{Appearance, Palette};
use yellow_snow::renderer::{self, RenderOptions};
use yellow_snow::{logging, Annotator, Result, Session};

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    logging::init(&config.logging.level);
    let start_time = Instant::now();

    if let Err(e) = run(&args, &config) {
        tracing::error!(error = %e, "giving up");
        eprintln!("No history available for {}: {}", args.file.display(), e);
        std::process::exit(1);
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "finished");
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let mut annotate = config.annotate.clone();
    if let Some(git) = &args.git {
        annotate.git = git.clone();
    }

    let annotator = Annotator::new(&annotate);
    let mut session = with_spinner("Annotating", || Session::open(&args.file, annotator))?;

    let moved = with_spinner("Travelling back in time", || navigate(&mut session, args))?;
    if moved.is_none() && args.index.is_some() {
        eprintln!(
            "Change {} does not exist, showing the newest of {}",
            args.index.unwrap_or_default(),
            session.len()
        );
    }

    let appearance = if args.light { Appearance::Light } else { Appearance::Dark };
    let theme = args.theme.unwrap_or(config.display.theme).resolve(appearance);
    let palette = Palette::new(&theme);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.commits {
        renderer::render_commits(&mut out, session.base(), session.index())?;
    } else if args.json {
        renderer::render_json(&mut out, session.base(), session.current(), session.index(), &palette)?;
    } else {
        let options = RenderOptions {
            show_authors: config.display.show_authors && !args.no_authors,
            ..RenderOptions::default()
        };
        renderer::render_lines(&mut out, session.current(), &palette, &options)?;
        renderer::render_position(&mut out, session.base(), session.index())?;
    }

    Ok(())
}

fn navigate(session: &mut Session, args: &Args) -> Result<Option<f64>> {
    if let Some(index) = args.index {
        return session.jump(index);
    }
    if let Some(target) = args.seek {
        return session.seek(target);
    }
    if let Some(delta) = args.step {
        return session.step(delta);
    }
    Ok(None)
}

/// Keeps a spinner on stderr while `work` blocks on git.
fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    let result = work();
    bar.finish_and_clear();
    result
}
