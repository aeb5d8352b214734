#![forbid(unsafe_code)]

//! Hue Demo
//!
//! Loads a configuration and its translations, then walks the settings
//! screen through a fixed script (switch language, flip dark mode, follow
//! the host) and prints each rendered screen.
//!
//! # Running
//!
//! ```sh
//! cargo run -p hue-demo
//! cargo run -p hue-demo -- --locale ar --theme dark
//! HUE_LOG=hue=debug cargo run -p hue-demo
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hue::prelude::*;
use hue::{SettingsScreen, TextDirection};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HUE_LOG";

#[derive(Debug, Parser)]
#[command(name = "hue-demo", about = "Walk the Hue settings screen through a script", version)]
struct Cli {
    /// Configuration file (TOML, or JSON by extension).
    #[arg(default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/hue.toml"))]
    config: PathBuf,

    /// Override the configured theme mode (light, dark, system).
    #[arg(long)]
    theme: Option<ThemeMode>,

    /// Override the configured or detected locale.
    #[arg(long)]
    locale: Option<Locale>,

    /// Start with the host preferring dark appearance.
    #[arg(long)]
    host_dark: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    #[cfg(feature = "json-logs")]
    builder.json().init();
    #[cfg(not(feature = "json-logs"))]
    builder.init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = err.error_type(), "{err}");
            eprintln!("hue-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> hue::Result<()> {
    let config = HueConfig::load(&cli.config)?;
    let host = HostAppearance::new(if cli.host_dark {
        Brightness::Dark
    } else {
        Brightness::Light
    });
    let ctx = AppContext::from_config(&config, host)?;

    if let Some(mode) = cli.theme {
        ctx.settings().set_theme_mode(mode);
    }
    if let Some(locale) = &cli.locale {
        ctx.settings().set_locale(locale.clone());
    }

    let report = ctx.catalog().coverage_report();
    for locale in &report.locales {
        if !locale.missing.is_empty() {
            println!(
                "note: {} is missing {} of {} keys",
                locale.locale,
                locale.missing.len(),
                report.total_keys
            );
        }
    }

    let mut view = SettingsView::new(ctx.clone());
    print_screen("start", &view.view(), &ctx);

    let other = view
        .view()
        .locale_options
        .into_iter()
        .find(|option| !option.selected)
        .map(|option| option.locale);
    if let Some(locale) = other {
        view.update(SettingsMsg::SelectLocale(locale));
        print_screen("language switched", &view.view(), &ctx);
    }

    let dark = !view.view().dark_mode_on;
    view.update(SettingsMsg::ToggleDark(dark));
    print_screen("dark mode toggled", &view.view(), &ctx);

    view.update(SettingsMsg::FollowSystem);
    let flipped = if ctx.host().brightness().is_dark() {
        Brightness::Light
    } else {
        Brightness::Dark
    };
    ctx.host().set_brightness(flipped);
    print_screen("following host", &view.view(), &ctx);

    info!("demo finished");
    Ok(())
}

fn print_screen(step: &str, screen: &SettingsScreen, ctx: &AppContext) {
    let rtl = screen.direction == TextDirection::Rtl;
    let line = |text: &str| {
        if rtl {
            println!("{text:>40}");
        } else {
            println!("{text}");
        }
    };

    println!("── {step} ──");
    line(&format!(
        "{} [{} | primary {} | background {}]",
        screen.title,
        screen.theme.brightness.as_str(),
        screen.theme.primary,
        screen.theme.background
    ));
    let options: Vec<String> = screen
        .locale_options
        .iter()
        .map(|o| {
            if o.selected {
                format!("*{}", o.label)
            } else {
                o.label.clone()
            }
        })
        .collect();
    line(&format!("{}: {}", screen.language_label, options.join(" / ")));
    line(&format!(
        "{}: {}",
        screen.dark_mode_label,
        if screen.dark_mode_on { "on" } else { "off" }
    ));
    line(&format!(
        "{}: {}",
        screen.follow_system_label,
        if screen.following_system { "yes" } else { "no" }
    ));
    line(&ctx.tr_with("home.greeting", &[("name", "Hue")]));
    for count in [0, 1, 5] {
        line(&ctx.tr_plural("home.inbox", count, &[]));
    }
    if let Some(color) = screen.theme.extension_color("status.success") {
        line(&format!("status.success {color}"));
    }
    println!();
}
