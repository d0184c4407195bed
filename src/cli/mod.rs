pub mod date_arg;
pub mod record;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use date_arg::{DateArg, DateStyle};
use record::{parse_pairs, prompt_entries, UsageEntry};
use report::{
    render_calendar, render_daily_status, render_remaining, render_summary,
    render_weekly_status, Palette,
};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::{
    ledger::{Category, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS},
    storage::{
        ledger_storage::{JsonLedgerStorage, LedgerStorage},
        limits_config::load_limits,
    },
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, LogOptions},
        time::{date_to_key, week_start},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Screentime", version, long_about = None)]
#[command(about = "Application for tracking daily screen time against limits", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(long, global = true, help = "Don't color reports")]
    plain: bool,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Record usage for a day, replacing what was recorded before. Prompts for every category when no values are given"
    )]
    Record {
        #[command(flatten)]
        date: DateArg,
        #[arg(value_name = "CATEGORY=MINUTES", help = "For example games=90 education=120")]
        entries: Vec<String>,
    },
    #[command(about = "Show a calendar sheet of the last days")]
    Calendar {
        #[command(flatten)]
        date: DateArg,
        #[arg(
            long,
            default_value_t = DEFAULT_WINDOW_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS as i64),
            help = "Number of days to show"
        )]
        days: u32,
    },
    #[command(about = "Check usage of a day against daily limits")]
    Status {
        #[command(flatten)]
        date: DateArg,
    },
    #[command(about = "Check usage from Monday through the date against weekly limits")]
    Week {
        #[command(flatten)]
        date: DateArg,
    },
    #[command(about = "Show time left for every limited category")]
    Remaining {
        #[command(flatten)]
        date: DateArg,
    },
    #[command(about = "List every recorded day")]
    Summary {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, ensure_dir)?;

    enable_logging(LogOptions::cli(&app_dir.join("logs"), args.log))?;

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    execute(args, &app_dir, &DefaultClock, &mut input, &mut output).await
}

/// Runs a single command against the ledger stored in `app_dir`. Prompts are read from `input`,
/// everything the user should see goes into `output`.
async fn execute(
    args: Args,
    app_dir: &Path,
    clock: &dyn Clock,
    input: &mut (impl AsyncBufRead + Unpin),
    output: &mut (impl AsyncWrite + Unpin),
) -> Result<()> {
    let now = clock.now();
    let palette = Palette::new(args.plain);
    let storage = JsonLedgerStorage::new(app_dir);
    let mut ledger = storage.load(load_limits(app_dir).await).await?;

    let text = match args.commands {
        Commands::Record { date, entries } => {
            let date = date.resolve(now, args.date_style)?;
            let mut text = String::new();
            let entries = if entries.is_empty() {
                output
                    .write_all(format!("Entering usage for {}:\n", date_to_key(date)).as_bytes())
                    .await?;
                // Prompts already told the user about every bad answer.
                prompt_entries(input, output).await?
            } else {
                let entries = parse_pairs(&entries)?;
                for UsageEntry { category, .. } in entries.iter().filter(|v| !v.accepted) {
                    text += &format!("Invalid value for {category}, recorded 0.\n");
                }
                entries
            };

            ledger.record_usage(date, entries.into_iter().map(|v| (v.category, v.minutes)));
            storage.save(&ledger).await?;
            info!("Recorded usage for {date}");

            text += &format!("Saved usage for {}.\n", date_to_key(date));
            text
        }
        Commands::Calendar { date, days } => {
            let date = date.resolve(now, args.date_style)?;
            render_calendar(&ledger.recent_window(date, days), palette)
        }
        Commands::Status { date } => {
            let date = date.resolve(now, args.date_style)?;
            render_daily_status(
                date,
                ledger.has_entry(date),
                &ledger.daily_status(date),
                palette,
            )
        }
        Commands::Week { date } => {
            let date = date.resolve(now, args.date_style)?;
            render_weekly_status(week_start(date), date, &ledger.weekly_status(date), palette)
        }
        Commands::Remaining { date } => {
            let date = date.resolve(now, args.date_style)?;
            let remaining = Category::ALL
                .into_iter()
                .map(|category| (category, ledger.remaining(date, category)))
                .collect::<Vec<_>>();
            render_remaining(date, &remaining, palette)
        }
        Commands::Summary {} => render_summary(ledger.entries()),
    };

    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
