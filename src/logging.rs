use std::io::{self, Write};

use anstyle::{Ansi256Color, AnsiColor, Color, Style};
use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
#[cfg(all(unix, feature = "journald"))]
use systemd_journal_logger::{JournalLog, connected_to_journal, current_exe_identifier};

/// `Oct 18 2026 14:46:23`
const TIMESTAMP_FMT: &str = "%b %d %Y %H:%M:%S";

/// Logger for the command-line tool.
///
/// Messages go to `stderr` (coloured through [`anstream`] when the terminal supports it), or straight to the systemd
/// journal when the process was started by systemd. Only records from this crate are shown; `reqwest` and friends
/// are silenced.
pub struct Logger {
    filter: LevelFilter,
    timestamps: bool,
    #[cfg(all(unix, feature = "journald"))]
    journald: Option<JournalLog>,
}

impl Logger {
    pub fn new(filter: LevelFilter) -> Self {
        let timestamps = !crate::get_var("NAMECHEAP_LOG_NO_TIMESTAMPS").is_ok_and(|v| !v.is_empty());

        #[cfg(all(unix, feature = "journald"))]
        let journald = init_journald();
        // The journal timestamps entries itself.
        #[cfg(all(unix, feature = "journald"))]
        let timestamps = timestamps && journald.is_none();

        Self {
            filter,
            timestamps,
            #[cfg(all(unix, feature = "journald"))]
            journald,
        }
    }

    /// Installs this logger as the global [`log`] backend.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.filter;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }

    fn try_log(&self, record: &Record) -> io::Result<()> {
        if !record.target().starts_with(env!("CARGO_CRATE_NAME")) || !self.enabled(record.metadata()) {
            return Ok(());
        }

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            return journald.journal_send(record);
        }

        let mut output = anstream::stderr().lock();
        let (style, tag) = level_style(record.level());

        if self.timestamps {
            write!(output, "{} ", Local::now().format(TIMESTAMP_FMT))?;
        }

        writeln!(output, "{} {style}{tag} {}{style:#}", record.target(), record.args())?;
        output.flush()
    }
}

/// Colours follow systemd's `journalctl` output for the matching syslog priority.
#[rustfmt::skip]
fn level_style(level: Level) -> (Style, &'static str) {
    const GREY: Color = Color::Ansi256(Ansi256Color(245));
    const KHAKI: Color = Color::Ansi256(Ansi256Color(185));
    const RED: Color = Color::Ansi(AnsiColor::Red);

    match level {
        Level::Trace => (Style::new().fg_color(Some(GREY)),        "[trace]"),
        Level::Debug => (Style::new(),                             "[debug]"),
        Level::Info  => (Style::new().bold(),                      "[info]"),
        Level::Warn  => (Style::new().fg_color(Some(KHAKI)).bold(), "[warn]"),
        Level::Error => (Style::new().fg_color(Some(RED)).bold(),   "[error]"),
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        let _ = self.try_log(record);
    }

    fn flush(&self) {
        let _ = anstream::stderr().flush();

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            <JournalLog as Log>::flush(journald);
        }
    }
}

#[cfg(all(unix, feature = "journald"))]
fn init_journald() -> Option<JournalLog> {
    if !connected_to_journal() {
        return None;
    }

    let identifier = current_exe_identifier().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let logger = JournalLog::empty()
        .ok()?
        .with_syslog_identifier(identifier)
        .add_extra_field("version", env!("CARGO_PKG_VERSION"));
    Some(logger)
}
