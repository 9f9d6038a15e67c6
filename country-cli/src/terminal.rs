use std::{
    io::{IsTerminal, Write},
    sync::atomic::{AtomicBool, Ordering},
};

use country_core::{DisplayFields, Presenter, display::Link};

/// Presenter that writes to the terminal: loading and errors on stderr,
/// fields on stdout.
#[derive(Debug)]
pub struct TerminalPresenter {
    json: bool,
    hyperlinks: bool,
    stderr_tty: bool,
    loading: AtomicBool,
    shown: AtomicBool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            hyperlinks: std::io::stdout().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            loading: AtomicBool::new(false),
            shown: AtomicBool::new(false),
        }
    }
}

/// What ends the loading line: erase it on a terminal, plain newline otherwise.
fn loading_line_end(stderr_tty: bool) -> &'static str {
    if stderr_tty { "\r\x1b[2K" } else { "\n" }
}

impl Presenter for TerminalPresenter {
    fn clear(&self) {
        self.hide_loading();
        if self.shown.swap(false, Ordering::SeqCst) && !self.json {
            println!("Display cleared.");
        }
    }

    fn show_loading(&self) {
        if !self.loading.swap(true, Ordering::SeqCst) {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "Loading...");
            let _ = err.flush();
        }
    }

    fn hide_loading(&self) {
        if self.loading.swap(false, Ordering::SeqCst) {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "{}", loading_line_end(self.stderr_tty));
            let _ = err.flush();
        }
    }

    fn render(&self, fields: &DisplayFields) {
        self.shown.store(true, Ordering::SeqCst);
        if self.json {
            match serde_json::to_string_pretty(fields) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("Failed to serialize fields: {err}"),
            }
        } else {
            print!("{}", format_table(fields, self.hyperlinks));
        }
    }

    fn notify_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// OSC 8 hyperlink, which terminals open in the browser.
fn hyperlink(link: &Link) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\ ({})", link.href, link.text, link.href)
}

pub fn format_table(fields: &DisplayFields, hyperlinks: bool) -> String {
    let rows = fields.rows();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let value = if label == "Map" && hyperlinks {
            hyperlink(&fields.map_link)
        } else {
            value.to_string()
        };
        out.push_str(&format!("{label:<width$}  {value}\n"));
    }
    out
}
