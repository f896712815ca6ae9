//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so styling stays
//! consistent across commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};

use crate::backup::PasswordStrength;
use crate::otp::countdown::{is_expiring_soon, remaining_seconds_at, CountdownSnapshot};
use crate::otp::{format_code, generate_with, TotpParams};
use crate::store::Credential;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print every credential with its code at `now_ms`.
pub fn print_credentials_table(credentials: &[Credential], params: &TotpParams, now_ms: u64) {
    if credentials.is_empty() {
        info("No credentials yet.");
        tip("Run `totpvault add <NAME> <SECRET>` to add your first one.");
        return;
    }

    let remaining = remaining_seconds_at(now_ms, params.period);
    let expiring = is_expiring_soon(remaining);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Code", "Expires", "Added"]);

    for c in credentials {
        let code = format_code(&generate_with(&c.secret, now_ms, params));
        let expires = Cell::new(format!("{remaining}s"));
        table.add_row(vec![
            Cell::new(&c.name),
            Cell::new(code),
            if expiring { expires.fg(Color::Red) } else { expires },
            Cell::new(c.created_at.format("%Y-%m-%d").to_string()),
        ]);
    }

    println!("{table}");
}

/// One `watch` row: name, grouped code, seconds left and a bar.
pub fn watch_line(name: &str, name_width: usize, code: &str, snapshot: &CountdownSnapshot) -> String {
    const BAR_WIDTH: usize = 20;

    let filled = ((snapshot.progress_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "\u{2588}".repeat(filled.min(BAR_WIDTH)),
        "\u{2591}".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
    );
    let seconds = format!("{:>2}s", snapshot.remaining_seconds);

    if snapshot.is_expiring_soon {
        format!(
            "{name:<name_width$}  {}  {}  {}",
            style(format_code(code)).bold(),
            style(seconds).red(),
            style(bar).red()
        )
    } else {
        format!(
            "{name:<name_width$}  {}  {}  {}",
            style(format_code(code)).bold(),
            seconds,
            style(bar).green()
        )
    }
}

/// Colored label for a password rating.
pub fn strength_label(strength: PasswordStrength) -> StyledObject<String> {
    let label = strength.to_string();
    match strength {
        PasswordStrength::Weak => style(label).red().bold(),
        PasswordStrength::Medium => style(label).yellow().bold(),
        PasswordStrength::Strong => style(label).green().bold(),
    }
}
