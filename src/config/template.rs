//! Shell-sourceable `.env` template rendering for a configuration schema.
//!
//! Template mode is a one-shot startup path: instead of resolving
//! configuration and starting the service, the process prints one
//! `export PREFIX_KEY=<default>` line per option and exits. Typically hung
//! off a CLI flag:
//!
//! ```rust,ignore
//! if cli.print_env_template {
//!     svckit::config::print_env_template_and_exit("MYAPP_", &options);
//! }
//! ```

use super::ConfigOption;

// Inline help comments start at this column when the export line fits.
const HELP_COLUMN: usize = 47;
const INLINE_HELP_MAX_LINE: usize = 45;

/// Render the schema as shell `export` lines, one per option, in schema
/// order.
///
/// Defaults are shell-quoted. Help text becomes a `# comment`: inline,
/// right-padded to column 47, when the export line is 45 characters or
/// shorter; on its own line immediately before the export line otherwise.
pub fn render_env_template(prefix: &str, options: &[ConfigOption]) -> String {
    let mut out = String::new();
    for option in options {
        let env_value = option.as_env_var(option.default.as_ref());
        let line = format!(
            "export {}{}={}",
            prefix,
            option.env_key(),
            shell_quote(&env_value)
        );
        if option.help.is_empty() {
            out.push_str(&line);
            out.push('\n');
        } else {
            let comment = format!("# {}", option.help);
            if line.len() > INLINE_HELP_MAX_LINE {
                out.push_str(&comment);
                out.push('\n');
                out.push_str(&line);
                out.push('\n');
            } else {
                out.push_str(&format!("{:<width$}{}\n", line, comment, width = HELP_COLUMN));
            }
        }
    }
    out
}

/// Print the rendered template to standard output.
pub fn print_env_template(prefix: &str, options: &[ConfigOption]) {
    print!("{}", render_env_template(prefix, options));
}

/// Print the rendered template to standard output, then exit successfully.
///
/// This is the whole of template mode; it never returns to normal startup.
pub fn print_env_template_and_exit(prefix: &str, options: &[ConfigOption]) -> ! {
    print_env_template(prefix, options);
    std::process::exit(0)
}

/// Quote a string for safe use in a shell `export` statement.
///
/// Matches POSIX single-quoting: the empty string becomes `''`, strings made
/// only of shell-safe characters pass through bare, everything else is
/// single-quoted with embedded quotes escaped as `'"'"'`.
pub fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\"'\"'"))
    }
}
