//! wkhtmltopdf command construction.
//!
//! [`WkCommand`] turns a [`PdfOptions`] set into the program path and a list
//! of discrete arguments, in this fixed order:
//!
//! ```text
//! <binary>
//!   [--copies N]            copies > 1
//!   --orientation <value>
//!   --page-size <value>
//!   [--toc]                 toc == true
//!   [--grayscale]           grayscale == true
//!   [--password <value>]    password set
//!   [--username <value>]    username set
//!   [--footer-<key> <value>]...
//!   [--header-<key> <value>]...
//!   --title <value>
//!   <input>
//!   -
//! ```
//!
//! Arguments are handed to the OS directly, never through a shell, so
//! header/footer text, credentials and the title cannot inject commands.
//! [`WkCommand::to_shell_string`] reproduces the quoted one-line form for logs.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::options::{PdfOptions, keys};

/// Placeholder argument standing for the source file path.
pub const INPUT_PLACEHOLDER: &str = "%input%";

/// Final argument telling wkhtmltopdf to write the PDF to stdout.
pub const STDOUT_TARGET: &str = "-";

/// Stands in for credential values in [`WkCommand::to_shell_string`].
pub const REDACTED: &str = "[REDACTED]";

const CREDENTIAL_FLAGS: [&str; 2] = ["--username", "--password"];

/// Header/footer sub-keys passed through to wkhtmltopdf. Others are dropped.
pub const SECTION_KEYS: [&str; 8] = [
    "left",
    "right",
    "center",
    "font-name",
    "html",
    "line",
    "spacing",
    "font-size",
];

/// A wkhtmltopdf invocation as a program plus argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WkCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WkCommand {
    /// Build the command for `options`, with [`INPUT_PLACEHOLDER`] in the
    /// input position.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wkhtmltopdf_view::{PdfOptions, PdfViewConfig, WkCommand};
    ///
    /// let mut options = PdfOptions::from_config(&PdfViewConfig::default());
    /// options.set_option("copies", 2);
    ///
    /// let command = WkCommand::build(&options);
    /// assert_eq!(
    ///     command.to_shell_string(),
    ///     "/usr/bin/wkhtmltopdf --copies 2 --orientation Portrait --page-size A4 --title \"\" \"%input%\" -"
    /// );
    /// ```
    pub fn build(options: &PdfOptions) -> Self {
        let mut args: Vec<OsString> = Vec::new();

        let copies = options.copies();
        if copies > 1 {
            args.push("--copies".into());
            args.push(copies.to_string().into());
        }

        args.push("--orientation".into());
        args.push(options.orientation().into());
        args.push("--page-size".into());
        args.push(options.page_size().into());

        if options.toc() {
            args.push("--toc".into());
        }
        if options.grayscale() {
            args.push("--grayscale".into());
        }
        if let Some(password) = options.password() {
            args.push("--password".into());
            args.push(password.into());
        }
        if let Some(username) = options.username() {
            args.push("--username".into());
            args.push(username.into());
        }

        push_section(&mut args, options, keys::FOOTER);
        push_section(&mut args, options, keys::HEADER);

        args.push("--title".into());
        args.push(options.title().into());
        args.push(INPUT_PLACEHOLDER.into());
        args.push(STDOUT_TARGET.into());

        Self {
            program: options.binary(),
            args,
        }
    }

    /// Assemble a command from an explicit program and argument list.
    ///
    /// Useful for custom runners and diagnostics (`--version`); renders use
    /// [`build`](Self::build).
    pub fn from_parts<I, S>(program: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.to_path_buf(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Copy of this command with the input placeholder replaced by `input`.
    pub fn with_input(&self, input: &Path) -> Self {
        let args = self
            .args
            .iter()
            .map(|arg| {
                if arg == INPUT_PLACEHOLDER {
                    input.as_os_str().to_os_string()
                } else {
                    arg.clone()
                }
            })
            .collect();

        Self {
            program: self.program.clone(),
            args,
        }
    }

    /// The executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments, excluding the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Number of times `flag` appears as an argument.
    pub fn count_flag(&self, flag: &str) -> usize {
        self.args.iter().filter(|arg| *arg == flag).count()
    }

    /// The value following the first occurrence of `flag`.
    pub fn flag_value(&self, flag: &str) -> Option<String> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(|v| v.to_string_lossy().into_owned())
    }

    /// One-line rendering in the legacy shell form, for logging.
    ///
    /// Header/footer values, the title and the input path are wrapped in
    /// double quotes; nothing is escaped. Credential values are replaced by
    /// [`REDACTED`]. Never pass this to a shell.
    pub fn to_shell_string(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        let mut quote_next = false;
        let mut redact_next = false;

        for arg in &self.args {
            let arg = arg.to_string_lossy();
            let is_input = arg == INPUT_PLACEHOLDER || self.is_input_position(&arg);
            line.push(' ');
            if redact_next {
                line.push_str(REDACTED);
            } else if quote_next || is_input {
                line.push('"');
                line.push_str(&arg);
                line.push('"');
            } else {
                line.push_str(&arg);
            }
            quote_next = arg == "--title"
                || arg.starts_with("--footer-")
                || arg.starts_with("--header-");
            redact_next = CREDENTIAL_FLAGS.iter().any(|flag| arg == *flag);
        }

        line
    }

    // The input is always second to last, just before the stdout target.
    fn is_input_position(&self, arg: &str) -> bool {
        let len = self.args.len();
        len >= 2 && self.args[len - 2] == arg && self.args[len - 1] == STDOUT_TARGET
    }
}

impl fmt::Display for WkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

fn push_section(args: &mut Vec<OsString>, options: &PdfOptions, section: &str) {
    let Some(entries) = options.section(section) else {
        return;
    };

    for (key, value) in entries {
        if SECTION_KEYS.contains(&key.as_str()) {
            args.push(format!("--{}-{}", section, key).into());
            args.push(value.to_string().into());
        } else {
            log::trace!("Dropping unsupported {} option: {}", section, key);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PdfViewConfig;
    use crate::options::OptionValue;

    fn defaults() -> PdfOptions {
        PdfOptions::from_config(&PdfViewConfig::default())
    }

    fn args_of(command: &WkCommand) -> Vec<String> {
        command
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_command() {
        let command = WkCommand::build(&defaults());

        assert_eq!(command.program(), Path::new("/usr/bin/wkhtmltopdf"));
        assert_eq!(
            args_of(&command),
            vec![
                "--orientation",
                "Portrait",
                "--page-size",
                "A4",
                "--title",
                "",
                "%input%",
                "-"
            ]
        );
    }

    #[test]
    fn test_copies_only_when_greater_than_one() {
        let mut options = defaults();
        for copies in [-3, 0, 1] {
            options.set_option(keys::COPIES, copies);
            assert_eq!(WkCommand::build(&options).count_flag("--copies"), 0);
        }

        for copies in [2, 5, 40] {
            options.set_option(keys::COPIES, copies);
            let command = WkCommand::build(&options);
            assert_eq!(command.count_flag("--copies"), 1);
            assert_eq!(command.flag_value("--copies"), Some(copies.to_string()));
        }
    }

    #[test]
    fn test_full_ordering() {
        let mut options = defaults();
        options.set_options([
            (keys::COPIES, OptionValue::from(3)),
            (keys::ORIENTATION, OptionValue::from("Landscape")),
            (keys::PAGE_SIZE, OptionValue::from("Letter")),
            (keys::TOC, OptionValue::from(true)),
            (keys::GRAYSCALE, OptionValue::from(true)),
            (keys::USERNAME, OptionValue::from("alice")),
            (keys::PASSWORD, OptionValue::from("s3cret")),
            (keys::HEADER, OptionValue::map([("left", "Acme Corp")])),
            (keys::FOOTER, OptionValue::map([("center", "[page]")])),
            (keys::TITLE, OptionValue::from("Invoice 42")),
        ]);

        let command = WkCommand::build(&options);
        assert_eq!(
            args_of(&command),
            vec![
                "--copies",
                "3",
                "--orientation",
                "Landscape",
                "--page-size",
                "Letter",
                "--toc",
                "--grayscale",
                "--password",
                "s3cret",
                "--username",
                "alice",
                "--footer-center",
                "[page]",
                "--header-left",
                "Acme Corp",
                "--title",
                "Invoice 42",
                "%input%",
                "-"
            ]
        );
    }

    #[test]
    fn test_section_drops_unknown_keys() {
        let mut options = defaults();
        options.set_option(
            keys::FOOTER,
            OptionValue::map([
                ("right", "[page]"),
                ("colour", "red"),
                ("font-size", "8"),
                ("exec", "rm -rf /"),
                ("line", "1"),
            ]),
        );

        let args = args_of(&WkCommand::build(&options));
        assert!(args.contains(&"--footer-right".to_string()));
        assert!(args.contains(&"--footer-font-size".to_string()));
        assert!(args.contains(&"--footer-line".to_string()));
        assert!(!args.iter().any(|a| a.contains("colour") || a.contains("red")));
        assert!(!args.iter().any(|a| a.contains("exec") || a.contains("rm -rf")));
    }

    #[test]
    fn test_every_allowed_section_key_is_emitted() {
        for section in [keys::HEADER, keys::FOOTER] {
            let mut options = defaults();
            options.set_option(
                section,
                OptionValue::map(SECTION_KEYS.iter().map(|k| (*k, "v"))),
            );

            let command = WkCommand::build(&options);
            for key in SECTION_KEYS {
                let flag = format!("--{}-{}", section, key);
                assert_eq!(command.count_flag(&flag), 1, "missing {}", flag);
            }
        }
    }

    #[test]
    fn test_non_map_section_is_ignored() {
        let mut options = defaults();
        options.set_option(keys::HEADER, "just text");

        let command = WkCommand::build(&options);
        assert!(!args_of(&command).iter().any(|a| a.starts_with("--header-")));
    }

    #[test]
    fn test_values_are_single_arguments() {
        let mut options = defaults();
        options.set_option(keys::TITLE, "Q3 \"final\"; echo pwned");
        options.set_option(keys::HEADER, OptionValue::map([("center", "$(whoami)")]));

        let command = WkCommand::build(&options);
        assert_eq!(
            command.flag_value("--title"),
            Some("Q3 \"final\"; echo pwned".to_string())
        );
        assert_eq!(
            command.flag_value("--header-center"),
            Some("$(whoami)".to_string())
        );
    }

    #[test]
    fn test_with_input_replaces_placeholder() {
        let command = WkCommand::build(&defaults()).with_input(Path::new("/tmp/wk/abc.html"));
        let args = args_of(&command);

        assert!(!args.contains(&INPUT_PLACEHOLDER.to_string()));
        assert_eq!(args[args.len() - 2], "/tmp/wk/abc.html");
        assert_eq!(args[args.len() - 1], "-");
    }

    #[test]
    fn test_shell_string_redacts_credentials() {
        let mut options = defaults();
        options.set_options([(keys::USERNAME, "alice"), (keys::PASSWORD, "s3cret")]);

        let command = WkCommand::build(&options);
        let line = command.to_shell_string();

        assert!(!line.contains("s3cret"), "password leaked: {}", line);
        assert!(!line.contains("alice"), "username leaked: {}", line);
        assert!(line.contains("--password [REDACTED] --username [REDACTED]"));
        assert_eq!(command.to_string(), line);
        assert_eq!(command.flag_value("--password"), Some("s3cret".to_string()));
    }

    #[test]
    fn test_shell_string_quotes_like_legacy_form() {
        let mut options = defaults();
        options.set_option(keys::FOOTER, OptionValue::map([("left", "Page [page]")]));
        options.set_option(keys::TITLE, "Report");

        let line = WkCommand::build(&options)
            .with_input(Path::new("/tmp/x.html"))
            .to_shell_string();
        assert_eq!(
            line,
            "/usr/bin/wkhtmltopdf --orientation Portrait --page-size A4 \
             --footer-left \"Page [page]\" --title \"Report\" \"/tmp/x.html\" -"
        );
    }
}
