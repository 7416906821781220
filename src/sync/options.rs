//! Validation of the extra rsync options.
//!
//! `-a` and `-v` are always passed, so any spelling of them in the user's
//! options is dropped before invoking rsync.

/// Options already implied by the `-av` every mirror run uses.
pub const IMPLICIT_OPTIONS: [&str; 5] = ["-av", "--archive", "-a", "--verbose", "-v"];

/// Separator used by the configuration form's options field.
pub const OPTIONS_TEXT_SEPARATOR: &str = ", ";

/// Result of [`validate_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedOptions {
    /// Options to pass through, in their original order.
    pub options: Vec<String>,
    /// Options that were removed because they duplicate the defaults.
    pub stripped: Vec<String>,
}

impl ValidatedOptions {
    pub fn has_stripped(&self) -> bool {
        !self.stripped.is_empty()
    }

    /// Warning to report when implicit options were supplied.
    pub fn warning(&self) -> Option<String> {
        self.has_stripped().then(|| {
            format!(
                "Warning: --archive (-a) and --verbose (-v) are default options (-av)! Ignored: {}",
                self.stripped.join(" ")
            )
        })
    }
}

/// Split options into pass-through and implicit ones (case-sensitive match).
pub fn validate_options<S: AsRef<str>>(options: &[S]) -> ValidatedOptions {
    let (stripped, options): (Vec<String>, Vec<String>) = options
        .iter()
        .map(|o| o.as_ref().to_string())
        .partition(|o| IMPLICIT_OPTIONS.contains(&o.as_str()));
    ValidatedOptions { options, stripped }
}

/// Parse the options text field (`"--progress, -l"`).
///
/// Blank text yields no options. Duplicates keep their first occurrence.
pub fn parse_options_text(text: &str) -> ValidatedOptions {
    if text.trim().is_empty() {
        return ValidatedOptions::default();
    }
    let mut unique: Vec<&str> = Vec::new();
    for entry in text.trim().split(OPTIONS_TEXT_SEPARATOR) {
        let entry = entry.trim();
        if !entry.is_empty() && !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    validate_options(&unique)
}

/// Render options back into the text form accepted by [`parse_options_text`].
pub fn format_options_text(options: Option<&[String]>) -> String {
    options
        .map(|o| o.join(OPTIONS_TEXT_SEPARATOR))
        .unwrap_or_default()
}
