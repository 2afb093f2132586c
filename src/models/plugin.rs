use serde_json::Value;

/// Plugin keys the command line knows about.
///
/// Each plugin becomes a `--<name>` flag. Syntax files may carry other keys;
/// those are forwarded to the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
    /// Replace each leading tab with an indent unit (number of spaces, or a literal string)
    Indent,

    /// `true` strips spaces and tabs at the end of every line
    TrailingWhitespace,

    /// `"lf"` or `"crlf"`
    LineEndings,

    /// `true` ends the file with exactly one line break, `false` with none
    FinalNewline,
}

impl Plugin {
    pub const ALL: [Plugin; 4] = [
        Plugin::Indent,
        Plugin::TrailingWhitespace,
        Plugin::LineEndings,
        Plugin::FinalNewline,
    ];

    /// Key used in syntax files and override maps
    pub fn name(self) -> &'static str {
        match self {
            Plugin::Indent => "indent",
            Plugin::TrailingWhitespace => "trailing_whitespace",
            Plugin::LineEndings => "line_endings",
            Plugin::FinalNewline => "final_newline",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|plugin| plugin.name() == name)
    }

    /// Convert a raw flag value into the value stored in the override map.
    ///
    /// A bare flag means `true`. Values that parse as JSON keep their type
    /// (`4`, `false`, `"x"`); anything else is taken as a plain string.
    pub fn flag_value(raw: Option<&str>) -> Value {
        match raw {
            None => Value::Bool(true),
            Some(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            }
        }
    }
}

impl std::fmt::Display for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
