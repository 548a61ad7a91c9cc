//! FTP reply handling
//!
//! Defines reply codes, the [`Reply`] value written on the control channel
//! and the helpers both ends use to recognise reply lines.

pub const FILE_STATUS_OK: u16 = 150;
pub const OK: u16 = 200;
pub const HELP: u16 = 214;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ENTERING_PASSIVE: u16 = 227;
pub const LOGIN_SUCCESS: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const CANT_OPEN_DATA: u16 = 425;
pub const LOCAL_ERROR: u16 = 451;
pub const SYNTAX_ERROR: u16 = 500;
pub const ARGUMENT_ERROR: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const BAD_SEQUENCE: u16 = 503;
pub const PARAMETER_NOT_IMPLEMENTED: u16 = 504;
pub const AUTH_FAILED: u16 = 530;
pub const FILE_UNAVAILABLE: u16 = 550;

/// A reply sent on the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `CODE text`
    Single { code: u16, text: String },
    /// An opening line, free-form body lines and a closing line whose code
    /// tells the reader the reply is over.
    Multi {
        code: u16,
        text: String,
        body: Vec<String>,
        closing_code: u16,
        closing_text: String,
    },
}

impl Reply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Reply::Single {
            code,
            text: text.into(),
        }
    }

    pub fn multi(
        code: u16,
        text: impl Into<String>,
        body: Vec<String>,
        closing_code: u16,
        closing_text: impl Into<String>,
    ) -> Self {
        Reply::Multi {
            code,
            text: text.into(),
            body,
            closing_code,
            closing_text: closing_text.into(),
        }
    }

    /// Code of the first line.
    pub fn code(&self) -> u16 {
        match self {
            Reply::Single { code, .. } | Reply::Multi { code, .. } => *code,
        }
    }

    /// Code of the last line, the one a reader waits for.
    pub fn final_code(&self) -> u16 {
        match self {
            Reply::Single { code, .. } => *code,
            Reply::Multi { closing_code, .. } => *closing_code,
        }
    }

    /// Renders the reply as CRLF-terminated wire text.
    ///
    /// CR and LF inside a body line become spaces, so one body line is always
    /// one wire line. Body lines starting with a digit then get a leading
    /// space so they cannot be mistaken for a reply line.
    pub fn to_wire(&self) -> String {
        match self {
            Reply::Single { code, text } => format_response(*code, text),
            Reply::Multi {
                code,
                text,
                body,
                closing_code,
                closing_text,
            } => {
                let mut wire = format_response(*code, text);
                for line in body {
                    let line = line.replace(['\r', '\n'], " ");
                    if line.starts_with(|c: char| c.is_ascii_digit()) {
                        wire.push(' ');
                    }
                    wire.push_str(&line);
                    wire.push_str("\r\n");
                }
                wire.push_str(&format_response(*closing_code, closing_text));
                wire
            }
        }
    }
}

/// Format an FTP response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Extracts the reply code from a line such as `226 Transfer complete`.
///
/// Only three leading digits followed by a space, a hyphen or the end of the
/// line count as a reply line.
pub fn reply_code(line: &str) -> Option<u16> {
    let line = line.trim_end_matches(['\r', '\n']);
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return None;
    }
    match bytes.get(3) {
        None | Some(b' ') | Some(b'-') => line[..3].parse().ok(),
        _ => None,
    }
}

/// Returns the text after the code, or an empty string for a bare code.
pub fn reply_text(line: &str) -> &str {
    let line = line.trim_end_matches(['\r', '\n']);
    line.get(4..).unwrap_or("")
}

/// True when `line` is a reply line carrying exactly `code`.
pub fn is_terminator(line: &str, code: u16) -> bool {
    reply_code(line) == Some(code)
}
