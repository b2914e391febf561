use chrono::Utc;
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// Declares a private submodule and re-exports its contents, exactly the way
/// every multi-file module in this workspace is assembled.
#[macro_export]
macro_rules! submodule {
    ($name:ident) => {
        mod $name;
        pub use $name::*;
    };
}

/// Timestamp used in log lines and the persisted snapshot.
pub fn now() -> chrono::DateTime<Utc> {
    Utc::now()
}

/// Grapheme-aware display width, used to line-wrap log output.
pub fn str_width(string: &str) -> usize {
    string.graphemes(true).count()
}

/// Splits log message text into lines, always returning at least one.
pub fn to_lines(text: impl Into<Cow<'static, str>>) -> Vec<Cow<'static, str>> {
    let text = text.into();
    if text.is_empty() {
        return vec!["".into()];
    }
    text.lines().map(|line| line.to_owned().into()).collect()
}

#[macro_export]
macro_rules! hex_bytes {
    ($hex:expr) => {
        bytes::BytesMut::from(hex::decode($hex).unwrap().as_slice()).freeze()
    };
}
