//! Delimited-line parsing for the node directory
//!
//! Quoting follows the classic CSV rules: a field that opens with the
//! quote character runs until the matching close quote, delimiters inside
//! it are literal, and a doubled quote stands for one quote character.
//! Quoted fields never span lines: a row is always a single line.

/// Decode ISO-8859-1 bytes. Every byte is a valid code point, so this
/// cannot fail regardless of what the file contains.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    StartField,
    InField,
    InQuoted,
    QuoteInQuoted,
}

/// Split one line into fields. A blank line yields no fields.
pub fn split_fields(line: &str, delimiter: char, quote: char) -> Vec<String> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    if line.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::StartField;

    for c in line.chars() {
        state = match state {
            State::StartField if c == quote => State::InQuoted,
            State::StartField | State::InField if c == delimiter => {
                fields.push(std::mem::take(&mut field));
                State::StartField
            }
            State::StartField | State::InField => {
                field.push(c);
                State::InField
            }
            State::InQuoted if c == quote => State::QuoteInQuoted,
            State::InQuoted => {
                field.push(c);
                State::InQuoted
            }
            State::QuoteInQuoted if c == quote => {
                field.push(quote);
                State::InQuoted
            }
            State::QuoteInQuoted if c == delimiter => {
                fields.push(std::mem::take(&mut field));
                State::StartField
            }
            // Stray text after a closing quote is kept as-is
            State::QuoteInQuoted => {
                field.push(c);
                State::InField
            }
        };
    }
    fields.push(field);
    fields
}
