//! Command-line tokenizer.
//!
//! Splits a raw line into arguments on whitespace, honoring double-quoted
//! spans and backslash escapes. Quoting and escaping are local
//! modifications of whatever state they occur in, so the machine keeps an
//! explicit state stack rather than a single state: closing a quote or
//! finishing an escape pops back to the enclosing state.

/// Tokenizer state. `InEscape` and `InQuotedString` are pushed on top of
/// the state they interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingArgument,
    InArgument,
    InQuotedString,
    InEscape,
}

/// Split a command line into arguments.
///
/// Never fails: an unterminated quote or trailing escape flushes whatever
/// is buffered instead of raising an error.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut stack = vec![State::AwaitingArgument];
    let mut out = Vec::new();
    let mut buffer = String::new();

    for c in line.chars() {
        match *stack.last().unwrap_or(&State::AwaitingArgument) {
            State::AwaitingArgument => {
                stack.push(State::InArgument);
                match c {
                    ' ' => {
                        stack.pop();
                    }
                    '\\' => stack.push(State::InEscape),
                    '"' => stack.push(State::InQuotedString),
                    _ => buffer.push(c),
                }
            }
            State::InArgument => match c {
                ' ' => {
                    out.push(std::mem::take(&mut buffer));
                    stack.pop();
                }
                '\\' => stack.push(State::InEscape),
                '"' => stack.push(State::InQuotedString),
                _ => buffer.push(c),
            },
            State::InQuotedString => match c {
                '"' => {
                    stack.pop();
                }
                '\\' => stack.push(State::InEscape),
                _ => buffer.push(c),
            },
            State::InEscape => {
                buffer.push(c);
                stack.pop();
            }
        }
    }

    if !buffer.is_empty() {
        out.push(buffer);
    }
    out
}
