use std::iter::Peekable;
use crate::Located;
use crate::syntax::{
    token,
    Token,
    Lexer,
    Result,
    peek,
    consume,
    consume_token
};

/**
 * Checks if a reply is an error report.
 *
 * The reply must start with the `error` token, possibly preceded by an opening parenthesis.
 */
pub fn is_error(reply: &str) -> bool {
    let text = reply.trim_start();
    let text = match text.strip_prefix('(') {
        Some(rest) => rest.trim_start(),
        None => text
    };

    match text.strip_prefix("error") {
        Some(rest) => match rest.chars().next() {
            Some(c) => c.is_whitespace() || super::lexer::is_separator(c),
            None => true
        },
        None => false
    }
}

/**
 * Parse one `(error "<message>")` group.
 *
 * Returns `None` if the next tokens do not form such a group.
 */
fn error_group<L>(lexer: &mut Peekable<L>) -> Result<Option<String>> where L: Iterator<Item=Result<Located<Token>>> {
    match peek(lexer)? {
        Some(ref token) if **token == Token::Begin => (),
        _ => return Ok(None)
    }
    consume(lexer)?;

    match consume(lexer)?.into_inner() {
        Token::Ident(ref id) if id == "error" => (),
        _ => return Ok(None)
    }

    let message = match consume(lexer)?.into_inner() {
        Token::Litteral(token::Litteral::String(message)) => message,
        _ => return Ok(None)
    };

    consume_token(lexer, Token::End)?;
    Ok(Some(message))
}

/**
 * Shift the line number of a message starting with `line <N>`.
 */
fn shift_line(message: String, line_offset: usize) -> String {
    if let Some(rest) = message.strip_prefix("line ") {
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if let Ok(n) = rest[..len].parse::<i64>() {
            return format!("line {}{}", n - line_offset as i64, &rest[len..])
        }
    }

    message
}

/**
 * Extract the message of an error reply.
 *
 * All the consecutive `(error "<message>")` groups at the start of the reply are joined with `"; "`.
 * Line numbers are shifted back by `line_offset`, the number of lines the solver received that the
 * user did not write.
 * If no group is found, the whole (trimmed) reply is the message.
 */
pub fn error_message(reply: &str, line_offset: usize) -> String {
    let mut lexer = Lexer::from_text(reply).peekable();
    let mut messages = Vec::new();

    while let Ok(Some(message)) = error_group(&mut lexer) {
        messages.push(shift_line(message, line_offset))
    }

    if messages.is_empty() {
        reply.trim().to_string()
    } else {
        messages.join("; ")
    }
}
