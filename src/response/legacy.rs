use std::borrow::Cow;
use num_bigint::BigUint;

fn digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Widest litteral rewritten. Wider ones are left as they are.
const MAX_WIDTH: usize = 1 << 16;

/// Bits of `value`, most significant first, truncated or padded to `width`.
fn bits(value: &BigUint, width: usize) -> String {
    let digits = value.to_str_radix(2);
    if digits.len() >= width {
        digits[digits.len() - width..].to_string()
    } else {
        let mut bits = "0".repeat(width - digits.len());
        bits.push_str(&digits);
        bits
    }
}

/**
 * Recognize `bv<value>[<width>]` at the start of `s`.
 *
 * Returns the replacement bits and the length of the recognized text.
 */
fn legacy_litteral(s: &str) -> Option<(String, usize)> {
    let after = s.strip_prefix("bv")?;
    let value_len = digits(after);
    if value_len == 0 {
        return None
    }

    let width_part = after[value_len..].strip_prefix('[')?;
    let width_len = digits(width_part);
    if width_len == 0 || !width_part[width_len..].starts_with(']') {
        return None
    }

    let width: usize = width_part[..width_len].parse().ok()?;
    if width > MAX_WIDTH {
        return None
    }

    let value: BigUint = after[..value_len].parse().ok()?;
    Some((bits(&value, width), 2 + value_len + 1 + width_len + 1))
}

/**
 * Rewrite the legacy bit-vector litterals `bv<value>[<width>]` into `#b<bits>`.
 *
 * Everything else is left untouched.
 */
pub fn normalize_bitvectors(reply: &str) -> Cow<'_, str> {
    if !reply.contains("bv") {
        return Cow::Borrowed(reply)
    }

    let mut out = String::with_capacity(reply.len());
    let mut rest = reply;
    while let Some(i) = rest.find("bv") {
        out.push_str(&rest[..i]);
        let candidate = &rest[i..];
        match legacy_litteral(candidate) {
            Some((bits, len)) => {
                out.push_str("#b");
                out.push_str(&bits);
                rest = &candidate[len..];
            },
            None => {
                out.push('b');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}
