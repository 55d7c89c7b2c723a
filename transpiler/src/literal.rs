//! Decoding of literal tokens into constant values.

use interpreter::Value;

/// Decodes a literal token. Returns the reason on failure.
pub fn parse_literal(token: &str) -> Result<Value, String> {
    let token = token.trim();
    match token {
        "" => return Err("empty literal".to_string()),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        "undefined" => return Ok(Value::Undefined),
        _ => {}
    }

    if let Some(quote @ ('"' | '\'')) = token.chars().next() {
        return parse_string(token, quote).map(Value::String);
    }

    let digits = token.replace('_', "");
    if let Ok(n) = digits.parse::<i64>() {
        return Ok(Value::Integer(n));
    }
    match digits.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Float(n)),
        _ => Err(format!("`{token}` is not a string, number or keyword literal")),
    }
}

fn parse_string(token: &str, quote: char) -> Result<String, String> {
    let body = token
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .filter(|_| token.len() >= 2)
        .ok_or_else(|| format!("unterminated string literal {token}"))?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == quote {
            return Err(format!("unescaped {quote} inside string literal {token}"));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape \\u{hex}"))?
            }
            Some(c @ ('\\' | '"' | '\'')) => c,
            Some(c) => return Err(format!("unknown escape \\{c}")),
            None => return Err(format!("dangling escape in {token}")),
        };
        out.push(escaped);
    }
    Ok(out)
}
