use interpreter::{BinaryOperator, UnaryOperator, UpdateOperator};

pub enum Prefix {
    Unary(UnaryOperator),
    Update(UpdateOperator),
}

pub fn prefix(token: &str) -> Option<Prefix> {
    let op = match token.trim() {
        "!" => Prefix::Unary(UnaryOperator::Not),
        "-" => Prefix::Unary(UnaryOperator::Negate),
        "+" => Prefix::Unary(UnaryOperator::Plus),
        "++" => Prefix::Update(UpdateOperator::Increment),
        "--" => Prefix::Update(UpdateOperator::Decrement),
        _ => return None,
    };
    Some(op)
}

pub fn binary(token: &str) -> Option<BinaryOperator> {
    let op = match token.trim() {
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Subtract,
        "*" => BinaryOperator::Multiply,
        "/" => BinaryOperator::Divide,
        "%" => BinaryOperator::Remainder,
        "==" => BinaryOperator::Equal,
        "!=" => BinaryOperator::NotEqual,
        "===" => BinaryOperator::StrictEqual,
        "!==" => BinaryOperator::StrictNotEqual,
        "<" => BinaryOperator::LessThan,
        "<=" => BinaryOperator::LessThanOrEqual,
        ">" => BinaryOperator::GreaterThan,
        ">=" => BinaryOperator::GreaterThanOrEqual,
        "&&" => BinaryOperator::And,
        "||" => BinaryOperator::Or,
        "??" => BinaryOperator::Coalesce,
        _ => return None,
    };
    Some(op)
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        assert_eq!(binary("<"), Some(BinaryOperator::LessThan));
        assert_eq!(binary("!=="), Some(BinaryOperator::StrictNotEqual));
        assert_eq!(binary("<=>"), None);
        assert!(matches!(
            prefix("++"),
            Some(Prefix::Update(UpdateOperator::Increment))
        ));
        assert!(prefix("~").is_none());
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("model"));
        assert!(is_identifier("_i2"));
        assert!(is_identifier("$index"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
