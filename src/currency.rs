//! Dollar formatting shared by the console and the HTML renderer.

const GROUPING_SEPARATOR: char = ',';

/// `1234.5` becomes `$1,234.50`; negatives keep a leading sign (`-$12.00`).
pub fn format_money(amount: f64) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Fixed precision with thousands grouping, without a symbol.
pub fn format_number(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value);
    match body.find('.') {
        Some(pos) => format!("{}{}", group_digits(&body[..pos]), &body[pos..]),
        None => group_digits(&body),
    }
}

fn group_digits(int_part: &str) -> String {
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(1_234.5), "$1,234.50");
        assert_eq!(format_money(625.0), "$625.00");
        assert_eq!(format_money(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_money(0.0), "$0.00");
    }

    #[test]
    fn negatives_keep_their_sign() {
        assert_eq!(format_money(-12.0), "-$12.00");
        assert_eq!(format_money(-0.001), "$0.00");
    }

    #[test]
    fn plain_numbers_use_requested_precision() {
        assert_eq!(format_number(6.25, 2), "6.25");
        assert_eq!(format_number(12_345.678, 1), "12,345.7");
    }
}
