//! Display formatting for money.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// The currency symbol shown in front of amounts.
const CURRENCY_SYMBOL: &str = "₴";

/// Format `number` as an amount of money with two decimal places,
/// e.g. "₴1,234.50" or "-₴30.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter(CURRENCY_SYMBOL));
    let negative_fmt =
        NEGATIVE_FMT.get_or_init(|| currency_formatter(&format!("-{CURRENCY_SYMBOL}")));

    // Rounding first avoids "-₴0.00" for tiny negative amounts.
    let number = (number * 100.0).round() / 100.0;

    let formatted_string = match (positive_fmt, negative_fmt) {
        _ if number == 0.0 => return format!("{CURRENCY_SYMBOL}0.00"),
        (_, Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), _) if number > 0.0 => positive_fmt.fmt_string(number),
        _ => {
            let sign = if number < 0.0 { "-" } else { "" };
            format!("{sign}{CURRENCY_SYMBOL}{:.2}", number.abs())
        }
    };

    pad_cents(formatted_string)
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    match Formatter::currency(prefix) {
        Ok(formatter) => Some(formatter.precision(Precision::Decimals(2))),
        Err(error) => {
            tracing::error!("Could not create currency formatter for {prefix}: {error:?}");
            None
        }
    }
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so
/// they are added back here.
fn pad_cents(formatted_string: String) -> String {
    match formatted_string.rsplit_once('.') {
        Some((_, cents)) if cents.len() >= 2 => formatted_string,
        Some((_, cents)) => format!("{formatted_string}{}", "0".repeat(2 - cents.len())),
        None => format!("{formatted_string}.00"),
    }
}
