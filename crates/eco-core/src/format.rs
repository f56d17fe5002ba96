//! Display formatting for view components.
//!
//! Pure functions only. Anything that needs "today" takes it as a parameter so
//! page handlers decide the clock and tests stay deterministic.

use chrono::NaiveDate;

/// Format an amount in minor units as a currency string.
///
/// Whole amounts drop the fractional part (`$12,500`); anything with cents
/// shows two decimals (`$12,500.50`). Currencies without a known symbol are
/// written with the code as a suffix (`1,000 JPY`).
#[must_use]
pub fn format_currency(amount_cents: i64, currency: &str) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    let whole = group_thousands(abs / 100);
    let cents = abs % 100;
    let number = if cents == 0 {
        whole
    } else {
        format!("{whole}.{cents:02}")
    };

    let code = currency.trim().to_ascii_uppercase();
    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None if code.is_empty() => format!("{sign}{number}"),
        None => format!("{sign}{number} {code}"),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "CAD" => Some("CA$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed number of days from `today` until `deadline`. Negative once past.
#[must_use]
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Human label for an opportunity deadline relative to `today`.
#[must_use]
pub fn deadline_label(deadline: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(deadline) = deadline else {
        return "No deadline".to_string();
    };
    match days_until(deadline, today) {
        0 => "Closes today".to_string(),
        1 => "Closes tomorrow".to_string(),
        -1 => "Closed yesterday".to_string(),
        n if n > 1 => format!("Closes in {n} days"),
        n => format!("Closed {} days ago", -n),
    }
}

/// Up to two uppercase initials for avatar badges. `"?"` for blank names.
#[must_use]
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

/// Truncate to at most `max_chars` characters, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(max_chars - 1).collect();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn currency_whole_amounts_drop_cents() {
        assert_eq!(format_currency(1_250_000, "USD"), "$12,500");
        assert_eq!(format_currency(0, "usd"), "$0");
        assert_eq!(format_currency(100_000_000_00, "USD"), "$100,000,000");
    }

    #[test]
    fn currency_with_cents() {
        assert_eq!(format_currency(1_250_050, "USD"), "$12,500.50");
        assert_eq!(format_currency(5, "GBP"), "£0.05");
    }

    #[test]
    fn currency_negative_and_unknown_code() {
        assert_eq!(format_currency(-99_900, "EUR"), "-€999");
        assert_eq!(format_currency(100_000, "JPY"), "1,000 JPY");
        assert_eq!(format_currency(100_000, ""), "1,000");
        assert_eq!(format_currency(250_000, "CAD"), "CA$2,500");
    }

    #[test]
    fn day_counts() {
        let today = date(2026, 3, 1);
        assert_eq!(days_until(date(2026, 3, 15), today), 14);
        assert_eq!(days_until(date(2026, 2, 27), today), -2);
        assert_eq!(days_until(today, today), 0);
    }

    #[test]
    fn deadline_labels() {
        let today = date(2026, 3, 1);
        assert_eq!(deadline_label(None, today), "No deadline");
        assert_eq!(deadline_label(Some(today), today), "Closes today");
        assert_eq!(deadline_label(Some(date(2026, 3, 2)), today), "Closes tomorrow");
        assert_eq!(deadline_label(Some(date(2026, 3, 11)), today), "Closes in 10 days");
        assert_eq!(deadline_label(Some(date(2026, 2, 28)), today), "Closed yesterday");
        assert_eq!(deadline_label(Some(date(2026, 2, 22)), today), "Closed 7 days ago");
    }

    #[test]
    fn initials_from_names() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("studio eleven collective"), "SE");
        assert_eq!(initials("Björk"), "B");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("naïve café culture", 7), "naïve…");
        assert_eq!(truncate("abc", 0), "");
    }
}
