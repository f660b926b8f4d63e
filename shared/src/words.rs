//! Amount in words on the Indian numbering scale (thousand, lakh, crore).

const ONES: [&str; 20] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
    "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN",
    "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// `"ONE LAKH FIFTY THOUSAND ONLY"` for 150000.
///
/// Paise are rounded away. Zero, negative-zero and non-finite input give
/// `"ZERO"`.
pub fn amount_in_words(amount: f64) -> String {
    if !amount.is_finite() {
        return "ZERO".to_string();
    }
    let rupees = amount.abs().round() as u64;
    if rupees == 0 {
        return "ZERO".to_string();
    }
    let words = integer_words(rupees);
    if amount < 0.0 {
        format!("MINUS {} ONLY", words)
    } else {
        format!("{} ONLY", words)
    }
}

fn integer_words(n: u64) -> String {
    let mut parts: Vec<String> = Vec::new();

    let crores = n / CRORE;
    let rest = n % CRORE;
    if crores > 0 {
        parts.push(format!("{} CRORE", integer_words(crores)));
    }

    let lakhs = rest / LAKH;
    if lakhs > 0 {
        parts.push(format!("{} LAKH", below_hundred(lakhs)));
    }

    let thousands = (rest % LAKH) / THOUSAND;
    if thousands > 0 {
        parts.push(format!("{} THOUSAND", below_hundred(thousands)));
    }

    let hundreds = rest % THOUSAND;
    if hundreds > 0 {
        parts.push(below_thousand(hundreds));
    }

    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => format!("{} HUNDRED", ONES[h as usize]),
        (h, r) => format!("{} HUNDRED AND {}", ONES[h as usize], below_hundred(r)),
    }
}

fn below_hundred(n: u64) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_amounts() {
        assert_eq!(amount_in_words(0.0), "ZERO");
        assert_eq!(amount_in_words(100.0), "ONE HUNDRED ONLY");
        assert_eq!(amount_in_words(150000.0), "ONE LAKH FIFTY THOUSAND ONLY");
        assert_eq!(
            amount_in_words(12345678.0),
            "ONE CRORE TWENTY THREE LAKH FORTY FIVE THOUSAND SIX HUNDRED AND SEVENTY EIGHT ONLY"
        );
    }

    #[test]
    fn test_and_joiner_stays_inside_the_hundreds_group() {
        assert_eq!(amount_in_words(100005.0), "ONE LAKH FIVE ONLY");
        assert_eq!(amount_in_words(2000.0), "TWO THOUSAND ONLY");
        assert_eq!(amount_in_words(101.0), "ONE HUNDRED AND ONE ONLY");
        assert_eq!(amount_in_words(19.0), "NINETEEN ONLY");
        assert_eq!(amount_in_words(40.0), "FORTY ONLY");
    }

    #[test]
    fn test_large_crore_values_recurse() {
        assert_eq!(
            amount_in_words(1_500_000_000.0),
            "ONE HUNDRED AND FIFTY CRORE ONLY"
        );
    }

    #[test]
    fn test_odd_inputs() {
        assert_eq!(amount_in_words(f64::NAN), "ZERO");
        assert_eq!(amount_in_words(0.4), "ZERO");
        assert_eq!(amount_in_words(99.6), "ONE HUNDRED ONLY");
        assert_eq!(amount_in_words(-250.0), "MINUS TWO HUNDRED AND FIFTY ONLY");
    }
}
