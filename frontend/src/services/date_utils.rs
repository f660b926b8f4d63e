use chrono::NaiveDate;
use js_sys::Date;

/// Today in the browser's local time zone.
pub fn today() -> NaiveDate {
    let now = Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// `(year, month)` of today.
pub fn current_month() -> (i32, u32) {
    use chrono::Datelike;
    let today = today();
    (today.year(), today.month())
}

/// Value for an `<input type="date">`.
pub fn input_value(date: NaiveDate) -> String {
    shared::datetime::format_iso_date(date)
}

pub fn from_input_value(value: &str) -> Option<NaiveDate> {
    shared::datetime::parse_iso_date(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_today_matches_js_date() {
        let now = Date::new_0();
        let today = today();
        assert_eq!(input_value(today).len(), 10);
        assert_eq!(chrono::Datelike::day(&today), now.get_date());
    }

    #[wasm_bindgen_test]
    fn test_input_value_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(input_value(date), "2025-12-31");
        assert_eq!(from_input_value("2025-12-31"), Some(date));
        assert_eq!(from_input_value(""), None);
    }
}
