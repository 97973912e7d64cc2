#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Schedule specs come from user config, so any text must parse or error
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = elprice::tariff::detect_format(text);
    let _ = elprice::tariff::parse_date_ranges(text, 2024);
    let _ = elprice::tariff::parse_date_ranges(text, 2023);
    if let Ok(windows) = elprice::tariff::parse_time_ranges(text) {
        for hour in 0..24 {
            let _ = windows.iter().any(|w| w.contains_hour(hour));
        }
    }
    let _ = elprice::config::parse_number("fuzz", text);
});
