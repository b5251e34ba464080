#![no_main]
use libfuzzer_sys::fuzz_target;
use nordplug::pricing::client::{parse_price_response, select_day};
use nordplug::pricing::{NormalizeOptions, normalize};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(days) = parse_price_response(body) else {
        return;
    };

    // Exercise every listed day through selection and normalization
    for key in days.keys().cloned().collect::<Vec<_>>() {
        let Ok(date) = chrono::NaiveDate::parse_from_str(&key, "%Y-%m-%d") else {
            continue;
        };
        if let Ok(series) = select_day(days.clone(), date) {
            let options = NormalizeOptions {
                vat_percentage: Some(24.0),
                ..Default::default()
            };
            let _ = normalize(series.as_slice(), &options);
        }
    }
});
