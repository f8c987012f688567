#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON documents must load into some dictionary without panicking
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let dictionary = krasnyy::dorks::TemplateDictionary::from_value(value);
        let query = krasnyy::query::EncodedQuery::new("fuzz");
        let locale = krasnyy::locale::LocaleBundle::default();
        let _ = dictionary.render_units(&query, &locale).count();
    }
});
