#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    template: &'a str,
    query: &'a str,
}

fuzz_target!(|input: Input| {
    // Encoding and expansion must not panic on any input
    let query = krasnyy::query::EncodedQuery::new(input.query);
    let _ = krasnyy::query::build_url(input.template, &query);
});
