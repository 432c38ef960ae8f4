#![no_main]

use libfuzzer_sys::fuzz_target;
use prayerq::query::{compile, evaluate, tokenize};
use prayerq::record::{PrayerRecord, Status};

fuzz_target!(|data: &str| {
    // Any query string must tokenize, compile and evaluate without panicking
    let tokens = tokenize(data);
    let expr = compile(&tokens);

    let record = PrayerRecord {
        id: "fuzz".to_string(),
        name: "Ann".to_string(),
        request_text: "job interview".to_string(),
        answer_text: Some("got the job".to_string()),
        status: Status::Answered,
        requested_at: None,
        answered_at: None,
    };
    let _ = evaluate(&record, expr.as_ref());
});
