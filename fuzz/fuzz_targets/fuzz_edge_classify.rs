#![no_main]

use arbitrary::Arbitrary;
use axum::http::Method;
use libfuzzer_sys::fuzz_target;
use nodeboard_edge::{EdgeRouter, MemoryAssetStore, Route, StaticMatcher};

#[derive(Arbitrary, Debug)]
struct Input {
    method: u8,
    any_dot: bool,
    path: String,
}

fuzz_target!(|input: Input| {
    let matcher = if input.any_dot {
        StaticMatcher::AnyDot
    } else {
        StaticMatcher::Extensions
    };
    let router = EdgeRouter::new(MemoryAssetStore::new()).with_matcher(matcher);
    let method = match input.method % 5 {
        0 => Method::GET,
        1 => Method::HEAD,
        2 => Method::POST,
        3 => Method::OPTIONS,
        _ => Method::DELETE,
    };

    let route = router.classify(&method, &input.path);

    // Classification is total and consistent with its inputs.
    match route {
        Route::Preflight => assert_eq!(method, Method::OPTIONS),
        Route::Api => assert!(input.path.starts_with("/api/")),
        Route::Asset => assert!(matcher.is_static(&input.path)),
        Route::Fallback => assert!(!matcher.is_static(&input.path)),
    }
});
